//! Wake-up signals for long polls.
//!
//! Keeps one `watch` channel per session that someone is waiting on and
//! bumps it whenever a `session.updated` event arrives. Waiters still
//! re-read the store; the watched value only says "look again".
//!
//! A channel lives exactly as long as its waiters: the last
//! [`ChangeSignal`] to drop removes the entry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

use crate::domain::foundation::{DomainError, EventEnvelope, SessionId, VersionToken};
use crate::domain::session::SessionUpdated;
use crate::ports::EventHandler;

use super::session_id_of;

type Senders = HashMap<SessionId, watch::Sender<Option<VersionToken>>>;

/// Registry of per-session change signals.
#[derive(Default)]
pub struct VersionWatchers {
    senders: Mutex<Senders>,
}

impl VersionWatchers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching a session. Changes after this call wake the signal.
    pub fn watch(&self, session_id: &SessionId) -> ChangeSignal<'_> {
        let receiver = self
            .lock()
            .entry(*session_id)
            .or_insert_with(|| watch::channel(None).0)
            .subscribe();
        ChangeSignal {
            watchers: self,
            session_id: *session_id,
            receiver,
        }
    }

    /// Signal that `session_id` now carries `version`.
    pub fn notify(&self, session_id: &SessionId, version: VersionToken) {
        if let Some(sender) = self.lock().get(session_id) {
            sender.send_replace(Some(version));
        }
    }

    /// Number of sessions with a live channel.
    pub fn watched_sessions(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Senders> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One waiter's subscription to a session's changes.
pub struct ChangeSignal<'a> {
    watchers: &'a VersionWatchers,
    session_id: SessionId,
    receiver: watch::Receiver<Option<VersionToken>>,
}

impl ChangeSignal<'_> {
    /// Resolves on the next notification. Errors once the channel is gone.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.receiver.changed().await
    }

    /// Last version announced for the session, if any.
    pub fn latest(&self) -> Option<VersionToken> {
        self.receiver.borrow().clone()
    }
}

impl Drop for ChangeSignal<'_> {
    fn drop(&mut self) {
        let mut senders = self.watchers.lock();
        // Our own receiver is still alive here.
        let last = senders
            .get(&self.session_id)
            .is_some_and(|sender| sender.receiver_count() <= 1);
        if last {
            senders.remove(&self.session_id);
        }
    }
}

#[async_trait]
impl EventHandler for VersionWatchers {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let session_id = session_id_of(&event)?;
        let version = event
            .payload_as::<SessionUpdated>()
            .map(|updated| updated.version)
            .unwrap_or_else(|_| VersionToken::next());
        self.notify(&session_id, version);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "VersionWatchers"
    }
}
