//! StateBroadcaster - push delivery of session state.
//!
//! On every `session.updated` event the broadcaster reads the session once,
//! resolves names once, then sends each active member their own masked
//! projection. Sends run concurrently. Delivery is at-most-once: failures
//! are logged and dropped, and a viewer that misses a push resynchronizes
//! with a long poll.
//!
//! Pushes for one session are serialized, and an event whose version is no
//! longer current is skipped because a newer event follows it. A viewer
//! therefore never receives an older state after a newer one.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

use crate::domain::foundation::{DomainError, EventEnvelope, SessionId};
use crate::domain::session::{SessionError, SessionUpdated};
use crate::domain::state::project;
use crate::ports::{EventHandler, MemberDirectory, PublishError, SessionRepository, StatePublisher};

use super::{resolve_members, session_id_of};

pub struct StateBroadcaster {
    repository: Arc<dyn SessionRepository>,
    directory: Arc<dyn MemberDirectory>,
    publisher: Arc<dyn StatePublisher>,
    /// One push at a time per session; entries exist only while in use.
    gates: Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>,
}

impl StateBroadcaster {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        directory: Arc<dyn MemberDirectory>,
        publisher: Arc<dyn StatePublisher>,
    ) -> Self {
        Self {
            repository,
            directory,
            publisher,
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Number of sessions with a push in flight.
    pub fn sessions_in_flight(&self) -> usize {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn gate(&self, session_id: &SessionId) -> Arc<AsyncMutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(gates.entry(*session_id).or_default())
    }

    /// Drops the gate once no other push holds or waits on it.
    fn release(&self, session_id: &SessionId, gate: Arc<AsyncMutex<()>>) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        drop(gate);
        let unused = gates
            .get(session_id)
            .is_some_and(|gate| Arc::strong_count(gate) == 1);
        if unused {
            gates.remove(session_id);
        }
    }

    async fn push(&self, session_id: SessionId, event: &EventEnvelope) -> Result<(), DomainError> {
        let session = match self.repository.get(&session_id).await {
            Ok(session) => session,
            Err(SessionError::NotFound(_)) => {
                tracing::warn!(session_id = %session_id, "Session vanished before push");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if let Ok(updated) = event.payload_as::<SessionUpdated>() {
            if &updated.version != session.version() {
                tracing::debug!(
                    session_id = %session_id,
                    version = %updated.version,
                    current = %session.version(),
                    "Superseded change, push skipped"
                );
                return Ok(());
            }
        }

        let members = resolve_members(self.directory.as_ref(), &session).await;

        let deliveries = session
            .players()
            .iter()
            .filter(|(_, player)| player.is_active())
            .map(|(member_id, _)| {
                let state = project(member_id, &session, &members);
                async move {
                    let result = self
                        .publisher
                        .send_to_player(&session_id, member_id, state)
                        .await;
                    (member_id, result)
                }
            });

        let mut delivered = 0usize;
        for (member_id, result) in join_all(deliveries).await {
            match result {
                Ok(()) => delivered += 1,
                Err(PublishError::NotConnected { .. }) => {
                    tracing::debug!(
                        session_id = %session_id,
                        member_id = %member_id,
                        "No push connection for member"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        member_id = %member_id,
                        error = %e,
                        "Push delivery failed"
                    );
                }
            }
        }

        tracing::debug!(
            session_id = %session_id,
            version = %session.version(),
            delivered,
            "Session state pushed"
        );
        Ok(())
    }
}

#[async_trait]
impl EventHandler for StateBroadcaster {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let session_id = session_id_of(&event)?;

        let gate = self.gate(&session_id);
        let result = {
            let _turn = gate.lock().await;
            self.push(session_id, &event).await
        };
        self.release(&session_id, gate);
        result
    }

    fn name(&self) -> &'static str {
        "StateBroadcaster"
    }
}
