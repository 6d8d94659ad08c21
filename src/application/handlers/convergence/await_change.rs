//! AwaitChangeHandler - long-poll delivery of session state.
//!
//! The caller passes the last version it has seen. If the session moved on,
//! the new projection is returned at once; otherwise the handler waits for
//! a change signal or the next poll tick, up to the deadline, and then
//! returns whatever the session looks like. A timeout is not an error.
//!
//! Dropping the returned future abandons the wait; nothing in the store is
//! affected.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, sleep_until, Instant};

use crate::config::ConvergenceConfig;
use crate::domain::foundation::{MemberId, SessionId, VersionToken};
use crate::domain::session::{Session, SessionError};
use crate::domain::state::{project, SessionState};
use crate::ports::{MemberDirectory, SessionRepository};

use super::{resolve_members, VersionWatchers};

/// Query for the next state of a session.
#[derive(Debug, Clone)]
pub struct AwaitChangeQuery {
    pub session_id: SessionId,
    pub viewer: MemberId,
    /// `None` means "anything", which returns immediately.
    pub last_known_version: Option<VersionToken>,
    /// Clamped to the configured ceiling; `None` uses the ceiling.
    pub max_wait: Option<Duration>,
}

/// Result of a long poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitChangeResult {
    pub state: SessionState,
    /// True when the deadline passed without a new version.
    pub timed_out: bool,
}

/// Handler for long-poll requests.
pub struct AwaitChangeHandler {
    repository: Arc<dyn SessionRepository>,
    directory: Arc<dyn MemberDirectory>,
    watchers: Arc<VersionWatchers>,
    poll_interval: Duration,
    max_wait: Duration,
}

impl AwaitChangeHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        directory: Arc<dyn MemberDirectory>,
        watchers: Arc<VersionWatchers>,
        config: &ConvergenceConfig,
    ) -> Self {
        Self {
            repository,
            directory,
            watchers,
            poll_interval: config.poll_interval(),
            max_wait: config.max_wait(),
        }
    }

    pub async fn handle(&self, query: AwaitChangeQuery) -> Result<AwaitChangeResult, SessionError> {
        let wait = query.max_wait.map_or(self.max_wait, |w| w.min(self.max_wait));
        let deadline = Instant::now() + wait;
        let mut changes = None;
        let mut watching = true;

        loop {
            let session = self.repository.get(&query.session_id).await?;
            let changed = query
                .last_known_version
                .as_ref()
                .map_or(true, |known| known != session.version());

            if changed || Instant::now() >= deadline {
                let state = self.render(&query.viewer, &session).await?;
                if !changed {
                    tracing::debug!(
                        session_id = %query.session_id,
                        member_id = %query.viewer,
                        "Long poll timed out"
                    );
                }
                return Ok(AwaitChangeResult {
                    state,
                    timed_out: !changed,
                });
            }

            // Subscribe only once the session is known to exist, then
            // re-read so a change between the read and the subscription is
            // not missed.
            let Some(signal) = changes.as_mut() else {
                changes = Some(self.watchers.watch(&query.session_id));
                continue;
            };

            tokio::select! {
                result = signal.changed(), if watching => {
                    if result.is_err() {
                        watching = false;
                    }
                }
                _ = sleep(self.poll_interval) => {}
                _ = sleep_until(deadline) => {}
            }
        }
    }

    async fn render(&self, viewer: &MemberId, session: &Session) -> Result<SessionState, SessionError> {
        if !session.is_member(viewer) {
            return Err(SessionError::NotAMember(viewer.clone()));
        }
        let members = resolve_members(self.directory.as_ref(), session).await;
        Ok(project(viewer, session, &members))
    }
}
