//! LeaveSessionHandler - Command handler for leaving the table.

use std::sync::Arc;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Command to leave a session.
#[derive(Debug, Clone)]
pub struct LeaveSessionCommand {
    pub session_id: SessionId,
    pub member_id: MemberId,
}

/// Handler for leaving sessions.
///
/// Leaving a session one is not part of succeeds without changing it.
pub struct LeaveSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl LeaveSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: LeaveSessionCommand) -> Result<Session, SessionError> {
        let member_id = cmd.member_id;
        self.repository
            .modify_exclusively(
                &cmd.session_id,
                Box::new(move |session| Ok(session.leave(&member_id).into_iter().collect())),
            )
            .await
    }
}
