//! JoinSessionHandler - Command handler for taking a seat.

use std::sync::Arc;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Command to join a session.
#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub session_id: SessionId,
    pub member_id: MemberId,
}

/// Handler for joining sessions.
pub struct JoinSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl JoinSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: JoinSessionCommand) -> Result<Session, SessionError> {
        let member_id = cmd.member_id;
        self.repository
            .modify_exclusively(
                &cmd.session_id,
                Box::new(move |session| Ok(vec![session.join(member_id)])),
            )
            .await
    }
}
