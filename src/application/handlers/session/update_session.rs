//! UpdateSessionHandler - Command handler for renaming a session.

use std::sync::Arc;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Command to change a session's name and ticket reference.
#[derive(Debug, Clone)]
pub struct UpdateSessionCommand {
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub name: String,
    pub ticket_url: String,
}

/// Handler for updating session metadata.
pub struct UpdateSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl UpdateSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateSessionCommand) -> Result<Session, SessionError> {
        let UpdateSessionCommand {
            session_id,
            member_id,
            name,
            ticket_url,
        } = cmd;

        self.repository
            .modify_exclusively(
                &session_id,
                Box::new(move |session| Ok(vec![session.update(&member_id, name, ticket_url)?])),
            )
            .await
    }
}
