//! RevealVotesHandler - Command handler for ending a round.

use std::sync::Arc;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Command to reveal all votes.
#[derive(Debug, Clone)]
pub struct RevealVotesCommand {
    pub session_id: SessionId,
    pub member_id: MemberId,
}

/// Handler for revealing votes.
pub struct RevealVotesHandler {
    repository: Arc<dyn SessionRepository>,
}

impl RevealVotesHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: RevealVotesCommand) -> Result<Session, SessionError> {
        let member_id = cmd.member_id;
        self.repository
            .modify_exclusively(
                &cmd.session_id,
                Box::new(move |session| Ok(vec![session.reveal(&member_id)?])),
            )
            .await
    }
}
