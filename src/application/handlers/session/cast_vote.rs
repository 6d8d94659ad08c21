//! Vote handlers - casting and withdrawing a vote.

use std::sync::Arc;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Card, Session, SessionError};
use crate::ports::SessionRepository;

/// Command to cast or replace a vote.
#[derive(Debug, Clone)]
pub struct CastVoteCommand {
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub card: Card,
}

/// Command to withdraw a vote.
#[derive(Debug, Clone)]
pub struct WithdrawVoteCommand {
    pub session_id: SessionId,
    pub member_id: MemberId,
}

/// Handler for casting votes.
pub struct CastVoteHandler {
    repository: Arc<dyn SessionRepository>,
}

impl CastVoteHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CastVoteCommand) -> Result<Session, SessionError> {
        let CastVoteCommand {
            session_id,
            member_id,
            card,
        } = cmd;

        self.repository
            .modify_exclusively(
                &session_id,
                Box::new(move |session| Ok(vec![session.vote(&member_id, card)?])),
            )
            .await
    }
}

/// Handler for withdrawing votes.
pub struct WithdrawVoteHandler {
    repository: Arc<dyn SessionRepository>,
}

impl WithdrawVoteHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: WithdrawVoteCommand) -> Result<Session, SessionError> {
        let member_id = cmd.member_id;
        self.repository
            .modify_exclusively(
                &cmd.session_id,
                Box::new(move |session| Ok(vec![session.unvote(&member_id)?])),
            )
            .await
    }
}
