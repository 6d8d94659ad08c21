//! RestartRoundHandler - Command handler for starting a fresh round.

use std::sync::Arc;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Command to restart the round.
#[derive(Debug, Clone)]
pub struct RestartRoundCommand {
    pub session_id: SessionId,
    pub member_id: MemberId,
}

/// Handler for restarting rounds.
pub struct RestartRoundHandler {
    repository: Arc<dyn SessionRepository>,
}

impl RestartRoundHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: RestartRoundCommand) -> Result<Session, SessionError> {
        let member_id = cmd.member_id;
        self.repository
            .modify_exclusively(
                &cmd.session_id,
                Box::new(move |session| Ok(vec![session.restart(&member_id)?])),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{card, member, Fixture};
    use crate::domain::foundation::RoundState;

    #[tokio::test]
    async fn restart_reopens_round_without_leavers() {
        let fixture = Fixture::new();
        let id = fixture.session_with(&["alice", "bob", "carol"]).await;
        fixture
            .store
            .modify_exclusively(
                &id,
                Box::new(|s| {
                    let voted = s.vote(&member("alice"), card("S"))?;
                    let left = s.leave(&member("alice"));
                    let revealed = s.reveal(&member("bob"))?;
                    Ok(std::iter::once(voted).chain(left).chain([revealed]).collect())
                }),
            )
            .await
            .unwrap();

        let session = RestartRoundHandler::new(fixture.repository())
            .handle(RestartRoundCommand {
                session_id: id,
                member_id: member("carol"),
            })
            .await
            .unwrap();

        assert_eq!(session.state(), RoundState::Running);
        assert_eq!(session.member_ids(), vec![member("bob"), member("carol")]);
        assert!(session.players().values().all(|p| !p.has_voted()));
        assert!(session.players().values().any(|p| p.can_reveal()));
    }
}
