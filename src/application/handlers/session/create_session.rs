//! CreateSessionHandler - Command handler for opening new sessions.

use std::sync::Arc;

use crate::domain::foundation::MemberId;
use crate::domain::session::{Deck, Session, SessionError};
use crate::ports::SessionRepository;

/// Command to open a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub creator: MemberId,
    pub name: String,
    pub ticket_url: String,
    /// Falls back to the t-shirt deck when absent.
    pub deck: Option<Deck>,
    pub everyone_can_reveal: bool,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl CreateSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<Session, SessionError> {
        let deck = cmd.deck.unwrap_or_else(Deck::t_shirt);
        let (session, events) = Session::create(
            cmd.name,
            cmd.ticket_url,
            deck,
            cmd.everyone_can_reveal,
            cmd.creator,
        )?;

        self.repository.save(&session, events).await?;
        tracing::debug!(session_id = %session.id(), "Session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{member, sizes_deck, Fixture};
    use crate::domain::foundation::RoundState;
    use crate::domain::session::{SessionChange, SessionUpdated, MAX_TICKET_URL_LENGTH, SESSION_UPDATED};

    fn command(deck: Option<Deck>) -> CreateSessionCommand {
        CreateSessionCommand {
            creator: member("alice"),
            name: "Sprint 12".to_string(),
            ticket_url: "https://tracker.example.com/PP-1".to_string(),
            deck,
            everyone_can_reveal: false,
        }
    }

    #[tokio::test]
    async fn creates_running_session_with_creator_seated() {
        let fixture = Fixture::new();
        let handler = CreateSessionHandler::new(fixture.repository());

        let session = handler.handle(command(Some(sizes_deck()))).await.unwrap();

        let stored = fixture.get(session.id()).await;
        assert_eq!(stored, session);
        assert_eq!(stored.state(), RoundState::Running);
        assert!(stored.player(&member("alice")).unwrap().can_reveal());
    }

    #[tokio::test]
    async fn missing_deck_defaults_to_t_shirt_sizes() {
        let fixture = Fixture::new();
        let handler = CreateSessionHandler::new(fixture.repository());

        let session = handler.handle(command(None)).await.unwrap();

        assert_eq!(session.deck(), &Deck::t_shirt());
    }

    #[tokio::test]
    async fn publishes_created_and_joined() {
        let fixture = Fixture::new();
        let handler = CreateSessionHandler::new(fixture.repository());

        let session = handler.handle(command(None)).await.unwrap();

        let changes: Vec<SessionChange> = fixture
            .bus
            .events_for_aggregate(&session.id().to_string())
            .iter()
            .filter(|e| e.event_type == SESSION_UPDATED)
            .map(|e| e.payload_as::<SessionUpdated>().unwrap().change)
            .collect();
        assert_eq!(changes, vec![SessionChange::Created, SessionChange::Joined]);
    }

    #[tokio::test]
    async fn oversized_ticket_url_stores_nothing() {
        let fixture = Fixture::new();
        let handler = CreateSessionHandler::new(fixture.repository());
        let mut cmd = command(None);
        cmd.ticket_url = "u".repeat(MAX_TICKET_URL_LENGTH + 1);

        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(SessionError::Validation(_))));
        assert!(fixture.store.is_empty());
        assert_eq!(fixture.bus.event_count(), 0);
    }
}
