//! MemberRenameListener - refreshes sessions showing a renamed member.
//!
//! Sessions only store member ids, so a rename changes nothing they hold.
//! Forcing a version bump on every session where the member is active makes
//! both delivery paths pick up the new name.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope, ErrorCode, MemberId};
use crate::ports::{EventHandler, SessionRepository};

pub struct MemberRenameListener {
    repository: Arc<dyn SessionRepository>,
}

impl MemberRenameListener {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl EventHandler for MemberRenameListener {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let member_id = MemberId::new(event.aggregate_id.as_str()).map_err(|e| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Bad member id in {}: {}", event.event_type, e),
            )
        })?;

        let sessions = self.repository.find_active_by_member(&member_id).await?;
        let mut refreshed = 0usize;
        for session in sessions {
            let result = self
                .repository
                .modify_exclusively(session.id(), Box::new(|s| Ok(vec![s.force_changed()])))
                .await;
            match result {
                Ok(_) => refreshed += 1,
                Err(e) => {
                    tracing::warn!(
                        session_id = %session.id(),
                        member_id = %member_id,
                        error = %e,
                        "Could not refresh session after rename"
                    );
                }
            }
        }

        tracing::debug!(member_id = %member_id, refreshed, "Rename propagated");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MemberRenameListener"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{card, member, Fixture};
    use crate::domain::foundation::SerializableDomainEvent;
    use crate::domain::member::MemberUpdated;

    #[tokio::test]
    async fn active_sessions_get_new_version() {
        let fixture = Fixture::new();
        let seated = fixture.session_with(&["alice", "bob"]).await;
        let absent = fixture.session_by("carol").await;
        let seated_before = fixture.get(&seated).await;
        let absent_before = fixture.get(&absent).await;
        let listener = MemberRenameListener::new(fixture.repository());

        listener
            .handle(MemberUpdated::new(member("bob"), "Robert").to_envelope())
            .await
            .unwrap();

        let seated_after = fixture.get(&seated).await;
        assert_ne!(seated_after.version(), seated_before.version());
        assert_eq!(seated_after.players(), seated_before.players());
        assert_eq!(fixture.get(&absent).await, absent_before);
    }

    #[tokio::test]
    async fn inactive_seat_is_not_refreshed() {
        let fixture = Fixture::new();
        let id = fixture.session_with(&["alice", "bob"]).await;
        fixture
            .store
            .modify_exclusively(
                &id,
                Box::new(|s| {
                    let voted = s.vote(&member("bob"), card("S"))?;
                    Ok(std::iter::once(voted).chain(s.leave(&member("bob"))).collect())
                }),
            )
            .await
            .unwrap();
        let before = fixture.get(&id).await;
        let listener = MemberRenameListener::new(fixture.repository());

        listener
            .handle(MemberUpdated::new(member("bob"), "Robert").to_envelope())
            .await
            .unwrap();

        assert_eq!(fixture.get(&id).await, before);
    }
}
