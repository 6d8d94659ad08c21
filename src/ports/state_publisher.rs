//! StatePublisher port - pushes projected state to connected viewers.
//!
//! Implemented by whatever persistent-connection layer sits in front of
//! the engine. Delivery is best-effort.

use async_trait::async_trait;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::state::SessionState;

/// Errors that can occur when pushing state to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// Nobody is listening for this member in this session
    #[error("No connection for member {member_id} in session {session_id}")]
    NotConnected {
        session_id: SessionId,
        member_id: MemberId,
    },

    /// The transport went away mid-send
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}

/// Port for pushing a viewer's projection to them.
#[async_trait]
pub trait StatePublisher: Send + Sync {
    /// Deliver `state` to `member` within `session`.
    async fn send_to_player(
        &self,
        session_id: &SessionId,
        member_id: &MemberId,
        state: SessionState,
    ) -> Result<(), PublishError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn StatePublisher) {}
    }

    #[test]
    fn not_connected_names_both_ids() {
        let session_id = SessionId::new();
        let err = PublishError::NotConnected {
            session_id,
            member_id: MemberId::new("m1").unwrap(),
        };
        let message = err.to_string();
        assert!(message.contains("m1"));
        assert!(message.contains(&session_id.to_string()));
    }
}
