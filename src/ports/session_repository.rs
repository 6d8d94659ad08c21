//! Session repository port.
//!
//! Defines the contract for storing Session aggregates and serializing
//! their mutations.
//!
//! # Design
//!
//! - **Exclusive mutation**: at most one mutation per session id runs at a
//!   time; mutations of different ids may run concurrently
//! - **All or nothing**: a failed mutation persists nothing and publishes
//!   nothing
//! - **Event publishing**: implementations publish the events a mutation
//!   returns, after persisting, in order

use async_trait::async_trait;

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::session::{Session, SessionError, SessionUpdated};

/// A mutation applied to a private copy of a session.
///
/// Returns the events it caused; an `Err` discards the copy.
pub type SessionMutation =
    Box<dyn FnOnce(&mut Session) -> Result<Vec<SessionUpdated>, SessionError> + Send>;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a newly created session and publish its creation events.
    ///
    /// Does not take the per-session gate: the id is not known to anyone
    /// else yet.
    ///
    /// # Errors
    ///
    /// - `Infrastructure` if the snapshot cannot be encoded
    async fn save(&self, session: &Session, events: Vec<SessionUpdated>)
        -> Result<(), SessionError>;

    /// Fetch a point-in-time copy of a session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no session has this id
    async fn get(&self, id: &SessionId) -> Result<Session, SessionError>;

    /// Apply `mutation` to the latest copy of a session, under the gate.
    ///
    /// Returns the persisted session on success.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no session has this id
    /// - whatever the mutation returned; nothing is persisted in that case
    async fn modify_exclusively(
        &self,
        id: &SessionId,
        mutation: SessionMutation,
    ) -> Result<Session, SessionError>;

    /// All sessions in which the member is seated and active.
    async fn find_active_by_member(&self, member: &MemberId) -> Result<Vec<Session>, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
