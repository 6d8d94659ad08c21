//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, SessionId, ValidationError};

use super::Card;

/// Failures of session commands and queries.
///
/// Every variant except `Infrastructure` is raised before the aggregate is
/// touched, so a failed command leaves the session unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Input failed value-object validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No session with this id exists.
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    /// The command issuer is not in the session.
    #[error("Member {0} is not part of this session")]
    NotAMember(MemberId),

    /// The member lacks the right required by the action.
    #[error("Member {0} is not allowed to reveal cards")]
    Forbidden(MemberId),

    /// A running-only action was attempted on a revealed session.
    #[error("Votes are already revealed; restart the round first")]
    SessionFinished,

    /// The card is not part of the session deck.
    #[error("Card '{0}' is not in the session deck")]
    UnknownCard(Card),

    /// Storage or serialization failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl SessionError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Validation(_) => ErrorCode::ValidationFailed,
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::NotAMember(_) => ErrorCode::NotAMember,
            SessionError::Forbidden(_) => ErrorCode::Forbidden,
            SessionError::SessionFinished => ErrorCode::SessionFinished,
            SessionError::UnknownCard(_) => ErrorCode::UnknownCard,
            SessionError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        SessionError::Infrastructure(err.to_string())
    }
}

impl From<SessionError> for DomainError {
    fn from(err: SessionError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
