//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, event plumbing and error
//! types that form the vocabulary of the planning poker domain.

mod errors;
mod events;
mod ids;
mod round_state;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventId, SerializableDomainEvent};
pub use ids::{MemberId, SessionId, VersionToken};
pub use round_state::RoundState;
pub use timestamp::Timestamp;
