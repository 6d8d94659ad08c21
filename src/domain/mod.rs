//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `session` - Session aggregate, cards and decks, and its events
//! - `member` - Member display identities and rename events
//! - `state` - Per-viewer projection of a session

pub mod foundation;
pub mod member;
pub mod session;
pub mod state;
