//! Volatile storage adapters.
//!
//! - `InMemorySessionRepository` - Session snapshots with per-session gates
//! - `InMemoryMemberDirectory` - Display names, publishes renames

mod member_directory;
mod session_repository;

pub use member_directory::InMemoryMemberDirectory;
pub use session_repository::InMemorySessionRepository;
