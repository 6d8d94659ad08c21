//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to its collaborators:
//! - `events` - In-process event bus
//! - `memory` - Volatile session store and member directory
//! - `push` - Per-player broadcast channels

pub mod events;
pub mod memory;
pub mod push;

pub use events::InProcessEventBus;
pub use memory::{InMemoryMemberDirectory, InMemorySessionRepository};
pub use push::PlayerChannels;
