//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Storage Ports
//!
//! - `SessionRepository` - Session snapshots and the per-session gate
//! - `MemberDirectory` - Display names for member ids
//!
//! ## Delivery Ports
//!
//! - `StatePublisher` - Push projected state to a connected viewer

mod event_publisher;
mod event_subscriber;
mod member_directory;
mod session_repository;
mod state_publisher;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use member_directory::MemberDirectory;
pub use session_repository::{SessionMutation, SessionRepository};
pub use state_publisher::{PublishError, StatePublisher};
