//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers mutate sessions through the store's exclusive gate; the
//! convergence handlers read snapshots and deliver projections.

pub mod engine;
pub mod handlers;

pub use engine::Engine;
pub use handlers::*;
