//! Read models computed from session snapshots.

mod projection;

pub use projection::{project, PlayerView, SessionState};
