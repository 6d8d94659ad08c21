//! Event bus adapters.
//!
//! - `InProcessEventBus` - Fire-and-forget, task-per-handler dispatch

mod in_process;

pub use in_process::InProcessEventBus;
