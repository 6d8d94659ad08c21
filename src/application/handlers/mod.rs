//! Application handlers.
//!
//! - `session` - one command handler per session operation
//! - `convergence` - long poll, push and cross-aggregate refresh

pub mod convergence;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use convergence::{
    AwaitChangeHandler, AwaitChangeQuery, AwaitChangeResult, ChangeSignal, MemberRenameListener,
    StateBroadcaster, VersionWatchers,
};
pub use session::{
    CastVoteCommand, CastVoteHandler, CreateSessionCommand, CreateSessionHandler,
    JoinSessionCommand, JoinSessionHandler, LeaveSessionCommand, LeaveSessionHandler,
    RestartRoundCommand, RestartRoundHandler, RevealVotesCommand, RevealVotesHandler,
    UpdateSessionCommand, UpdateSessionHandler, WithdrawVoteCommand, WithdrawVoteHandler,
};
