//! Session command handlers.
//!
//! Every mutating handler goes through `SessionRepository::modify_exclusively`
//! so the aggregate's checks and the write happen under the session's gate.

mod cast_vote;
mod create_session;
mod join_session;
mod leave_session;
mod restart_round;
mod reveal_votes;
mod update_session;

pub use cast_vote::{CastVoteCommand, CastVoteHandler, WithdrawVoteCommand, WithdrawVoteHandler};
pub use create_session::{CreateSessionCommand, CreateSessionHandler};
pub use join_session::{JoinSessionCommand, JoinSessionHandler};
pub use leave_session::{LeaveSessionCommand, LeaveSessionHandler};
pub use restart_round::{RestartRoundCommand, RestartRoundHandler};
pub use reveal_votes::{RevealVotesCommand, RevealVotesHandler};
pub use update_session::{UpdateSessionCommand, UpdateSessionHandler};
