//! Convergence handlers - getting session state to every viewer.
//!
//! - `AwaitChangeHandler` - long poll (pull)
//! - `StateBroadcaster` - per-viewer push on `session.updated`
//! - `VersionWatchers` - wakes long polls on `session.updated`
//! - `MemberRenameListener` - refreshes sessions on `member.updated`

mod await_change;
mod broadcaster;
mod member_rename;
mod version_watchers;

pub use await_change::{AwaitChangeHandler, AwaitChangeQuery, AwaitChangeResult};
pub use broadcaster::StateBroadcaster;
pub use member_rename::MemberRenameListener;
pub use version_watchers::{ChangeSignal, VersionWatchers};

use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, SessionId};
use crate::domain::member::MemberProfile;
use crate::domain::session::Session;
use crate::ports::MemberDirectory;

fn session_id_of(event: &EventEnvelope) -> Result<SessionId, DomainError> {
    SessionId::from_str(&event.aggregate_id).map_err(|e| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("Bad session id in {}: {}", event.event_type, e),
        )
    })
}

/// Looks up names for everyone seated. A failing directory degrades to
/// placeholder names.
async fn resolve_members(directory: &dyn MemberDirectory, session: &Session) -> Vec<MemberProfile> {
    match directory.get_many(&session.member_ids()).await {
        Ok(members) => members,
        Err(e) => {
            tracing::warn!(session_id = %session.id(), error = %e, "Member lookup failed");
            Vec::new()
        }
    }
}
