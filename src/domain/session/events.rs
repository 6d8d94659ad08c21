//! Session domain events.
//!
//! Every successful session mutation produces exactly one
//! `SessionUpdated` notification tagged with the session id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{domain_event, EventId, SessionId, Timestamp, VersionToken};

/// Event type routed by the bus for session changes.
pub const SESSION_UPDATED: &str = "session.updated";

/// What kind of mutation produced a `SessionUpdated` event.
///
/// Informational only; subscribers re-read the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionChange {
    Created,
    Joined,
    Left,
    Voted,
    Unvoted,
    Revealed,
    Restarted,
    Updated,
    Refreshed,
}

impl fmt::Display for SessionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionChange::Created => "created",
            SessionChange::Joined => "joined",
            SessionChange::Left => "left",
            SessionChange::Voted => "voted",
            SessionChange::Unvoted => "unvoted",
            SessionChange::Revealed => "revealed",
            SessionChange::Restarted => "restarted",
            SessionChange::Updated => "updated",
            SessionChange::Refreshed => "refreshed",
        };
        write!(f, "{}", s)
    }
}

/// Published whenever a session's visible state may have changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Session that changed.
    pub session_id: SessionId,

    /// Version token the session carried after the change.
    pub version: VersionToken,

    pub change: SessionChange,

    /// When the change happened.
    pub occurred_at: Timestamp,
}

impl SessionUpdated {
    pub fn new(session_id: SessionId, version: VersionToken, change: SessionChange) -> Self {
        Self {
            event_id: EventId::new(),
            session_id,
            version,
            change,
            occurred_at: Timestamp::now(),
        }
    }
}

domain_event!(SessionUpdated, kind = SESSION_UPDATED, aggregate = "Session", id = session_id);
