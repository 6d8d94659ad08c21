//! Member domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, MemberId, Timestamp};

/// Event type published when a member's profile changes.
pub const MEMBER_UPDATED: &str = "member.updated";

/// Published when a member changes their display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpdated {
    pub event_id: EventId,
    pub member_id: MemberId,
    pub name: String,
    pub occurred_at: Timestamp,
}

impl MemberUpdated {
    pub fn new(member_id: MemberId, name: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            member_id,
            name: name.into(),
            occurred_at: Timestamp::now(),
        }
    }
}

domain_event!(MemberUpdated, kind = MEMBER_UPDATED, aggregate = "Member", id = member_id);
