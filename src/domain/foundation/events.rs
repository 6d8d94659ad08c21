//! Event plumbing shared by every aggregate.
//!
//! Events are notifications, not deltas: a subscriber that needs state
//! re-reads it from the owning store using `aggregate_id`. The payload
//! carries whatever small facts let a subscriber skip that read (the
//! session version, a member's new name).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::Timestamp;

/// Identity and routing data every domain event exposes.
pub trait DomainEvent: Send + Sync {
    /// Routing key, e.g. `"session.updated"`.
    fn event_type(&self) -> &'static str;

    fn aggregate_id(&self) -> String;

    /// Aggregate kind, e.g. `"Session"` or `"Member"`.
    fn aggregate_type(&self) -> &'static str;

    fn occurred_at(&self) -> Timestamp;

    fn event_id(&self) -> EventId;
}

/// Provides `to_envelope()` for any event that can be serialized.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    fn to_envelope(&self) -> EventEnvelope {
        EventEnvelope::from_event(self)
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Implements [`DomainEvent`] for a struct with `event_id` and
/// `occurred_at` fields.
///
/// ```ignore
/// domain_event!(SessionUpdated, kind = "session.updated", aggregate = "Session", id = session_id);
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event:ident,
        kind = $kind:expr,
        aggregate = $aggregate:expr,
        id = $id_field:ident
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event {
            fn event_type(&self) -> &'static str {
                $kind
            }

            fn aggregate_id(&self) -> String {
                self.$id_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $aggregate
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.occurred_at
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.event_id
            }
        }
    };
}

pub use domain_event;

/// Unique identifier of one published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What travels over the event bus.
///
/// `event_type` routes the envelope to handlers; `aggregate_id` tells a
/// handler which session or member to look at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub event_type: String,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,
    pub payload: JsonValue,
}

impl EventEnvelope {
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            payload,
        }
    }

    /// Wraps a domain event, keeping its own id and timestamp.
    ///
    /// A payload that fails to serialize becomes `null`; routing only
    /// depends on the identity fields.
    pub fn from_event<T>(event: &T) -> Self
    where
        T: DomainEvent + Serialize + ?Sized,
    {
        Self {
            event_id: event.event_id(),
            event_type: event.event_type().to_string(),
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event).unwrap_or(JsonValue::Null),
        }
    }

    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
