//! In-memory session store.
//!
//! Sessions are kept as encoded JSON documents, so every caller works on
//! its own decoded copy and nothing outside the store can reach the stored
//! state. Each session id has its own gate; mutations of different
//! sessions never wait on each other.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

use crate::domain::foundation::{MemberId, SerializableDomainEvent, SessionId};
use crate::domain::session::{Session, SessionError, SessionSnapshot, SessionUpdated};
use crate::ports::{EventPublisher, SessionMutation, SessionRepository};

/// Storage slot for one session.
struct Slot {
    /// Held for the whole read-mutate-persist-publish sequence.
    gate: Mutex<()>,
    document: RwLock<Vec<u8>>,
}

impl Slot {
    fn new(document: Vec<u8>) -> Self {
        Self {
            gate: Mutex::new(()),
            document: RwLock::new(document),
        }
    }

    fn read(&self) -> Vec<u8> {
        self.document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, document: Vec<u8>) {
        *self
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner) = document;
    }
}

/// Volatile session store with per-session exclusive mutation.
///
/// # Example
///
/// ```ignore
/// let store = InMemorySessionRepository::new(bus.clone());
/// store.save(&session, events).await?;
///
/// store
///     .modify_exclusively(session.id(), Box::new(move |s| Ok(vec![s.vote(&member, card)?])))
///     .await?;
/// ```
pub struct InMemorySessionRepository {
    slots: RwLock<HashMap<SessionId, Arc<Slot>>>,
    publisher: Arc<dyn EventPublisher>,
}

impl InMemorySessionRepository {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            publisher,
        }
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: &SessionId) -> Result<Arc<Slot>, SessionError> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or(SessionError::NotFound(*id))
    }

    fn all_slots(&self) -> Vec<(SessionId, Arc<Slot>)> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, slot)| (*id, Arc::clone(slot)))
            .collect()
    }

    fn encode(session: &Session) -> Result<Vec<u8>, SessionError> {
        SessionSnapshot::from(session).to_json().map_err(|e| {
            SessionError::infrastructure(format!(
                "Failed to encode session {}: {}",
                session.id(),
                e
            ))
        })
    }

    fn decode(id: &SessionId, document: &[u8]) -> Result<Session, SessionError> {
        let snapshot = SessionSnapshot::from_json(document).map_err(|e| {
            SessionError::infrastructure(format!("Failed to decode session {}: {}", id, e))
        })?;
        Session::try_from(snapshot).map_err(|e| {
            SessionError::infrastructure(format!("Stored session {} is invalid: {}", id, e))
        })
    }

    /// Publishes events in order. Failures are logged; the state change
    /// they describe is already persisted.
    async fn publish(&self, id: &SessionId, events: Vec<SessionUpdated>) {
        if events.is_empty() {
            return;
        }
        let envelopes = events.iter().map(|e| e.to_envelope()).collect();
        if let Err(e) = self.publisher.publish_all(envelopes).await {
            tracing::error!(
                session_id = %id,
                error = %e,
                "Failed to publish session events"
            );
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(
        &self,
        session: &Session,
        events: Vec<SessionUpdated>,
    ) -> Result<(), SessionError> {
        let document = Self::encode(session)?;
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*session.id(), Arc::new(Slot::new(document)));

        tracing::debug!(
            session_id = %session.id(),
            version = %session.version(),
            events = events.len(),
            "Session saved"
        );
        self.publish(session.id(), events).await;
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Session, SessionError> {
        let slot = self.slot(id)?;
        Self::decode(id, &slot.read())
    }

    async fn modify_exclusively(
        &self,
        id: &SessionId,
        mutation: SessionMutation,
    ) -> Result<Session, SessionError> {
        let slot = match self.slot(id) {
            Ok(slot) => slot,
            Err(e) => {
                tracing::warn!(session_id = %id, "Mutation of unknown session");
                return Err(e);
            }
        };
        let _gate = slot.gate.lock().await;

        let mut session = Self::decode(id, &slot.read())?;
        let events = mutation(&mut session)?;
        slot.write(Self::encode(&session)?);

        tracing::debug!(
            session_id = %id,
            version = %session.version(),
            events = events.len(),
            "Session mutated"
        );
        self.publish(id, events).await;
        Ok(session)
    }

    async fn find_active_by_member(
        &self,
        member: &MemberId,
    ) -> Result<Vec<Session>, SessionError> {
        let mut sessions = Vec::new();
        for (id, slot) in self.all_slots() {
            let session = Self::decode(&id, &slot.read())?;
            if session.is_active_member(member) {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }
}
