//! In-memory member directory.
//!
//! Holds display names and announces renames on the event bus so sessions
//! showing the member can refresh.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, SerializableDomainEvent};
use crate::domain::member::{validate_display_name, MemberProfile, MemberUpdated};
use crate::ports::{EventPublisher, MemberDirectory};

pub struct InMemoryMemberDirectory {
    profiles: RwLock<HashMap<MemberId, MemberProfile>>,
    publisher: Arc<dyn EventPublisher>,
}

impl InMemoryMemberDirectory {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            publisher,
        }
    }

    /// Registers a new member under a generated id.
    pub async fn register(&self, name: &str) -> Result<MemberProfile, DomainError> {
        let profile = MemberProfile::new(MemberId::generate(), name)?;
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile.clone());
        tracing::debug!(member_id = %profile.id, "Member registered");
        Ok(profile)
    }

    /// Registers a member under a caller-chosen id, replacing any existing
    /// profile.
    pub async fn insert(&self, profile: MemberProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
    }

    /// Changes a member's display name and publishes `member.updated`.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the id is unknown
    /// - `ValidationFailed` if the name is blank or too long
    pub async fn rename(&self, id: &MemberId, name: &str) -> Result<MemberProfile, DomainError> {
        let name = validate_display_name(name)?;
        let profile = {
            let mut profiles = self.profiles.write().await;
            let profile = profiles.get_mut(id).ok_or_else(|| {
                DomainError::new(ErrorCode::MemberNotFound, format!("Member {} not found", id))
            })?;
            profile.name = name;
            profile.clone()
        };

        let event = MemberUpdated::new(profile.id.clone(), profile.name.clone());
        if let Err(e) = self.publisher.publish(event.to_envelope()).await {
            tracing::error!(member_id = %id, error = %e, "Failed to publish member rename");
        }
        Ok(profile)
    }

    pub async fn get(&self, id: &MemberId) -> Option<MemberProfile> {
        self.profiles.read().await.get(id).cloned()
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn get_many(&self, ids: &[MemberId]) -> Result<Vec<MemberProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }
}
