//! Per-player push channels.
//!
//! Every connected viewer gets a broadcast channel keyed by session and
//! member, so each one receives only their own masked projection.
//!
//! # Architecture
//!
//! ```text
//! session-123           session-456
//! ├── alice ─► rx, rx   └── carol ─► rx
//! └── bob   ─► rx
//! ```
//!
//! A member may hold several receivers (tabs, devices); all of them get the
//! same view.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

use crate::domain::foundation::{MemberId, SessionId};
use crate::domain::state::SessionState;
use crate::ports::{PublishError, StatePublisher};

type ChannelKey = (SessionId, MemberId);

/// Registry of push channels for connected viewers.
///
/// Slow receivers that fall behind the channel capacity miss the oldest
/// states; a missed push is recovered with a long poll.
pub struct PlayerChannels {
    channels: RwLock<HashMap<ChannelKey, broadcast::Sender<SessionState>>>,
    channel_capacity: usize,
}

impl PlayerChannels {
    /// Create a registry with the given per-channel buffer size.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Create with default capacity (16 states).
    pub fn with_default_capacity() -> Self {
        Self::new(16)
    }

    /// Open a receiver for `member`'s view of `session_id`.
    pub async fn connect(
        &self,
        session_id: &SessionId,
        member_id: &MemberId,
    ) -> broadcast::Receiver<SessionState> {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry((*session_id, member_id.clone()))
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0);
        tracing::debug!(session_id = %session_id, member_id = %member_id, "Viewer connected");
        sender.subscribe()
    }

    /// Drop the channel once its last receiver is gone.
    pub async fn disconnect(&self, session_id: &SessionId, member_id: &MemberId) {
        let key = (*session_id, member_id.clone());
        let mut channels = self.channels.write().await;
        if channels
            .get(&key)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&key);
            tracing::debug!(session_id = %session_id, member_id = %member_id, "Viewer disconnected");
        }
    }

    /// Number of receivers listening for `member` in `session_id`.
    pub async fn receiver_count(&self, session_id: &SessionId, member_id: &MemberId) -> usize {
        self.channels
            .read()
            .await
            .get(&(*session_id, member_id.clone()))
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Members with an open channel in `session_id`.
    pub async fn connected_members(&self, session_id: &SessionId) -> Vec<MemberId> {
        let mut members: Vec<MemberId> = self
            .channels
            .read()
            .await
            .keys()
            .filter(|(session, _)| session == session_id)
            .map(|(_, member)| member.clone())
            .collect();
        members.sort();
        members
    }
}

impl Default for PlayerChannels {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl StatePublisher for PlayerChannels {
    async fn send_to_player(
        &self,
        session_id: &SessionId,
        member_id: &MemberId,
        state: SessionState,
    ) -> Result<(), PublishError> {
        let not_connected = || PublishError::NotConnected {
            session_id: *session_id,
            member_id: member_id.clone(),
        };

        let channels = self.channels.read().await;
        let sender = channels
            .get(&(*session_id, member_id.clone()))
            .ok_or_else(not_connected)?;
        sender.send(state).map(|_| ()).map_err(|_| not_connected())
    }
}
