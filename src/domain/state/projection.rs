//! Per-viewer read model of a session.
//!
//! `project` is a pure function over a session snapshot and a batch of
//! member profiles. It never fails: members without a profile are shown
//! under a placeholder name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, RoundState, SessionId, VersionToken};
use crate::domain::member::{MemberProfile, UNKNOWN_MEMBER_NAME};
use crate::domain::session::{Card, Deck, Session};

/// One seat as a given viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub member_id: MemberId,
    pub name: String,
    /// True value, the unrevealed placeholder, or `None` if no vote yet.
    pub voted_card: Option<Card>,
    pub active: bool,
}

/// What a single viewer is allowed to see of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub name: String,
    pub ticket_url: String,
    pub deck: Deck,
    pub players: Vec<PlayerView>,
    pub state: RoundState,
    /// The viewer's own vote, always in clear.
    pub voted_card: Option<Card>,
    pub can_reveal: bool,
    pub version: VersionToken,
}

impl SessionState {
    pub fn player(&self, member: &MemberId) -> Option<&PlayerView> {
        self.players.iter().find(|p| &p.member_id == member)
    }
}

/// Builds the read model of `session` for `viewer`.
///
/// While the round is running, every other member's vote is replaced with
/// the unrevealed placeholder. Players are ordered by display name, then id.
pub fn project(viewer: &MemberId, session: &Session, members: &[MemberProfile]) -> SessionState {
    let names: HashMap<&MemberId, &str> = members
        .iter()
        .map(|profile| (&profile.id, profile.name.as_str()))
        .collect();
    let masked = session.state() == RoundState::Running;

    let mut players: Vec<PlayerView> = session
        .players()
        .iter()
        .map(|(id, player)| {
            let voted_card = player.voted_card().map(|card| {
                if masked && id != viewer {
                    Card::unrevealed()
                } else {
                    card.clone()
                }
            });
            PlayerView {
                member_id: id.clone(),
                name: names
                    .get(id)
                    .copied()
                    .unwrap_or(UNKNOWN_MEMBER_NAME)
                    .to_string(),
                voted_card,
                active: player.is_active(),
            }
        })
        .collect();
    players.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.member_id.cmp(&b.member_id)));

    let own = session.player(viewer);

    SessionState {
        session_id: *session.id(),
        name: session.name().to_string(),
        ticket_url: session.ticket_url().to_string(),
        deck: session.deck().clone(),
        players,
        state: session.state(),
        voted_card: own.and_then(|p| p.voted_card().cloned()),
        can_reveal: own.is_some_and(|p| p.can_reveal()),
        version: session.version().clone(),
    }
}
