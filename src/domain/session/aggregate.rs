//! Session aggregate entity.
//!
//! A session is one estimation table: who sits at it, what each of them
//! voted, and whether the votes are visible yet.
//!
//! # Membership
//!
//! The key set of `players` is the membership list. Every command except
//! `join` and `leave` fails with `NotAMember` for ids outside of it; this is
//! the only authorization rule the aggregate knows.
//!
//! # Events
//!
//! Mutations return the `SessionUpdated` event they caused instead of
//! buffering it on the entity. The store publishes what it is handed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, RoundState, SessionId, ValidationError, VersionToken};

use super::{Card, Deck, SessionChange, SessionError, SessionUpdated};

/// Maximum length for the session name.
pub const MAX_NAME_LENGTH: usize = 2048;

/// Maximum length for the ticket reference.
pub const MAX_TICKET_URL_LENGTH: usize = 2048;

/// A participant's seat at the table.
///
/// A member who leaves while holding a vote is kept as an inactive player
/// so the vote survives until the round is revealed or restarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    voted_card: Option<Card>,
    can_reveal: bool,
    active: bool,
}

impl Player {
    fn seated(can_reveal: bool) -> Self {
        Self {
            voted_card: None,
            can_reveal,
            active: true,
        }
    }

    /// Rebuilds a player from persistence.
    pub fn reconstitute(voted_card: Option<Card>, can_reveal: bool, active: bool) -> Self {
        Self {
            voted_card,
            can_reveal,
            active,
        }
    }

    pub fn voted_card(&self) -> Option<&Card> {
        self.voted_card.as_ref()
    }

    pub fn has_voted(&self) -> bool {
        self.voted_card.is_some()
    }

    pub fn can_reveal(&self) -> bool {
        self.can_reveal
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Session aggregate - one estimation round and its participants.
///
/// # Invariants
///
/// - `id` is globally unique
/// - while the session has at least one player, at least one player can
///   reveal; when active players exist, one of them can reveal
/// - a `Revealed` session accepts no votes until restarted
/// - `version` changes on every successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    name: String,
    ticket_url: String,
    deck: Deck,
    players: HashMap<MemberId, Player>,
    state: RoundState,
    everyone_can_reveal: bool,
    version: VersionToken,
}

impl Session {
    /// Create a new running session and seat its creator.
    ///
    /// Returns the session along with the `Created` and `Joined` events.
    ///
    /// # Errors
    ///
    /// - `Validation` if name or ticket URL are too long
    pub fn create(
        name: impl Into<String>,
        ticket_url: impl Into<String>,
        deck: Deck,
        everyone_can_reveal: bool,
        creator: MemberId,
    ) -> Result<(Self, Vec<SessionUpdated>), SessionError> {
        let name = name.into();
        let ticket_url = ticket_url.into();
        Self::validate_metadata(&name, &ticket_url)?;

        let mut session = Self {
            id: SessionId::new(),
            name,
            ticket_url,
            deck,
            players: HashMap::new(),
            state: RoundState::Running,
            everyone_can_reveal,
            version: VersionToken::next(),
        };

        let created = SessionUpdated::new(
            session.id,
            session.version.clone(),
            SessionChange::Created,
        );
        let joined = session.join(creator);

        Ok((session, vec![created, joined]))
    }

    /// Reconstitute a session from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        name: String,
        ticket_url: String,
        deck: Deck,
        players: HashMap<MemberId, Player>,
        state: RoundState,
        everyone_can_reveal: bool,
        version: VersionToken,
    ) -> Self {
        Self {
            id,
            name,
            ticket_url,
            deck,
            players,
            state,
            everyone_can_reveal,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticket_url(&self) -> &str {
        &self.ticket_url
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn players(&self) -> &HashMap<MemberId, Player> {
        &self.players
    }

    pub fn player(&self, member: &MemberId) -> Option<&Player> {
        self.players.get(member)
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn everyone_can_reveal(&self) -> bool {
        self.everyone_can_reveal
    }

    pub fn version(&self) -> &VersionToken {
        &self.version
    }

    /// Checks if the given member is seated, active or not.
    pub fn is_member(&self, member: &MemberId) -> bool {
        self.players.contains_key(member)
    }

    /// Checks if the given member is seated and has not left.
    pub fn is_active_member(&self, member: &MemberId) -> bool {
        self.players.get(member).is_some_and(Player::is_active)
    }

    /// Ids of all seated members, sorted.
    pub fn member_ids(&self) -> Vec<MemberId> {
        let mut ids: Vec<MemberId> = self.players.keys().cloned().collect();
        ids.sort();
        ids
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Seat a member.
    ///
    /// Joining again while active changes nothing but the version. A member
    /// who left with a live vote is reactivated with that vote intact.
    pub fn join(&mut self, member: MemberId) -> SessionUpdated {
        match self.players.get_mut(&member) {
            Some(player) => player.active = true,
            None => {
                let can_reveal = self.everyone_can_reveal || self.players.is_empty();
                self.players.insert(member, Player::seated(can_reveal));
            }
        }
        self.ensure_revealer();
        self.changed(SessionChange::Joined)
    }

    /// Remove a member from the table.
    ///
    /// A member with a live vote is only marked inactive. Returns `None`
    /// when nothing changed (unknown member, or already inactive).
    pub fn leave(&mut self, member: &MemberId) -> Option<SessionUpdated> {
        let player = self.players.get_mut(member)?;
        if !player.active {
            return None;
        }

        if player.has_voted() {
            player.active = false;
        } else {
            self.players.remove(member);
        }
        self.ensure_revealer();
        Some(self.changed(SessionChange::Left))
    }

    /// Cast or replace a member's vote.
    ///
    /// # Errors
    ///
    /// - `NotAMember` if the member is not seated
    /// - `SessionFinished` if votes are revealed
    /// - `UnknownCard` if the card is not in the deck
    pub fn vote(&mut self, member: &MemberId, card: Card) -> Result<SessionUpdated, SessionError> {
        self.ensure_member(member)?;
        self.ensure_running()?;
        if !self.deck.contains(&card) {
            return Err(SessionError::UnknownCard(card));
        }

        if let Some(player) = self.players.get_mut(member) {
            player.voted_card = Some(card);
        }
        Ok(self.changed(SessionChange::Voted))
    }

    /// Withdraw a member's vote.
    ///
    /// # Errors
    ///
    /// - `NotAMember` if the member is not seated
    /// - `SessionFinished` if votes are revealed
    pub fn unvote(&mut self, member: &MemberId) -> Result<SessionUpdated, SessionError> {
        self.ensure_member(member)?;
        self.ensure_running()?;

        if let Some(player) = self.players.get_mut(member) {
            player.voted_card = None;
        }
        Ok(self.changed(SessionChange::Unvoted))
    }

    /// Make every vote visible.
    ///
    /// # Errors
    ///
    /// - `NotAMember` if the member is not seated
    /// - `Forbidden` if the member may not reveal
    pub fn reveal(&mut self, member: &MemberId) -> Result<SessionUpdated, SessionError> {
        let player = self.ensure_member(member)?;
        if !player.can_reveal {
            return Err(SessionError::Forbidden(member.clone()));
        }

        self.state = RoundState::Revealed;
        Ok(self.changed(SessionChange::Revealed))
    }

    /// Start a fresh round.
    ///
    /// Clears all votes, drops inactive players and, if nobody is left who
    /// can reveal, hands that right to the first remaining member by id.
    ///
    /// # Errors
    ///
    /// - `NotAMember` if the member is not seated
    pub fn restart(&mut self, member: &MemberId) -> Result<SessionUpdated, SessionError> {
        self.ensure_member(member)?;

        self.players = std::mem::take(&mut self.players)
            .into_iter()
            .filter(|(_, player)| player.active)
            .map(|(id, player)| {
                let player = Player {
                    voted_card: None,
                    ..player
                };
                (id, player)
            })
            .collect();
        self.state = RoundState::Running;
        self.ensure_revealer();
        Ok(self.changed(SessionChange::Restarted))
    }

    /// Rename the session or change its ticket reference.
    ///
    /// # Errors
    ///
    /// - `NotAMember` if the member is not seated
    /// - `Validation` if name or ticket URL are too long
    pub fn update(
        &mut self,
        member: &MemberId,
        name: impl Into<String>,
        ticket_url: impl Into<String>,
    ) -> Result<SessionUpdated, SessionError> {
        self.ensure_member(member)?;
        let name = name.into();
        let ticket_url = ticket_url.into();
        Self::validate_metadata(&name, &ticket_url)?;

        self.name = name;
        self.ticket_url = ticket_url;
        Ok(self.changed(SessionChange::Updated))
    }

    /// Mark the session as changed without touching its state.
    ///
    /// Used when something the session displays, such as a member's name,
    /// changed elsewhere.
    pub fn force_changed(&mut self) -> SessionUpdated {
        self.changed(SessionChange::Refreshed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_member(&self, member: &MemberId) -> Result<&Player, SessionError> {
        self.players
            .get(member)
            .ok_or_else(|| SessionError::NotAMember(member.clone()))
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.state.accepts_votes() {
            Ok(())
        } else {
            Err(SessionError::SessionFinished)
        }
    }

    /// Elects a revealer when none is seated.
    ///
    /// Active players are preferred; the lowest member id wins.
    fn ensure_revealer(&mut self) {
        let any_active = self.players.values().any(|p| p.active);
        let has_revealer = self
            .players
            .values()
            .any(|p| p.can_reveal && (p.active || !any_active));
        if has_revealer {
            return;
        }

        let elected = self
            .players
            .iter()
            .filter(|(_, p)| p.active || !any_active)
            .map(|(id, _)| id)
            .min()
            .cloned();
        if let Some(id) = elected {
            if let Some(player) = self.players.get_mut(&id) {
                player.can_reveal = true;
            }
        }
    }

    fn changed(&mut self, change: SessionChange) -> SessionUpdated {
        self.version = VersionToken::next();
        SessionUpdated::new(self.id, self.version.clone(), change)
    }

    fn validate_metadata(name: &str, ticket_url: &str) -> Result<(), ValidationError> {
        let name_length = name.chars().count();
        if name_length > MAX_NAME_LENGTH {
            return Err(ValidationError::too_long("name", MAX_NAME_LENGTH, name_length));
        }
        let url_length = ticket_url.chars().count();
        if url_length > MAX_TICKET_URL_LENGTH {
            return Err(ValidationError::too_long(
                "ticket_url",
                MAX_TICKET_URL_LENGTH,
                url_length,
            ));
        }
        Ok(())
    }
}
