//! Serialized form of a session.
//!
//! The store keeps sessions as JSON documents and hands every caller its own
//! decoded copy. Decoding goes back through the domain constructors so a
//! corrupted document surfaces as an error instead of an invalid aggregate.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, RoundState, SessionId, ValidationError, VersionToken};

use super::{Card, Deck, Player, Session};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub name: String,
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub voted_card: Option<String>,
    pub can_reveal: bool,
    pub active: bool,
}

/// Storage document for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub name: String,
    pub ticket_url: String,
    pub deck: DeckSnapshot,
    pub players: BTreeMap<String, PlayerSnapshot>,
    pub state: RoundState,
    pub version: String,
    pub everyone_can_reveal: bool,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        let players = session
            .players()
            .iter()
            .map(|(id, player)| {
                let snapshot = PlayerSnapshot {
                    voted_card: player.voted_card().map(|c| c.as_str().to_string()),
                    can_reveal: player.can_reveal(),
                    active: player.is_active(),
                };
                (id.as_str().to_string(), snapshot)
            })
            .collect();

        Self {
            id: *session.id(),
            name: session.name().to_string(),
            ticket_url: session.ticket_url().to_string(),
            deck: DeckSnapshot {
                name: session.deck().name().to_string(),
                cards: session
                    .deck()
                    .cards()
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            },
            players,
            state: session.state(),
            version: session.version().as_str().to_string(),
            everyone_can_reveal: session.everyone_can_reveal(),
        }
    }
}

impl TryFrom<SessionSnapshot> for Session {
    type Error = ValidationError;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self, Self::Error> {
        let deck = Deck::from_tokens(snapshot.deck.name, snapshot.deck.cards.as_slice())?;

        let mut players = HashMap::with_capacity(snapshot.players.len());
        for (id, player) in snapshot.players {
            let voted_card = match player.voted_card {
                Some(token) => {
                    let card = Card::new(token)?;
                    if !deck.contains(&card) {
                        return Err(ValidationError::invalid_format(
                            "players.voted_card",
                            format!("card '{}' is not in the deck", card),
                        ));
                    }
                    Some(card)
                }
                None => None,
            };
            players.insert(
                MemberId::new(id)?,
                Player::reconstitute(voted_card, player.can_reveal, player.active),
            );
        }

        if snapshot.version.is_empty() {
            return Err(ValidationError::empty_field("version"));
        }

        Ok(Session::reconstitute(
            snapshot.id,
            snapshot.name,
            snapshot.ticket_url,
            deck,
            players,
            snapshot.state,
            snapshot.everyone_can_reveal,
            VersionToken::from_string(snapshot.version),
        ))
    }
}
