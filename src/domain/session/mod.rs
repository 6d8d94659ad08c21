//! Session domain module.
//!
//! A session is one planning-poker table: a deck of cards, the members
//! seated at it and the votes they cast for the current round.
//!
//! # Events
//!
//! - `SessionUpdated` - Published after every successful mutation, carrying
//!   the new version token

mod aggregate;
mod card;
mod errors;
mod events;
mod snapshot;

pub use aggregate::{Player, Session, MAX_NAME_LENGTH, MAX_TICKET_URL_LENGTH};
pub use card::{Card, Deck, MAX_CARD_LENGTH, T_SHIRT_CARDS, UNREVEALED_TOKEN};
pub use errors::SessionError;
pub use events::{SessionChange, SessionUpdated, SESSION_UPDATED};
pub use snapshot::{DeckSnapshot, PlayerSnapshot, SessionSnapshot};
