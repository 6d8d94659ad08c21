//! Card and Deck value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Maximum number of characters in a card token.
pub const MAX_CARD_LENGTH: usize = 3;

/// Token displayed in place of a vote that is still hidden.
pub const UNREVEALED_TOKEN: &str = "*";

/// The cards of the built-in t-shirt deck.
pub const T_SHIRT_CARDS: &[&str] = &["XXS", "XS", "S", "M", "L", "XL", "XXL", "?"];

/// An estimate value such as "XS", "8" or "?".
///
/// # Invariants
///
/// - token is 1..=3 characters
/// - token is never the unrevealed sentinel, unless built by [`Card::unrevealed`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(String);

impl Card {
    /// Creates a card from a token.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the token is empty
    /// - `TooLong` if the token exceeds 3 characters
    /// - `InvalidFormat` if the token is the unrevealed sentinel
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ValidationError::empty_field("card"));
        }
        let length = token.chars().count();
        if length > MAX_CARD_LENGTH {
            return Err(ValidationError::too_long("card", MAX_CARD_LENGTH, length));
        }
        if token == UNREVEALED_TOKEN {
            return Err(ValidationError::invalid_format(
                "card",
                "the unrevealed marker cannot be used as a card",
            ));
        }
        Ok(Self(token))
    }

    /// The masking placeholder shown instead of a hidden vote.
    pub fn unrevealed() -> Self {
        Self(UNREVEALED_TOKEN.to_string())
    }

    /// Returns true for the masking placeholder.
    pub fn is_unrevealed(&self) -> bool {
        self.0 == UNREVEALED_TOKEN
    }

    /// Returns the card token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, ordered set of cards that are legal in one session.
///
/// Duplicates are accepted and carry no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    name: String,
    cards: Vec<Card>,
}

impl Deck {
    /// Creates a deck.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is empty or no cards are given
    pub fn new(name: impl Into<String>, cards: Vec<Card>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::empty_field("deck.name"));
        }
        if cards.is_empty() {
            return Err(ValidationError::empty_field("deck.cards"));
        }
        Ok(Self { name, cards })
    }

    /// Creates a deck from raw tokens, validating each of them.
    pub fn from_tokens<S: AsRef<str>>(
        name: impl Into<String>,
        tokens: &[S],
    ) -> Result<Self, ValidationError> {
        let cards = tokens
            .iter()
            .map(|t| Card::new(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, cards)
    }

    /// The default t-shirt sizing deck.
    pub fn t_shirt() -> Self {
        Self {
            name: "T-Shirt".to_string(),
            cards: T_SHIRT_CARDS
                .iter()
                .map(|t| Card(t.to_string()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Exact membership test.
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.iter().any(|c| c == card)
    }
}
