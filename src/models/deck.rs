//! Canonical deck representation.

use serde::{Deserialize, Serialize};

use super::CardId;

/// Number of cards in a deck.
pub const DECK_SIZE: usize = 8;

/// A deck as its card identifiers, sorted ascending.
///
/// The sorted form is the lookup key for every match query. An empty deck
/// means resolution failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    /// Build a canonical deck from resolved identifiers in any order.
    pub fn from_ids(mut ids: Vec<CardId>) -> Self {
        ids.sort_unstable();
        Self { cards: ids }
    }

    /// The deck produced by a failed resolution.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if any identifier appears more than once.
    pub fn has_repeats(&self) -> bool {
        self.cards.windows(2).any(|pair| pair[0] == pair[1])
    }

    /// Sorted card identifiers.
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }
}
