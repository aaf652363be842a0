//! Match history store.
//!
//! The store is read-only from the resolver's point of view. It exposes
//! card lookups and one parameterized aggregate over a single match side:
//! - Occurrence counts
//! - Win counts
//! - Trophy sums

mod sqlite;

pub use sqlite::*;

#[cfg(test)]
pub(crate) use sqlite::fixtures;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Card, CardId, Deck, ElixirCost};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Incomplete deck: expected 8 cards, got {0}")]
    IncompleteDeck(usize),

    #[error("Card not found: {0}")]
    MissingCard(CardId),
}

/// One of the two participant slots in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Player 1.
    A,
    /// Player 2.
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// Column prefix used by the `Matches` table.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Side::A => "Player1",
            Side::B => "Player2",
        }
    }

    /// Value of `Matches.Winner` when this side won.
    pub fn winner_value(&self) -> i64 {
        match self {
            Side::A => 1,
            Side::B => 0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_prefix())
    }
}

/// Aggregate computed over the matches where one side played a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideAggregate {
    /// Matches where the side played the deck.
    Occurrences,
    /// Of those, matches the side won.
    Wins,
    /// Sum of the side's trophies over those matches.
    TrophySum,
}

/// Query interface over the card catalog and match history.
pub trait MatchStore {
    /// Look up a card id by its exact (already normalized) name.
    fn card_id_by_name(&self, name: &str) -> Result<Option<CardId>, StoreError>;

    /// Look up a card's elixir cost.
    fn elixir_cost(&self, id: CardId) -> Result<Option<ElixirCost>, StoreError>;

    /// Aggregate over matches whose `side` card slots equal `deck` slot-for-slot.
    fn aggregate(
        &self,
        side: Side,
        deck: &Deck,
        aggregate: SideAggregate,
    ) -> Result<i64, StoreError>;

    /// The full card catalog, ordered by id.
    fn cards(&self) -> Result<Vec<Card>, StoreError>;
}

impl<S: MatchStore + ?Sized> MatchStore for &S {
    fn card_id_by_name(&self, name: &str) -> Result<Option<CardId>, StoreError> {
        (**self).card_id_by_name(name)
    }

    fn elixir_cost(&self, id: CardId) -> Result<Option<ElixirCost>, StoreError> {
        (**self).elixir_cost(id)
    }

    fn aggregate(
        &self,
        side: Side,
        deck: &Deck,
        aggregate: SideAggregate,
    ) -> Result<i64, StoreError> {
        (**self).aggregate(side, deck, aggregate)
    }

    fn cards(&self) -> Result<Vec<Card>, StoreError> {
        (**self).cards()
    }
}

/// Configuration for opening the store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Open without write access.
    #[serde(default = "default_read_only")]
    pub read_only: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/matches.db")
}

fn default_read_only() -> bool {
    true
}

impl StoreConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            read_only: default_read_only(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(default_store_path())
    }
}
