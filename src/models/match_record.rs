//! Historical match records.

use serde::{Deserialize, Serialize};

use super::{CardId, DECK_SIZE};

/// One row of the `Matches` table.
///
/// Each side's cards are stored positionally. A side only matches a
/// canonical deck when its slots hold the identifiers in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub player1_cards: [CardId; DECK_SIZE],
    pub player2_cards: [CardId; DECK_SIZE],
    pub player1_trophies: i64,
    pub player2_trophies: i64,
    /// True when player 1 won (`Winner = 1`), false when player 2 won (`Winner = 0`).
    pub player1_won: bool,
}
