//! Per-deck aggregates over the match store.
//!
//! Every statistic sums the same aggregate over both sides of a match, so a
//! deck counts whether it was played by player 1 or player 2.

use tracing::{debug, warn};

use super::{average_elixir, calculate_average_trophies, calculate_win_rate};
use crate::models::Deck;
use crate::store::{MatchStore, Side, SideAggregate, StoreError};

/// Computes statistics for one canonical deck.
pub struct MatchAggregator<'a, S: MatchStore> {
    store: &'a S,
    deck: &'a Deck,
}

impl<'a, S: MatchStore> MatchAggregator<'a, S> {
    pub fn new(store: &'a S, deck: &'a Deck) -> Self {
        Self { store, deck }
    }

    fn both_sides(&self, aggregate: SideAggregate) -> Result<i64, StoreError> {
        let mut total = 0;
        for side in Side::BOTH {
            total += self.store.aggregate(side, self.deck, aggregate)?;
        }
        Ok(total)
    }

    /// Like `both_sides`, but a side whose query fails contributes 0.
    fn both_sides_or_zero(&self, aggregate: SideAggregate) -> i64 {
        Side::BOTH
            .iter()
            .map(|&side| {
                self.store
                    .aggregate(side, self.deck, aggregate)
                    .unwrap_or_else(|e| {
                        warn!("{:?} query failed for {} side: {}", aggregate, side, e);
                        0
                    })
            })
            .sum()
    }

    /// Number of matches in which the deck appears on either side.
    pub fn occurrence_count(&self) -> Result<i64, StoreError> {
        self.both_sides(SideAggregate::Occurrences)
    }

    /// Number of those matches won by the side playing the deck.
    pub fn win_count(&self) -> Result<i64, StoreError> {
        self.both_sides(SideAggregate::Wins)
    }

    pub fn trophy_total(&self) -> Result<i64, StoreError> {
        self.both_sides(SideAggregate::TrophySum)
    }

    /// Wins over occurrences; `None` if the deck never occurs.
    pub fn win_rate(&self) -> Result<Option<f64>, StoreError> {
        let occurrences = self.occurrence_count()?;
        let wins = self.win_count()?;
        debug!("Deck won {} of {} matches", wins, occurrences);
        Ok(calculate_win_rate(wins, occurrences))
    }

    /// Floor of trophies per occurrence; `None` if the deck never occurs.
    pub fn average_trophies(&self) -> Result<Option<i64>, StoreError> {
        let occurrences = self.occurrence_count()?;
        let total = self.trophy_total()?;
        Ok(calculate_average_trophies(total, occurrences))
    }

    /// Occurrence count with failed side queries read as 0.
    pub fn occurrence_count_or_default(&self) -> i64 {
        self.both_sides_or_zero(SideAggregate::Occurrences)
    }

    /// Win count with failed side queries read as 0.
    pub fn win_count_or_default(&self) -> i64 {
        self.both_sides_or_zero(SideAggregate::Wins)
    }

    /// Win rate from per-side recovered counts.
    pub fn win_rate_or_default(&self) -> Option<f64> {
        calculate_win_rate(
            self.win_count_or_default(),
            self.occurrence_count_or_default(),
        )
    }

    /// Average trophies from per-side recovered sums and counts.
    pub fn average_trophies_or_default(&self) -> Option<i64> {
        calculate_average_trophies(
            self.both_sides_or_zero(SideAggregate::TrophySum),
            self.occurrence_count_or_default(),
        )
    }

    /// Average elixir cost, independent of match history.
    pub fn elixir_cost(&self) -> Result<Option<f64>, StoreError> {
        let costs = self
            .deck
            .cards()
            .iter()
            .map(|&id| {
                self.store
                    .elixir_cost(id)?
                    .ok_or(StoreError::MissingCard(id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(average_elixir(&costs))
    }
}
