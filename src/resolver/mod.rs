//! Deck statistics resolution.
//!
//! A [`DeckStatsResolver`] takes a deck as card names plus the names of the
//! statistics to compute, and builds the result mapping once at construction.
//! Validation failures are reported inside the mapping, never as errors.

mod rules;

pub use rules::*;

use tracing::{debug, info, warn};

use crate::calculate::MatchAggregator;
use crate::models::{
    normalize_card_name, Deck, StatResult, StatValue, Statistic, DECK_SIZE, ERROR_KEY,
    INVALID_KEY, NOTE_KEY,
};
use crate::store::{MatchStore, SqliteStore, StoreConfig, StoreError};

pub const INVALID_NAMES_MESSAGE: &str = "card names were not entered correctly";
pub const REPEAT_CARDS_MESSAGE: &str = "contains repeat cards";
pub const NO_STATISTICS_MESSAGE: &str = "no statistics selected";
pub const NOT_IN_DATASET_MESSAGE: &str = "deck is not in dataset";

/// Resolve card names to a canonical deck.
///
/// Returns an empty deck if any name does not resolve, a lookup fails, or
/// the number of names is not [`DECK_SIZE`].
pub fn resolve_deck<S, N>(store: &S, names: &[N]) -> Deck
where
    S: MatchStore,
    N: AsRef<str>,
{
    if names.len() != DECK_SIZE {
        debug!("Deck has {} cards, expected {}", names.len(), DECK_SIZE);
        return Deck::empty();
    }

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let normalized = normalize_card_name(name.as_ref());
        match store.card_id_by_name(&normalized) {
            Ok(Some(id)) => ids.push(id),
            Ok(None) => {
                debug!("Unknown card name: {:?}", normalized);
                return Deck::empty();
            }
            Err(e) => {
                warn!("Card lookup failed for {:?}: {}", normalized, e);
                return Deck::empty();
            }
        }
    }

    Deck::from_ids(ids)
}

/// Substitute `default` for a failed store computation.
fn recover<T>(result: Result<T, StoreError>, default: T, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!("Failed to compute {}: {}", what, e);
        default
    })
}

/// Computes the requested statistics for one deck.
pub struct DeckStatsResolver<S: MatchStore> {
    /// Held so the connection lives as long as the resolver.
    _store: S,
    deck: Deck,
    outcome: Outcome,
    results: StatResult,
}

impl DeckStatsResolver<SqliteStore> {
    /// Open the configured store and resolve the request against it.
    ///
    /// A store that cannot be opened fails the whole request.
    pub fn connect<D, T>(
        config: &StoreConfig,
        deck: &[D],
        statistics: &[T],
    ) -> Result<Self, StoreError>
    where
        D: AsRef<str>,
        T: AsRef<str>,
    {
        let store = SqliteStore::open(config)?;
        Ok(Self::new(store, deck, statistics))
    }
}

impl<S: MatchStore> DeckStatsResolver<S> {
    pub fn new<D, T>(store: S, deck: &[D], statistics: &[T]) -> Self
    where
        D: AsRef<str>,
        T: AsRef<str>,
    {
        let deck = resolve_deck(&store, deck);
        let (outcome, results) = assemble(&store, &deck, statistics);

        Self {
            _store: store,
            deck,
            outcome,
            results,
        }
    }

    /// The assembled result mapping.
    pub fn results(&self) -> &StatResult {
        &self.results
    }

    pub fn into_results(self) -> StatResult {
        self.results
    }

    /// The canonical deck; empty if resolution failed.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

fn assemble<S, T>(store: &S, deck: &Deck, statistics: &[T]) -> (Outcome, StatResult)
where
    S: MatchStore,
    T: AsRef<str>,
{
    let aggregator = MatchAggregator::new(store, deck);
    let probe = || aggregator.occurrence_count_or_default();

    let elixir_requested = statistics
        .iter()
        .any(|s| s.as_ref() == Statistic::ElixirCost.label());
    let facts = RequestFacts::new(
        !deck.is_empty(),
        deck.has_repeats(),
        statistics.len(),
        elixir_requested,
        &probe,
    );

    let outcome = evaluate(&facts);
    info!("Deck {:?}: {:?}", deck.cards(), outcome);

    let results = match outcome {
        Outcome::InvalidCardNames => StatResult::message(INVALID_KEY, INVALID_NAMES_MESSAGE),
        Outcome::RepeatCards => StatResult::message(INVALID_KEY, REPEAT_CARDS_MESSAGE),
        Outcome::NoStatistics => StatResult::message(ERROR_KEY, NO_STATISTICS_MESSAGE),
        Outcome::NotInDataset => StatResult::message(ERROR_KEY, NOT_IN_DATASET_MESSAGE),
        Outcome::ElixirCostOnly => {
            let mut results = StatResult::new();
            results.insert(
                Statistic::ElixirCost.label(),
                compute_statistic(&aggregator, Statistic::ElixirCost),
            );
            results
        }
        Outcome::ElixirCostWithNote => {
            let mut results = StatResult::new();
            results.insert(
                Statistic::ElixirCost.label(),
                compute_statistic(&aggregator, Statistic::ElixirCost),
            );
            results.insert(
                NOTE_KEY,
                StatValue::Message(format!("no other statistics: {}", NOT_IN_DATASET_MESSAGE)),
            );
            results
        }
        Outcome::ComputeAll => {
            let mut results = StatResult::new();
            for name in statistics {
                let name = name.as_ref();
                let value = match name.parse::<Statistic>() {
                    Ok(stat) => compute_statistic(&aggregator, stat),
                    Err(e) => {
                        warn!("{}", e);
                        StatValue::Missing
                    }
                };
                results.insert(name, value);
            }
            results
        }
    };

    (outcome, results)
}

fn compute_statistic<S: MatchStore>(
    aggregator: &MatchAggregator<'_, S>,
    stat: Statistic,
) -> StatValue {
    match stat {
        Statistic::WinRate => aggregator.win_rate_or_default().into(),
        Statistic::ElixirCost => recover(aggregator.elixir_cost(), None, stat.label()).into(),
        Statistic::AverageTrophyCount => aggregator
            .average_trophies_or_default()
            .map(StatValue::Integer)
            .unwrap_or(StatValue::Missing),
        Statistic::NumberOfWins => StatValue::Integer(aggregator.win_count_or_default()),
    }
}
