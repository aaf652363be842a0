//! Statistics calculation engine.
//!
//! Computes deck statistics from stored match data:
//! - Average elixir cost
//! - Win counts and win rate
//! - Average trophy count

mod aggregator;

pub use aggregator::*;

use crate::models::ElixirCost;

/// Average elixir cost over a deck's cards.
///
/// Variable-cost cards are left out of both the sum and the divisor.
/// Returns `None` if no card has a fixed cost.
pub fn average_elixir(costs: &[ElixirCost]) -> Option<f64> {
    let fixed: Vec<f64> = costs.iter().filter_map(ElixirCost::fixed).collect();
    if fixed.is_empty() {
        None
    } else {
        Some(fixed.iter().sum::<f64>() / fixed.len() as f64)
    }
}

/// Calculate win rate from wins and total occurrences.
pub fn calculate_win_rate(wins: i64, occurrences: i64) -> Option<f64> {
    if occurrences <= 0 {
        None
    } else {
        Some(wins as f64 / occurrences as f64)
    }
}

/// Average trophies per occurrence, rounded down.
pub fn calculate_average_trophies(total_trophies: i64, occurrences: i64) -> Option<i64> {
    if occurrences <= 0 {
        None
    } else {
        Some(total_trophies.div_euclid(occurrences))
    }
}
