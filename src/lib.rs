//! # Deck Stats
//!
//! Summary statistics for an 8-card deck, looked up from a database of
//! historical matches.
//!
//! ## Architecture
//!
//! - **models**: Cards, decks, statistic names and the result mapping
//! - **store**: Match history store (SQLite)
//! - **calculate**: Statistics computation over a canonical deck
//! - **resolver**: Request validation and result assembly
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod resolver;
pub mod store;

pub use models::*;
pub use resolver::DeckStatsResolver;

/// Split a comma-separated list of names, trimming whitespace and dropping blanks.
pub fn parse_name_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
