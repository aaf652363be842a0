//! Core data models for deck statistics.

mod card;
mod deck;
mod match_record;
mod stats;

pub use card::*;
pub use deck::*;
pub use match_record::*;
pub use stats::*;
