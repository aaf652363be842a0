//! Card catalog entries.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use serde::{Deserialize, Serialize};

/// Card identifier as stored in the `Cards` table.
pub type CardId = i64;

/// Text stored in `Cards.ElixirCost` for cards without a fixed cost.
pub const VARIABLE_COST_MARKER: &str = "?";

/// Elixir cost of a single card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElixirCost {
    Fixed(f64),
    /// Cost depends on the previously played card (e.g. Mirror).
    Variable,
}

impl ElixirCost {
    pub fn is_variable(&self) -> bool {
        matches!(self, ElixirCost::Variable)
    }

    /// Fixed cost, or `None` for the variable-cost sentinel.
    pub fn fixed(&self) -> Option<f64> {
        match self {
            ElixirCost::Fixed(cost) => Some(*cost),
            ElixirCost::Variable => None,
        }
    }
}

impl std::fmt::Display for ElixirCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElixirCost::Fixed(cost) => write!(f, "{}", cost),
            ElixirCost::Variable => write!(f, "{}", VARIABLE_COST_MARKER),
        }
    }
}

impl FromSql for ElixirCost {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(ElixirCost::Fixed(i as f64)),
            ValueRef::Real(r) => Ok(ElixirCost::Fixed(r)),
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))?
                    .trim();
                if text == VARIABLE_COST_MARKER {
                    Ok(ElixirCost::Variable)
                } else {
                    text.parse::<f64>()
                        .map(ElixirCost::Fixed)
                        .map_err(|_| FromSqlError::InvalidType)
                }
            }
            ValueRef::Null | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// A row of the card catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub elixir_cost: ElixirCost,
}

/// Normalize a user-entered card name to the catalog's title-cased form.
///
/// Every letter that follows a non-letter (or starts the string) is
/// uppercased, every other letter is lowercased: `"mini pekka"` becomes
/// `"Mini Pekka"`, `"x-bow"` becomes `"X-Bow"`.
pub fn normalize_card_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_letter = false;

    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
