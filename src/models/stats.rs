//! Statistic names and the result mapping returned to callers.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::str::FromStr;

/// Result key for deck validation failures.
pub const INVALID_KEY: &str = "invalid";

/// Result key for request-level failures.
pub const ERROR_KEY: &str = "error";

/// Result key for the note attached to a partial result.
pub const NOTE_KEY: &str = "note";

/// A statistic that can be requested for a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    WinRate,
    ElixirCost,
    AverageTrophyCount,
    NumberOfWins,
}

impl Statistic {
    pub const ALL: [Statistic; 4] = [
        Statistic::WinRate,
        Statistic::ElixirCost,
        Statistic::AverageTrophyCount,
        Statistic::NumberOfWins,
    ];

    /// Display name, also used as the result key.
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::WinRate => "Win Rate",
            Statistic::ElixirCost => "Elixir Cost",
            Statistic::AverageTrophyCount => "Average Trophy Count",
            Statistic::NumberOfWins => "Number of Wins",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .iter()
            .copied()
            .find(|stat| stat.label() == s)
            .ok_or_else(|| format!("Unknown statistic: {}", s))
    }
}

/// A value in the result mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Integer(i64),
    Float(f64),
    Message(String),
    /// The statistic could not be computed.
    Missing,
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Integer(i) => Some(*i as f64),
            StatValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&str> {
        match self {
            StatValue::Message(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Option<f64>> for StatValue {
    fn from(value: Option<f64>) -> Self {
        value.map(StatValue::Float).unwrap_or(StatValue::Missing)
    }
}

impl Serialize for StatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatValue::Integer(i) => serializer.serialize_i64(*i),
            StatValue::Float(f) => serializer.serialize_f64(*f),
            StatValue::Message(m) => serializer.serialize_str(m),
            StatValue::Missing => serializer.serialize_none(),
        }
    }
}

/// Ordered mapping from statistic name (or error key) to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatResult {
    entries: Vec<(String, StatValue)>,
}

impl StatResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result holding a single message under `key`.
    pub fn message(key: &str, message: &str) -> Self {
        let mut result = Self::new();
        result.insert(key, StatValue::Message(message.to_string()));
        result
    }

    /// Insert a value. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: StatValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns true if the result carries a validation or request error.
    pub fn is_error(&self) -> bool {
        self.contains_key(INVALID_KEY) || self.contains_key(ERROR_KEY)
    }
}

impl Serialize for StatResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_statistic_labels_round_trip() {
        for stat in Statistic::ALL {
            assert_eq!(stat.label().parse::<Statistic>(), Ok(stat));
        }
    }

    #[test]
    fn test_statistic_unknown() {
        assert!("Deck Popularity".parse::<Statistic>().is_err());
        assert!("win rate".parse::<Statistic>().is_err());
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut result = StatResult::new();
        result.insert("Win Rate", StatValue::Float(0.5));
        result.insert("Elixir Cost", StatValue::Float(3.5));
        result.insert("Number of Wins", StatValue::Integer(3));

        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(keys, vec!["Win Rate", "Elixir Cost", "Number of Wins"]);
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut result = StatResult::new();
        result.insert("Win Rate", StatValue::Float(0.5));
        result.insert("Elixir Cost", StatValue::Float(3.5));
        result.insert("Win Rate", StatValue::Float(0.75));

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("Win Rate"), Some(&StatValue::Float(0.75)));
        assert_eq!(result.keys().next(), Some("Win Rate"));
    }

    #[test]
    fn test_serialize_as_ordered_object() {
        let mut result = StatResult::new();
        result.insert("Win Rate", StatValue::Float(0.6));
        result.insert("Average Trophy Count", StatValue::Integer(5120));
        result.insert("Elixir Cost", StatValue::Missing);

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"Win Rate":0.6,"Average Trophy Count":5120,"Elixir Cost":null}"#
        );
    }

    #[test]
    fn test_message_result() {
        let result = StatResult::message(INVALID_KEY, "contains repeat cards");
        assert!(result.is_error());
        assert_eq!(
            result.get(INVALID_KEY).and_then(StatValue::as_message),
            Some("contains repeat cards")
        );
    }

    #[test]
    fn test_stat_value_as_f64() {
        assert_eq!(StatValue::Integer(4810).as_f64(), Some(4810.0));
        assert_eq!(StatValue::Float(0.6).as_f64(), Some(0.6));
        assert_eq!(StatValue::Missing.as_f64(), None);
        assert_eq!(StatValue::Message("x".to_string()).as_f64(), None);
    }

    #[test]
    fn test_stat_value_from_option() {
        assert_eq!(StatValue::from(Some(4.0)), StatValue::Float(4.0));
        assert_eq!(StatValue::from(None), StatValue::Missing);
    }
}
