//! Ordered request validation rules.
//!
//! Rules are checked top to bottom and the first one that applies decides
//! the outcome. The occurrence count is only queried once a rule needs it.

use std::cell::OnceCell;

/// What the resolver should put in the result for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A card name did not resolve, or the deck has the wrong size.
    InvalidCardNames,
    RepeatCards,
    NoStatistics,
    /// Deck never played and elixir cost was not requested.
    NotInDataset,
    /// Deck never played and elixir cost was the only request.
    ElixirCostOnly,
    /// Deck never played; elixir cost plus a note about the rest.
    ElixirCostWithNote,
    ComputeAll,
}

/// Inputs the rules are evaluated against.
pub struct RequestFacts<'a> {
    pub deck_resolved: bool,
    pub has_repeats: bool,
    pub statistic_count: usize,
    pub elixir_requested: bool,
    occurrences: OnceCell<i64>,
    occurrence_probe: &'a dyn Fn() -> i64,
}

impl<'a> RequestFacts<'a> {
    pub fn new(
        deck_resolved: bool,
        has_repeats: bool,
        statistic_count: usize,
        elixir_requested: bool,
        occurrence_probe: &'a dyn Fn() -> i64,
    ) -> Self {
        Self {
            deck_resolved,
            has_repeats,
            statistic_count,
            elixir_requested,
            occurrences: OnceCell::new(),
            occurrence_probe,
        }
    }

    /// Number of historical matches for the deck, queried at most once.
    pub fn occurrences(&self) -> i64 {
        *self.occurrences.get_or_init(|| (self.occurrence_probe)())
    }

    fn not_in_dataset(&self) -> bool {
        self.occurrences() == 0
    }
}

struct Rule {
    applies: fn(&RequestFacts<'_>) -> bool,
    outcome: Outcome,
}

fn names_unresolved(facts: &RequestFacts<'_>) -> bool {
    !facts.deck_resolved
}

fn repeats(facts: &RequestFacts<'_>) -> bool {
    facts.has_repeats
}

fn nothing_requested(facts: &RequestFacts<'_>) -> bool {
    facts.statistic_count == 0
}

fn absent_without_elixir(facts: &RequestFacts<'_>) -> bool {
    facts.not_in_dataset() && !facts.elixir_requested
}

fn absent_single_request(facts: &RequestFacts<'_>) -> bool {
    facts.not_in_dataset() && facts.statistic_count == 1
}

fn absent(facts: &RequestFacts<'_>) -> bool {
    facts.not_in_dataset()
}

const RULES: [Rule; 6] = [
    Rule {
        applies: names_unresolved,
        outcome: Outcome::InvalidCardNames,
    },
    Rule {
        applies: repeats,
        outcome: Outcome::RepeatCards,
    },
    Rule {
        applies: nothing_requested,
        outcome: Outcome::NoStatistics,
    },
    Rule {
        applies: absent_without_elixir,
        outcome: Outcome::NotInDataset,
    },
    Rule {
        applies: absent_single_request,
        outcome: Outcome::ElixirCostOnly,
    },
    Rule {
        applies: absent,
        outcome: Outcome::ElixirCostWithNote,
    },
];

/// Pick the outcome of the first rule that applies.
pub fn evaluate(facts: &RequestFacts<'_>) -> Outcome {
    RULES
        .iter()
        .find(|rule| (rule.applies)(facts))
        .map(|rule| rule.outcome)
        .unwrap_or(Outcome::ComputeAll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn unreachable_probe() -> i64 {
        panic!("occurrence count should not be queried")
    }

    #[test]
    fn test_invalid_names_masks_everything() {
        let facts = RequestFacts::new(false, true, 0, false, &unreachable_probe);
        assert_eq!(evaluate(&facts), Outcome::InvalidCardNames);
    }

    #[test]
    fn test_repeats_before_empty_request() {
        let facts = RequestFacts::new(true, true, 0, false, &unreachable_probe);
        assert_eq!(evaluate(&facts), Outcome::RepeatCards);
    }

    #[test]
    fn test_no_statistics() {
        let facts = RequestFacts::new(true, false, 0, false, &unreachable_probe);
        assert_eq!(evaluate(&facts), Outcome::NoStatistics);
    }

    #[test]
    fn test_absent_without_elixir() {
        let zero = || 0_i64;
        let facts = RequestFacts::new(true, false, 2, false, &zero);
        assert_eq!(evaluate(&facts), Outcome::NotInDataset);
    }

    #[test]
    fn test_absent_elixir_only() {
        let zero = || 0_i64;
        let facts = RequestFacts::new(true, false, 1, true, &zero);
        assert_eq!(evaluate(&facts), Outcome::ElixirCostOnly);
    }

    #[test]
    fn test_absent_elixir_with_others() {
        let zero = || 0_i64;
        let facts = RequestFacts::new(true, false, 3, true, &zero);
        assert_eq!(evaluate(&facts), Outcome::ElixirCostWithNote);
    }

    #[test]
    fn test_present_computes_all() {
        let ten = || 10_i64;
        let facts = RequestFacts::new(true, false, 1, false, &ten);
        assert_eq!(evaluate(&facts), Outcome::ComputeAll);
    }

    #[test]
    fn test_occurrences_queried_once() {
        let calls = Cell::new(0);
        let probe = || {
            calls.set(calls.get() + 1);
            0_i64
        };
        let facts = RequestFacts::new(true, false, 3, true, &probe);

        assert_eq!(evaluate(&facts), Outcome::ElixirCostWithNote);
        assert_eq!(calls.get(), 1);
    }
}
