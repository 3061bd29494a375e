//! The shared mutation-strategy contract
//!
//! Every strategy follows the same skeleton: parse the unit, offer each
//! annotation site to the decision gate in traversal order, and splice at most
//! one rewrite back into the source. The gate draws once per site whether or
//! not the pass has already produced its edit, so the positions a given seed
//! fires at do not depend on where the first mutation landed.

use crate::config::StrategyConfig;
use crate::entity::{BugRecord, CodeProperty, CodeUnit};
use crate::random::{RandomSource, SeededRandom};
use crate::sites::{collect_sites, Site};
use faultline_pycst::{parse_module, SourceEdit};

/// Complexity floor below which no strategy attempts a unit
pub const MIN_COMPLEXITY: u32 = 3;

/// Decision state for one strategy instance: the configured likelihood and
/// the random stream draws are taken from
pub struct DecisionGate {
    likelihood: f64,
    random: Box<dyn RandomSource>,
}

impl DecisionGate {
    /// Gate seeded from a strategy config
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            likelihood: config.likelihood,
            random: Box::new(SeededRandom::new(config.seed)),
        }
    }

    /// Gate drawing from a caller-supplied source
    pub fn with_source(likelihood: f64, random: Box<dyn RandomSource>) -> Self {
        Self { likelihood, random }
    }

    /// One uniform draw against the likelihood. Exactly one draw per call,
    /// with no retries or compensating draws.
    pub fn flip(&mut self) -> bool {
        self.random.next_f64() < self.likelihood
    }

    /// Uniform pick from a slice. An empty slice yields `None` without
    /// consuming a draw.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.random.next_index(items.len())])
        }
    }

    /// Fair coin
    pub fn coin(&mut self) -> bool {
        self.random.next_bool()
    }
}

/// A source-level mutation strategy
pub trait ProceduralModifier {
    /// Short identifier recorded with every bug this strategy produces
    fn strategy(&self) -> &'static str;

    /// Fixed human-readable description of the bug category
    fn explanation(&self) -> &'static str;

    /// Property tags a unit must carry to be eligible
    fn conditions(&self) -> &[CodeProperty];

    /// Complexity floor for eligibility
    fn min_complexity(&self) -> u32 {
        MIN_COMPLEXITY
    }

    /// Whether a unit is worth attempting. Callers consult this before
    /// `modify`; `modify` itself does not re-check eligibility.
    fn can_modify(&self, unit: &CodeUnit) -> bool {
        unit.complexity >= self.min_complexity()
            && self.conditions().iter().all(|p| unit.has(*p))
    }

    /// Run one mutation pass over the unit. Returns `None` when the source
    /// does not parse, no site's flip fired, every fired site had no legal
    /// rewrite, or the rewritten text came out identical to the input.
    fn modify(&mut self, unit: &CodeUnit) -> Option<BugRecord>;

    /// Package a mutated source text with this strategy's labels
    fn record(&self, rewrite: String) -> BugRecord {
        BugRecord {
            rewrite,
            explanation: self.explanation().to_string(),
            strategy: self.strategy().to_string(),
        }
    }
}

/// Drive one traversal pass: parse, offer every site to the gate, apply the
/// winning edit, and confirm the output differs from the input.
///
/// The already-modified flag is the `winner` local: once an edit is produced,
/// later sites still consume their flip draw but are never handled. A fired
/// site whose handler returns `None` (no legal rewrite there) does not set
/// the flag, so the pass keeps looking.
pub(crate) fn run_pass(
    source: &str,
    gate: &mut DecisionGate,
    mut site_edit: impl FnMut(&Site, &mut DecisionGate) -> Option<SourceEdit>,
) -> Option<String> {
    let module = parse_module(source).ok()?;
    let mut winner: Option<SourceEdit> = None;
    for site in collect_sites(&module) {
        let fired = gate.flip();
        if winner.is_some() || !fired {
            continue;
        }
        winner = site_edit(&site, gate);
    }
    let rewrite = winner?.apply(source);
    if rewrite == source {
        return None;
    }
    Some(rewrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use faultline_pycst::Span;

    struct NullModifier;

    impl ProceduralModifier for NullModifier {
        fn strategy(&self) -> &'static str {
            "null"
        }
        fn explanation(&self) -> &'static str {
            "does nothing"
        }
        fn conditions(&self) -> &[CodeProperty] {
            &[CodeProperty::IsFunction]
        }
        fn modify(&mut self, _unit: &CodeUnit) -> Option<BugRecord> {
            None
        }
    }

    #[test]
    fn eligibility_needs_tags_and_complexity() {
        let modifier = NullModifier;
        let eligible = CodeUnit::new("def f(): pass\n")
            .with_property(CodeProperty::IsFunction)
            .with_complexity(3);
        assert!(modifier.can_modify(&eligible));

        let too_simple = eligible.clone().with_complexity(2);
        assert!(!modifier.can_modify(&too_simple));

        let untagged = CodeUnit::new("def f(): pass\n").with_complexity(9);
        assert!(!modifier.can_modify(&untagged));
    }

    #[test]
    fn record_carries_strategy_labels() {
        let record = NullModifier.record("source".to_string());
        assert_eq!(record.strategy, "null");
        assert_eq!(record.explanation, "does nothing");
        assert_eq!(record.rewrite, "source");
    }

    #[test]
    fn gate_choose_skips_draw_for_empty_slices() {
        // No queued picks: choose on an empty slice must not reach the source.
        let mut gate = DecisionGate::with_source(1.0, Box::new(ScriptedRandom::new()));
        let empty: &[&str] = &[];
        assert!(gate.choose(empty).is_none());
    }

    #[test]
    fn unparseable_source_is_a_no_op() {
        let mut gate = DecisionGate::with_source(1.0, Box::new(ScriptedRandom::new()));
        let out = run_pass("def f(:\n", &mut gate, |_, _| {
            Some(SourceEdit::replace(Span::new(0, 0), "x".to_string()))
        });
        assert!(out.is_none());
    }

    #[test]
    fn later_sites_win_when_earlier_handlers_decline() {
        let src = "def f(a: int, b: str):\n    pass\n";
        let script = ScriptedRandom::new().with_flips([0.0, 0.0]);
        let mut gate = DecisionGate::with_source(1.0, Box::new(script));
        let mut offered = Vec::new();
        let out = run_pass(src, &mut gate, |site, _| {
            let text = site.annotation().span().slice(src).to_string();
            offered.push(text.clone());
            if text == "int" {
                None
            } else {
                Some(SourceEdit::replace(site.annotation().span(), "bytes".to_string()))
            }
        });
        assert_eq!(offered, vec!["int", "str"]);
        assert_eq!(out.unwrap(), "def f(a: int, b: bytes):\n    pass\n");
    }

    #[test]
    fn flag_blocks_sites_after_first_edit_but_draws_continue() {
        let src = "def f(a: int, b: str, c: bool):\n    pass\n";
        // Three sites, three flips scripted; only the first is handled.
        let script = ScriptedRandom::new().with_flips([0.0, 0.0, 0.0]);
        let mut gate = DecisionGate::with_source(1.0, Box::new(script));
        let mut handled = 0;
        let out = run_pass(src, &mut gate, |site, _| {
            handled += 1;
            Some(SourceEdit::replace(site.annotation().span(), "float".to_string()))
        });
        assert_eq!(handled, 1);
        assert_eq!(out.unwrap(), "def f(a: float, b: str, c: bool):\n    pass\n");
    }
}
