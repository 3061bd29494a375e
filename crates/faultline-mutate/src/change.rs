//! Type-change strategy: swap one annotation for a plausible wrong one

use crate::config::StrategyConfig;
use crate::entity::{BugRecord, CodeProperty, CodeUnit};
use crate::modifier::{run_pass, DecisionGate, ProceduralModifier};
use crate::random::RandomSource;
use crate::rewrite::{render_type_expr, rewrite_type_expr};
use crate::sites::Site;
use faultline_pycst::SourceEdit;

/// Identifier recorded on bugs produced by [`TypeChangeModifier`]
pub const TYPE_CHANGE_STRATEGY: &str = "func_pm_type_change";

const EXPLANATION: &str = "The type annotations in the code are likely incorrect.";
const CONDITIONS: &[CodeProperty] = &[CodeProperty::IsFunction];

/// Rewrites exactly one type annotation in a unit to a different type
pub struct TypeChangeModifier {
    gate: DecisionGate,
}

impl TypeChangeModifier {
    /// Modifier with the configured likelihood and seed
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            gate: DecisionGate::new(config),
        }
    }

    /// Modifier drawing from a caller-supplied random source
    pub fn with_source(likelihood: f64, random: Box<dyn RandomSource>) -> Self {
        Self {
            gate: DecisionGate::with_source(likelihood, random),
        }
    }
}

impl ProceduralModifier for TypeChangeModifier {
    fn strategy(&self) -> &'static str {
        TYPE_CHANGE_STRATEGY
    }

    fn explanation(&self) -> &'static str {
        EXPLANATION
    }

    fn conditions(&self) -> &[CodeProperty] {
        CONDITIONS
    }

    fn modify(&mut self, unit: &CodeUnit) -> Option<BugRecord> {
        let source = unit.source.as_str();
        let rewrite = run_pass(source, &mut self.gate, |site, gate| {
            substitute_annotation(site, source, gate)
        })?;
        Some(self.record(rewrite))
    }
}

/// Build the replacement edit for one site, or `None` when the annotation's
/// shape has no applicable rewrite rule
fn substitute_annotation(
    site: &Site,
    source: &str,
    gate: &mut DecisionGate,
) -> Option<SourceEdit> {
    let annotation = site.annotation();
    let replacement = rewrite_type_expr(annotation, gate)?;
    Some(SourceEdit::replace(
        annotation.span(),
        render_type_expr(&replacement, source),
    ))
}
