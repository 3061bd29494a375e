//! Type-remove strategy: delete one annotation outright

use crate::config::StrategyConfig;
use crate::entity::{BugRecord, CodeProperty, CodeUnit};
use crate::modifier::{run_pass, DecisionGate, ProceduralModifier};
use crate::random::RandomSource;
use crate::sites::Site;
use faultline_pycst::{SourceEdit, Span};

/// Identifier recorded on bugs produced by [`TypeRemoveModifier`]
pub const TYPE_REMOVE_STRATEGY: &str = "func_pm_type_remove";

const EXPLANATION: &str = "There are missing type annotations in the code.";
const CONDITIONS: &[CodeProperty] = &[CodeProperty::IsFunction];

/// Deletes exactly one type annotation from a unit
pub struct TypeRemoveModifier {
    gate: DecisionGate,
}

impl TypeRemoveModifier {
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

impl ProceduralModifier for TypeRemoveModifier {
    fn strategy(&self) -> &'static str {
        TYPE_REMOVE_STRATEGY
    }

    fn explanation(&self) -> &'static str {
        EXPLANATION
    }

    fn conditions(&self) -> &[CodeProperty] {
        CONDITIONS
    }

    fn modify(&mut self, unit: &CodeUnit) -> Option<BugRecord> {
        let source = unit.source.as_str();
        let rewrite = run_pass(source, &mut self.gate, |site, _| delete_annotation(site))?;
        Some(self.record(rewrite))
    }
}

/// Build the deletion edit for one site. Each deletion starts right after the
/// anchor the annotation hangs off, so the colon or arrow goes with it:
///
/// - parameter: `name: T` loses `: T`
/// - return: `(...) -> T` loses ` -> T`
/// - annotated assignment with a value: `x: T = v` becomes `x = v`
///
/// An annotated declaration with no value has no legal plain-assignment form,
/// so that site is declined outright.
fn delete_annotation(site: &Site) -> Option<SourceEdit> {
    match site {
        Site::Param { param, annotation } => {
            let name = param.name.as_ref()?;
            Some(SourceEdit::delete(Span::new(
                name.span.end,
                annotation.span().end,
            )))
        }
        Site::Return { def, annotation } => Some(SourceEdit::delete(Span::new(
            def.params_span.end,
            annotation.span().end,
        ))),
        Site::VarAnn { ann } => {
            ann.value?;
            Some(SourceEdit::delete(Span::new(
                ann.target.end,
                ann.annotation.span().end,
            )))
        }
    }
}
