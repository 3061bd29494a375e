//! # Faultline Mutate
//!
//! Procedural mutation strategies that plant type-annotation bugs in Python
//! source snippets. Each strategy parses a unit with [`faultline_pycst`],
//! walks its annotation sites in a fixed order, and lets a seeded decision
//! gate authorize at most one rewrite per pass, so a given seed and likelihood
//! always reproduce the same bug. On success the strategy returns a
//! [`BugRecord`] carrying the full mutated source and fixed labels for the
//! bug category.
//!
//! ```
//! use faultline_mutate::{
//!     CodeProperty, CodeUnit, ProceduralModifier, StrategyConfig, TypeChangeModifier,
//! };
//!
//! let unit = CodeUnit::new("def lookup(key: Optional[str]) -> None:\n    pass\n")
//!     .with_property(CodeProperty::IsFunction)
//!     .with_complexity(3);
//!
//! let mut modifier =
//!     TypeChangeModifier::new(StrategyConfig::default().with_likelihood(1.0).with_seed(7));
//! assert!(modifier.can_modify(&unit));
//!
//! let bug = modifier.modify(&unit).unwrap();
//! assert_eq!(bug.rewrite, "def lookup(key: str) -> None:\n    pass\n");
//! assert_eq!(bug.strategy, "func_pm_type_change");
//! ```

pub mod change;
pub mod config;
pub mod entity;
pub mod modifier;
pub mod random;
pub mod remove;
pub mod rewrite;
pub mod sites;

pub use change::{TypeChangeModifier, TYPE_CHANGE_STRATEGY};
pub use config::StrategyConfig;
pub use entity::{BugRecord, CodeProperty, CodeUnit};
pub use modifier::{DecisionGate, ProceduralModifier, MIN_COMPLEXITY};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use remove::{TypeRemoveModifier, TYPE_REMOVE_STRATEGY};
pub use sites::{collect_sites, Site};
