//! Code units offered to strategies and the records they produce

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Structural facts an orchestration layer attaches to a code unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeProperty {
    /// The unit is a function definition
    IsFunction,
    /// The unit is a class definition
    IsClass,
    /// The unit is a method on a class
    IsMethod,
    /// The unit body contains a loop
    HasLoop,
    /// The unit body contains a conditional branch
    HasBranch,
    /// The unit body contains a return statement
    HasReturn,
}

/// A candidate snippet of source code with precomputed facts about it.
///
/// The engine never derives properties or complexity itself; both come from
/// whatever produced the unit, and eligibility checks read them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeUnit {
    /// The source text of the unit
    pub source: String,
    /// Property tags describing the unit
    pub properties: HashSet<CodeProperty>,
    /// Cyclomatic complexity score
    pub complexity: u32,
}

impl CodeUnit {
    /// Create a unit with no properties and the minimum complexity score
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            properties: HashSet::new(),
            complexity: 1,
        }
    }

    /// Tag the unit with a property
    pub fn with_property(mut self, property: CodeProperty) -> Self {
        self.properties.insert(property);
        self
    }

    /// Set the unit's complexity score
    pub fn with_complexity(mut self, complexity: u32) -> Self {
        self.complexity = complexity;
        self
    }

    /// Whether the unit carries a property tag
    pub fn has(&self, property: CodeProperty) -> bool {
        self.properties.contains(&property)
    }
}

/// A successfully synthesized bug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugRecord {
    /// Full mutated source text
    pub rewrite: String,
    /// Fixed description of the bug category
    pub explanation: String,
    /// Short identifier of the strategy that produced the bug
    pub strategy: String,
}

impl BugRecord {
    /// Format as compact JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Format as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
