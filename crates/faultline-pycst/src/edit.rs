//! Source text edits
//!
//! Serialization in this crate is splicing: a rewrite is expressed as one
//! replacement of a byte range in the original text, so every byte outside
//! the edited span survives exactly as written. A tree with no edits
//! round-trips to the input by definition.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A single replacement of a byte range in the source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEdit {
    /// The byte range to replace
    pub span: Span,
    /// The text to put in its place (empty for a deletion)
    pub replacement: String,
}

impl SourceEdit {
    /// Replace the text covered by `span` with `replacement`
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Delete the text covered by `span`
    pub fn delete(span: Span) -> Self {
        Self {
            span,
            replacement: String::new(),
        }
    }

    /// Apply this edit to the source, producing the rewritten text
    pub fn apply(&self, source: &str) -> String {
        let mut out = String::with_capacity(
            source.len() - self.span.len() + self.replacement.len(),
        );
        out.push_str(&source[..self.span.start]);
        out.push_str(&self.replacement);
        out.push_str(&source[self.span.end..]);
        out
    }
}
