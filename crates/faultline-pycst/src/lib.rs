//! # Faultline PyCST
//!
//! A lossless concrete-syntax layer for Python source snippets. The tree
//! carries byte spans into the original text instead of reprinting it, so a
//! parse with no edits reproduces the input byte for byte, and a single
//! [`SourceEdit`] splices a rewritten region into otherwise untouched source.
//!
//! Only the constructs that carry type annotations are modeled in detail:
//! function definitions (name, parameters, return annotation) and annotated
//! assignments. Everything else is captured as opaque spans, with compound
//! statement suites still parsed so definitions nested under classes, loops,
//! and `try` blocks remain reachable.
//!
//! ```
//! use faultline_pycst::{parse_module, Stmt};
//!
//! let module = parse_module("def f(x: int) -> int:\n    return x\n").unwrap();
//! assert!(matches!(module.body[0], Stmt::FunctionDef(_)));
//! ```

pub mod ast;
pub mod edit;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::{
    AnnAssign, CompoundStmt, FunctionDef, Identifier, Module, Param, Stmt, Suite, TypeExpr,
};
pub use edit::SourceEdit;
pub use error::{ParseError, ParseResult};
pub use lexer::Lexer;
pub use parser::{parse_module, Parser};
pub use span::Span;
pub use token::{Token, TokenKind};
