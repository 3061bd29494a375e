//! Syntax tree node definitions
//!
//! The tree models exactly the constructs annotation mutation needs to
//! navigate: function definitions (parameters, return annotation, body),
//! annotated assignments, and type expressions. Everything else is captured
//! as an opaque span so the surrounding structure still walks correctly.
//!
//! Every node borrows a byte span into the original source; nodes built after
//! parsing (replacement subtrees) carry [`Span::dummy`] instead.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A parsed module: the top-level statement sequence of a source snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `def name(params) -> type: suite` (or `async def`)
    FunctionDef(FunctionDef),
    /// `target: annotation` or `target: annotation = value`
    AnnAssign(AnnAssign),
    /// Any other statement carrying a suite (`if`, `for`, `class`, ...)
    Compound(CompoundStmt),
    /// Any simple statement the tree does not model
    Opaque(Span),
}

impl Stmt {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::FunctionDef(f) => f.span,
            Stmt::AnnAssign(a) => a.span,
            Stmt::Compound(c) => c.span,
            Stmt::Opaque(span) => *span,
        }
    }
}

/// A function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Identifier,
    pub params: Vec<Param>,
    /// Span of the parameter list including both parentheses; the return
    /// annotation (if any) starts after this
    pub params_span: Span,
    pub returns: Option<TypeExpr>,
    pub body: Suite,
    pub span: Span,
}

/// One formal parameter
///
/// Marker entries (`*`, `/`) and parameters the parser cannot shape (for
/// example a default containing something it mis-splits on) have no name and
/// no annotation; they are never mutation candidates. A parameter with an
/// annotation always has a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Option<Identifier>,
    pub annotation: Option<TypeExpr>,
    /// Span of the default value expression, if present
    pub default: Option<Span>,
    pub span: Span,
}

/// An annotated assignment statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnAssign {
    /// Span of the assignment target (a name, attribute, or subscript chain)
    pub target: Span,
    pub annotation: TypeExpr,
    /// Span of the initializer value, if present
    pub value: Option<Span>,
    pub span: Span,
}

/// A compound statement the tree does not model in detail: its header is kept
/// as a span and its suite is parsed so nested definitions and annotated
/// assignments remain reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundStmt {
    /// Span from the introducing keyword through the header colon
    pub header: Span,
    pub body: Suite,
    pub span: Span,
}

/// A statement suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Suite {
    /// Statements on the header line itself: `def f(): x = 1; return x`
    Inline(Vec<Stmt>),
    /// An indented block on the following lines
    Block(Vec<Stmt>),
}

impl Suite {
    /// The statements in this suite, regardless of layout
    pub fn stmts(&self) -> &[Stmt] {
        match self {
            Suite::Inline(stmts) | Suite::Block(stmts) => stmts,
        }
    }
}

/// A type annotation expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExpr {
    /// A bare name: `int`, `MyClass`, `None`
    Name(Identifier),
    /// A dotted name: `typing.Optional`, `a.b.C`
    Attribute { parts: Vec<Identifier>, span: Span },
    /// A subscripted bare name: `List[int]`, `Dict[str, int]`
    Parametric {
        base: Identifier,
        args: Vec<TypeExpr>,
        span: Span,
    },
    /// Any annotation shape the tree does not model (`int | None`,
    /// string annotations, subscripted dotted names, ...)
    Opaque(Span),
}

impl TypeExpr {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Name(id) => id.span,
            TypeExpr::Attribute { span, .. } => *span,
            TypeExpr::Parametric { span, .. } => *span,
            TypeExpr::Opaque(span) => *span,
        }
    }
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    /// Create a new identifier
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}
