//! Token types for lexical analysis
//!
//! Defines the tokens recognized by the Python lexer. Structural punctuation
//! and the keywords the parser dispatches on get their own kinds; every other
//! operator is lexed as [`TokenKind::Op`] with its text in the lexeme, since
//! the parser only needs it for bracket-depth and extent scanning.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Atoms
    /// Identifier or non-structural keyword (`return`, `pass`, ...)
    Name,
    /// Number literal (42, 3.14, 0x1f)
    Number,
    /// String literal, including prefix and quotes
    String,

    // Keywords the parser dispatches on
    /// `def` keyword
    Def,
    /// `class` keyword
    Class,
    /// `async` keyword
    Async,
    /// `if` keyword
    If,
    /// `elif` keyword
    Elif,
    /// `else` keyword
    Else,
    /// `for` keyword
    For,
    /// `while` keyword
    While,
    /// `with` keyword
    With,
    /// `try` keyword
    Try,
    /// `except` keyword
    Except,
    /// `finally` keyword
    Finally,
    /// `lambda` keyword
    Lambda,

    // Structural punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `=` (plain, not `==` or an augmented assignment)
    Equal,
    /// `->`
    Arrow,
    /// `.`
    Dot,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// Any other operator (`+`, `==`, `:=`, `|`, ...), text in the lexeme
    Op,

    // Layout
    /// Logical end of line (suppressed inside brackets)
    Newline,
    /// Increase in indentation level
    Indent,
    /// Decrease in indentation level
    Dedent,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Keyword lookup for identifiers; returns `None` for plain names and for
    /// keywords the parser treats as opaque text.
    pub fn keyword(name: &str) -> Option<TokenKind> {
        match name {
            "def" => Some(TokenKind::Def),
            "class" => Some(TokenKind::Class),
            "async" => Some(TokenKind::Async),
            "if" => Some(TokenKind::If),
            "elif" => Some(TokenKind::Elif),
            "else" => Some(TokenKind::Else),
            "for" => Some(TokenKind::For),
            "while" => Some(TokenKind::While),
            "with" => Some(TokenKind::With),
            "try" => Some(TokenKind::Try),
            "except" => Some(TokenKind::Except),
            "finally" => Some(TokenKind::Finally),
            "lambda" => Some(TokenKind::Lambda),
            _ => None,
        }
    }

    /// Whether this kind opens a compound statement header
    pub fn starts_compound(&self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::If
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::For
                | TokenKind::While
                | TokenKind::With
                | TokenKind::Try
                | TokenKind::Except
                | TokenKind::Finally
        )
    }

    /// Human-readable name for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Name => "name",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Def => "def",
            TokenKind::Class => "class",
            TokenKind::Async => "async",
            TokenKind::If => "if",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::With => "with",
            TokenKind::Try => "try",
            TokenKind::Except => "except",
            TokenKind::Finally => "finally",
            TokenKind::Lambda => "lambda",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Equal => "=",
            TokenKind::Arrow => "->",
            TokenKind::Dot => ".",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Op => "operator",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Eof => "end of input",
        }
    }
}
