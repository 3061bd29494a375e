//! Lexical analysis (tokenization)
//!
//! The lexer converts Python source into a stream of tokens with byte-accurate
//! span information. Block structure is surfaced as `Newline`/`Indent`/`Dedent`
//! tokens: newlines inside brackets are treated as whitespace, blank and
//! comment-only lines produce nothing, and indentation is tracked against a
//! stack seeded from the first content line so indented snippets lex cleanly.
//!
//! String literals (including prefixed and triple-quoted forms) are consumed
//! as single opaque tokens; the contents of f-string interpolation fields are
//! not tokenized.

use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Original source code
    source: String,
    /// Characters of the source with their byte offsets
    chars: Vec<(usize, char)>,
    /// Current position in `chars`
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Byte offset where the current token starts
    start: usize,
    /// Line where the current token starts
    start_line: usize,
    /// Open bracket nesting depth
    bracket_depth: usize,
    /// Open brackets with the line they were opened on
    open_brackets: Vec<(char, usize)>,
    /// Indentation stack; entry 0 is the base level of the snippet
    indents: Vec<String>,
    /// Whether the cursor sits at the start of a logical line
    at_line_start: bool,
    /// Whether the current logical line has produced any token
    line_has_content: bool,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        Self {
            source,
            chars,
            current: 0,
            line: 1,
            start: 0,
            start_line: 1,
            bracket_depth: 0,
            open_brackets: Vec::new(),
            indents: Vec::new(),
            at_line_start: true,
            line_has_content: false,
        }
    }

    /// Tokenize the source code
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                self.scan_indentation(&mut tokens)?;
            }
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }
            let token = self.next_token()?;
            tokens.push(token);
        }

        if let Some(&(bracket, line)) = self.open_brackets.last() {
            return Err(ParseError::UnclosedBracket { bracket, line });
        }

        let end = self.source.len();
        if self.line_has_content {
            tokens.push(Token::new(TokenKind::Newline, "", Span::new(end, end)));
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            tokens.push(Token::new(TokenKind::Dedent, "", Span::new(end, end)));
        }
        tokens.push(Token::new(TokenKind::Eof, "", Span::new(end, end)));

        Ok(tokens)
    }

    /// Measure the indentation of the next content line, emitting `Indent` or
    /// `Dedent` tokens as the level changes. Blank and comment-only lines are
    /// consumed without producing anything.
    fn scan_indentation(&mut self, tokens: &mut Vec<Token>) -> ParseResult<()> {
        loop {
            let line_start = self.byte_pos();
            let mut indent = String::new();
            while let Some(c @ (' ' | '\t')) = self.peek() {
                indent.push(c);
                self.advance();
            }

            match self.peek() {
                None => {
                    self.at_line_start = false;
                    return Ok(());
                }
                Some('\r') => {
                    self.advance();
                    continue;
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    continue;
                }
                Some('#') => {
                    while !self.is_at_end() && self.peek() != Some('\n') {
                        self.advance();
                    }
                    continue;
                }
                Some(_) => {}
            }

            if self.indents.is_empty() {
                // First content line fixes the base level.
                self.indents.push(indent);
            } else if &indent == self.indents.last().unwrap() {
                // Same level.
            } else if indent.starts_with(self.indents.last().unwrap().as_str()) {
                self.indents.push(indent);
                tokens.push(Token::new(
                    TokenKind::Indent,
                    "",
                    Span::new(line_start, self.byte_pos()),
                ));
            } else {
                while self.indents.last().map(String::as_str) != Some(indent.as_str()) {
                    if self.indents.len() == 1 {
                        return Err(ParseError::BadDedent { line: self.line });
                    }
                    self.indents.pop();
                    tokens.push(Token::new(
                        TokenKind::Dedent,
                        "",
                        Span::new(line_start, line_start),
                    ));
                }
            }

            self.at_line_start = false;
            return Ok(());
        }
    }

    /// Skip spaces, comments, escaped line breaks, and (inside brackets)
    /// newlines. The newline that ends a logical line is left for
    /// [`next_token`](Self::next_token).
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('\n') if self.bracket_depth > 0 => {
                    self.advance();
                    self.line += 1;
                }
                Some('#') => {
                    while !self.is_at_end() && self.peek() != Some('\n') {
                        self.advance();
                    }
                }
                Some('\\') if matches!(self.peek_next(), Some('\n' | '\r')) => {
                    self.advance();
                    if self.advance() == '\r' && self.peek() == Some('\n') {
                        self.advance();
                    }
                    self.line += 1;
                }
                _ => return,
            }
        }
    }

    /// Scan the next token
    fn next_token(&mut self) -> ParseResult<Token> {
        self.start = self.byte_pos();
        self.start_line = self.line;
        self.line_has_content = true;

        let c = self.advance();

        let token = match c {
            '\n' => {
                self.line += 1;
                self.at_line_start = true;
                self.line_has_content = false;
                self.make_token(TokenKind::Newline)
            }

            '(' => self.open_bracket(TokenKind::LeftParen, '('),
            '[' => self.open_bracket(TokenKind::LeftBracket, '['),
            '{' => self.open_bracket(TokenKind::LeftBrace, '{'),
            ')' => self.close_bracket(TokenKind::RightParen),
            ']' => self.close_bracket(TokenKind::RightBracket),
            '}' => self.close_bracket(TokenKind::RightBrace),

            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),

            ':' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::Op)
                } else {
                    self.make_token(TokenKind::Colon)
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::Op)
                } else {
                    self.make_token(TokenKind::Equal)
                }
            }
            '-' => {
                if self.match_char('>') {
                    self.make_token(TokenKind::Arrow)
                } else {
                    self.match_char('=');
                    self.make_token(TokenKind::Op)
                }
            }
            '*' => {
                if self.match_char('*') {
                    if self.match_char('=') {
                        self.make_token(TokenKind::Op)
                    } else {
                        self.make_token(TokenKind::StarStar)
                    }
                } else if self.match_char('=') {
                    self.make_token(TokenKind::Op)
                } else {
                    self.make_token(TokenKind::Star)
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.make_token(TokenKind::Op)
                } else {
                    self.make_token(TokenKind::Dot)
                }
            }
            '/' | '<' | '>' => {
                // Possibly doubled, then possibly augmented.
                if self.peek() == Some(c) {
                    self.advance();
                }
                self.match_char('=');
                self.make_token(TokenKind::Op)
            }
            '!' | '+' | '%' | '@' | '&' | '|' | '^' => {
                self.match_char('=');
                self.make_token(TokenKind::Op)
            }

            '"' | '\'' => self.string(c)?,

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier()?,

            // Anything else is carried as an opaque operator; downstream
            // parsing captures unmodeled text by span, never by meaning.
            _ => self.make_token(TokenKind::Op),
        };

        Ok(token)
    }

    /// Consume a string literal; the opening quote has been consumed. The
    /// token span starts at `self.start`, which includes any prefix letters.
    fn string(&mut self, quote: char) -> ParseResult<Token> {
        let triple = self.peek() == Some(quote) && self.peek_next() == Some(quote);
        if triple {
            self.advance();
            self.advance();
            loop {
                if self.is_at_end() {
                    return Err(ParseError::UnterminatedString {
                        line: self.start_line,
                    });
                }
                let c = self.advance();
                if c == '\n' {
                    self.line += 1;
                } else if c == '\\' && !self.is_at_end() {
                    if self.advance() == '\n' {
                        self.line += 1;
                    }
                } else if c == quote && self.peek() == Some(quote) && self.peek_next() == Some(quote)
                {
                    self.advance();
                    self.advance();
                    break;
                }
            }
        } else {
            loop {
                if self.is_at_end() {
                    return Err(ParseError::UnterminatedString {
                        line: self.start_line,
                    });
                }
                let c = self.advance();
                if c == '\n' {
                    return Err(ParseError::UnterminatedString {
                        line: self.start_line,
                    });
                } else if c == '\\' && !self.is_at_end() {
                    if self.advance() == '\n' {
                        self.line += 1;
                    }
                } else if c == quote {
                    break;
                }
            }
        }
        Ok(self.make_token(TokenKind::String))
    }

    /// Consume a number literal. Exponent signs are not chased; the tail
    /// lexes as separate tokens, which is harmless in opaque positions.
    fn number(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '.') {
            self.advance();
        }
        self.make_token(TokenKind::Number)
    }

    /// Consume an identifier, keyword, or prefixed string literal
    fn identifier(&mut self) -> ParseResult<Token> {
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let lexeme = &self.source[self.start..self.byte_pos()];

        if matches!(self.peek(), Some('"' | '\'')) && is_string_prefix(lexeme) {
            let quote = self.advance();
            return self.string(quote);
        }

        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Name);
        Ok(self.make_token(kind))
    }

    fn open_bracket(&mut self, kind: TokenKind, bracket: char) -> Token {
        self.bracket_depth += 1;
        self.open_brackets.push((bracket, self.start_line));
        self.make_token(kind)
    }

    fn close_bracket(&mut self, kind: TokenKind) -> Token {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
        self.open_brackets.pop();
        self.make_token(kind)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let span = Span::new(self.start, self.byte_pos());
        Token::new(kind, span.slice(&self.source), span)
    }

    fn byte_pos(&self) -> usize {
        self.chars
            .get(self.current)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.source.len())
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).map(|&(_, c)| c)
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).map(|&(_, c)| c)
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current].1;
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

fn is_string_prefix(s: &str) -> bool {
    !s.is_empty() && s.len() <= 2 && s.chars().all(|c| matches!(c, 'r' | 'R' | 'b' | 'B' | 'f' | 'F' | 'u' | 'U'))
}
