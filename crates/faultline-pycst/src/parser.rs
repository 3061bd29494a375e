//! Parsing
//!
//! A recursive-descent parser over the lexer's token stream. Function
//! definitions and annotated assignments are parsed in detail; every other
//! statement is captured by span — compound statements keep their headers
//! opaque but have their suites parsed so nested definitions stay reachable.
//!
//! Annotations are handled in two steps: an extent scan finds where the
//! annotation ends (bracket-depth aware, and blind to the commas and colon of
//! a `lambda` header), then a shape pass classifies the covered tokens as a
//! name, dotted name, or subscripted name. Anything the shape pass cannot
//! account for becomes an opaque expression covering the full extent.

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parse a source snippet into a [`Module`]
pub fn parse_module(source: &str) -> ParseResult<Module> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(source, tokens).parse()
}

/// Parser state
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    current: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over a lexed token stream
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            current: 0,
        }
    }

    /// Parse the token stream into a module
    pub fn parse(mut self) -> ParseResult<Module> {
        let mut body = Vec::new();
        while !self.check(TokenKind::Eof) {
            self.parse_line_into(&mut body)?;
        }
        Ok(Module {
            body,
            span: Span::new(0, self.source.len()),
        })
    }

    /// Parse one logical line (or one compound statement) into `out`. A
    /// simple-statement line may contribute several statements when separated
    /// by semicolons.
    fn parse_line_into(&mut self, out: &mut Vec<Stmt>) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Newline => {
                self.advance();
            }
            TokenKind::Indent => return Err(self.error_at_peek("a statement")),
            TokenKind::Def => out.push(self.parse_function_def()?),
            TokenKind::Async => {
                if self.peek_next_kind() == TokenKind::Def {
                    out.push(self.parse_function_def()?);
                } else {
                    out.push(self.parse_compound()?);
                }
            }
            kind if kind.starts_compound() => out.push(self.parse_compound()?),
            _ => out.append(&mut self.parse_inline_stmts()?),
        }
        Ok(())
    }

    /// Parse a function definition: `[async] def name(params) [-> type]: suite`
    fn parse_function_def(&mut self) -> ParseResult<Stmt> {
        let start = self.peek().span;
        if self.check(TokenKind::Async) {
            self.advance();
        }
        self.consume(TokenKind::Def, "'def'")?;
        let name_token = self.consume(TokenKind::Name, "a function name")?;
        let name = Identifier::new(name_token.lexeme.clone(), name_token.span);

        // PEP 695 type parameter list: skipped, not modeled.
        if self.check(TokenKind::LeftBracket) {
            self.skip_balanced();
        }

        let lparen = self.consume(TokenKind::LeftParen, "'(' after function name")?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RightParen) && !self.check(TokenKind::Eof) {
            params.push(self.parse_param()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        let rparen = self.consume(TokenKind::RightParen, "')' after parameters")?;
        let params_span = lparen.span.merge(rparen.span);

        let returns = if self.match_token(TokenKind::Arrow) {
            Some(self.parse_type_annotation(&[TokenKind::Colon], "a return type annotation")?)
        } else {
            None
        };

        self.consume(TokenKind::Colon, "':' after function signature")?;
        let body = self.parse_suite()?;
        let end = body
            .stmts()
            .last()
            .map(|s| s.span().end)
            .unwrap_or(params_span.end);

        Ok(Stmt::FunctionDef(FunctionDef {
            name,
            params,
            params_span,
            returns,
            body,
            span: Span::new(start.start, end),
        }))
    }

    /// Parse one parameter. Parameters that do not fit the
    /// `[*|**] name [: type] [= default]` shape (markers like `*` and `/`,
    /// or anything surprising) are captured opaquely with no name.
    fn parse_param(&mut self) -> ParseResult<Param> {
        let start_idx = self.current;
        let start = self.peek().span;

        if self.check(TokenKind::Star) || self.check(TokenKind::StarStar) {
            self.advance();
        }

        if self.check(TokenKind::Name) {
            let name_token = self.advance();
            let name = Identifier::new(name_token.lexeme.clone(), name_token.span);

            let annotation = if self.match_token(TokenKind::Colon) {
                Some(self.parse_type_annotation(
                    &[TokenKind::Comma, TokenKind::RightParen, TokenKind::Equal],
                    "a type annotation",
                )?)
            } else {
                None
            };

            let default = if self.match_token(TokenKind::Equal) {
                let (s, e) = self.scan_extent_from(
                    self.current,
                    &[TokenKind::Comma, TokenKind::RightParen],
                );
                if s == e {
                    return Err(self.error_at_peek("a default value"));
                }
                self.current = e;
                Some(self.tokens[s].span.merge(self.tokens[e - 1].span))
            } else {
                None
            };

            if self.check(TokenKind::Comma) || self.check(TokenKind::RightParen) {
                let end = self.tokens[self.current - 1].span.end;
                return Ok(Param {
                    name: Some(name),
                    annotation,
                    default,
                    span: Span::new(start.start, end),
                });
            }
        }

        // Opaque parameter: rescan from the start of the parameter.
        let (s, e) =
            self.scan_extent_from(start_idx, &[TokenKind::Comma, TokenKind::RightParen]);
        self.current = e;
        let end = if e > s {
            self.tokens[e - 1].span.end
        } else {
            start.start
        };
        Ok(Param {
            name: None,
            annotation: None,
            default: None,
            span: Span::new(start.start, end),
        })
    }

    /// Parse a compound statement with an opaque header: everything from the
    /// current token through the header colon, then a suite.
    fn parse_compound(&mut self) -> ParseResult<Stmt> {
        let start = self.peek().span;
        let (_, e) = self.scan_extent_from(self.current, &[TokenKind::Colon]);
        if self.tokens[e].kind != TokenKind::Colon {
            self.current = e;
            return Err(self.error_at_peek("':' to end the statement header"));
        }
        self.current = e;
        let colon = self.advance();
        let header = Span::new(start.start, colon.span.end);

        let body = self.parse_suite()?;
        let end = body
            .stmts()
            .last()
            .map(|s| s.span().end)
            .unwrap_or(header.end);

        Ok(Stmt::Compound(CompoundStmt {
            header,
            body,
            span: Span::new(start.start, end),
        }))
    }

    /// Parse the suite after a header colon: either the rest of the line, or
    /// an indented block on the following lines.
    fn parse_suite(&mut self) -> ParseResult<Suite> {
        if self.match_token(TokenKind::Newline) {
            self.consume(TokenKind::Indent, "an indented block")?;
            let mut stmts = Vec::new();
            while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
                self.parse_line_into(&mut stmts)?;
            }
            self.match_token(TokenKind::Dedent);
            Ok(Suite::Block(stmts))
        } else {
            Ok(Suite::Inline(self.parse_inline_stmts()?))
        }
    }

    /// Parse semicolon-separated simple statements up to the end of the line
    fn parse_inline_stmts(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = vec![self.parse_small_stmt()?];
        while self.match_token(TokenKind::Semicolon) {
            if self.check(TokenKind::Newline) || self.check(TokenKind::Eof) {
                break;
            }
            stmts.push(self.parse_small_stmt()?);
        }
        self.match_token(TokenKind::Newline);
        Ok(stmts)
    }

    /// Parse one simple statement: an annotated assignment if the line shapes
    /// like one, otherwise an opaque span. A line whose last token before the
    /// break is a colon is a block header the lexer could not know about
    /// (`match`/`case` are soft keywords) and is re-parsed as a compound
    /// statement.
    fn parse_small_stmt(&mut self) -> ParseResult<Stmt> {
        let (s, e) = self.scan_extent_from(self.current, &[]);
        if s == e {
            return Err(self.error_at_peek("a statement"));
        }
        let slice = &self.tokens[s..e];
        if slice.last().map(|t| t.kind) == Some(TokenKind::Colon) {
            return self.parse_compound();
        }

        let stmt = match ann_assign_from_line(slice) {
            Some(ann) => Stmt::AnnAssign(ann),
            None => Stmt::Opaque(slice[0].span.merge(slice[slice.len() - 1].span)),
        };
        self.current = e;
        Ok(stmt)
    }

    /// Scan an annotation extent and classify its shape
    fn parse_type_annotation(
        &mut self,
        stops: &[TokenKind],
        what: &str,
    ) -> ParseResult<TypeExpr> {
        let (s, e) = self.scan_extent_from(self.current, stops);
        if s == e {
            return Err(self.error_at_peek(what));
        }
        self.current = e;
        Ok(shape_type_expr(&self.tokens[s..e]))
    }

    /// Find where an expression extent ends: at the first of `stops` seen at
    /// bracket depth zero, at any closer that would leave the current depth,
    /// or at a hard break (newline, semicolon, indent change, end of input).
    /// The commas and terminating colon of a `lambda` header do not stop the
    /// scan. Returns `(from, end)` without consuming anything; `end` indexes
    /// the token that stopped the scan.
    fn scan_extent_from(&self, from: usize, stops: &[TokenKind]) -> (usize, usize) {
        let mut i = from;
        let mut depth = 0usize;
        let mut lambda_heads = 0usize;
        loop {
            let kind = self.tokens[i].kind;
            if matches!(
                kind,
                TokenKind::Eof | TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent
            ) {
                break;
            }
            if kind == TokenKind::Semicolon && depth == 0 {
                break;
            }
            if matches!(
                kind,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace
            ) {
                depth += 1;
                i += 1;
                continue;
            }
            if matches!(
                kind,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
            ) {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
                continue;
            }
            if kind == TokenKind::Lambda && depth == 0 {
                lambda_heads += 1;
                i += 1;
                continue;
            }
            if kind == TokenKind::Colon && depth == 0 && lambda_heads > 0 {
                lambda_heads -= 1;
                i += 1;
                continue;
            }
            if depth == 0 && lambda_heads == 0 && stops.contains(&kind) {
                break;
            }
            i += 1;
        }
        (from, i)
    }

    /// Skip a balanced bracket group starting at the current token
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::Eof => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_peek(expected))
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    fn error_at_peek(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof => {
                token.kind.as_str().to_string()
            }
            _ => token.lexeme.clone(),
        };
        ParseError::Expected {
            expected: expected.to_string(),
            found,
            line: self.line_at(token.span.start),
        }
    }

    fn line_at(&self, offset: usize) -> usize {
        let end = offset.min(self.source.len());
        self.source[..end].matches('\n').count() + 1
    }
}

/// Classify a statement's tokens as an annotated assignment:
/// `target : annotation [= value]` with the colon at depth zero before any
/// depth-zero `=`, and a target that is a name/attribute/subscript chain.
fn ann_assign_from_line(tokens: &[Token]) -> Option<AnnAssign> {
    let colon = find_annotation_colon(tokens)?;
    if !is_assign_target(&tokens[..colon]) {
        return None;
    }

    let rest = &tokens[colon + 1..];
    let (ann_slice, value_slice) = match find_top_level_equal(rest) {
        Some(eq) => (&rest[..eq], Some(&rest[eq + 1..])),
        None => (rest, None),
    };
    if ann_slice.is_empty() {
        return None;
    }
    if matches!(value_slice, Some(v) if v.is_empty()) {
        return None;
    }

    let target = tokens[0].span.merge(tokens[colon - 1].span);
    let value = value_slice.map(|v| v[0].span.merge(v[v.len() - 1].span));
    Some(AnnAssign {
        target,
        annotation: shape_type_expr(ann_slice),
        value,
        span: tokens[0].span.merge(tokens[tokens.len() - 1].span),
    })
}

/// Find the annotation colon: the first depth-zero colon that is not part of
/// a lambda header, provided no depth-zero `=` comes before it.
fn find_annotation_colon(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    let mut lambda_heads = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                depth = depth.saturating_sub(1)
            }
            TokenKind::Lambda if depth == 0 => lambda_heads += 1,
            TokenKind::Colon if depth == 0 => {
                if lambda_heads > 0 {
                    lambda_heads -= 1;
                } else {
                    return Some(i);
                }
            }
            TokenKind::Equal if depth == 0 && lambda_heads == 0 => return None,
            _ => {}
        }
    }
    None
}

/// Find the first depth-zero `=` that is not a lambda-header default
fn find_top_level_equal(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    let mut lambda_heads = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                depth = depth.saturating_sub(1)
            }
            TokenKind::Lambda if depth == 0 => lambda_heads += 1,
            TokenKind::Colon if depth == 0 && lambda_heads > 0 => lambda_heads -= 1,
            TokenKind::Equal if depth == 0 && lambda_heads == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Whether the tokens form an assignment target: a name followed by any mix
/// of `.name` accesses and balanced subscript groups
fn is_assign_target(tokens: &[Token]) -> bool {
    if tokens.first().map(|t| t.kind) != Some(TokenKind::Name) {
        return false;
    }
    let mut i = 1;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Dot if tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::Name) => {
                i += 2;
            }
            TokenKind::LeftBracket => {
                let mut depth = 1usize;
                i += 1;
                while i < tokens.len() && depth > 0 {
                    match tokens[i].kind {
                        TokenKind::LeftParen
                        | TokenKind::LeftBracket
                        | TokenKind::LeftBrace => depth += 1,
                        TokenKind::RightParen
                        | TokenKind::RightBracket
                        | TokenKind::RightBrace => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
                if depth != 0 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// Classify an annotation extent's tokens, falling back to an opaque span
fn shape_type_expr(tokens: &[Token]) -> TypeExpr {
    let span = tokens[0].span.merge(tokens[tokens.len() - 1].span);
    try_shape(tokens).unwrap_or(TypeExpr::Opaque(span))
}

/// Try to shape tokens as `name(.name)*` optionally followed by one subscript
/// group that accounts for every remaining token. Subscript arguments are
/// shaped recursively; an argument that fails becomes an opaque expression of
/// its own, which keeps wrapper unwrapping available for exotic inner types.
fn try_shape(tokens: &[Token]) -> Option<TypeExpr> {
    let first = tokens.first()?;
    if first.kind != TokenKind::Name {
        return None;
    }
    let mut parts = vec![Identifier::new(first.lexeme.clone(), first.span)];
    let mut i = 1;
    while i + 1 < tokens.len()
        && tokens[i].kind == TokenKind::Dot
        && tokens[i + 1].kind == TokenKind::Name
    {
        parts.push(Identifier::new(
            tokens[i + 1].lexeme.clone(),
            tokens[i + 1].span,
        ));
        i += 2;
    }

    let span = first.span.merge(tokens[tokens.len() - 1].span);
    if i == tokens.len() {
        return Some(if parts.len() == 1 {
            TypeExpr::Name(parts.remove(0))
        } else {
            TypeExpr::Attribute { parts, span }
        });
    }

    // A subscripted dotted name stays opaque; only a bare base is modeled.
    if parts.len() != 1
        || tokens[i].kind != TokenKind::LeftBracket
        || tokens[tokens.len() - 1].kind != TokenKind::RightBracket
    {
        return None;
    }
    let inner = &tokens[i + 1..tokens.len() - 1];
    if inner.is_empty() {
        return None;
    }

    let mut args = Vec::new();
    for slice in split_top_level(inner)? {
        let arg_first = slice.first()?;
        let arg_span = arg_first.span.merge(slice[slice.len() - 1].span);
        args.push(try_shape(slice).unwrap_or(TypeExpr::Opaque(arg_span)));
    }
    Some(TypeExpr::Parametric {
        base: parts.remove(0),
        args,
        span,
    })
}

/// Split a balanced token slice at depth-zero commas; `None` if the brackets
/// do not balance within the slice
fn split_top_level(tokens: &[Token]) -> Option<Vec<&[Token]>> {
    let mut slices = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            TokenKind::Comma if depth == 0 => {
                slices.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    slices.push(&tokens[start..]);
    Some(slices)
}
