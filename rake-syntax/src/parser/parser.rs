use tracing::trace;

use crate::error::{Diagnostics, ParseError};
use crate::ir::ast::{
    Definition, FieldDef, Parameter, RakeDef, RecordDef, ResultSpec, RoutineDef, SourceFile,
    TypeDef,
};
use crate::span::Span;

use super::ErrorMode;
use super::cursor::TokenCursor;
use super::lexer::{Token, TokenKind};

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Fail-fast parse of an already lexed buffer.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<SourceFile, ParseError> {
    let mut parser = Parser::new(tokens);
    let mut diagnostics = Diagnostics::default();
    let file = parser.parse_source_file(ErrorMode::FailFast, &mut diagnostics);
    match diagnostics.errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(file),
    }
}

pub struct Parser {
    pub(crate) cursor: TokenCursor,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
        }
    }

    pub fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    pub fn parse_source_file(
        &mut self,
        mode: ErrorMode,
        diagnostics: &mut Diagnostics,
    ) -> SourceFile {
        let mut definitions = Vec::new();

        while !self.cursor.at_eof() {
            let started = self.cursor.position();
            match self.parse_definition() {
                Ok(definition) => definitions.push(definition),
                Err(error) => {
                    diagnostics.push(error);
                    if mode == ErrorMode::FailFast {
                        break;
                    }
                    self.recover_to_next_definition(started);
                }
            }
        }

        let span = Span::default().merge(self.cursor.peek().span);
        SourceFile { definitions, span }
    }

    fn parse_definition(&mut self) -> PResult<Definition> {
        match self.peek_kind() {
            TokenKind::Stack => Ok(Definition::Stack(self.parse_record_def()?)),
            TokenKind::Single => Ok(Definition::Single(self.parse_record_def()?)),
            TokenKind::Type => Ok(Definition::Type(self.parse_type_def()?)),
            TokenKind::Crunch => Ok(Definition::Crunch(self.parse_routine_def()?)),
            TokenKind::Rake => Ok(Definition::Rake(self.parse_rake_def()?)),
            TokenKind::Run => Ok(Definition::Run(self.parse_routine_def()?)),
            _ => Err(self.unexpected(&[
                "`stack`", "`single`", "`type`", "`crunch`", "`rake`", "`run`",
            ])),
        }
    }

    /// stack Name { field: type, ... } / single Name { ... }
    fn parse_record_def(&mut self) -> PResult<RecordDef> {
        let start = self.cursor.advance().span; // consume 'stack' / 'single'
        let (name, _) = self.expect_type_ident()?;
        self.expect(TokenKind::LBrace)?;
        let fields = self.comma_separated(TokenKind::RBrace, |p| p.parse_field_def())?;
        self.expect(TokenKind::RBrace)?;
        Ok(RecordDef {
            name,
            fields,
            span: self.span_from(start),
        })
    }

    fn parse_field_def(&mut self) -> PResult<FieldDef> {
        let (name, start) = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(FieldDef {
            name,
            ty,
            span: self.span_from(start),
        })
    }

    fn parse_type_def(&mut self) -> PResult<TypeDef> {
        let start = self.cursor.advance().span; // consume 'type'
        let (name, _) = self.expect_type_ident()?;
        self.expect(TokenKind::Equal)?;
        let aliased = self.parse_type()?;
        Ok(TypeDef {
            name,
            aliased,
            span: self.span_from(start),
        })
    }

    /// crunch / run: name params -> result: statements
    fn parse_routine_def(&mut self) -> PResult<RoutineDef> {
        let start = self.cursor.advance().span; // consume 'crunch' / 'run'
        let (name, _) = self.expect_ident()?;
        let (params, result) = self.parse_signature()?;

        let mut body = Vec::new();
        while !self.at_definition_boundary() {
            body.push(self.parse_statement()?);
        }

        Ok(RoutineDef {
            name,
            params,
            result,
            body,
            span: self.span_from(start),
        })
    }

    /// rake: setup lets, then tines, then through blocks, then one sweep.
    fn parse_rake_def(&mut self) -> PResult<RakeDef> {
        let start = self.cursor.advance().span; // consume 'rake'
        let (name, _) = self.expect_ident()?;
        let (params, result) = self.parse_signature()?;

        let mut setup = Vec::new();
        while self.check(TokenKind::Let) {
            setup.push(self.parse_let_binding()?);
        }

        let mut tines = Vec::new();
        while self.check(TokenKind::Pipe) {
            tines.push(self.parse_tine_decl()?);
        }
        if tines.is_empty() {
            return Err(self.structural(
                "tine declaration",
                format!("rake `{name}` requires at least one tine declaration"),
            ));
        }
        if self.check(TokenKind::Let) {
            return Err(self.structural(
                "setup statement",
                format!("setup `let` in rake `{name}` must precede the first tine declaration"),
            ));
        }

        let mut throughs = Vec::new();
        while self.check(TokenKind::Through) {
            throughs.push(self.parse_through_block()?);
        }
        if throughs.is_empty() {
            return Err(self.structural(
                "through block",
                format!("rake `{name}` requires at least one through block"),
            ));
        }

        match self.peek_kind() {
            TokenKind::Sweep => {}
            TokenKind::Pipe => {
                return Err(self.structural(
                    "tine declaration",
                    format!("tines in rake `{name}` must precede the first through block"),
                ));
            }
            _ => {
                return Err(self.structural(
                    "sweep block",
                    format!("rake `{name}` must end with a sweep block"),
                ));
            }
        }
        let sweep = self.parse_sweep_block()?;
        if self.check(TokenKind::Sweep) {
            return Err(self.structural(
                "sweep block",
                format!("rake `{name}` has more than one sweep block"),
            ));
        }

        Ok(RakeDef {
            name,
            params,
            result,
            setup,
            tines,
            throughs,
            sweep,
            span: self.span_from(start),
        })
    }

    /// params -> result :
    fn parse_signature(&mut self) -> PResult<(Vec<Parameter>, ResultSpec)> {
        let params = self.parse_parameters()?;
        self.expect(TokenKind::Arrow)?;
        let result = self.parse_result_spec()?;
        self.expect(TokenKind::Colon)?;
        Ok((params, result))
    }

    /// Zero or more parameters, stopping at the first token that cannot start one.
    pub(crate) fn parse_parameters(&mut self) -> PResult<Vec<Parameter>> {
        let mut params = Vec::new();
        loop {
            let start = self.cursor.peek().span;
            let param = match self.peek_kind() {
                TokenKind::Ident => {
                    let (name, span) = self.expect_ident()?;
                    Parameter::Rack { name, ty: None, span }
                }
                TokenKind::Less | TokenKind::LeftArrow => {
                    let expr = self.parse_scalar_literal()?;
                    Parameter::Scalar {
                        expr,
                        ty: None,
                        span: self.span_from(start),
                    }
                }
                TokenKind::LParen => self.parse_typed_parameter()?,
                _ => break,
            };
            params.push(param);
        }
        Ok(params)
    }

    /// (name: type) or (<scalar>: type)
    fn parse_typed_parameter(&mut self) -> PResult<Parameter> {
        let start = self.cursor.advance().span; // consume '('
        match self.peek_kind() {
            TokenKind::Ident => {
                let (name, _) = self.expect_ident()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(Parameter::Rack {
                    name,
                    ty: Some(ty),
                    span: self.span_from(start),
                })
            }
            TokenKind::Less | TokenKind::LeftArrow => {
                let expr = self.parse_scalar_literal()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(Parameter::Scalar {
                    expr,
                    ty: Some(ty),
                    span: self.span_from(start),
                })
            }
            _ => Err(self.unexpected(&["identifier", "scalar literal"])),
        }
    }

    fn parse_result_spec(&mut self) -> PResult<ResultSpec> {
        if self.check(TokenKind::Ident) {
            let (name, span) = self.expect_ident()?;
            return Ok(ResultSpec::Single { name, ty: None, span });
        }

        let start = self.expect(TokenKind::LParen)?.span;
        if self.check(TokenKind::RParen) {
            return Err(self.structural(
                "result name",
                "result tuple needs at least one name".to_string(),
            ));
        }
        if self.cursor.lookahead(1).is(TokenKind::Colon) {
            let (name, _) = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            self.expect(TokenKind::RParen)?;
            return Ok(ResultSpec::Single {
                name,
                ty: Some(ty),
                span: self.span_from(start),
            });
        }

        let mut names = vec![self.expect_ident()?.0];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_ident()?.0);
        }
        self.expect(TokenKind::RParen)?;
        Ok(ResultSpec::Tuple {
            names,
            span: self.span_from(start),
        })
    }

    /// Skips to the next token that can open a definition. Always makes progress
    /// unless the failed definition already stopped on such a token.
    fn recover_to_next_definition(&mut self, started: usize) {
        if self.cursor.position() == started || !self.at_definition_start() {
            self.cursor.advance();
        }
        while !self.cursor.at_eof() && !self.at_definition_start() {
            self.cursor.advance();
        }
        let resumed = self.cursor.peek();
        trace!(
            line = resumed.span.line,
            column = resumed.span.column,
            "resynchronised at {}",
            resumed.kind
        );
    }

    /// `stack` and `single` also appear as type suffixes (`P stack`), so they
    /// only count when a type name follows.
    fn at_definition_start(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Stack | TokenKind::Single => {
                self.cursor.lookahead(1).is(TokenKind::TypeIdent)
            }
            kind => kind.starts_definition(),
        }
    }

    pub(crate) fn at_definition_boundary(&self) -> bool {
        self.cursor.at_eof() || self.at_definition_start()
    }

    // ── Token helpers ──

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.cursor.peek_kind()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.cursor.peek().is(kind)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.cursor.advance().clone())
        } else {
            let expected = kind.to_string();
            Err(self.unexpected(&[expected.as_str()]))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> PResult<(String, Span)> {
        let token = self.expect(TokenKind::Ident)?;
        Ok((token.lexeme, token.span))
    }

    pub(crate) fn expect_type_ident(&mut self) -> PResult<(String, Span)> {
        let token = self.expect(TokenKind::TypeIdent)?;
        Ok((token.lexeme, token.span))
    }

    /// Items separated by `,` up to (not including) `close`; may be empty.
    pub(crate) fn comma_separated<T>(
        &mut self,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut items = Vec::new();
        if self.check(close) {
            return Ok(items);
        }
        items.push(item(self)?);
        while self.eat(TokenKind::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    pub(crate) fn unexpected(&self, expected: &[&str]) -> ParseError {
        let token = self.cursor.peek();
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", token.lexeme),
        };
        ParseError::UnexpectedToken {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found,
            span: token.span,
        }
    }

    pub(crate) fn structural(&self, construct: &'static str, message: String) -> ParseError {
        ParseError::Structural {
            construct,
            message,
            span: self.cursor.peek().span,
        }
    }
}
