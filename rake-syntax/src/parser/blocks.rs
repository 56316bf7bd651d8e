use crate::ir::ast::{
    Expression, LetBinding, Statement, SweepArm, SweepBlock, SweepTarget, ThroughBlock,
    ThroughGuard, TineDecl, TineRef,
};

use super::lexer::TokenKind;
use super::parser::{PResult, Parser};

/// What a `let` turned out to be once we saw whether `in` follows.
enum LetForm {
    Binding(LetBinding),
    Expression(Expression),
}

impl Parser {
    // ── Statements ──

    pub(crate) fn parse_statement(&mut self) -> PResult<Statement> {
        match self.peek_kind() {
            TokenKind::Let => match self.parse_let_form()? {
                LetForm::Binding(binding) => Ok(Statement::Let(binding)),
                LetForm::Expression(expr) => Ok(Statement::Expr(expr)),
            },
            TokenKind::Over => self.parse_over(),
            TokenKind::Ident if self.cursor.lookahead(1).is(TokenKind::LeftArrow) => {
                let (name, start) = self.expect_ident()?;
                self.cursor.advance(); // consume '<-'
                let value = self.parse_expression()?;
                Ok(Statement::Assign {
                    name,
                    value,
                    span: self.span_from(start),
                })
            }
            _ => Ok(Statement::Expr(self.parse_expression()?)),
        }
    }

    /// let name (: type)? = expr
    pub(crate) fn parse_let_binding(&mut self) -> PResult<LetBinding> {
        let start = self.expect(TokenKind::Let)?.span;
        let (name, _) = self.expect_ident()?;
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expression()?;
        Ok(LetBinding {
            name,
            ty,
            value,
            span: self.span_from(start),
        })
    }

    /// A `let` in statement position is a binding unless `in` follows the
    /// value, in which case it is a let-in expression.
    fn parse_let_form(&mut self) -> PResult<LetForm> {
        let binding = self.parse_let_binding()?;
        if binding.ty.is_some() || !self.eat(TokenKind::In) {
            return Ok(LetForm::Binding(binding));
        }
        let LetBinding {
            name, value, span, ..
        } = binding;
        Ok(LetForm::Expression(self.finish_let_in(span, name, value)?))
    }

    /// over pack, <count> |> binding: body
    fn parse_over(&mut self) -> PResult<Statement> {
        let start = self.cursor.advance().span; // consume 'over'
        let pack = self.parse_expression()?;
        self.expect(TokenKind::Comma)?;
        let count = self.parse_scalar_literal()?;
        self.expect(TokenKind::PipeForward)?;
        let (binding, _) = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_expression()?;
        Ok(Statement::Over {
            pack,
            count,
            binding,
            body,
            span: self.span_from(start),
        })
    }

    // ── Rake blocks ──

    pub(crate) fn parse_tine_ref(&mut self) -> PResult<TineRef> {
        let token = self.expect(TokenKind::TineRef)?;
        Ok(TineRef {
            name: token.lexeme.trim_start_matches('#').to_string(),
            span: token.span,
        })
    }

    /// | #name := (predicate)
    pub(crate) fn parse_tine_decl(&mut self) -> PResult<TineDecl> {
        let start = self.expect(TokenKind::Pipe)?.span;
        let tine = self.parse_tine_ref()?;
        self.expect(TokenKind::Define)?;
        self.expect(TokenKind::LParen)?;
        let guard = self.parse_predicate()?;
        self.expect(TokenKind::RParen)?;
        Ok(TineDecl {
            tine,
            guard,
            span: self.span_from(start),
        })
    }

    /// through #tine (else value)?: lets* value -> binding
    pub(crate) fn parse_through_block(&mut self) -> PResult<ThroughBlock> {
        let start = self.expect(TokenKind::Through)?.span;
        let guard = match self.peek_kind() {
            TokenKind::TineRef => ThroughGuard::Tine(self.parse_tine_ref()?),
            TokenKind::LParen => {
                self.cursor.advance();
                let predicate = self.parse_predicate()?;
                self.expect(TokenKind::RParen)?;
                ThroughGuard::Predicate(predicate)
            }
            _ => return Err(self.unexpected(&["tine reference", "`(`"])),
        };
        let else_value = if self.eat(TokenKind::Else) {
            Some(self.parse_simple_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Colon)?;

        let mut setup = Vec::new();
        let mut value = None;
        while value.is_none() && self.check(TokenKind::Let) {
            match self.parse_let_form()? {
                LetForm::Binding(binding) => setup.push(binding),
                LetForm::Expression(expr) => value = Some(expr),
            }
        }
        let value = match value {
            Some(value) => value,
            None => self.parse_expression()?,
        };

        self.expect(TokenKind::Arrow)?;
        let (binding, _) = self.expect_ident()?;
        Ok(ThroughBlock {
            guard,
            else_value,
            setup,
            value,
            binding,
            span: self.span_from(start),
        })
    }

    /// sweep: | #tine -> value ... -> binding
    pub(crate) fn parse_sweep_block(&mut self) -> PResult<SweepBlock> {
        let start = self.expect(TokenKind::Sweep)?.span;
        self.expect(TokenKind::Colon)?;

        let mut arms = Vec::new();
        while self.check(TokenKind::Pipe) {
            arms.push(self.parse_sweep_arm()?);
        }
        if arms.is_empty() {
            return Err(self.structural(
                "sweep arm",
                "sweep block requires at least one arm".to_string(),
            ));
        }

        self.expect(TokenKind::Arrow)?;
        let (binding, _) = self.expect_ident()?;
        Ok(SweepBlock {
            arms,
            binding,
            span: self.span_from(start),
        })
    }

    fn parse_sweep_arm(&mut self) -> PResult<SweepArm> {
        let start = self.cursor.advance().span; // consume '|'
        let target = match self.peek_kind() {
            TokenKind::TineRef => SweepTarget::Tine(self.parse_tine_ref()?),
            TokenKind::Ident if self.cursor.peek().lexeme == "_" => {
                SweepTarget::Wildcard(self.cursor.advance().span)
            }
            _ => return Err(self.unexpected(&["tine reference", "`_`"])),
        };
        self.expect(TokenKind::Arrow)?;
        let value = self.parse_expression()?;
        Ok(SweepArm {
            target,
            value,
            span: self.span_from(start),
        })
    }
}
