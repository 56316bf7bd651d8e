use tracing::trace;

use crate::error::ParseError;
use crate::ir::ast::{CompareOp, Expression, Node, Predicate, Primary};

use super::lexer::TokenKind;
use super::operators::token_to_compare;
use super::parser::{PResult, Parser};

impl Parser {
    // ── Predicates: or → and → not → comparison/atom ──

    pub fn parse_predicate(&mut self) -> PResult<Predicate> {
        let mut lhs = self.parse_predicate_and()?;
        while matches!(self.peek_kind(), TokenKind::PipePipe | TokenKind::Or) {
            self.cursor.advance();
            let rhs = self.parse_predicate_and()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Predicate::Or {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_predicate_and(&mut self) -> PResult<Predicate> {
        let mut lhs = self.parse_predicate_not()?;
        while matches!(self.peek_kind(), TokenKind::AmpAmp | TokenKind::And) {
            self.cursor.advance();
            let rhs = self.parse_predicate_not()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Predicate::And {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_predicate_not(&mut self) -> PResult<Predicate> {
        if matches!(self.peek_kind(), TokenKind::Bang | TokenKind::Not) {
            let start = self.cursor.advance().span;
            let operand = self.parse_predicate_not()?;
            let span = start.merge(operand.span());
            return Ok(Predicate::Not {
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_predicate_atom()
    }

    fn parse_predicate_atom(&mut self) -> PResult<Predicate> {
        match self.peek_kind() {
            TokenKind::TineRef => Ok(Predicate::TineTest(self.parse_tine_ref()?)),
            // `(` opens either a grouped predicate or a parenthesised comparison operand
            TokenKind::LParen => {
                let checkpoint = self.cursor.checkpoint();
                let comparison_error = match self.parse_comparison() {
                    Ok(predicate) => return Ok(predicate),
                    Err(error) if error.is_internal() => return Err(error),
                    Err(error) => error,
                };
                trace!("comparison attempt failed, retrying as predicate group");
                self.cursor.rewind(checkpoint);
                match self.parse_predicate_group() {
                    Ok(predicate) => Ok(predicate),
                    Err(group_error) => Err(furthest(comparison_error, group_error)),
                }
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_predicate_group(&mut self) -> PResult<Predicate> {
        let start = self.expect(TokenKind::LParen)?.span;
        let inner = self.parse_predicate()?;
        self.expect(TokenKind::RParen)?;
        Ok(Predicate::Group {
            inner: Box::new(inner),
            span: self.span_from(start),
        })
    }

    /// operand op operand; a lone `true`/`false` stands for itself.
    fn parse_comparison(&mut self) -> PResult<Predicate> {
        let lhs = self.parse_cmp_operand()?;
        let Some(op) = self.parse_compare_op() else {
            if let Expression::Primary(Primary::Bool(value), span) = lhs {
                return Ok(Predicate::Const(value, span));
            }
            return Err(self.unexpected(&["comparison operator"]));
        };
        let rhs = self.parse_cmp_operand()?;
        let span = lhs.span().merge(rhs.span());
        Ok(Predicate::Compare { lhs, op, rhs, span })
    }

    fn parse_compare_op(&mut self) -> Option<CompareOp> {
        self.cursor.split_left_arrow();
        let kind = self.peek_kind();
        if kind == TokenKind::Is {
            self.cursor.advance();
            if self.eat(TokenKind::Not) {
                return Some(CompareOp::IsNot);
            }
            return Some(CompareOp::Is);
        }
        let op = token_to_compare(kind)?;
        self.cursor.advance();
        Some(op)
    }
}

/// Of two failed alternatives, keep the one that got further into the input.
fn furthest(first: ParseError, second: ParseError) -> ParseError {
    if second.is_internal() {
        return second;
    }
    let reach = |error: &ParseError| error.span().map(|span| span.start).unwrap_or(0);
    if reach(&second) >= reach(&first) {
        second
    } else {
        first
    }
}
