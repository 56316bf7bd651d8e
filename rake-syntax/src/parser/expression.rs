use tracing::trace;

use crate::error::ParseError;
use crate::ir::ast::{Expression, FieldInit, Node, Primary, ScalarInner};
use crate::span::Span;

use super::lexer::TokenKind;
use super::operators::{
    ADDITIVE, PIPE, binary_precedence, token_to_binop, token_to_reduce, token_to_scan,
    token_to_unop,
};
use super::parser::{PResult, Parser};

/// Which grammar sits above the shared arithmetic core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grammar {
    /// Full expression: pipe, boolean and comparison levels, lambdas, let-in.
    Expression,
    /// Comparison operand: arithmetic levels only.
    Comparison,
}

impl Parser {
    // ── Expression parsing (precedence climbing) ──

    pub fn parse_expression(&mut self) -> PResult<Expression> {
        self.parse_binary(PIPE, Grammar::Expression)
    }

    /// Operand on either side of a predicate comparison. Never consumes
    /// `|>`, `||`, `&&` or a comparison operator.
    pub(crate) fn parse_cmp_operand(&mut self) -> PResult<Expression> {
        self.parse_binary(ADDITIVE, Grammar::Comparison)
    }

    fn parse_binary(&mut self, min_prec: u8, grammar: Grammar) -> PResult<Expression> {
        let mut lhs = self.parse_unary(grammar)?;

        loop {
            // `<x>-1` lexes the minus into the literal; in infix position it is subtraction
            match self.peek_kind() {
                TokenKind::Int | TokenKind::Float => {
                    self.cursor.split_signed_literal();
                }
                // after an operand `<-` is `<` then a negative operand (`x<-1`)
                TokenKind::LeftArrow => {
                    self.cursor.split_left_arrow();
                }
                _ => {}
            }

            let kind = self.peek_kind();
            let Some(prec) = binary_precedence(kind) else {
                break;
            };
            if prec < min_prec {
                break;
            }

            let op_span = self.cursor.advance().span;
            let op = token_to_binop(kind).ok_or_else(|| ParseError::PrecedenceAmbiguityExhausted {
                operator: kind.describe().to_string(),
                span: op_span,
            })?;
            let rhs = self.parse_binary(prec + 1, grammar)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expression::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self, grammar: Grammar) -> PResult<Expression> {
        match self.peek_kind() {
            TokenKind::Fun if grammar == Grammar::Expression => self.parse_lambda(),
            TokenKind::Let if grammar == Grammar::Expression => self.parse_let_in(),
            kind => match token_to_unop(kind) {
                Some(op) => {
                    let start = self.cursor.advance().span;
                    let operand = self.parse_unary(grammar)?;
                    let span = start.merge(operand.span());
                    Ok(Expression::Unary {
                        op,
                        operand: Box::new(operand),
                        span,
                    })
                }
                None => {
                    let primary = self.parse_primary()?;
                    self.parse_postfix(primary)
                }
            },
        }
    }

    /// fun params -> body; the body runs to the end of the enclosing expression.
    fn parse_lambda(&mut self) -> PResult<Expression> {
        let start = self.cursor.advance().span; // consume 'fun'
        let params = self.parse_parameters()?;
        if params.is_empty() {
            return Err(self.unexpected(&["parameter"]));
        }
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expression()?;
        Ok(Expression::Lambda {
            params,
            body: Box::new(body),
            span: self.span_from(start),
        })
    }

    fn parse_let_in(&mut self) -> PResult<Expression> {
        let start = self.cursor.advance().span; // consume 'let'
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::In)?;
        self.finish_let_in(start, name, value)
    }

    /// Parses the body after `in` has been consumed.
    pub(crate) fn finish_let_in(
        &mut self,
        start: Span,
        name: String,
        value: Expression,
    ) -> PResult<Expression> {
        let body = self.parse_expression()?;
        Ok(Expression::LetIn {
            name,
            value: Box::new(value),
            body: Box::new(body),
            span: self.span_from(start),
        })
    }

    /// Field access, shuffles and lane folds, applied left to right.
    fn parse_postfix(&mut self, mut expr: Expression) -> PResult<Expression> {
        loop {
            let kind = self.peek_kind();
            if kind == TokenKind::Dot {
                self.cursor.advance();
                let (name, name_span) = self.expect_ident()?;
                let span = expr.span().merge(name_span);
                expr = Expression::Field {
                    base: Box::new(expr),
                    name,
                    span,
                };
            } else if kind == TokenKind::Shuffle {
                self.cursor.advance();
                self.expect(TokenKind::LBracket)?;
                let indices = self.comma_separated(TokenKind::RBracket, |p| p.parse_int_literal())?;
                self.expect(TokenKind::RBracket)?;
                let span = self.span_from(expr.span());
                expr = Expression::Shuffle {
                    operand: Box::new(expr),
                    indices,
                    span,
                };
            } else if let Some(op) = token_to_reduce(kind) {
                let span = expr.span().merge(self.cursor.advance().span);
                expr = Expression::Reduce {
                    operand: Box::new(expr),
                    op,
                    span,
                };
            } else if let Some(op) = token_to_scan(kind) {
                let span = expr.span().merge(self.cursor.advance().span);
                expr = Expression::Scan {
                    operand: Box::new(expr),
                    op,
                    span,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        let token = self.cursor.peek().clone();
        let primary = match token.kind {
            TokenKind::Ident if self.cursor.lookahead(1).is(TokenKind::LParen) => {
                return self.parse_call();
            }
            TokenKind::Ident => Primary::Ident(token.lexeme),
            TokenKind::TypeIdent => return self.parse_record(),
            TokenKind::Int => {
                let value = self.parse_int_literal()?;
                return Ok(Expression::Primary(Primary::Int(value), token.span));
            }
            TokenKind::Float => {
                let value = self.parse_float_literal()?;
                return Ok(Expression::Primary(Primary::Float(value), token.span));
            }
            TokenKind::True => Primary::Bool(true),
            TokenKind::False => Primary::Bool(false),
            TokenKind::At => Primary::LaneIndex,
            TokenKind::Lanes => Primary::Lanes,
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::Less | TokenKind::LeftArrow => return self.parse_scalar_literal(),
            _ => return Err(self.unexpected(&["expression"])),
        };
        self.cursor.advance();
        Ok(Expression::Primary(primary, token.span))
    }

    fn parse_call(&mut self) -> PResult<Expression> {
        let (name, start) = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let args = self.comma_separated(TokenKind::RParen, |p| p.parse_expression())?;
        self.expect(TokenKind::RParen)?;
        Ok(Expression::Call {
            name,
            args,
            span: self.span_from(start),
        })
    }

    /// Name { field := expr, ... }
    fn parse_record(&mut self) -> PResult<Expression> {
        let (type_name, start) = self.expect_type_ident()?;
        self.expect(TokenKind::LBrace)?;
        let inits = self.comma_separated(TokenKind::RBrace, |p| {
            let (name, start) = p.expect_ident()?;
            p.expect(TokenKind::Define)?;
            let value = p.parse_expression()?;
            Ok(FieldInit {
                name,
                value,
                span: p.span_from(start),
            })
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(Expression::Record {
            type_name,
            inits,
            span: self.span_from(start),
        })
    }

    /// (), (expr), (a, b, ...)
    fn parse_paren(&mut self) -> PResult<Expression> {
        let start = self.cursor.advance().span; // consume '('
        if self.eat(TokenKind::RParen) {
            return Ok(Expression::Primary(Primary::Unit, self.span_from(start)));
        }

        let first = self.parse_expression()?;
        let primary = if self.check(TokenKind::Comma) {
            let mut elements = vec![first];
            while self.eat(TokenKind::Comma) {
                elements.push(self.parse_expression()?);
            }
            Primary::Tuple(elements)
        } else {
            Primary::Paren(Box::new(first))
        };
        self.expect(TokenKind::RParen)?;
        Ok(Expression::Primary(primary, self.span_from(start)))
    }

    // ── Scalar literals ──

    /// Speculatively parses `'<' scalar_inner '>'`. On mismatch the cursor is
    /// rewound to the opening `<` and the literal is reported as unterminated.
    pub(crate) fn parse_scalar_literal(&mut self) -> PResult<Expression> {
        let checkpoint = self.cursor.checkpoint();
        let open = self.cursor.peek().span;
        match self.try_scalar_literal()? {
            Some(expr) => {
                trace!(line = open.line, column = open.column, "committed scalar literal");
                Ok(expr)
            }
            None => {
                self.cursor.rewind(checkpoint);
                trace!(line = open.line, column = open.column, "scalar literal rolled back");
                Err(ParseError::UnterminatedScalar { span: open })
            }
        }
    }

    /// `Ok(None)` means the tokens do not form a scalar literal; the cursor
    /// is left wherever the attempt stopped.
    fn try_scalar_literal(&mut self) -> PResult<Option<Expression>> {
        let start = self.cursor.peek().span;
        let inner = match self.peek_kind() {
            TokenKind::Less => {
                self.cursor.advance();
                match self.try_scalar_inner()? {
                    Some(inner) => inner,
                    None => return Ok(None),
                }
            }
            // `<-3>` lexes as `<-` followed by `3`
            TokenKind::LeftArrow => {
                self.cursor.advance();
                match self.try_unsigned_literal()? {
                    Some(inner) => self.negate(inner)?,
                    None => return Ok(None),
                }
            }
            _ => return Ok(None),
        };

        // A single `>`; `>=` and `>>` are distinct tokens and never close a literal
        if !self.eat(TokenKind::Greater) {
            return Ok(None);
        }
        Ok(Some(Expression::Scalar {
            inner,
            span: self.span_from(start),
        }))
    }

    fn try_scalar_inner(&mut self) -> PResult<Option<ScalarInner>> {
        match self.peek_kind() {
            TokenKind::Ident => {
                let (name, _) = self.expect_ident()?;
                let mut inner = ScalarInner::Ident(name);
                while self.check(TokenKind::Dot) && self.cursor.lookahead(1).is(TokenKind::Ident) {
                    self.cursor.advance();
                    let (field, _) = self.expect_ident()?;
                    inner = ScalarInner::Field(Box::new(inner), field);
                }
                Ok(Some(inner))
            }
            TokenKind::Minus => {
                self.cursor.advance();
                match self.try_unsigned_literal()? {
                    Some(inner) => Ok(Some(self.negate(inner)?)),
                    None => Ok(None),
                }
            }
            _ => self.try_unsigned_literal(),
        }
    }

    fn try_unsigned_literal(&mut self) -> PResult<Option<ScalarInner>> {
        match self.peek_kind() {
            TokenKind::Int => Ok(Some(ScalarInner::Int(self.parse_int_literal()?))),
            TokenKind::Float => Ok(Some(ScalarInner::Float(self.parse_float_literal()?))),
            _ => Ok(None),
        }
    }

    // ── Literals ──

    pub(crate) fn parse_int_literal(&mut self) -> PResult<i64> {
        let token = self.expect(TokenKind::Int)?;
        token.lexeme.parse().map_err(|_| ParseError::InvalidLiteral {
            lexeme: token.lexeme.clone(),
            span: token.span,
        })
    }

    pub(crate) fn parse_float_literal(&mut self) -> PResult<f64> {
        let token = self.expect(TokenKind::Float)?;
        token.lexeme.parse().map_err(|_| ParseError::InvalidLiteral {
            lexeme: token.lexeme.clone(),
            span: token.span,
        })
    }

    /// else-clause value: scalar literal, number or boolean.
    pub(crate) fn parse_simple_expression(&mut self) -> PResult<Expression> {
        match self.peek_kind() {
            TokenKind::Less | TokenKind::LeftArrow => self.parse_scalar_literal(),
            TokenKind::Int | TokenKind::Float | TokenKind::True | TokenKind::False => {
                self.parse_primary()
            }
            _ => Err(self.unexpected(&["scalar literal", "number", "boolean"])),
        }
    }

    /// Applies a leading `-` to the literal just consumed.
    fn negate(&self, inner: ScalarInner) -> PResult<ScalarInner> {
        match inner {
            ScalarInner::Int(value) => {
                value
                    .checked_neg()
                    .map(ScalarInner::Int)
                    .ok_or_else(|| ParseError::InvalidLiteral {
                        lexeme: format!("-{value}"),
                        span: self.cursor.previous_span(),
                    })
            }
            ScalarInner::Float(value) => Ok(ScalarInner::Float(-value)),
            other => Ok(other),
        }
    }
}
