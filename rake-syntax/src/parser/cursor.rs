use crate::span::Span;

use super::lexer::{Token, TokenKind};

/// Saved cursor position for speculative parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Bounded lookahead and backtracking over a lexed token buffer.
/// The buffer always ends with an `Eof` token.
#[derive(Debug)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenCursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenKind::Eof)) {
            let end = tokens.last().map(|t| t.span).unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                span: Span::new(end.end, end.end, end.line, end.column + end.len()),
            });
        }
        Self { tokens, position: 0 }
    }

    pub fn peek(&self) -> &Token {
        self.lookahead(0)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Token `n` places ahead; clamps to the trailing `Eof`.
    pub fn lookahead(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    pub fn advance(&mut self) -> &Token {
        let index = self.position;
        if index < self.tokens.len() - 1 {
            self.position += 1;
        }
        &self.tokens[index]
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        match self.position.checked_sub(1) {
            Some(index) => self.tokens[index].span,
            None => self.peek().span,
        }
    }

    pub fn at_eof(&self) -> bool {
        self.peek().is(TokenKind::Eof)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Turns a signed numeric token at the cursor (`-1`) into `-` followed by
    /// the unsigned literal, for when it sits in infix position.
    /// Returns false if the current token is not a signed literal.
    pub fn split_signed_literal(&mut self) -> bool {
        let token = &self.tokens[self.position];
        let numeric = matches!(token.kind, TokenKind::Int | TokenKind::Float);
        if !numeric || !token.lexeme.starts_with('-') {
            return false;
        }
        let span = token.span;
        let minus = Token {
            kind: TokenKind::Minus,
            lexeme: "-".to_string(),
            span: Span::new(span.start, span.start + 1, span.line, span.column),
        };
        let literal = Token {
            kind: token.kind,
            lexeme: token.lexeme[1..].to_string(),
            span: Span::new(span.start + 1, span.end, span.line, span.column + 1),
        };
        self.tokens[self.position] = minus;
        self.tokens.insert(self.position + 1, literal);
        true
    }

    /// Turns `<-` at the cursor into `<` followed by `-`, for when it sits
    /// right after a complete operand (`x<-1`). An unsigned numeric literal
    /// directly after the arrow is joined with the `-`.
    /// Returns false if the current token is not `<-`.
    pub fn split_left_arrow(&mut self) -> bool {
        let arrow = &self.tokens[self.position];
        if !arrow.is(TokenKind::LeftArrow) {
            return false;
        }
        let span = arrow.span;
        let less = Token {
            kind: TokenKind::Less,
            lexeme: "<".to_string(),
            span: Span::new(span.start, span.start + 1, span.line, span.column),
        };
        let minus_span = Span::new(span.start + 1, span.end, span.line, span.column + 1);

        // `<-` is never the trailing Eof, so a next token always exists
        let next = &self.tokens[self.position + 1];
        let joins = matches!(next.kind, TokenKind::Int | TokenKind::Float)
            && next.span.start == span.end
            && !next.lexeme.starts_with('-');
        if joins {
            let literal = Token {
                kind: next.kind,
                lexeme: format!("-{}", next.lexeme),
                span: minus_span.merge(next.span),
            };
            self.tokens[self.position] = less;
            self.tokens[self.position + 1] = literal;
        } else {
            let minus = Token {
                kind: TokenKind::Minus,
                lexeme: "-".to_string(),
                span: minus_span,
            };
            self.tokens[self.position] = less;
            self.tokens.insert(self.position + 1, minus);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn rewind_restores_position() {
        let mut cursor = TokenCursor::new(tokenize("a b c").unwrap());
        cursor.advance();
        let saved = cursor.checkpoint();
        cursor.advance();
        cursor.advance();
        assert!(cursor.at_eof());
        cursor.rewind(saved);
        assert_eq!(cursor.peek().lexeme, "b");
    }

    #[test]
    fn advance_sticks_at_eof() {
        let mut cursor = TokenCursor::new(tokenize("a").unwrap());
        cursor.advance();
        cursor.advance();
        cursor.advance();
        assert!(cursor.at_eof());
        assert_eq!(cursor.lookahead(5).kind, TokenKind::Eof);
    }

    #[test]
    fn split_signed_literal_keeps_spans_contiguous() {
        let mut cursor = TokenCursor::new(tokenize("> -12").unwrap());
        cursor.advance();
        assert!(cursor.split_signed_literal());
        let minus = cursor.advance().clone();
        let literal = cursor.advance().clone();
        assert_eq!(minus.kind, TokenKind::Minus);
        assert_eq!(literal.lexeme, "12");
        assert_eq!(minus.span.end, literal.span.start);
    }

    #[test]
    fn split_left_arrow_joins_an_adjacent_literal() {
        let mut cursor = TokenCursor::new(tokenize("x<-1.5").unwrap());
        cursor.advance();
        assert!(cursor.split_left_arrow());
        let less = cursor.advance().clone();
        let literal = cursor.advance().clone();
        assert_eq!(less.kind, TokenKind::Less);
        assert_eq!(literal.kind, TokenKind::Float);
        assert_eq!(literal.lexeme, "-1.5");
        assert_eq!((literal.span.start, literal.span.end), (2, 6));
        assert!(cursor.at_eof());
    }

    #[test]
    fn split_left_arrow_keeps_minus_before_other_operands() {
        let mut cursor = TokenCursor::new(tokenize("a<-b").unwrap());
        cursor.advance();
        assert!(cursor.split_left_arrow());
        let kinds: Vec<TokenKind> = (0..3).map(|_| cursor.advance().kind).collect();
        assert_eq!(kinds, [TokenKind::Less, TokenKind::Minus, TokenKind::Ident]);
        assert!(!cursor.split_left_arrow());
    }
}
