use std::fmt;

use crate::error::ParseError;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Identifiers and literals
    Ident,     // lowercase or '_' first
    TypeIdent, // uppercase first
    Int,
    Float,
    TineRef, // #name
    // Keywords
    Stack, Single, Type, Crunch, Rake, Run,
    Through, Else, Sweep, Over, Let, In, Fun,
    True, False, Lanes, Or, And, Not, Is,
    // Brackets and separators
    LParen, RParen, LBrace, RBrace, LBracket, RBracket,
    Comma,
    Colon,
    Define,      // :=
    Dot,
    Pipe,        // |
    PipePipe,    // ||
    PipeForward, // |>
    AmpAmp,      // &&
    Arrow,       // ->
    LeftArrow,   // <-
    At,          // @
    Shuffle,     // ~>
    // Operators
    Less, LessEq, Greater, GreaterEq,
    Equal, NotEqual,
    Bang,
    Plus, Minus, Star, Slash, Percent,
    Shl, Shr,    // << >>
    Rol, Ror,    // <<< >>>
    Cross,       // ><
    // Lane folds
    ReduceAdd, ReduceMul, ReduceMin, ReduceMax, ReduceOr, ReduceAnd,
    ScanAdd, ScanMul, ScanMin, ScanMax,
    Eof,
}

impl TokenKind {
    /// Keywords that open a top-level definition.
    pub fn starts_definition(self) -> bool {
        matches!(
            self,
            Self::Stack | Self::Single | Self::Type | Self::Crunch | Self::Rake | Self::Run
        )
    }

    /// Tokens after which a `-` directly before a digit is binary minus.
    fn ends_operand(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::TypeIdent
                | Self::Int
                | Self::Float
                | Self::True
                | Self::False
                | Self::Lanes
                | Self::At
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
                | Self::ReduceAdd
                | Self::ReduceMul
                | Self::ReduceMin
                | Self::ReduceMax
                | Self::ReduceOr
                | Self::ReduceAnd
                | Self::ScanAdd
                | Self::ScanMul
                | Self::ScanMin
                | Self::ScanMax
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::TypeIdent => "type name",
            Self::Int => "integer literal",
            Self::Float => "float literal",
            Self::TineRef => "tine reference",
            Self::Eof => "end of input",
            other => KEYWORDS
                .iter()
                .chain(PUNCTUATION.iter())
                .find(|(_, kind)| *kind == other)
                .map(|(text, _)| *text)
                .unwrap_or("token"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident | Self::TypeIdent | Self::Int | Self::Float | Self::TineRef | Self::Eof => {
                f.write_str(self.describe())
            }
            _ => write!(f, "`{}`", self.describe()),
        }
    }
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("stack", TokenKind::Stack),
    ("single", TokenKind::Single),
    ("type", TokenKind::Type),
    ("crunch", TokenKind::Crunch),
    ("rake", TokenKind::Rake),
    ("run", TokenKind::Run),
    ("through", TokenKind::Through),
    ("else", TokenKind::Else),
    ("sweep", TokenKind::Sweep),
    ("over", TokenKind::Over),
    ("let", TokenKind::Let),
    ("in", TokenKind::In),
    ("fun", TokenKind::Fun),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("lanes", TokenKind::Lanes),
    ("or", TokenKind::Or),
    ("and", TokenKind::And),
    ("not", TokenKind::Not),
    ("is", TokenKind::Is),
];

// Longest spelling first so the scan below is maximal munch.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("\\min/", TokenKind::ReduceMin),
    ("\\max/", TokenKind::ReduceMax),
    ("\\min\\", TokenKind::ScanMin),
    ("\\max\\", TokenKind::ScanMax),
    ("\\+/", TokenKind::ReduceAdd),
    ("\\*/", TokenKind::ReduceMul),
    ("\\|/", TokenKind::ReduceOr),
    ("\\&/", TokenKind::ReduceAnd),
    ("\\+\\", TokenKind::ScanAdd),
    ("\\*\\", TokenKind::ScanMul),
    ("<<<", TokenKind::Rol),
    (">>>", TokenKind::Ror),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("<=", TokenKind::LessEq),
    (">=", TokenKind::GreaterEq),
    ("<-", TokenKind::LeftArrow),
    ("><", TokenKind::Cross),
    ("->", TokenKind::Arrow),
    (":=", TokenKind::Define),
    ("||", TokenKind::PipePipe),
    ("|>", TokenKind::PipeForward),
    ("&&", TokenKind::AmpAmp),
    ("!=", TokenKind::NotEqual),
    ("~>", TokenKind::Shuffle),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("=", TokenKind::Equal),
    ("!", TokenKind::Bang),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    (".", TokenKind::Dot),
    ("|", TokenKind::Pipe),
    ("@", TokenKind::At),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Lazy token stream over one source text. Yields a single `Eof` token and
/// then stops. After an unrecognized character the error is yielded and
/// lexing resumes at the next character, so callers may keep going.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    last: Option<TokenKind>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            last: None,
            finished: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn bump_while(&mut self, accept: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                // Comments run from ~~ to end of line
                Some('~') if self.peek_second() == Some('~') => {
                    self.bump_while(|ch| ch != '\n');
                }
                _ => break,
            }
        }
    }

    fn lex_kind(&mut self, ch: char) -> Option<TokenKind> {
        match ch {
            '0'..='9' => Some(self.lex_number()),
            '-' if self.peek_second().is_some_and(|c| c.is_ascii_digit())
                && !self.last.is_some_and(TokenKind::ends_operand) =>
            {
                self.bump();
                Some(self.lex_number())
            }
            'a'..='z' | '_' => {
                let start = self.pos;
                self.bump_while(is_ident_char);
                let word = &self.source[start..self.pos];
                let kind = KEYWORDS
                    .iter()
                    .find(|(text, _)| *text == word)
                    .map(|(_, kind)| *kind)
                    .unwrap_or(TokenKind::Ident);
                Some(kind)
            }
            'A'..='Z' => {
                self.bump_while(is_ident_char);
                Some(TokenKind::TypeIdent)
            }
            '#' => {
                if !self.peek_second().is_some_and(|c| c.is_ascii_lowercase() || c == '_') {
                    return None;
                }
                self.bump();
                self.bump_while(is_ident_char);
                Some(TokenKind::TineRef)
            }
            _ => {
                let rest = self.rest();
                let (text, kind) = PUNCTUATION
                    .iter()
                    .find(|(text, _)| rest.starts_with(text))?;
                for _ in 0..text.len() {
                    self.bump();
                }
                Some(*kind)
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        self.bump_while(|ch| ch.is_ascii_digit());
        if self.peek() != Some('.') {
            return TokenKind::Int;
        }
        self.bump();
        self.bump_while(|ch| ch.is_ascii_digit());

        if matches!(self.peek(), Some('e' | 'E')) {
            let mut exponent = self.rest().chars().skip(1);
            let has_digits = match exponent.next() {
                Some('+' | '-') => exponent.next().is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_digits {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.bump_while(|ch| ch.is_ascii_digit());
            }
        }
        TokenKind::Float
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.skip_trivia();

        let (start, line, column) = (self.pos, self.line, self.column);
        let Some(ch) = self.peek() else {
            self.finished = true;
            return Some(Ok(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                span: Span::new(start, start, line, column),
            }));
        };

        match self.lex_kind(ch) {
            Some(kind) => {
                self.last = Some(kind);
                Some(Ok(Token {
                    kind,
                    lexeme: self.source[start..self.pos].to_string(),
                    span: Span::new(start, self.pos, line, column),
                }))
            }
            None => {
                self.bump();
                Some(Err(ParseError::Lex {
                    ch,
                    span: Span::new(start, self.pos, line, column),
                }))
            }
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Eagerly lexes the whole source, stopping at the first unrecognized character.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn maximal_munch_on_angle_operators() {
        assert_eq!(
            kinds("<<< << < <= <- >>> >> > >= ><"),
            vec![
                TokenKind::Rol,
                TokenKind::Shl,
                TokenKind::Less,
                TokenKind::LessEq,
                TokenKind::LeftArrow,
                TokenKind::Ror,
                TokenKind::Shr,
                TokenKind::Greater,
                TokenKind::GreaterEq,
                TokenKind::Cross,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lane_folds() {
        assert_eq!(
            kinds("\\+/ \\*/ \\min/ \\max/ \\|/ \\&/ \\+\\ \\*\\ \\min\\ \\max\\"),
            vec![
                TokenKind::ReduceAdd,
                TokenKind::ReduceMul,
                TokenKind::ReduceMin,
                TokenKind::ReduceMax,
                TokenKind::ReduceOr,
                TokenKind::ReduceAnd,
                TokenKind::ScanAdd,
                TokenKind::ScanMul,
                TokenKind::ScanMin,
                TokenKind::ScanMax,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn minus_joins_literal_only_outside_operand_position() {
        let tokens = tokenize("x -1 < -2").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Minus);
        assert_eq!(tokens[2].lexeme, "1");
        assert_eq!(tokens[4].kind, TokenKind::Int);
        assert_eq!(tokens[4].lexeme, "-2");
    }

    #[test]
    fn float_exponent_requires_digits() {
        let tokens = tokenize("1.5e-3 2.e").unwrap();
        assert_eq!(tokens[0].lexeme, "1.5e-3");
        assert_eq!(tokens[1].lexeme, "2.");
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn lexer_resumes_after_bad_character() {
        let results: Vec<_> = Lexer::new("a $ b").collect();
        assert_eq!(results.len(), 4);
        assert!(matches!(results[1], Err(ParseError::Lex { ch: '$', .. })));
        assert!(matches!(&results[2], Ok(t) if t.lexeme == "b"));
    }

    #[test]
    fn hash_needs_a_name() {
        assert!(matches!(tokenize("# a"), Err(ParseError::Lex { ch: '#', .. })));
    }
}
