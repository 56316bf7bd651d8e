use std::fmt;

use thiserror::Error;

use crate::span::Span;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unrecognized character '{ch}'")]
    Lex { ch: char, span: Span },

    #[error("scalar literal opened here is never closed by '>'")]
    UnterminatedScalar { span: Span },

    #[error("expected {}, found {found}", expected_list(.expected))]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
        span: Span,
    },

    #[error("{message}")]
    Structural {
        construct: &'static str,
        message: String,
        span: Span,
    },

    #[error("invalid numeric literal `{lexeme}`")]
    InvalidLiteral { lexeme: String, span: Span },

    /// Operator table and AST operator mapping disagree. Never a user error.
    #[error("internal parser error: no resolution for operator `{operator}`")]
    PrecedenceAmbiguityExhausted { operator: String, span: Span },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lex { span, .. }
            | Self::UnterminatedScalar { span }
            | Self::UnexpectedToken { span, .. }
            | Self::Structural { span, .. }
            | Self::InvalidLiteral { span, .. }
            | Self::PrecedenceAmbiguityExhausted { span, .. } => Some(*span),
            Self::Io { .. } => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::PrecedenceAmbiguityExhausted { .. })
    }
}

fn expected_list(expected: &[String]) -> String {
    match expected {
        [] => "more input".to_string(),
        [one] => one.clone(),
        many => format!("one of {}", many.join(", ")),
    }
}

/// Every error collected while parsing one source file.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub source_id: String,
    pub errors: Vec<ParseError>,
}

impl Diagnostics {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    pub fn has_internal_errors(&self) -> bool {
        self.iter().any(ParseError::is_internal)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match error.span() {
                Some(span) => write!(f, "{}:{}: {}", self.source_id, span, error)?,
                None => write!(f, "{}: {}", self.source_id, error)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
