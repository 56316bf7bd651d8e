pub mod lexer;
pub mod parser;

mod blocks;
mod cursor;
mod expression;
pub(crate) mod operators;
mod predicate;
mod types;


use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Diagnostics, ParseError};
use crate::ir::ast;

pub use cursor::{Checkpoint, TokenCursor};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

/// How a parse reacts to the first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Stop at the first lexical or syntax error.
    FailFast,
    /// Record the error, skip to the next definition keyword and keep going.
    #[default]
    CollectAll,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub mode: ErrorMode,
}

impl ParseOptions {
    pub fn fail_fast() -> Self {
        Self {
            mode: ErrorMode::FailFast,
        }
    }

    pub fn collect_all() -> Self {
        Self {
            mode: ErrorMode::CollectAll,
        }
    }
}

/// Everything one parse produced: the definitions that made sense plus the
/// errors for the ones that did not.
#[derive(Debug)]
pub struct Parsed {
    pub file: ast::SourceFile,
    pub diagnostics: Diagnostics,
}

impl Parsed {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_result(self) -> Result<ast::SourceFile, Diagnostics> {
        if self.diagnostics.is_empty() {
            Ok(self.file)
        } else {
            Err(self.diagnostics)
        }
    }
}

/// Main entry point: source text in, AST plus diagnostics out.
pub fn parse_source(source_id: &str, source: &str, options: &ParseOptions) -> Parsed {
    let mut diagnostics = Diagnostics::new(source_id);
    let mut tokens = Vec::new();

    for item in Lexer::new(source) {
        match item {
            Ok(token) => tokens.push(token),
            Err(error) => {
                diagnostics.push(error);
                if options.mode == ErrorMode::FailFast {
                    let file = ast::SourceFile {
                        definitions: Vec::new(),
                        span: Default::default(),
                    };
                    return Parsed { file, diagnostics };
                }
            }
        }
    }

    let mut parser = Parser::new(tokens);
    let file = parser.parse_source_file(options.mode, &mut diagnostics);
    debug!(
        source = source_id,
        definitions = file.definitions.len(),
        errors = diagnostics.len(),
        "parsed source file"
    );
    Parsed { file, diagnostics }
}

/// Fail-fast parse of a whole source file.
pub fn parse(source: &str) -> Result<ast::SourceFile, ParseError> {
    let tokens = lexer::tokenize(source)?;
    parser::parse_tokens(tokens)
}

pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Parsed, ParseError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    Ok(parse_source(&path.display().to_string(), &source, options))
}

/// Parses `source` as a single expression that must span the whole input.
pub fn parse_expression(source: &str) -> Result<ast::Expression, ParseError> {
    parse_fragment(source, Parser::parse_expression)
}

/// Parses `source` as a single guard predicate that must span the whole input.
pub fn parse_predicate(source: &str) -> Result<ast::Predicate, ParseError> {
    parse_fragment(source, Parser::parse_predicate)
}

/// Parses `source` as a single type that must span the whole input.
pub fn parse_type(source: &str) -> Result<ast::Type, ParseError> {
    parse_fragment(source, Parser::parse_type)
}

fn parse_fragment<T>(
    source: &str,
    parse: impl FnOnce(&mut Parser) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    let mut parser = Parser::new(lexer::tokenize(source)?);
    let node = parse(&mut parser)?;
    if !parser.cursor().at_eof() {
        return Err(parser.unexpected(&["end of input"]));
    }
    Ok(node)
}
