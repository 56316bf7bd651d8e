//! Lexer and parser for the Rake vector language.
//!
//! Source text goes through [`parser::Lexer`] into a token buffer, and
//! [`parser::Parser`] turns that into an [`ir::ast::SourceFile`]. Semantic
//! checks such as tine reference resolution are left to later stages.

pub mod error;
pub mod ir;
pub mod parser;
pub mod span;

pub use error::{Diagnostics, ParseError};
pub use parser::{ErrorMode, ParseOptions, Parsed, parse, parse_file, parse_source};
