//! Configurable parser and evaluator for `${variable|pipe:param}` string
//! templates.
//!
//! ```
//! use pipestring::{evaluate_string_template, PipeRegistry, Variables};
//! use serde_json::json;
//!
//! let mut variables = Variables::new();
//! variables.insert("name".into(), json!("world"));
//! let pipes = PipeRegistry::with_builtins();
//!
//! assert_eq!(
//!     evaluate_string_template("hello ${name|upper}", &variables, &pipes),
//!     "hello WORLD"
//! );
//! ```
//!
//! Parsing never fails: unterminated placeholders are closed at the end of
//! the input and stray delimiters are kept as text. Only building a custom
//! [`ParserConfig`] or loading settings files can return an [`Error`].
//!
//! Custom patterns must consume at least one character when they match;
//! zero-width matches are ignored.

use std::sync::LazyLock;

pub mod cli;
pub mod config;
pub mod domain;
mod error;

pub use domain::template::{
    dotted_lookup, evaluate_parsed_string, evaluate_parsed_string_with, evaluate_string_template,
    make_parser, value_to_text, BraceBalancedQuote, ParsedString, ParserConfig, Pipe,
    PipeFunction, PipeRegistry, QuoteChain, QuoteFns, QuoteStrategy, RegexQuote, Segment,
    TemplateParser, TemplateResolver, Variable, Variables, DEFAULT_QUOTED_STRING_PATTERN,
};
pub use error::{Error, Result};

/// Parser for the built-in `${var|pipe:param}` syntax
pub static DEFAULT_PARSER: LazyLock<TemplateParser> = LazyLock::new(TemplateParser::default);

/// Parse `input` with the built-in syntax
pub fn parse_string_template(input: &str) -> ParsedString {
    DEFAULT_PARSER.parse(input)
}
