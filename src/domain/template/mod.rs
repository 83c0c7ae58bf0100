// Template module for `${variable|pipe:param}` strings
//
// This module provides the configurable parser, the parse result types and
// the evaluator that substitutes variables and runs pipes.

mod ast;
mod parser;
mod pipeline;
mod quote;
mod resolver;
mod syntax;

pub use ast::{ParsedString, Pipe, Segment, Variable};
pub use parser::{make_parser, TemplateParser};
pub use pipeline::{
    DefaultPipe, EncodePipe, LowerPipe, PipeFunction, PipeRegistry, PluralPipe, TrimPipe, UpperPipe,
};
pub use quote::{
    BraceBalancedQuote, QuoteChain, QuoteFns, QuoteStrategy, RegexQuote,
    DEFAULT_QUOTED_STRING_PATTERN,
};
pub use resolver::{
    dotted_lookup, evaluate_parsed_string, evaluate_parsed_string_with, evaluate_string_template,
    value_to_text, TemplateResolver, Variables,
};
pub use syntax::{
    ParserConfig, DEFAULT_ESCAPE, DEFAULT_PIPE_PARAMETER_START, DEFAULT_PIPE_START,
    DEFAULT_VARIABLE_END, DEFAULT_VARIABLE_START,
};
