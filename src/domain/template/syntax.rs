// Delimiter configuration for the template parser

use regex::Regex;
use std::fmt;
use std::sync::Arc;

use super::quote::{QuoteStrategy, RegexQuote};
use crate::error::{Error, Result};

pub const DEFAULT_ESCAPE: &str = r"\\";
pub const DEFAULT_VARIABLE_START: &str = r"\$\{\s*";
pub const DEFAULT_VARIABLE_END: &str = r"\s*\}";
pub const DEFAULT_PIPE_START: &str = r"\s*\|\s*";
pub const DEFAULT_PIPE_PARAMETER_START: &str = r"\s*:\s*";

/// Compile `pattern` so it can only match at the start of the haystack.
pub(crate) fn compile_anchored(option: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})"))
        .map_err(|source| Error::InvalidPattern { option, source })
}

/// Patterns and quoting rules driving the parser.
///
/// Every pattern is matched only at the current scan position. A pattern
/// that matches the empty string is treated as not matching, so a bad
/// pattern can never stall the scanner.
#[derive(Clone)]
pub struct ParserConfig {
    pub(crate) escape: Regex,
    pub(crate) variable_start: Regex,
    pub(crate) variable_end: Regex,
    pub(crate) pipe_start: Regex,
    pub(crate) pipe_parameter_start: Regex,
    pub(crate) quoted_string: Arc<dyn QuoteStrategy>,
    pub(crate) quoted_string_in_parameter: Arc<dyn QuoteStrategy>,
}

impl ParserConfig {
    pub fn with_escape(mut self, pattern: &str) -> Result<Self> {
        self.escape = compile_anchored("escape", pattern)?;
        Ok(self)
    }

    pub fn with_variable_start(mut self, pattern: &str) -> Result<Self> {
        self.variable_start = compile_anchored("variable_start", pattern)?;
        Ok(self)
    }

    pub fn with_variable_end(mut self, pattern: &str) -> Result<Self> {
        self.variable_end = compile_anchored("variable_end", pattern)?;
        Ok(self)
    }

    pub fn with_pipe_start(mut self, pattern: &str) -> Result<Self> {
        self.pipe_start = compile_anchored("pipe_start", pattern)?;
        Ok(self)
    }

    pub fn with_pipe_parameter_start(mut self, pattern: &str) -> Result<Self> {
        self.pipe_parameter_start = compile_anchored("pipe_parameter_start", pattern)?;
        Ok(self)
    }

    /// Replace the quoted-string regex for names and parameters alike
    pub fn with_quoted_string_pattern(self, pattern: &str) -> Result<Self> {
        let quote: Arc<dyn QuoteStrategy> = Arc::new(RegexQuote::new(pattern)?);
        Ok(Self {
            quoted_string: quote.clone(),
            quoted_string_in_parameter: quote,
            ..self
        })
    }

    /// Quoting used for variable and pipe names
    pub fn with_quoted_string(mut self, strategy: impl QuoteStrategy + 'static) -> Self {
        self.quoted_string = Arc::new(strategy);
        self
    }

    /// Quoting used for pipe parameters
    pub fn with_parameter_quoting(mut self, strategy: impl QuoteStrategy + 'static) -> Self {
        self.quoted_string_in_parameter = Arc::new(strategy);
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        let quote: Arc<dyn QuoteStrategy> = Arc::new(RegexQuote::default());
        Self {
            escape: builtin(DEFAULT_ESCAPE),
            variable_start: builtin(DEFAULT_VARIABLE_START),
            variable_end: builtin(DEFAULT_VARIABLE_END),
            pipe_start: builtin(DEFAULT_PIPE_START),
            pipe_parameter_start: builtin(DEFAULT_PIPE_PARAMETER_START),
            quoted_string: quote.clone(),
            quoted_string_in_parameter: quote,
        }
    }
}

fn builtin(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})")).expect("built-in delimiter pattern compiles")
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("escape", &self.escape.as_str())
            .field("variable_start", &self.variable_start.as_str())
            .field("variable_end", &self.variable_end.as_str())
            .field("pipe_start", &self.pipe_start.as_str())
            .field("pipe_parameter_start", &self.pipe_parameter_start.as_str())
            .field("quoted_string", &self.quoted_string)
            .field("quoted_string_in_parameter", &self.quoted_string_in_parameter)
            .finish()
    }
}
