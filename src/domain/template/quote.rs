// Quoted-string strategies for names and pipe parameters

use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

use super::syntax::compile_anchored;
use crate::error::Result;

/// Single- or double-quoted string with backslash escapes. An opening quote
/// with no closing quote runs to the end of the input.
pub const DEFAULT_QUOTED_STRING_PATTERN: &str = r#"^('((?:[^'\\]|\\.)*)'|'((?:[^'\\]|\\.)*)$|"((?:[^"\\]|\\.)*)"|"((?:[^"\\]|\\.)*)$)"#;

static DEFAULT_QUOTED_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_QUOTED_STRING_PATTERN).expect("default quoted string pattern compiles")
});

/// Recognizes and unwraps a quoted span at the start of the remaining input.
///
/// `extract` returns how many bytes of `remaining` the span covers together
/// with the text to append to the current buffer. A consumed length of zero
/// means "not a quoted string here" and the parser falls back to taking a
/// single character.
pub trait QuoteStrategy: Send + Sync + fmt::Debug {
    fn matches(&self, remaining: &str) -> bool;
    fn extract(&self, remaining: &str) -> (usize, String);
}

/// Regex driven quoting. The content is the concatenation of capture groups
/// 2 and up, with the first `\\` collapsed to `\`.
#[derive(Debug, Clone)]
pub struct RegexQuote {
    regex: Regex,
}

impl RegexQuote {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: compile_anchored("quoted_string", pattern)?,
        })
    }
}

impl Default for RegexQuote {
    fn default() -> Self {
        Self {
            regex: DEFAULT_QUOTED_STRING.clone(),
        }
    }
}

impl QuoteStrategy for RegexQuote {
    fn matches(&self, remaining: &str) -> bool {
        self.regex.is_match(remaining)
    }

    fn extract(&self, remaining: &str) -> (usize, String) {
        let Some(captures) = self.regex.captures(remaining) else {
            return (0, String::new());
        };
        let consumed = captures.get(0).map_or(0, |m| m.len());
        let content: String = captures
            .iter()
            .skip(2)
            .flatten()
            .map(|m| m.as_str())
            .collect();
        (consumed, content.replacen(r"\\", r"\", 1))
    }
}

/// Depth-counting brace span such as `{one {# item}}`.
///
/// Everything between the outermost braces is kept verbatim, so a nested
/// sub-template survives as one opaque string. Escaped braces do not count
/// toward the depth, and an unclosed span runs to the end of the input.
#[derive(Debug, Clone, Copy)]
pub struct BraceBalancedQuote {
    open: char,
    close: char,
    escape: char,
}

impl BraceBalancedQuote {
    pub fn new(open: char, close: char) -> Self {
        Self {
            open,
            close,
            escape: '\\',
        }
    }
}

impl Default for BraceBalancedQuote {
    fn default() -> Self {
        Self::new('{', '}')
    }
}

impl QuoteStrategy for BraceBalancedQuote {
    fn matches(&self, remaining: &str) -> bool {
        remaining.starts_with(self.open)
    }

    fn extract(&self, remaining: &str) -> (usize, String) {
        if !self.matches(remaining) {
            return (0, String::new());
        }
        let body_start = self.open.len_utf8();
        let mut depth = 0usize;
        let mut escaped = false;

        for (index, ch) in remaining.char_indices() {
            if escaped {
                escaped = false;
            } else if ch == self.escape {
                escaped = true;
            } else if ch == self.open {
                depth += 1;
            } else if ch == self.close {
                depth -= 1;
                if depth == 0 {
                    let end = index + ch.len_utf8();
                    return (end, remaining[body_start..index].to_string());
                }
            }
        }

        (remaining.len(), remaining[body_start..].to_string())
    }
}

/// First strategy that matches wins
#[derive(Debug, Clone, Default)]
pub struct QuoteChain {
    strategies: Vec<Arc<dyn QuoteStrategy>>,
}

impl QuoteChain {
    pub fn new(strategies: Vec<Arc<dyn QuoteStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn then(mut self, strategy: impl QuoteStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }
}

impl QuoteStrategy for QuoteChain {
    fn matches(&self, remaining: &str) -> bool {
        self.strategies.iter().any(|s| s.matches(remaining))
    }

    fn extract(&self, remaining: &str) -> (usize, String) {
        self.strategies
            .iter()
            .filter(|s| s.matches(remaining))
            .map(|s| s.extract(remaining))
            .find(|(consumed, _)| *consumed > 0)
            .unwrap_or((0, String::new()))
    }
}

/// Quoting built from a pair of plain functions
pub struct QuoteFns<T, E> {
    test: T,
    extract: E,
}

impl<T, E> QuoteFns<T, E>
where
    T: Fn(&str) -> bool + Send + Sync,
    E: Fn(&str) -> (usize, String) + Send + Sync,
{
    pub fn new(test: T, extract: E) -> Self {
        Self { test, extract }
    }
}

impl<T, E> fmt::Debug for QuoteFns<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QuoteFns")
    }
}

impl<T, E> QuoteStrategy for QuoteFns<T, E>
where
    T: Fn(&str) -> bool + Send + Sync,
    E: Fn(&str) -> (usize, String) + Send + Sync,
{
    fn matches(&self, remaining: &str) -> bool {
        (self.test)(remaining)
    }

    fn extract(&self, remaining: &str) -> (usize, String) {
        (self.extract)(remaining)
    }
}
