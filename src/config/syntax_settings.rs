use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::domain::template::{
    BraceBalancedQuote, ParserConfig, QuoteChain, RegexQuote, TemplateParser,
};
use crate::error::{IoResultExt, Result};

/// How pipe parameters may be quoted
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParameterQuoting {
    /// Same quoted strings as names
    #[default]
    Quotes,
    /// Depth-balanced `{...}` spans only
    Braces,
    /// Balanced braces first, then quoted strings
    BracesOrQuotes,
}

/// Delimiter settings as written in a YAML file. Missing keys keep the
/// built-in `${var|pipe:param}` syntax.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SyntaxSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipe_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipe_parameter_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_quoting: Option<ParameterQuoting>,
}

impl SyntaxSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).with_path(path)?;
        let settings = Self::from_yaml(&yaml)?;
        debug!(path = %path.display(), ?settings, "loaded syntax settings");
        Ok(settings)
    }

    pub fn into_config(self) -> Result<ParserConfig> {
        let mut config = ParserConfig::default();
        if let Some(pattern) = &self.escape {
            config = config.with_escape(pattern)?;
        }
        if let Some(pattern) = &self.variable_start {
            config = config.with_variable_start(pattern)?;
        }
        if let Some(pattern) = &self.variable_end {
            config = config.with_variable_end(pattern)?;
        }
        if let Some(pattern) = &self.pipe_start {
            config = config.with_pipe_start(pattern)?;
        }
        if let Some(pattern) = &self.pipe_parameter_start {
            config = config.with_pipe_parameter_start(pattern)?;
        }

        let quote = match &self.quoted_string {
            Some(pattern) => RegexQuote::new(pattern)?,
            None => RegexQuote::default(),
        };
        config = config.with_quoted_string(quote.clone());
        config = match self.parameter_quoting.unwrap_or_default() {
            ParameterQuoting::Quotes => config.with_parameter_quoting(quote),
            ParameterQuoting::Braces => {
                config.with_parameter_quoting(BraceBalancedQuote::default())
            }
            ParameterQuoting::BracesOrQuotes => config.with_parameter_quoting(
                QuoteChain::default()
                    .then(BraceBalancedQuote::default())
                    .then(quote),
            ),
        };
        Ok(config)
    }

    pub fn into_parser(self) -> Result<TemplateParser> {
        Ok(TemplateParser::new(self.into_config()?))
    }
}
