// Template parser: a single left-to-right scan driven by four states
//
// Nothing here can fail. Unterminated variables, pipes and parameters are
// finalized at end of input and stray delimiters fall through as text.

use regex::Regex;
use tracing::{debug, trace};

use super::ast::{ParsedString, Pipe, Variable};
use super::syntax::ParserConfig;

/// Nesting level of the scanner. Deeper levels compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ParseState {
    Literal,
    Variable,
    Pipe,
    PipeParameter,
}

/// A parser bound to one delimiter configuration
#[derive(Debug, Clone, Default)]
pub struct TemplateParser {
    config: ParserConfig,
}

impl TemplateParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, input: &str) -> ParsedString {
        trace!(len = input.len(), "parsing template");
        Scanner::new(&self.config, input).run()
    }
}

/// Build a standalone parse function for `config`
pub fn make_parser(config: ParserConfig) -> impl Fn(&str) -> ParsedString + Send + Sync + Clone {
    let parser = TemplateParser::new(config);
    move |input: &str| parser.parse(input)
}

/// Per-call scan state. `None` means the level is not open.
struct Scanner<'a> {
    config: &'a ParserConfig,
    input: &'a str,
    pos: usize,
    state: ParseState,
    parsed: ParsedString,
    literal: String,
    variable: Option<Variable>,
    pipe: Option<Pipe>,
    parameter: Option<String>,
}

impl<'a> Scanner<'a> {
    fn new(config: &'a ParserConfig, input: &'a str) -> Self {
        Self {
            config,
            input,
            pos: 0,
            state: ParseState::Literal,
            parsed: ParsedString::default(),
            literal: String::new(),
            variable: None,
            pipe: None,
            parameter: None,
        }
    }

    fn run(mut self) -> ParsedString {
        while self.pos < self.input.len() {
            if let Some(len) = self.match_len(&self.config.escape) {
                self.pos += len;
                self.take_escaped();
                continue;
            }
            if self.try_transition() {
                continue;
            }
            if self.state != ParseState::Literal && self.try_quoted() {
                continue;
            }
            self.take_char();
        }

        if self.state != ParseState::Literal {
            debug!(state = ?self.state, "unterminated placeholder finalized at end of input");
        }
        self.collapse();
        self.parsed.literals.push(std::mem::take(&mut self.literal));
        self.parsed
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Length of a non-empty match of `pattern` at the cursor
    fn match_len(&self, pattern: &Regex) -> Option<usize> {
        pattern
            .find(self.rest())
            .map(|m| m.len())
            .filter(|len| *len > 0)
    }

    fn buffer(&mut self) -> &mut String {
        match self.state {
            ParseState::Literal => &mut self.literal,
            ParseState::Variable => &mut self.variable.get_or_insert_with(Variable::default).name,
            ParseState::Pipe => &mut self.pipe.get_or_insert_with(Pipe::default).name,
            ParseState::PipeParameter => self.parameter.get_or_insert_with(String::new),
        }
    }

    fn take_char(&mut self) {
        if let Some(ch) = self.rest().chars().next() {
            self.pos += ch.len_utf8();
            self.buffer().push(ch);
        }
    }

    /// The character after an escape marker, if any, goes in verbatim
    fn take_escaped(&mut self) {
        self.take_char();
    }

    fn try_quoted(&mut self) -> bool {
        let strategy = if self.state == ParseState::PipeParameter {
            &self.config.quoted_string_in_parameter
        } else {
            &self.config.quoted_string
        };
        let rest = self.rest();
        if !strategy.matches(rest) {
            return false;
        }
        let (consumed, content) = strategy.extract(rest);
        if consumed == 0 || consumed > rest.len() || !rest.is_char_boundary(consumed) {
            return false;
        }
        self.pos += consumed;
        self.buffer().push_str(&content);
        true
    }

    fn try_transition(&mut self) -> bool {
        match self.state {
            ParseState::Literal => self.try_variable_start(),
            ParseState::Variable => self.try_variable_end() || self.try_pipe_start(),
            ParseState::Pipe | ParseState::PipeParameter => {
                self.try_variable_end()
                    || self.try_pipe_parameter_start()
                    || self.try_pipe_start()
            }
        }
    }

    fn try_variable_start(&mut self) -> bool {
        let Some(len) = self.match_len(&self.config.variable_start) else {
            return false;
        };
        self.pos += len;
        self.parsed.literals.push(std::mem::take(&mut self.literal));
        self.variable = Some(Variable::default());
        self.state = ParseState::Variable;
        true
    }

    fn try_variable_end(&mut self) -> bool {
        let Some(len) = self.match_len(&self.config.variable_end) else {
            return false;
        };
        self.pos += len;
        self.collapse();
        true
    }

    fn try_pipe_start(&mut self) -> bool {
        let Some(len) = self.match_len(&self.config.pipe_start) else {
            return false;
        };
        self.pos += len;
        if self.state >= ParseState::PipeParameter {
            self.close_parameter();
        }
        if self.state >= ParseState::Pipe {
            self.close_pipe();
        }
        self.pipe = Some(Pipe::default());
        self.state = ParseState::Pipe;
        true
    }

    fn try_pipe_parameter_start(&mut self) -> bool {
        let Some(len) = self.match_len(&self.config.pipe_parameter_start) else {
            return false;
        };
        self.pos += len;
        if self.state >= ParseState::PipeParameter {
            self.close_parameter();
        }
        self.parameter = Some(String::new());
        self.state = ParseState::PipeParameter;
        true
    }

    fn close_parameter(&mut self) {
        if let Some(parameter) = self.parameter.take() {
            self.pipe.get_or_insert_with(Pipe::default).parameters.push(parameter);
        }
    }

    fn close_pipe(&mut self) {
        if let Some(pipe) = self.pipe.take() {
            self.variable.get_or_insert_with(Variable::default).pipes.push(pipe);
        }
    }

    fn close_variable(&mut self) {
        if let Some(variable) = self.variable.take() {
            self.parsed.variables.push(variable);
        }
    }

    /// Finalize every open level, deepest first, and drop back to literal text
    fn collapse(&mut self) {
        self.close_parameter();
        self.close_pipe();
        self.close_variable();
        self.state = ParseState::Literal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::quote::BraceBalancedQuote;

    fn parse(input: &str) -> ParsedString {
        TemplateParser::default().parse(input)
    }

    fn var(name: &str, pipes: Vec<Pipe>) -> Variable {
        Variable::new(name).with_pipes(pipes)
    }

    fn pipe(name: &str, parameters: &[&str]) -> Pipe {
        Pipe::new(name).with_parameters(parameters.iter().copied())
    }

    fn parsed(literals: &[&str], variables: Vec<Variable>) -> ParsedString {
        ParsedString::new(literals.iter().map(|l| l.to_string()).collect(), variables)
    }

    #[test]
    fn test_parse_empty_string() {
        assert_eq!(parse(""), parsed(&[""], vec![]));
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse("basic string"), parsed(&["basic string"], vec![]));
    }

    #[test]
    fn test_parse_simple_variable() {
        assert_eq!(
            parse("string with variable ${var}"),
            parsed(&["string with variable ", ""], vec![var("var", vec![])])
        );
    }

    #[test]
    fn test_parse_whitespace_inside_delimiters() {
        assert_eq!(
            parse("string with variable ${ var }"),
            parsed(&["string with variable ", ""], vec![var("var", vec![])])
        );
    }

    #[test]
    fn test_parse_escaped_variable_start() {
        assert_eq!(
            parse(r"string without variable \${var}"),
            parsed(&["string without variable ${var}"], vec![])
        );
    }

    #[test]
    fn test_parse_two_variables() {
        assert_eq!(
            parse("xxx ${var} yyy ${var2} zzz"),
            parsed(
                &["xxx ", " yyy ", " zzz"],
                vec![var("var", vec![]), var("var2", vec![])]
            )
        );
    }

    #[test]
    fn test_parse_pipe_chain_with_parameters() {
        assert_eq!(
            parse("xxx ${var|pipe1:param1:param2|pipe2}"),
            parsed(
                &["xxx ", ""],
                vec![var(
                    "var",
                    vec![pipe("pipe1", &["param1", "param2"]), pipe("pipe2", &[])]
                )]
            )
        );
    }

    #[test]
    fn test_parse_empty_variable() {
        assert_eq!(parse("xxx ${}"), parsed(&["xxx ", ""], vec![var("", vec![])]));
    }

    #[test]
    fn test_parse_quoted_names() {
        assert_eq!(
            parse(r#"x ${"var}name"}"#),
            parsed(&["x ", ""], vec![var("var}name", vec![])])
        );
        assert_eq!(
            parse(r#"x ${var|"pipe:name"}"#),
            parsed(&["x ", ""], vec![var("var", vec![pipe("pipe:name", &[])])])
        );
    }

    #[test]
    fn test_parse_quoted_parameter() {
        assert_eq!(
            parse(r#"x ${var|pipe:"param|param"}"#),
            parsed(&["x ", ""], vec![var("var", vec![pipe("pipe", &["param|param"])])])
        );
    }

    #[test]
    fn test_parse_escaped_closing_brace_in_parameter() {
        assert_eq!(
            parse(r"x ${var|pipe:{parameter\}}"),
            parsed(&["x ", ""], vec![var("var", vec![pipe("pipe", &["{parameter}"])])])
        );
    }

    #[test]
    fn test_parse_unterminated_levels() {
        assert_eq!(parse("${var"), parsed(&["", ""], vec![var("var", vec![])]));
        assert_eq!(
            parse("${var|pipe"),
            parsed(&["", ""], vec![var("var", vec![pipe("pipe", &[])])])
        );
        assert_eq!(
            parse("${var|pipe:param"),
            parsed(&["", ""], vec![var("var", vec![pipe("pipe", &["param"])])])
        );
    }

    #[test]
    fn test_parse_unterminated_escape() {
        assert_eq!(
            parse(r"${var|pipe:param\"),
            parsed(&["", ""], vec![var("var", vec![pipe("pipe", &["param"])])])
        );
        assert_eq!(parse(r"abc\"), parsed(&["abc"], vec![]));
    }

    #[test]
    fn test_parse_empty_trailing_parameter() {
        assert_eq!(
            parse("x ${var|pipe:empty_param_next:}"),
            parsed(
                &["x ", ""],
                vec![var("var", vec![pipe("pipe", &["empty_param_next", ""])])]
            )
        );
    }

    #[test]
    fn test_parse_stray_closing_delimiter_is_text() {
        assert_eq!(parse("a } b | c"), parsed(&["a } b | c"], vec![]));
    }

    #[test]
    fn test_parse_multibyte_text() {
        assert_eq!(
            parse("héllo ${ñame|ü:ß} wörld"),
            parsed(
                &["héllo ", " wörld"],
                vec![var("ñame", vec![pipe("ü", &["ß"])])]
            )
        );
    }

    #[test]
    fn test_make_parser_with_custom_delimiters() {
        let config = ParserConfig::default()
            .with_variable_start(r"\{\{\s*")
            .unwrap()
            .with_variable_end(r"\s*\}\}")
            .unwrap();
        let parse_angular = make_parser(config);
        assert_eq!(parse_angular("string ${var}"), parsed(&["string ${var}"], vec![]));
        assert_eq!(
            parse_angular("string {{var|pipe:param}}"),
            parsed(&["string ", ""], vec![var("var", vec![pipe("pipe", &["param"])])])
        );
    }

    #[test]
    fn test_parameter_quoting_is_independent_of_name_quoting() {
        let config = ParserConfig::default().with_parameter_quoting(BraceBalancedQuote::default());
        let parser = TemplateParser::new(config);
        assert_eq!(
            parser.parse("${n|plural:{one {#}}:{other}}"),
            parsed(&["", ""], vec![var("n", vec![pipe("plural", &["one {#}", "other"])])])
        );
        // names still use the regular quotes
        assert_eq!(
            parser.parse(r#"${"a}b"}"#),
            parsed(&["", ""], vec![var("a}b", vec![])])
        );
    }

    #[test]
    fn test_zero_width_delimiter_never_matches() {
        let config = ParserConfig::default().with_pipe_start(r"\s*").unwrap();
        let parser = TemplateParser::new(config);
        assert_eq!(parser.parse("${a b}"), parsed(&["", ""], vec![var("a", vec![pipe("b", &[])])]));
        assert_eq!(parser.parse("${ab}"), parsed(&["", ""], vec![var("ab", vec![])]));
    }
}
