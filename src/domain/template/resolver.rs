// Template evaluation: variable lookup, text coercion and pipe application

use serde_json::{Map, Value};
use tracing::debug;

use super::ast::{ParsedString, Segment, Variable};
use super::parser::TemplateParser;
use super::pipeline::PipeRegistry;
use crate::DEFAULT_PARSER;

/// Mapping from variable name to value
pub type Variables = Map<String, Value>;

/// Resolve `name` against `variables`.
///
/// An exact key wins. Otherwise the name is split on `.` and walked through
/// nested objects (and arrays, by index). Any missing segment yields `Null`.
pub fn dotted_lookup(variables: &Variables, name: &str) -> Value {
    if let Some(value) = variables.get(name) {
        return value.clone();
    }

    let mut segments = name.split('.');
    let Some(mut current) = segments.next().and_then(|first| variables.get(first)) else {
        return Value::Null;
    };
    for segment in segments {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

/// Text a looked-up value contributes before any pipe runs.
///
/// `null`, `false`, `0` and `""` all count as missing and become `""`.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(element_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

// Array elements only drop null, the way a joined list prints
fn element_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => value_to_text(other),
    }
}

fn render_variable<L>(variable: &Variable, pipes: &PipeRegistry, lookup: &L) -> String
where
    L: Fn(&str) -> Value,
{
    let initial = value_to_text(&lookup(&variable.name));
    variable.pipes.iter().fold(initial, |value, pipe| match pipes.get(&pipe.name) {
        Some(function) => function.apply(&value, &pipe.parameters),
        None => {
            debug!(
                pipe = %pipe.name,
                variable = %variable.name,
                "unknown pipe, value passed through"
            );
            value
        }
    })
}

/// Evaluate with a caller supplied lookup
pub fn evaluate_parsed_string_with<L>(
    parsed: &ParsedString,
    pipes: &PipeRegistry,
    lookup: L,
) -> String
where
    L: Fn(&str) -> Value,
{
    if parsed.literals.is_empty() {
        return String::new();
    }
    if parsed.variables.len() + 1 < parsed.literals.len() {
        debug!(
            literals = parsed.literals.len(),
            variables = parsed.variables.len(),
            "parsed string is missing variables, rendering them empty"
        );
    }

    let mut out = String::new();
    for part in parsed.parts() {
        match part {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable(variable) => {
                out.push_str(&render_variable(variable, pipes, &lookup))
            }
        }
    }
    out
}

/// Evaluate using the dotted-path lookup over `variables`
pub fn evaluate_parsed_string(
    parsed: &ParsedString,
    variables: &Variables,
    pipes: &PipeRegistry,
) -> String {
    evaluate_parsed_string_with(parsed, pipes, |name| dotted_lookup(variables, name))
}

/// Parse with the default syntax and evaluate in one go
pub fn evaluate_string_template(
    input: &str,
    variables: &Variables,
    pipes: &PipeRegistry,
) -> String {
    evaluate_parsed_string(&DEFAULT_PARSER.parse(input), variables, pipes)
}

/// A parser and pipe registry bundled for repeated rendering
#[derive(Debug, Default)]
pub struct TemplateResolver {
    parser: TemplateParser,
    pipes: PipeRegistry,
}

impl TemplateResolver {
    pub fn new(parser: TemplateParser, pipes: PipeRegistry) -> Self {
        Self { parser, pipes }
    }

    pub fn parser(&self) -> &TemplateParser {
        &self.parser
    }

    pub fn pipes_mut(&mut self) -> &mut PipeRegistry {
        &mut self.pipes
    }

    pub fn render(&self, input: &str, variables: &Variables) -> String {
        evaluate_parsed_string(&self.parser.parse(input), variables, &self.pipes)
    }
}
