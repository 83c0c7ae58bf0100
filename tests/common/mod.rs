// Common test utilities shared across test files

use pipestring::{ParsedString, Pipe, PipeRegistry, Variable, Variables};
use serde_json::json;

/// Build an expected parse result
#[allow(dead_code)]
pub fn parsed(literals: &[&str], variables: Vec<Variable>) -> ParsedString {
    ParsedString::new(literals.iter().map(|l| l.to_string()).collect(), variables)
}

#[allow(dead_code)]
pub fn var(name: &str, pipes: Vec<Pipe>) -> Variable {
    Variable::new(name).with_pipes(pipes)
}

#[allow(dead_code)]
pub fn pipe(name: &str, parameters: &[&str]) -> Pipe {
    Pipe::new(name).with_parameters(parameters.iter().copied())
}

/// Variables used by the evaluation tests
#[allow(dead_code)]
pub fn sample_variables() -> Variables {
    let value = json!({
        "a": "value-a",
        "b": "value-b",
        "c": "value-c",
        "d": {"e": "bla"},
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Pipes used by the evaluation tests
#[allow(dead_code)]
pub fn sample_pipes() -> PipeRegistry {
    PipeRegistry::new()
        .with_fn("!", |value, _| format!("{value}-!"))
        .with_fn("postfix", |value, parameters| {
            format!("{}-{}", value, parameters.join("-"))
        })
        .with_fn("prefix", |value, parameters| {
            format!("{}-{}", parameters.join("-"), value)
        })
        .with_fn("upper", |value, _| value.to_uppercase())
}
