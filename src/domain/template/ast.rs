// Parse result types for string templates

use serde::{Deserialize, Serialize};

/// A parsed template: literal text interleaved with variables.
///
/// A well-formed value always has exactly one more literal than variables,
/// so rendering is `literals[0] + variables[0] + literals[1] + ... + literals[n]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedString {
    pub literals: Vec<String>,
    pub variables: Vec<Variable>,
}

impl ParsedString {
    pub fn new(literals: Vec<String>, variables: Vec<Variable>) -> Self {
        Self {
            literals,
            variables,
        }
    }

    /// Walk literals and variables in render order
    pub fn parts(&self) -> impl Iterator<Item = Segment<'_>> {
        let mut variables = self.variables.iter();
        self.literals.iter().enumerate().flat_map(move |(index, literal)| {
            let variable = if index == 0 {
                None
            } else {
                variables.next().map(Segment::Variable)
            };
            variable
                .into_iter()
                .chain(std::iter::once(Segment::Literal(literal.as_str())))
        })
    }

    /// Names of all referenced variables, in template order
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }
}

/// One piece of a [`ParsedString`] in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a Variable),
}

/// A placeholder: the variable name plus the pipes applied to its value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub pipes: Vec<Pipe>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pipes: Vec::new(),
        }
    }

    pub fn with_pipes(mut self, pipes: Vec<Pipe>) -> Self {
        self.pipes = pipes;
        self
    }
}

/// A named transformation with its string parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipe {
    pub name: String,
    pub parameters: Vec<String>,
}

impl Pipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }
}
