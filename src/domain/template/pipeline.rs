// Pipe trait, built-in pipes and the name -> pipe registry

use std::collections::HashMap;
use std::fmt;

/// A named transformation applied to a variable's text
pub trait PipeFunction: Send + Sync {
    fn apply(&self, value: &str, parameters: &[String]) -> String;
}

impl<F> PipeFunction for F
where
    F: Fn(&str, &[String]) -> String + Send + Sync,
{
    fn apply(&self, value: &str, parameters: &[String]) -> String {
        self(value, parameters)
    }
}

/// Percent-encode the value
pub struct EncodePipe;

impl PipeFunction for EncodePipe {
    fn apply(&self, value: &str, _parameters: &[String]) -> String {
        urlencoding::encode(value).into_owned()
    }
}

/// Trim surrounding whitespace
pub struct TrimPipe;

impl PipeFunction for TrimPipe {
    fn apply(&self, value: &str, _parameters: &[String]) -> String {
        value.trim().to_string()
    }
}

pub struct UpperPipe;

impl PipeFunction for UpperPipe {
    fn apply(&self, value: &str, _parameters: &[String]) -> String {
        value.to_uppercase()
    }
}

pub struct LowerPipe;

impl PipeFunction for LowerPipe {
    fn apply(&self, value: &str, _parameters: &[String]) -> String {
        value.to_lowercase()
    }
}

/// First parameter when the value is empty
pub struct DefaultPipe;

impl PipeFunction for DefaultPipe {
    fn apply(&self, value: &str, parameters: &[String]) -> String {
        match parameters.first() {
            Some(fallback) if value.is_empty() => fallback.clone(),
            _ => value.to_string(),
        }
    }
}

/// `plural:ONE:OTHER[:ZERO]` with `#` standing in for the count.
///
/// Falsy values render as the empty string before any pipe runs, so an
/// empty value is read as zero.
pub struct PluralPipe;

impl PipeFunction for PluralPipe {
    fn apply(&self, value: &str, parameters: &[String]) -> String {
        let count = if value.is_empty() { "0" } else { value };
        let branch = match (count, parameters) {
            ("1", [one, ..]) => one,
            ("0", [_, _, zero, ..]) => zero,
            (_, [_, other, ..]) => other,
            (_, [only]) => only,
            (_, []) => return value.to_string(),
        };
        branch.replace('#', count)
    }
}

/// Registry for pipes, keyed by the name used in templates
#[derive(Default)]
pub struct PipeRegistry {
    pipes: HashMap<String, Box<dyn PipeFunction>>,
}

impl PipeRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with encode, trim, upper, lower, default and plural
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("encode", EncodePipe);
        registry.register("trim", TrimPipe);
        registry.register("upper", UpperPipe);
        registry.register("lower", LowerPipe);
        registry.register("default", DefaultPipe);
        registry.register("plural", PluralPipe);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, pipe: impl PipeFunction + 'static) {
        self.pipes.insert(name.into(), Box::new(pipe));
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, pipe: F)
    where
        F: Fn(&str, &[String]) -> String + Send + Sync + 'static,
    {
        self.register(name, pipe);
    }

    pub fn with_fn<F>(mut self, name: impl Into<String>, pipe: F) -> Self
    where
        F: Fn(&str, &[String]) -> String + Send + Sync + 'static,
    {
        self.register_fn(name, pipe);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn PipeFunction> {
        self.pipes.get(name).map(|b| b.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pipes.contains_key(name)
    }
}

impl fmt::Debug for PipeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.pipes.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("PipeRegistry").field("pipes", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_encode_pipe() {
        assert_eq!(EncodePipe.apply("hello world", &[]), "hello%20world");
        assert_eq!(EncodePipe.apply("foo/bar", &[]), "foo%2Fbar");
    }

    #[test]
    fn test_trim_pipe() {
        assert_eq!(TrimPipe.apply("  hello  ", &[]), "hello");
        assert_eq!(TrimPipe.apply("world", &[]), "world");
    }

    #[test]
    fn test_case_pipes() {
        assert_eq!(UpperPipe.apply("value-a", &[]), "VALUE-A");
        assert_eq!(LowerPipe.apply("VaLuE", &[]), "value");
    }

    #[test]
    fn test_default_pipe() {
        assert_eq!(DefaultPipe.apply("", &params(&["n/a"])), "n/a");
        assert_eq!(DefaultPipe.apply("set", &params(&["n/a"])), "set");
        assert_eq!(DefaultPipe.apply("", &[]), "");
    }

    #[test]
    fn test_plural_pipe() {
        let branches = params(&["# item", "# items", "no items"]);
        assert_eq!(PluralPipe.apply("1", &branches), "1 item");
        assert_eq!(PluralPipe.apply("3", &branches), "3 items");
        assert_eq!(PluralPipe.apply("", &branches), "no items");
        assert_eq!(PluralPipe.apply("", &branches[..2]), "0 items");
        assert_eq!(PluralPipe.apply("7", &[]), "7");
    }

    #[test]
    fn test_registry_builtins() {
        let registry = PipeRegistry::with_builtins();
        for name in ["encode", "trim", "upper", "lower", "default", "plural"] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
        assert!(registry.get("unknown").is_none());
        assert!(PipeRegistry::new().get("encode").is_none());
    }

    #[test]
    fn test_registry_closures() {
        let registry = PipeRegistry::new()
            .with_fn("!", |value, _| format!("{value}-!"))
            .with_fn("prefix", |value, parameters| {
                format!("{}-{}", parameters.join("-"), value)
            });
        let bang = registry.get("!").unwrap();
        assert_eq!(bang.apply("v", &[]), "v-!");
        let prefix = registry.get("prefix").unwrap();
        assert_eq!(prefix.apply("v", &params(&["@", "#"])), "@-#-v");
    }

    #[test]
    fn test_registering_same_name_replaces() {
        let mut registry = PipeRegistry::with_builtins();
        registry.register_fn("upper", |value, _| format!("<{value}>"));
        assert_eq!(registry.get("upper").unwrap().apply("x", &[]), "<x>");
    }
}
