// Command line rendering of templates

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::config::{load_variables, parse_assignment, SyntaxSettings};
use crate::domain::template::{evaluate_parsed_string, PipeRegistry, TemplateParser, Variables};

pub fn command() -> Command {
    Command::new("pipestring")
        .about("Render ${variable|pipe:param} string templates")
        .arg(
            Arg::new("template")
                .value_name("TEMPLATE")
                .help("Template text (read from --file or stdin when omitted)")
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to a file containing the template"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("SYNTAX")
                .help("Path to a YAML file with delimiter settings"),
        )
        .arg(
            Arg::new("vars")
                .short('v')
                .long("vars")
                .value_name("VARS")
                .help("Path to a YAML or JSON file with variables"),
        )
        .arg(
            Arg::new("set")
                .short('s')
                .long("set")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Set a variable (VALUE is parsed as JSON when possible)"),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .action(ArgAction::SetTrue)
                .help("Print the parsed template as JSON instead of rendering it"),
        )
}

/// Execute a parsed command line, returning what should be printed
pub fn run(matches: &ArgMatches, mut stdin: impl Read) -> Result<String> {
    let template = match (
        matches.get_one::<String>("template"),
        matches.get_one::<String>("file"),
    ) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read template {path}"))?,
        (None, None) => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("read template from stdin")?;
            text
        }
    };

    let parser = match matches.get_one::<String>("config") {
        Some(path) => SyntaxSettings::load(Path::new(path))
            .and_then(SyntaxSettings::into_parser)
            .with_context(|| format!("load syntax settings {path}"))?,
        None => TemplateParser::default(),
    };

    let parsed = parser.parse(&template);
    if matches.get_flag("ast") {
        let json = serde_json::to_string_pretty(&parsed).context("serialize parsed template")?;
        return Ok(format!("{json}\n"));
    }

    let variables = collect_variables(matches)?;
    debug!(
        variables = variables.len(),
        referenced = ?parsed.variable_names(),
        "rendering template"
    );
    Ok(evaluate_parsed_string(&parsed, &variables, &PipeRegistry::with_builtins()))
}

fn collect_variables(matches: &ArgMatches) -> Result<Variables> {
    let mut variables = match matches.get_one::<String>("vars") {
        Some(path) => load_variables(Path::new(path))
            .with_context(|| format!("load variables {path}"))?,
        None => Variables::new(),
    };
    for assignment in matches.get_many::<String>("set").into_iter().flatten() {
        let (key, value) = parse_assignment(assignment)?;
        variables.insert(key, value);
    }
    Ok(variables)
}
