use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = pipestring::cli::command().get_matches();
    let output = pipestring::cli::run(&matches, std::io::stdin().lock())?;
    print!("{output}");
    Ok(())
}
