mod cli;
mod config;
mod error;
mod scrape;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::ExporterError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries the metrics
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), ExporterError> {
    let settings = build_settings(&cli)?;

    let gathered = scrape::scrape(&settings).await?;
    let text = gathered.encode_text()?;
    write_output(&text, cli.output.as_deref())?;

    match gathered.errors.first() {
        None => Ok(()),
        Some(first) => Err(ExporterError::Scrape {
            failed: gathered.errors.len(),
            first: first.clone(),
        }),
    }
}

/// Config file, environment, then flags.
fn build_settings(cli: &Cli) -> Result<config::Settings, ExporterError> {
    let config_error = |source| ExporterError::Config {
        source,
        path: cli
            .config
            .clone()
            .unwrap_or_else(config::config_path)
            .display()
            .to_string(),
    };

    let mut cfg = config::load_config(cli.config.as_deref()).map_err(config_error)?;
    cfg.apply_overrides(cli);
    tracing::debug!(config = ?cfg, "resolved configuration");

    cfg.resolve().map_err(config_error)
}

/// Write to stdout, or replace `path` atomically so a textfile collector
/// never reads a partial file.
fn write_output(text: &str, path: Option<&Path>) -> Result<(), ExporterError> {
    let output_error = |source| ExporterError::Output {
        path: path.map_or_else(|| "stdout".into(), |p| p.display().to_string()),
        source,
    };

    let Some(path) = path else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes()).map_err(output_error)?;
        return stdout.flush().map_err(output_error);
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(output_error)?;
    tmp.write_all(text.as_bytes()).map_err(output_error)?;
    tmp.persist(path).map_err(|e| output_error(e.error))?;

    tracing::info!(path = %path.display(), "metrics written");
    Ok(())
}
