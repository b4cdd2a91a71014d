use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use exec_approvals::{Allowlist, PatternCache, Resolver, first_token};
use tracing::level_filters::LevelFilter;
use tracing::{Level, info, instrument, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

mod cli;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    // Log path: CMDGATE_LOG env var > ~/.cmdgate/cmdgate.log > stderr fallback.
    let log_path = std::env::var("CMDGATE_LOG").ok().unwrap_or_else(|| {
        dirs::home_dir()
            .map(|h| h.join(".cmdgate").join("cmdgate.log"))
            .unwrap_or_else(|| std::path::PathBuf::from("cmdgate.log"))
            .to_string_lossy()
            .into_owned()
    });

    // Ensure parent directory exists.
    if let Some(parent) = std::path::Path::new(&log_path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = OpenOptions::new().create(true).append(true).open(&log_path);

    // stdout carries the machine-readable result; diagnostics go to the log
    // file, or to stderr when the file cannot be opened or with --verbose.
    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_filter = EnvFilter::builder()
        .with_default_directive(stderr_level.into())
        .from_env_lossy();

    match log_file {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_level(true)
                        .with_writer(file)
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(false)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_ansi(true)
                        .with_filter(LevelFilter::from_level(Level::DEBUG)),
                )
                .with(verbose.then(|| {
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_filter(stderr_filter)
                }))
                .init();
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_level(true)
                        .with_writer(std::io::stderr)
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(false)
                        .with_filter(stderr_filter),
                )
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!(args = ?std::env::args(), "cmdgate started");

    let output = match cli.command {
        Commands::Matches { command, entries } => {
            run_matches(command.as_deref(), entries.as_deref())
        }
        Commands::Resolve {
            executable,
            cwd,
            path_env,
        } => run_resolve(executable.as_deref(), cwd.as_deref(), path_env.as_deref())?,
        Commands::FirstToken { command } => run_first_token(command.as_deref()),
    };

    // No trailing newline: callers consume stdout verbatim.
    if !output.is_empty() {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(output.as_bytes())
            .and_then(|_| stdout.flush())
            .context("failed to write result to stdout")?;
    }
    Ok(())
}

/// Evaluates `matches`. Missing arguments and malformed allowlist JSON are
/// indistinguishable from "no pattern matched" — the gate denies by default.
#[instrument(level = Level::TRACE)]
fn run_matches(command: Option<&str>, entries: Option<&str>) -> String {
    let (Some(command), Some(entries)) = (command, entries) else {
        return "false".into();
    };

    let allowlist = match Allowlist::from_json(entries) {
        Ok(list) => list,
        Err(error) => {
            warn!(%error, "unparseable allowlist, denying");
            return "false".into();
        }
    };

    let cache = PatternCache::new();
    let allowed = allowlist.matches(&cache, command);
    info!(command, allowed, entries = allowlist.len(), "allowlist check");

    if allowed { "true" } else { "false" }.into()
}

/// Evaluates `resolve`. Missing arguments produce no output; an empty
/// path-env is substituted with the process's own PATH.
#[instrument(level = Level::TRACE)]
fn run_resolve(
    executable: Option<&str>,
    cwd: Option<&str>,
    path_env: Option<&str>,
) -> Result<String> {
    let (Some(executable), Some(cwd), Some(path_env)) = (executable, cwd, path_env) else {
        return Ok(String::new());
    };

    let ambient;
    let path_env = if path_env.is_empty() {
        ambient = std::env::var("PATH").unwrap_or_default();
        ambient.as_str()
    } else {
        path_env
    };

    let resolution = Resolver::new().resolve(executable, cwd, path_env);
    info!(executable, resolved = ?resolution.resolved_path, "resolution");

    serde_json::to_string(&resolution).context("failed to encode resolution")
}

/// Evaluates `first-token`. A missing argument produces no output.
#[instrument(level = Level::TRACE)]
fn run_first_token(command: Option<&str>) -> String {
    command.map(first_token).unwrap_or_default().to_string()
}
