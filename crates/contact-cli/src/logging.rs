use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps `-v` repetitions and `-q` to a maximum log level.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn build_subscriber(
    level: LevelFilter,
    log_file: Option<&Path>,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Output {
                path: path.to_path_buf(),
                source,
            })?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(level)
        .with(stderr_layer)
        .with(file_layer))
}

/// Installs the global subscriber: a compact stderr layer and, optionally, a plain-text file layer.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    build_subscriber(level_filter(verbosity, quiet), log_file)?
        .try_init()
        .map_err(|e| CliError::Other(e.into()))
}
