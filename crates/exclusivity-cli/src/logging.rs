use crate::error::Result;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{Layer, Registry, filter::LevelFilter, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbosity) {
        (true, _) => LevelFilter::OFF,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Plain-text layer for `--log-file`; batch runs log from rayon workers, so thread ids are kept.
fn file_layer(file: File) -> BoxedLayer {
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .boxed()
}

/// Installs the global subscriber: compact output on stderr and, optionally, a log file.
///
/// The file is created (truncated) before anything is installed, so a bad path
/// surfaces as [`CliError::Io`](crate::error::CliError::Io) with logging still unset.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file_layer = log_file.map(File::create).transpose()?.map(file_layer);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .boxed();

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(level_filter(verbosity, quiet))
        .init();
    Ok(())
}
