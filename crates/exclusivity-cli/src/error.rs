use exclusivity::core::io::manifest::ManifestError;
use exclusivity::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid dimer pair line: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write batch summary: {0}")]
    Summary(#[from] csv::Error),

    /// Reported once a batch has finished; the individual failures are in the error log.
    #[error("{failed} of {total} dimer pairs failed; see the error log for details")]
    Batch { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use exclusivity::core::selection::SelectionError;

    #[test]
    fn engine_errors_keep_their_own_message() {
        let engine = EngineError::Selection {
            source: SelectionError::ChainNotFound('Q'),
        };
        let expected = engine.to_string();
        assert_eq!(CliError::from(engine).to_string(), expected);
    }

    #[test]
    fn batch_failure_counts_are_reported() {
        let err = CliError::Batch {
            failed: 2,
            total: 9,
        };
        assert_eq!(
            err.to_string(),
            "2 of 9 dimer pairs failed; see the error log for details"
        );
    }
}
