use exclusivity::engine::config::AnalysisConfig;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The eleven-line plain-text report.
    #[default]
    Text,
    /// The same report as a JSON object.
    Json,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub pair_delimiter: String,
    pub dimer_delimiter: String,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
}
