use super::models::OutputFormat;
use crate::error::{CliError, Result};
use exclusivity::engine::config::AlignmentAtoms;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAnalysisConfig {
    pub cutoff: Option<f64>,
    pub confidence_atom: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAlignmentConfig {
    pub cycles: Option<usize>,
    pub outlier_cutoff: Option<f64>,
    #[serde(default, deserialize_with = "alignment_atoms")]
    pub atoms: Option<AlignmentAtoms>,
    pub gap_open: Option<i32>,
    pub gap_extend: Option<i32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileManifestConfig {
    pub pair_delimiter: Option<String>,
    pub dimer_delimiter: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub directory: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Settings read from a TOML configuration file; every field is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub analysis: Option<FileAnalysisConfig>,
    pub alignment: Option<FileAlignmentConfig>,
    pub manifest: Option<FileManifestConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

fn alignment_atoms<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<AlignmentAtoms>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|s| s.parse().map_err(serde::de::Error::custom))
        .transpose()
}
