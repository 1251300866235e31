use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, OutputFormat};
use crate::cli::{AnalysisArgs, LayoutArgs};
use crate::error::{CliError, Result};
use clap::ValueEnum;
use exclusivity::engine::config::{AlignmentAtoms, AnalysisConfigBuilder};
use std::path::PathBuf;
use std::str::FromStr;

/// Resolves the settings of one invocation.
///
/// Precedence, highest first: explicit command-line flags, `-S key=value` overrides, the
/// TOML file given with `--config`, built-in defaults.
pub fn build_config(args: &AnalysisArgs, layout: Option<&LayoutArgs>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let alignment_file = file_config.alignment.take().unwrap_or_default();
    let manifest_file = file_config.manifest.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let analysis = AnalysisConfigBuilder::new()
        .contact_cutoff(
            args.cutoff
                .or(analysis_file.cutoff)
                .unwrap_or(defaults.contact_cutoff),
        )
        .confidence_atom(
            analysis_file
                .confidence_atom
                .unwrap_or(defaults.confidence_atom),
        )
        .cycles(
            args.align_cycles
                .or(alignment_file.cycles)
                .unwrap_or(defaults.cycles),
        )
        .outlier_cutoff(
            args.outlier_cutoff
                .or(alignment_file.outlier_cutoff)
                .unwrap_or(defaults.outlier_cutoff),
        )
        .atoms(
            args.align_atoms
                .or(alignment_file.atoms)
                .unwrap_or(defaults.atoms),
        )
        .gap_open(alignment_file.gap_open.unwrap_or(defaults.gap_open))
        .gap_extend(alignment_file.gap_extend.unwrap_or(defaults.gap_extend))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let cli_layout = layout.cloned().unwrap_or_default();
    let pair_delimiter = cli_layout
        .pair_delim
        .or(manifest_file.pair_delimiter)
        .unwrap_or(defaults.pair_delimiter);
    let dimer_delimiter = cli_layout
        .dimer_delim
        .or(manifest_file.dimer_delimiter)
        .unwrap_or(defaults.dimer_delimiter);
    if pair_delimiter.is_empty() || dimer_delimiter.is_empty() {
        return Err(CliError::Config(
            "Manifest delimiters must not be empty.".to_string(),
        ));
    }
    if pair_delimiter == dimer_delimiter {
        return Err(CliError::Config(format!(
            "The pair and dimer delimiters must differ (both are '{}').",
            pair_delimiter
        )));
    }

    let output_dir = cli_layout
        .output_dir
        .or(output_file.directory.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(defaults.output_directory));
    let format = args
        .format
        .or(output_file.format)
        .unwrap_or(defaults.format);

    Ok(AppConfig {
        analysis,
        pair_delimiter,
        dimer_delimiter,
        output_dir,
        format,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "analysis.cutoff" => {
                config.analysis.get_or_insert_with(Default::default).cutoff =
                    Some(parse_value(key, value_str, "float")?);
            }
            "analysis.confidence-atom" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .confidence_atom = Some(value_str.trim().to_string());
            }
            "alignment.cycles" => {
                config.alignment.get_or_insert_with(Default::default).cycles =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "alignment.outlier-cutoff" => {
                config
                    .alignment
                    .get_or_insert_with(Default::default)
                    .outlier_cutoff = Some(parse_value(key, value_str, "float")?);
            }
            "alignment.atoms" => {
                let atoms: AlignmentAtoms = value_str
                    .parse()
                    .map_err(|e| CliError::Config(format!("{}", e)))?;
                config.alignment.get_or_insert_with(Default::default).atoms = Some(atoms);
            }
            "alignment.gap-open" => {
                config.alignment.get_or_insert_with(Default::default).gap_open =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "alignment.gap-extend" => {
                config
                    .alignment
                    .get_or_insert_with(Default::default)
                    .gap_extend = Some(parse_value(key, value_str, "integer")?);
            }
            "manifest.pair-delimiter" => {
                config
                    .manifest
                    .get_or_insert_with(Default::default)
                    .pair_delimiter = Some(value_str.to_string());
            }
            "manifest.dimer-delimiter" => {
                config
                    .manifest
                    .get_or_insert_with(Default::default)
                    .dimer_delimiter = Some(value_str.to_string());
            }
            "output.directory" => {
                config.output.get_or_insert_with(Default::default).directory =
                    Some(value_str.trim().to_string());
            }
            "output.format" => {
                let format = <OutputFormat as ValueEnum>::from_str(value_str.trim(), true).map_err(|_| {
                    CliError::Config(format!(
                        "Invalid value for {}: {} (expected text or json)",
                        key, value_str
                    ))
                })?;
                config.output.get_or_insert_with(Default::default).format = Some(format);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
