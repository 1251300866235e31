pub mod batch;
pub mod compare;
pub mod pair;

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use exclusivity::core::io::manifest::ChainAssignment;
use exclusivity::core::io::pdb::PdbFile;
use exclusivity::core::io::traits::MolecularFile;
use exclusivity::core::models::system::MolecularSystem;
use exclusivity::engine::config::AnalysisConfig;
use exclusivity::engine::progress::ProgressReporter;
use exclusivity::workflows::compare::{self as compare_workflow, ComparisonOutcome};
use exclusivity::workflows::report::OverlapReport;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

fn load_structure(path: &Path) -> Result<MolecularSystem> {
    PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Loads both structures and runs the comparison workflow on them.
pub(crate) fn compare_files(
    pdb1: &Path,
    pdb2: &Path,
    chains: &ChainAssignment,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<ComparisonOutcome> {
    info!("Loading structures from {:?} and {:?}", pdb1, pdb2);
    let structure1 = load_structure(pdb1)?;
    let structure2 = load_structure(pdb2)?;
    info!(
        atoms1 = structure1.atom_count(),
        atoms2 = structure2.atom_count(),
        "Structures loaded."
    );
    Ok(compare_workflow::run(
        structure1,
        &structure2,
        chains,
        config,
        reporter,
    )?)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub(crate) fn render_report(report: &OverlapReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Writes the report to `output`, creating its directory, or to stdout when no path is given.
pub(crate) fn write_report(
    report: &OverlapReport,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let rendered = render_report(report, format)?;
    match output {
        Some(path) => {
            create_parent_dir(path)?;
            fs::write(path, rendered)?;
            info!("Report written to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub(crate) fn write_aligned(system: &MolecularSystem, path: &Path) -> Result<()> {
    create_parent_dir(path)?;
    PdbFile::write_to_path(system, path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!("Superposed structure written to {:?}", path);
    Ok(())
}
