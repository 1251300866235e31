use super::pair::{PairJob, line_failure_message};
use crate::cli::BatchArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::error_log::ErrorLog;
use crate::utils::progress::batch_bar;
use exclusivity::engine::progress::ProgressReporter;
use exclusivity::workflows::report::OverlapReport;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

const COMMENT_PREFIX: char = '#';

/// One row of the batch summary CSV.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRow {
    pub line: usize,
    pub input: String,
    pub status: &'static str,
    pub interface_overlap: Option<&'static str>,
    pub interface_residues: Option<usize>,
    pub chain_overlap: Option<&'static str>,
    pub chain1_residues: Option<usize>,
    pub chain2_residues: Option<usize>,
    pub rmsd: Option<f64>,
    pub report: Option<String>,
    pub error: Option<String>,
}

impl SummaryRow {
    fn success(line: usize, input: &str, job: &PairJob, report: &OverlapReport) -> Self {
        let yes_no = |flag: bool| if flag { "yes" } else { "no" };
        Self {
            line,
            input: input.to_string(),
            status: "ok",
            interface_overlap: Some(yes_no(report.interface_overlap)),
            interface_residues: Some(report.num_overlapping_interface_residues),
            chain_overlap: Some(yes_no(report.chain_overlap)),
            chain1_residues: Some(report.num_overlapping_chain1_residues),
            chain2_residues: Some(report.num_overlapping_chain2_residues),
            rmsd: report.alignment.as_ref().map(|a| a.rmsd),
            report: Some(job.output_file.display().to_string()),
            error: None,
        }
    }

    fn failure(line: usize, input: &str, error: &CliError) -> Self {
        Self {
            line,
            input: input.to_string(),
            status: "failed",
            interface_overlap: None,
            interface_residues: None,
            chain_overlap: None,
            chain1_residues: None,
            chain2_residues: None,
            rmsd: None,
            report: None,
            error: Some(error.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Lines of a manifest worth processing, with their 1-based line numbers.
pub fn manifest_entries(content: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(|(n, line)| (n, line.to_string()))
        .collect()
}

fn process_job(
    line_number: usize,
    line: &str,
    job: &PairJob,
    config: &AppConfig,
    error_log: &ErrorLog,
) -> SummaryRow {
    match job.execute(config, &ProgressReporter::new(), None) {
        Ok(report) => SummaryRow::success(line_number, line, job, &report),
        Err(e) => {
            error_log.record(&job.failure_message(&e));
            SummaryRow::failure(line_number, line, &e)
        }
    }
}

/// Compares every dimer pair of a manifest in parallel.
///
/// Failing lines are recorded in the error log and do not stop the others. A line that
/// resolves to the same report file as an earlier line is skipped with a warning, so no two
/// comparisons write one file. Rows come back in manifest order.
#[instrument(skip_all, name = "batch_workflow")]
pub fn process_manifest(
    entries: &[(usize, String)],
    config: &AppConfig,
    structure_root: &Path,
    error_log: &ErrorLog,
) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    let mut jobs = Vec::new();
    let mut scheduled = HashSet::new();
    for (line_number, line) in entries {
        match PairJob::from_line(line, config, structure_root) {
            Ok(job) => {
                if scheduled.insert(job.output_file.clone()) {
                    jobs.push((*line_number, line.as_str(), job));
                } else {
                    warn!(
                        line = *line_number,
                        "Skipping repeated dimer pair '{}'; {} is already being written.",
                        line,
                        job.output_file.display()
                    );
                }
            }
            Err(e) => {
                error_log.record(&line_failure_message(line, &e));
                rows.push(SummaryRow::failure(*line_number, line, &e));
            }
        }
    }

    let bar = batch_bar(jobs.len() as u64);
    let compared: Vec<SummaryRow> = jobs
        .par_iter()
        .map(|(line_number, line, job)| {
            let row = process_job(*line_number, line, job, config, error_log);
            bar.inc(1);
            row
        })
        .collect();
    bar.finish_and_clear();

    rows.extend(compared);
    rows.sort_by_key(|row| row.line);
    rows
}

pub fn write_summary(rows: &[SummaryRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Errors that stop the whole batch rather than a single line.
fn is_manifest_level(error: &CliError) -> bool {
    matches!(
        error,
        CliError::Config(_) | CliError::Io(_) | CliError::FileParsing { .. } | CliError::Summary(_)
    )
}

pub fn run(args: BatchArgs, error_log: &ErrorLog) -> Result<()> {
    let result = execute(&args, error_log);
    if let Err(e) = &result {
        if is_manifest_level(e) {
            error_log.record(&format!(
                "Error processing manifest {}: {}",
                args.manifest.display(),
                e
            ));
        }
    }
    result
}

fn execute(args: &BatchArgs, error_log: &ErrorLog) -> Result<()> {
    let config = build_config(&args.analysis, Some(&args.layout))?;

    info!("Reading dimer pairs from {:?}", args.manifest);
    let content = fs::read_to_string(&args.manifest)?;
    let entries = manifest_entries(&content);
    if entries.is_empty() {
        warn!("Manifest {:?} lists no dimer pairs.", args.manifest);
        println!("No dimer pairs found in {}.", args.manifest.display());
        return Ok(());
    }
    println!(
        "Comparing {} dimer pairs from {}...",
        entries.len(),
        args.manifest.display()
    );

    let rows = process_manifest(&entries, &config, &args.layout.structure_root, error_log);

    if let Some(path) = &args.summary {
        write_summary(&rows, path)?;
        println!("✓ Summary written to: {}", path.display());
    }

    let failed = rows.iter().filter(|r| !r.succeeded()).count();
    let total = rows.len();
    println!(
        "✓ {} of {} dimer pairs compared; reports in {}",
        total - failed,
        total,
        config.output_dir.display()
    );
    if failed > 0 {
        println!("  Failures were recorded in {}", error_log.path().display());
        return Err(CliError::Batch { failed, total });
    }
    Ok(())
}
