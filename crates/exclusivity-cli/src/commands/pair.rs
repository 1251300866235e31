use super::{compare_files, write_aligned, write_report};
use crate::cli::PairArgs;
use crate::config::{AppConfig, OutputFormat, build_config};
use crate::error::Result;
use crate::error_log::ErrorLog;
use crate::utils::progress::CliProgressHandler;
use exclusivity::core::io::manifest::DimerPairRecord;
use exclusivity::engine::progress::ProgressReporter;
use exclusivity::workflows::report::OverlapReport;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One manifest line resolved to structure files and a report path.
#[derive(Debug, Clone)]
pub struct PairJob {
    pub record: DimerPairRecord,
    pub pdb1: PathBuf,
    pub pdb2: PathBuf,
    pub output_file: PathBuf,
}

impl PairJob {
    pub fn from_line(line: &str, config: &AppConfig, structure_root: &Path) -> Result<Self> {
        let record = DimerPairRecord::parse(line, &config.pair_delimiter, &config.dimer_delimiter)?;
        let (pdb1, pdb2) = record.structure_paths(structure_root);
        let mut output_file = config.output_dir.join(record.output_file_name());
        if config.format == OutputFormat::Json {
            output_file.set_extension("json");
        }
        debug!(?pdb1, ?pdb2, ?output_file, "Resolved dimer pair '{}'.", line.trim());
        Ok(Self {
            record,
            pdb1,
            pdb2,
            output_file,
        })
    }

    /// The equivalent `compare` invocation.
    pub fn arguments(&self) -> String {
        let chains = &self.record.chains;
        format!(
            "--pdb1 {} --pdb2 {} --common-ch1 '{}' --common-ch2 '{}' --test-ch1 '{}' --test-ch2 '{}' --output-file {}",
            self.pdb1.display(),
            self.pdb2.display(),
            chains.common_chain1,
            chains.common_chain2,
            chains.test_chain1,
            chains.test_chain2,
            self.output_file.display()
        )
    }

    pub fn failure_message(&self, error: &dyn std::fmt::Display) -> String {
        let chains = &self.record.chains;
        format!(
            "Error processing PDBs {} and {} with chains {}, {}, {}, {}: {}",
            self.pdb1.display(),
            self.pdb2.display(),
            chains.common_chain1,
            chains.common_chain2,
            chains.test_chain1,
            chains.test_chain2,
            error
        )
    }

    /// Runs the comparison and writes the report to [`PairJob::output_file`].
    pub fn execute(
        &self,
        config: &AppConfig,
        reporter: &ProgressReporter,
        aligned_output: Option<&Path>,
    ) -> Result<OverlapReport> {
        let outcome = compare_files(
            &self.pdb1,
            &self.pdb2,
            &self.record.chains,
            &config.analysis,
            reporter,
        )?;
        if let Some(path) = aligned_output {
            write_aligned(&outcome.aligned_structure, path)?;
        }
        write_report(&outcome.report, config.format, Some(&self.output_file))?;
        info!(
            "Compared {} with {}; report at {:?}.",
            self.record.first.label, self.record.second.label, self.output_file
        );
        Ok(outcome.report)
    }
}

pub fn line_failure_message(line: &str, error: &dyn std::fmt::Display) -> String {
    format!("Error processing input line '{}': {}", line.trim(), error)
}

pub fn run(args: PairArgs, error_log: &ErrorLog) -> Result<()> {
    let config = build_config(&args.analysis, Some(&args.layout)).inspect_err(|e| {
        error_log.record(&line_failure_message(&args.input_line, e));
    })?;

    let job = PairJob::from_line(&args.input_line, &config, &args.layout.structure_root)
        .inspect_err(|e| error_log.record(&line_failure_message(&args.input_line, e)))?;

    let record = &job.record;
    println!("Proteins in pair 1: {}", record.first.proteins.join(", "));
    println!("Proteins in pair 2: {}", record.second.proteins.join(", "));
    println!("Common protein: {}", record.common_protein);
    println!(
        "Unique proteins: {}, {}",
        record.unique_protein1, record.unique_protein2
    );
    println!(
        "pdb1 is {}, with common chain: {} and unique chain: {}",
        job.pdb1.display(),
        record.chains.common_chain1,
        record.chains.test_chain1
    );
    println!(
        "pdb2 is {}, with common chain: {} and unique chain: {}",
        job.pdb2.display(),
        record.chains.common_chain2,
        record.chains.test_chain2
    );
    println!("Running the comparison with the following arguments:");
    println!("{}", job.arguments());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    job.execute(&config, &reporter, args.write_aligned.as_deref())
        .inspect_err(|e| error_log.record(&job.failure_message(e)))?;

    println!("✓ Report written to: {}", job.output_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AnalysisArgs, LayoutArgs};
    use crate::commands::fixtures::{complex_pdb, write_dimer};
    use crate::error::CliError;
    use exclusivity::core::selection::ChainSelector;
    use std::fs;
    use tempfile::tempdir;

    fn layout(root: &Path) -> LayoutArgs {
        LayoutArgs {
            structure_root: root.to_path_buf(),
            output_dir: Some(root.join("overlap_results")),
            ..Default::default()
        }
    }

    fn app_config(root: &Path) -> AppConfig {
        build_config(&AnalysisArgs::default(), Some(&layout(root))).unwrap()
    }

    #[test]
    fn job_resolves_paths_chains_and_report_name() {
        let root = Path::new("/data/dimers");
        let job = PairJob::from_line("P1-P2|P3-P1\n", &app_config(root), root).unwrap();

        assert_eq!(job.pdb1, root.join("P1-P2/P1-P2.pdb"));
        assert_eq!(job.pdb2, root.join("P3-P1/P3-P1.pdb"));
        assert_eq!(
            job.output_file,
            root.join("overlap_results/P1-P2_P3-P1_overlap.txt")
        );
        assert_eq!(job.record.chains.common_chain1, ChainSelector::new('A'));
        assert_eq!(job.record.chains.common_chain2, ChainSelector::new('B'));
        assert!(job.arguments().contains("--common-ch2 'chain B' --test-ch1 'chain B'"));
    }

    #[test]
    fn json_reports_get_a_json_extension() {
        let root = Path::new("dimers");
        let args = AnalysisArgs {
            set_values: vec!["output.format=json".to_string()],
            ..Default::default()
        };
        let config = build_config(&args, Some(&layout(root))).unwrap();
        let job = PairJob::from_line("A-B|A-C", &config, root).unwrap();
        assert!(job.output_file.ends_with("A-B_A-C_overlap.json"));
    }

    #[test]
    fn pair_run_writes_the_named_report() {
        let dir = tempdir().unwrap();
        write_dimer(dir.path(), "P1-P2", &complex_pdb(true, 4, [3.0, 1.0, -2.0]));
        write_dimer(dir.path(), "P3-P1", &complex_pdb(false, 4, [0.0, 0.0, 0.0]));
        let log = ErrorLog::new(dir.path().join("error_logs"));

        let args = PairArgs {
            input_line: "P1-P2|P3-P1".to_string(),
            write_aligned: None,
            layout: layout(dir.path()),
            analysis: AnalysisArgs::default(),
        };
        run(args, &log).unwrap();

        let report = fs::read_to_string(
            dir.path()
                .join("overlap_results/P1-P2_P3-P1_overlap.txt"),
        )
        .unwrap();
        assert!(report.starts_with("Interface Overlap: yes\nOverlapping Interface Residues: 5\n"));
        assert!(report.contains("Overlapping Chain 1 Residues: 1TYR\n"));
        assert!(report.contains("Average pLDDT for Overlapping Chain 2: 65.00\n"));
        assert!(!log.path().exists());
    }

    #[test]
    fn malformed_line_is_logged_with_the_line() {
        let dir = tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("error_logs"));
        let args = PairArgs {
            input_line: "P1-P2|P3-P4".to_string(),
            write_aligned: None,
            layout: layout(dir.path()),
            analysis: AnalysisArgs::default(),
        };

        let result = run(args, &log);

        assert!(matches!(result, Err(CliError::Manifest(_))));
        let logged = fs::read_to_string(log.path()).unwrap();
        assert!(logged.starts_with("Error processing input line 'P1-P2|P3-P4': "));
    }

    #[test]
    fn missing_structure_is_logged_with_paths_and_chains() {
        let dir = tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("error_logs"));
        let args = PairArgs {
            input_line: "P1-P2|P1-P3".to_string(),
            write_aligned: None,
            layout: layout(dir.path()),
            analysis: AnalysisArgs::default(),
        };

        let result = run(args, &log);

        assert!(matches!(result, Err(CliError::FileParsing { .. })));
        let logged = fs::read_to_string(log.path()).unwrap();
        assert!(logged.contains("P1-P2.pdb"));
        assert!(logged.contains("chain A, chain A, chain B, chain B"));
    }
}
