use super::{compare_files, write_aligned, write_report};
use crate::cli::CompareArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::error_log::ErrorLog;
use crate::utils::progress::CliProgressHandler;
use exclusivity::core::io::manifest::ChainAssignment;
use exclusivity::engine::progress::ProgressReporter;
use tracing::info;

pub fn run(args: CompareArgs, error_log: &ErrorLog) -> Result<()> {
    let chains = ChainAssignment {
        common_chain1: args.common_ch1,
        common_chain2: args.common_ch2,
        test_chain1: args.test_ch1,
        test_chain2: args.test_ch2,
    };

    let result = execute(&args, &chains);
    if let Err(e) = &result {
        error_log.record(&format!(
            "Error processing PDBs {} and {} with chains {}, {}, {}, {}: {}",
            args.pdb1.display(),
            args.pdb2.display(),
            chains.common_chain1,
            chains.common_chain2,
            chains.test_chain1,
            chains.test_chain2,
            e
        ));
    }
    result
}

fn execute(args: &CompareArgs, chains: &ChainAssignment) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let config = build_config(&args.analysis, None)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let outcome = compare_files(&args.pdb1, &args.pdb2, chains, &config.analysis, &reporter)?;

    if let Some(path) = &args.write_aligned {
        write_aligned(&outcome.aligned_structure, path)?;
        eprintln!("✓ Superposed structure written to: {}", path.display());
    }

    write_report(&outcome.report, config.format, args.output_file.as_deref())?;
    if let Some(path) = &args.output_file {
        eprintln!("✓ Report written to: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AnalysisArgs;
    use crate::commands::fixtures::complex_pdb;
    use crate::error::CliError;
    use exclusivity::core::selection::ChainSelector;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn args(dir: &Path, test_ch1: char) -> CompareArgs {
        let pdb1 = dir.join("first.pdb");
        let pdb2 = dir.join("second.pdb");
        fs::write(&pdb1, complex_pdb(true, 0, [5.0, 5.0, 5.0])).unwrap();
        fs::write(&pdb2, complex_pdb(true, 7, [0.0, 0.0, 0.0])).unwrap();
        CompareArgs {
            pdb1,
            pdb2,
            common_ch1: ChainSelector::new('A'),
            common_ch2: ChainSelector::new('A'),
            test_ch1: ChainSelector::new(test_ch1),
            test_ch2: ChainSelector::new('B'),
            output_file: Some(dir.join("out/report.txt")),
            write_aligned: Some(dir.join("out/aligned.pdb")),
            analysis: AnalysisArgs::default(),
        }
    }

    #[test]
    fn writes_report_and_aligned_structure() {
        let dir = tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("error_logs"));

        run(args(dir.path(), 'B'), &log).unwrap();

        let report = fs::read_to_string(dir.path().join("out/report.txt")).unwrap();
        assert!(report.starts_with("Interface Overlap: no\n"));
        assert!(report.contains("Chain Overlap: no\n"));
        let aligned = fs::read_to_string(dir.path().join("out/aligned.pdb")).unwrap();
        assert!(aligned.lines().any(|l| l.starts_with("ATOM")));
        assert!(!log.path().exists());
    }

    #[test]
    fn failures_are_written_to_the_error_log() {
        let dir = tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("error_logs"));

        let result = run(args(dir.path(), 'Z'), &log);

        assert!(matches!(result, Err(CliError::Engine(_))));
        let logged = fs::read_to_string(log.path()).unwrap();
        assert!(logged.contains("first.pdb"));
        assert!(logged.contains("chain A, chain A, chain Z, chain B"));
    }
}
