//! Append-only record of failed comparisons.
//!
//! One file per process, `error_log_<YYYYMMDD_HHMMSS>.txt`, created the first time a failure
//! is recorded so that successful runs leave nothing behind.

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, warn};

pub const DEFAULT_ERROR_LOG_DIR: &str = "error_logs";

#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ErrorLog {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_timestamp(dir, Local::now())
    }

    pub fn with_timestamp(dir: impl AsRef<Path>, timestamp: DateTime<Local>) -> Self {
        let file_name = format!("error_log_{}.txt", timestamp.format("%Y%m%d_%H%M%S"));
        Self {
            path: dir.as_ref().join(file_name),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Logs `message` as an error and appends it to the log file.
    ///
    /// A log file that cannot be written only produces a warning; the failure being recorded
    /// is already on its way to the user.
    pub fn record(&self, message: &str) {
        error!("{message}");
        if let Err(e) = self.append(message) {
            warn!("Could not write to error log {:?}: {}", self.path, e);
        }
    }

    fn append(&self, message: &str) -> io::Result<()> {
        let Ok(mut guard) = self.file.lock() else {
            return Err(io::Error::other("error log mutex was poisoned"));
        };
        if guard.is_none() {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            *guard = Some(file);
        }
        match guard.as_mut() {
            Some(file) => writeln!(file, "{message}"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn file_name_carries_the_timestamp() {
        let log = ErrorLog::with_timestamp("logs", fixed_time());
        assert_eq!(log.path(), Path::new("logs/error_log_20240309_140507.txt"));
    }

    #[test]
    fn nothing_is_created_until_a_failure_is_recorded() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("error_logs");
        let _log = ErrorLog::with_timestamp(&log_dir, fixed_time());
        assert!(!log_dir.exists());
    }

    #[test]
    fn records_are_appended_in_order() {
        let dir = tempdir().unwrap();
        let log = ErrorLog::with_timestamp(dir.path().join("nested/logs"), fixed_time());

        log.record("Error processing input line 'P1-P2|P3-P4': no shared protein");
        log.record("Error processing input line 'P1-P2': expected 2 dimers");

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "Error processing input line 'P1-P2|P3-P4': no shared protein\n\
             Error processing input line 'P1-P2': expected 2 dimers\n"
        );
    }

    #[test]
    fn existing_log_is_extended_not_truncated() {
        let dir = tempdir().unwrap();
        let first = ErrorLog::with_timestamp(dir.path(), fixed_time());
        first.record("first run");
        let second = ErrorLog::with_timestamp(dir.path(), fixed_time());
        second.record("second run");

        let content = fs::read_to_string(second.path()).unwrap();
        assert_eq!(content, "first run\nsecond run\n");
    }

    #[test]
    fn concurrent_records_are_all_kept() {
        let dir = tempdir().unwrap();
        let log = Arc::new(ErrorLog::with_timestamp(dir.path(), fixed_time()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = Arc::clone(&log);
                thread::spawn(move || log.record(&format!("failure {i}")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 8);
    }
}
