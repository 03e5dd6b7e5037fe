//! JSONL run log — append-only record of execution reports.
//!
//! Research runs are compared across automation stacks and engine
//! versions; keeping every report on disk makes those comparisons
//! possible without a collector service.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::ExecutionReport;

/// Append-only JSONL log of execution reports.
pub struct RunLog {
    file: File,
}

impl RunLog {
    /// Open or create the log file, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open run log: {}", path.display()))?;

        Ok(Self { file })
    }

    /// Open the default log at ~/.tripwire/runs.jsonl.
    pub fn default_log() -> Result<Self> {
        Self::open(&default_path())
    }

    /// Append one report as a single JSON line.
    pub fn append(&mut self, report: &ExecutionReport) -> Result<()> {
        let json = serde_json::to_string(report)?;
        writeln!(self.file, "{json}")?;
        Ok(())
    }
}

/// Default run log location.
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".tripwire")
        .join("runs.jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");

        let mut log = RunLog::open(&path).unwrap();
        let report = ExecutionReport::pending("hash".into()).complete(Vec::new());
        log.append(&report).unwrap();
        log.append(&report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: ExecutionReport = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(back.run_id, report.run_id);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/runs.jsonl");
        RunLog::open(&path).unwrap();
        assert!(path.exists());
    }
}
