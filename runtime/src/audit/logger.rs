//! Append-only JSONL log of pipeline operations.
//!
//! Features:
//! - Append-only JSONL format for easy parsing
//! - Automatic log rotation when file exceeds `MAX_LOG_SIZE` (100MB)
//! - Rotated files named `.1`, `.2`, etc. (max 5 rotations)

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum audit log size before rotation (100 MB).
const MAX_LOG_SIZE: u64 = 100 * 1024 * 1024;

/// Maximum number of rotated log files to keep.
const MAX_ROTATIONS: u32 = 5;

/// A single audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub run_id: String,
    pub operation: String,
    pub target: Option<String>,
    pub duration_ms: u64,
    pub status: String,
}

/// Append-only JSONL audit logger with automatic rotation.
pub struct AuditLogger {
    file: File,
    path: PathBuf,
    run_id: String,
    max_size: u64,
    /// Approximate current size (may drift slightly; re-checked on rotation).
    current_size: u64,
}

impl AuditLogger {
    /// Open or create the audit log file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open audit log: {}", path.display()))?;

        let current_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            run_id: uuid::Uuid::new_v4().to_string(),
            max_size: MAX_LOG_SIZE,
            current_size,
        })
    }

    /// Open the default audit log at ~/.paperflow/audit.jsonl.
    pub fn default_logger() -> Result<Self> {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".paperflow")
            .join("audit.jsonl");
        Self::open(&path)
    }

    /// Rotate once the file reaches `max_size` bytes.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Identifier shared by every event this logger writes.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Log an audit event.
    pub fn log(&mut self, event: &AuditEvent) -> Result<()> {
        if self.current_size >= self.max_size {
            self.rotate()?;
        }

        let json = serde_json::to_string(event)?;
        writeln!(self.file, "{json}")?;
        self.current_size += json.len() as u64 + 1;
        Ok(())
    }

    /// Log one operation with timing.
    pub fn log_operation(
        &mut self,
        operation: &str,
        target: Option<&str>,
        duration_ms: u64,
        status: &str,
    ) -> Result<()> {
        let event = AuditEvent {
            timestamp: Utc::now().to_rfc3339(),
            run_id: self.run_id.clone(),
            operation: operation.to_string(),
            target: target.map(String::from),
            duration_ms,
            status: status.to_string(),
        };
        self.log(&event)
    }

    /// Rotate log files: audit.jsonl → audit.jsonl.1, .1 → .2, etc.
    fn rotate(&mut self) -> Result<()> {
        self.file.flush()?;

        // Drop the oldest so the shift below never exceeds the limit
        let oldest = rotation_path(&self.path, MAX_ROTATIONS);
        if oldest.exists() {
            let _ = std::fs::remove_file(&oldest);
        }

        for i in (1..MAX_ROTATIONS).rev() {
            let from = rotation_path(&self.path, i);
            let to = rotation_path(&self.path, i + 1);
            if from.exists() {
                let _ = std::fs::rename(&from, &to);
            }
        }

        let first_rotation = rotation_path(&self.path, 1);
        let _ = std::fs::rename(&self.path, &first_rotation);

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| "failed to reopen audit log after rotation")?;
        self.current_size = 0;

        Ok(())
    }
}

/// Build path for a rotated log file: `audit.jsonl.1`, `audit.jsonl.2`, etc.
fn rotation_path(base: &Path, index: u32) -> PathBuf {
    let name = format!(
        "{}.{index}",
        base.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audit.jsonl")
    );
    base.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_events(path: &Path) -> Vec<AuditEvent> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_events_share_run_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut logger = AuditLogger::open(&path).unwrap();
        logger.log_operation("crawl.paper", Some("105/1"), 12, "inserted").unwrap();
        logger.log_operation("crawl.paper", Some("105/2"), 7, "skipped").unwrap();

        let events = read_events(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].run_id, logger.run_id());
        assert_eq!(events[1].status, "skipped");
    }

    #[test]
    fn test_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut logger = AuditLogger::open(&path).unwrap().with_max_size(1);
        logger.log_operation("a", None, 0, "ok").unwrap();
        logger.log_operation("b", None, 0, "ok").unwrap();
        logger.log_operation("c", None, 0, "ok").unwrap();

        assert_eq!(read_events(&path)[0].operation, "c");
        assert_eq!(read_events(&rotation_path(&path, 1))[0].operation, "b");
        assert_eq!(read_events(&rotation_path(&path, 2))[0].operation, "a");
    }
}
