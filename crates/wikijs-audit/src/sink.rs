//! Audit sinks.
//!
//! A sink receives complete lines and must write each one atomically, so that
//! interleaved records from concurrent tool calls never tear.

use crate::error::AuditError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Destination for audit lines.
pub trait AuditSink: Send + Sync {
    /// Write one line (without the trailing newline).
    fn write_line(&self, line: &str) -> Result<(), AuditError>;
}

/// Writes to the process's stderr.
#[derive(Debug, Default)]
pub struct StderrSink;

impl AuditSink for StderrSink {
    fn write_line(&self, line: &str) -> Result<(), AuditError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut stderr = std::io::stderr().lock();
        stderr.write_all(buf.as_bytes())?;
        stderr.flush()?;
        Ok(())
    }
}

/// Appends to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileSink {
    fn write_line(&self, line: &str) -> Result<(), AuditError> {
        let mut file = self.file.lock().map_err(|_| AuditError::Poisoned)?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }
}

/// Keeps lines in memory. Used by tests to inspect what was written.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemorySink {
    fn write_line(&self, line: &str) -> Result<(), AuditError> {
        self.lines
            .lock()
            .map_err(|_| AuditError::Poisoned)?
            .push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let sink = FileSink::open(&path).unwrap();
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        drop(sink);

        let sink = FileSink::open(&path).unwrap();
        sink.write_line("third").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\nthird\n");
    }

    #[test]
    fn test_file_sink_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSink::open(dir.path().join("missing").join("audit.log")).unwrap_err();
        assert!(matches!(err, AuditError::Open { .. }));
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        sink.write_line("a").unwrap();
        sink.write_line("b").unwrap();
        assert_eq!(sink.lines(), vec!["a", "b"]);
    }
}
