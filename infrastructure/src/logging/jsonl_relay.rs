//! JSONL file sink for relayed log entries.
//!
//! Each [`LogEntry`] is serialized as a single JSON line with a `timestamp`
//! field, appended to the file via a buffered writer.

use eforce_application::LogRelay;
use eforce_domain::LogEntry;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Log relay that appends one JSON object per entry.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlLogRelay {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlLogRelay {
    /// Open (or create) the file at `path` for appending.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create relay log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open relay log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogRelay for JsonlLogRelay {
    fn relay(&self, entry: LogEntry) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = serde_json::json!({
            "timestamp": timestamp,
            "sender": entry.sender,
            "channel": entry.channel,
            "message": entry.message,
        });

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlLogRelay {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eforce_domain::SenderId;

    #[test]
    fn test_writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.jsonl");
        let relay = JsonlLogRelay::new(&path).unwrap();

        relay.relay(LogEntry::info(SenderId::new("explorer"), "Query Successful"));
        relay.relay(LogEntry::error(SenderId::new("explorer"), "Query Failed x"));
        drop(relay);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["sender"], "explorer");
        assert_eq!(first["channel"], "Info");
        assert!(first.get("timestamp").is_some());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["channel"], "Error");
        assert_eq!(second["message"], "Query Failed x");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("relay.jsonl");

        for message in ["first", "second"] {
            let relay = JsonlLogRelay::new(&path).unwrap();
            relay.relay(LogEntry::info(SenderId::default(), message));
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
