use super::console::ConsoleFormatter;
use eforce_application::LogRelay;
use eforce_domain::LogEntry;
use std::io::Write;

/// Log relay that prints timestamped, colored lines on stderr.
///
/// Used by the one-shot `exec` mode, where stdout carries the result.
pub struct ConsoleLogRelay {
    formatter: ConsoleFormatter,
}

impl ConsoleLogRelay {
    pub fn new(formatter: ConsoleFormatter) -> Self {
        Self { formatter }
    }
}

impl LogRelay for ConsoleLogRelay {
    fn relay(&self, entry: LogEntry) {
        let line = self.formatter.format_log(&entry, &chrono::Local::now());
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }
}
