//! Console output formatter for dispatch responses and log entries

use super::table::{cell_text, field_value_table, records_table, render};
use crate::config::OutputConfig;
use chrono::{DateTime, TimeZone};
use colored::{ColoredString, Colorize};
use eforce_application::DispatchResponse;
use eforce_domain::{LogChannel, LogEntry, OutputFormat, ResponseChannel, ResponseEnvelope};
use serde_json::Value;
use std::fmt::Display;

/// Formats envelopes and log lines for terminal display
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    format: OutputFormat,
    color: bool,
}

impl ConsoleFormatter {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.format, config.color)
    }

    /// Format one dispatch response in the configured format
    pub fn format_response(&self, response: &DispatchResponse) -> String {
        match self.format {
            OutputFormat::Raw => Self::format_json(&response.envelope),
            OutputFormat::Table => self.format_table(response),
        }
    }

    /// Format as pretty-printed JSON
    pub fn format_json(envelope: &ResponseEnvelope) -> String {
        serde_json::to_string_pretty(envelope).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a log entry as `[HH:MM:SS] sender channel: message`
    pub fn format_log<Tz>(&self, entry: &LogEntry, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let channel = match &entry.channel {
            LogChannel::Error => self.paint(entry.channel.as_str(), |s| s.red().bold()),
            LogChannel::Info => self.paint(entry.channel.as_str(), |s| s.green()),
            LogChannel::Custom(label) => self.paint(label, |s| s.yellow()),
        };
        format!(
            "[{}] {} {}: {}",
            at.format("%H:%M:%S"),
            entry.sender,
            channel,
            entry.message
        )
    }

    fn format_table(&self, response: &DispatchResponse) -> String {
        let envelope = &response.envelope;
        let mut output = String::new();

        if envelope.status {
            output.push_str(&self.paint(&envelope.message, |s| s.green().bold()));
        } else {
            output.push_str(&self.paint(&envelope.message, |s| s.red().bold()));
        }
        output.push('\n');

        let body = if !envelope.status {
            match envelope.error_detail() {
                Some(detail) => format!(
                    "{} {}\n",
                    self.paint(&detail.error_code, |s| s.red()),
                    detail.message
                ),
                None => Self::pretty(&envelope.response),
            }
        } else {
            match response.channel {
                ResponseChannel::Query => self.records_section(&envelope.response),
                ResponseChannel::Describe => self.describe_section(&envelope.response),
                ResponseChannel::OrgObjectDisplay | ResponseChannel::Login => {
                    match envelope.response.as_object() {
                        Some(object) => field_value_table(object),
                        None => Self::pretty(&envelope.response),
                    }
                }
                ResponseChannel::Logout | ResponseChannel::Generic => {
                    match envelope.response.as_object() {
                        Some(object) if object.is_empty() => String::new(),
                        _ => Self::pretty(&envelope.response),
                    }
                }
            }
        };
        output.push_str(&body);

        if let Some(usage) = envelope.limit_info.and_then(|info| info.api_usage) {
            output.push_str(&format!(
                "{}\n",
                self.paint(
                    &format!("API usage: {}/{}", usage.used, usage.limit),
                    |s| s.dimmed()
                )
            ));
        }

        output
    }

    fn records_section(&self, payload: &Value) -> String {
        let records = payload
            .get("records")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let summary = format!(
            "Fetched {} of {} records",
            records.len(),
            cell_text(payload.get("totalSize"))
        );

        let mut output = format!("{}\n", self.paint(&summary, |s| s.cyan()));
        if !records.is_empty() {
            output.push_str(&records_table(records));
        }
        output
    }

    fn describe_section(&self, payload: &Value) -> String {
        let fields = payload
            .get("fields")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let name = cell_text(payload.get("name"));

        let mut output = format!(
            "{}\n",
            self.paint(&format!("{}: {} fields", name, fields.len()), |s| s.cyan())
        );
        let headers = ["Name", "Type", "Label"].map(String::from);
        let rows: Vec<Vec<String>> = fields
            .iter()
            .map(|field| {
                ["name", "type", "label"]
                    .iter()
                    .map(|key| cell_text(field.get(*key)))
                    .collect()
            })
            .collect();
        if !rows.is_empty() {
            output.push_str(&render(&headers, &rows));
        }
        output
    }

    fn pretty(value: &Value) -> String {
        let mut text = serde_json::to_string_pretty(value).unwrap_or_default();
        text.push('\n');
        text
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}
