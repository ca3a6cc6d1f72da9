//! Presentation layer for eforce
//!
//! This crate contains CLI definitions, the JSON-lines bridge,
//! and console output formatters.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use bridge::{BridgeLogRelay, BridgeServer, OutboundMessage};
pub use cli::commands::{Cli, Command, ExecArgs, ExecOperation, OutputFormat, PreparedOperation};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
pub use output::log_relay::ConsoleLogRelay;
