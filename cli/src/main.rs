//! CLI entrypoint for eforce
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use eforce_application::{
    ConnectionRegistry, DispatchOperationUseCase, FanoutLogRelay, LogRelay,
};
use eforce_domain::{Credentials, OperationRequest, SenderId};
use eforce_infrastructure::{
    ConfigLoader, FileConfig, JsonlLogRelay, SalesforceGateway, TracingLogRelay,
};
use eforce_presentation::{
    BridgeLogRelay, BridgeServer, Cli, Command, ConsoleFormatter, ConsoleLogRelay, ExecArgs,
    OutputConfig, PreparedOperation,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sender id used for requests issued by `exec`
const EXEC_SENDER: &str = "cli";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;
    info!("Starting eforce");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("{}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    // === Dependency Injection ===
    let gateway = Arc::new(SalesforceGateway::new(config.salesforce.api_version.clone())?);
    let registry = Arc::new(ConnectionRegistry::new());

    let mut relays: Vec<Arc<dyn LogRelay>> = Vec::new();
    let relay_file = cli
        .relay_log
        .clone()
        .or_else(|| config.logging.relay_file.clone().map(Into::into));
    if let Some(path) = relay_file {
        match JsonlLogRelay::new(&path) {
            Some(relay) => relays.push(Arc::new(relay)),
            None => warn!("Relay log disabled: cannot open {}", path.display()),
        }
    }

    match &command {
        Command::Bridge => {
            let (outbound, outbound_rx) = mpsc::unbounded_channel();
            for sink in log_sinks(&command) {
                match sink {
                    LogSink::Tracing => relays.push(Arc::new(TracingLogRelay)),
                    LogSink::Bridge => relays.push(Arc::new(BridgeLogRelay::new(outbound.clone()))),
                    LogSink::Console => {}
                }
            }

            let use_case = DispatchOperationUseCase::new(gateway, registry)
                .with_log_relay(Arc::new(FanoutLogRelay::new(relays)))
                .with_policy(config.dispatch_policy());
            let server =
                BridgeServer::new(use_case, config.salesforce.login_url.clone(), outbound);

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted; shutting down bridge");
                    on_signal.cancel();
                }
            });

            server
                .run(tokio::io::stdin(), tokio::io::stdout(), outbound_rx, cancel)
                .await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Exec(args) => {
            // Reject a bad statement or object name before opening a session.
            let operation = args.operation.clone().prepare()?;
            let output = OutputConfig {
                format: config.output.format.unwrap_or_default(),
                color: config.output.color,
            }
            .with_format_override(args.output.map(Into::into));
            let formatter = ConsoleFormatter::from_config(&output);
            for sink in log_sinks(&command) {
                match sink {
                    LogSink::Console => relays.push(Arc::new(ConsoleLogRelay::new(formatter))),
                    LogSink::Tracing | LogSink::Bridge => {}
                }
            }

            let use_case = DispatchOperationUseCase::new(gateway, registry)
                .with_log_relay(Arc::new(FanoutLogRelay::new(relays)))
                .with_policy(config.dispatch_policy());

            let succeeded = run_exec(args, operation, &config, &use_case, &formatter).await?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Where dispatcher log entries go, besides the optional relay file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogSink {
    /// Mirrored as tracing events on stderr
    Tracing,
    /// Sent to the interface process as `log_message` frames
    Bridge,
    /// Printed as colored lines on stderr
    Console,
}

/// Each mode gets one stderr sink, so an entry is never printed twice.
fn log_sinks(command: &Command) -> &'static [LogSink] {
    match command {
        Command::Bridge => &[LogSink::Tracing, LogSink::Bridge],
        Command::Exec(_) => &[LogSink::Console],
    }
}

/// Log in, run the requested operation, print its envelope, then log out
/// (unless the operation was the logout itself).
async fn run_exec(
    args: &ExecArgs,
    operation: PreparedOperation,
    config: &FileConfig,
    use_case: &DispatchOperationUseCase,
    formatter: &ConsoleFormatter,
) -> Result<bool> {
    let sender = SenderId::new(EXEC_SENDER);
    let login_url = args
        .url
        .clone()
        .unwrap_or_else(|| config.salesforce.login_url.clone());
    let credentials =
        Credentials::new(args.username.as_str(), args.password.as_str(), login_url)?
            .with_token(args.token.as_str());

    let login = use_case
        .execute(&sender, OperationRequest::Login(credentials))
        .await;
    if !login.envelope.status {
        println!("{}", formatter.format_response(&login));
        return Ok(false);
    }
    // The registry starts empty in exec mode, so it holds exactly this login.
    let Some(org) = use_case.registry().org_ids().await.into_iter().next() else {
        bail!("Login succeeded but no session was registered");
    };

    let request = operation.into_request(org.clone());
    let is_logout = matches!(request, OperationRequest::Logout { .. });
    let response = use_case.execute(&sender, request).await;
    println!("{}", formatter.format_response(&response));

    if !is_logout {
        use_case
            .execute(&sender, OperationRequest::Logout { org })
            .await;
    }

    Ok(response.envelope.status)
}

/// Install the tracing subscriber: stderr always, plus a daily-rolled file
/// when `--log-file` is given. Stdout stays reserved for bridge frames.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file needs a file name: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
