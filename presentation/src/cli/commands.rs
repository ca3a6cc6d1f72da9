//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use eforce_domain::{
    DomainError, OperationRequest, OrgId, SObjectName, SoqlQuery, SoslSearch,
};
use std::path::PathBuf;

/// Output format for rendered envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON envelope
    Raw,
    /// Tables for records, org details and describe fields
    Table,
}

impl From<OutputFormat> for eforce_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Raw => eforce_domain::OutputFormat::Raw,
            OutputFormat::Table => eforce_domain::OutputFormat::Table,
        }
    }
}

/// CLI arguments for eforce
#[derive(Parser, Debug)]
#[command(name = "eforce")]
#[command(author, version, about = "Salesforce session broker - login, query, search, describe")]
#[command(long_about = r#"
eforce keeps authenticated Salesforce sessions keyed by organization id and
executes query, search, describe and organization-explore operations against
them, answering each with a {status, message, response, limitInfo} envelope.

Modes:
  bridge   Serve JSON-lines requests on stdin, answer on stdout
  exec     Log in, run one operation, print the result

Configuration files are loaded from (in priority order):
1. EFORCE_* environment variables (e.g. EFORCE_SALESFORCE__API_VERSION=60.0)
2. --config <path>     Explicit config file
3. ./eforce.toml       Project-level config
4. ~/.config/eforce/config.toml   Global config

Example:
  eforce bridge
  eforce exec -u admin@acme.com -p secret -t TOKEN query "SELECT Id, Name FROM Account"
  eforce exec -u admin@acme.com -p secret --url https://test.salesforce.com org-explore
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file (rotated daily)
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Append relayed log entries to this JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub relay_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve JSON-lines requests on stdin/stdout
    Bridge,
    /// Log in, run one operation and print the envelope
    Exec(ExecArgs),
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Login username
    #[arg(short, long)]
    pub username: String,

    /// Login password
    #[arg(short, long)]
    pub password: String,

    /// Security token appended to the password
    #[arg(short, long, default_value = "")]
    pub token: String,

    /// Login endpoint (defaults to salesforce.login_url from config)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Output format (defaults to output.format from config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub operation: ExecOperation,
}

/// Operation to run after login
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ExecOperation {
    /// Run a SOQL query
    Query { soql: String },
    /// Run a SOSL search
    Search { sosl: String },
    /// Describe an object type
    Describe { sobject: String },
    /// Fetch every field of the Organization record
    OrgExplore,
    /// Invalidate the session
    Logout,
}

impl ExecOperation {
    /// Validate the statement or object name. Runs before login so a bad
    /// argument never leaves a session open on the remote side.
    pub fn prepare(self) -> Result<PreparedOperation, DomainError> {
        Ok(match self {
            ExecOperation::Query { soql } => PreparedOperation::Query(SoqlQuery::new(soql)?),
            ExecOperation::Search { sosl } => PreparedOperation::Search(SoslSearch::new(sosl)?),
            ExecOperation::Describe { sobject } => {
                PreparedOperation::Describe(SObjectName::new(sobject)?)
            }
            ExecOperation::OrgExplore => PreparedOperation::OrgExplore,
            ExecOperation::Logout => PreparedOperation::Logout,
        })
    }
}

/// A validated [`ExecOperation`] waiting for the organization to target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedOperation {
    Query(SoqlQuery),
    Search(SoslSearch),
    Describe(SObjectName),
    OrgExplore,
    Logout,
}

impl PreparedOperation {
    /// Build the request for the organization that was just logged in to.
    pub fn into_request(self, org: OrgId) -> OperationRequest {
        match self {
            PreparedOperation::Query(soql) => OperationRequest::Query { org, soql },
            PreparedOperation::Search(sosl) => OperationRequest::Search { org, sosl },
            PreparedOperation::Describe(sobject) => OperationRequest::Describe { org, sobject },
            PreparedOperation::OrgExplore => OperationRequest::OrgExplore { org },
            PreparedOperation::Logout => OperationRequest::Logout { org },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_exec_query() {
        let cli = Cli::try_parse_from([
            "eforce",
            "-vv",
            "exec",
            "-u",
            "admin@acme.com",
            "-p",
            "secret",
            "--output",
            "raw",
            "query",
            "SELECT Id FROM Account",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Some(Command::Exec(args)) = cli.command else {
            panic!("expected exec");
        };
        assert_eq!(args.username, "admin@acme.com");
        assert_eq!(args.token, "");
        assert_eq!(args.output, Some(OutputFormat::Raw));
        assert_eq!(
            args.operation,
            ExecOperation::Query {
                soql: "SELECT Id FROM Account".to_string()
            }
        );
    }

    #[test]
    fn test_prepare_validates_before_any_org_is_known() {
        let err = ExecOperation::Describe {
            sobject: "Account; DROP".to_string(),
        }
        .prepare()
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidObjectName(_)));

        let err = ExecOperation::Query {
            soql: "   ".to_string(),
        }
        .prepare()
        .unwrap_err();
        assert_eq!(err, DomainError::EmptyStatement("SOQL"));
    }

    #[test]
    fn test_prepared_operation_targets_the_org() {
        let org = OrgId::new("00DACME").unwrap();
        let request = ExecOperation::OrgExplore
            .prepare()
            .unwrap()
            .into_request(org.clone());
        assert_eq!(request, OperationRequest::OrgExplore { org: org.clone() });

        let request = ExecOperation::Describe {
            sobject: "Account".to_string(),
        }
        .prepare()
        .unwrap()
        .into_request(org.clone());
        assert_eq!(
            request,
            OperationRequest::Describe {
                org,
                sobject: SObjectName::new("Account").unwrap(),
            }
        );
    }

    #[test]
    fn test_bridge_takes_no_arguments() {
        let cli = Cli::try_parse_from(["eforce", "bridge"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Bridge)));
    }
}
