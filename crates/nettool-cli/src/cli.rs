use crate::errors::prelude::{CliError, Result};
use crate::output::{OutputFormat, ReplyPrinter};
use clap::{Parser, ValueHint};
use nettool_bot::config::CONFIG_PATH_ENV;
use nettool_bot::prelude::*;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Main CLI structure for the network tool command-line interface.
///
/// Positional arguments form one invocation of the network tool command,
/// exactly as they would follow the command name in a chat message.
/// With `--stdin` every input line is handled as a chat line instead.
#[derive(Parser, Debug, Default)]
#[command(
    name = "nettool-cli",
    version,
    about = "Network tool bot CLI",
    long_about = "Run 网络工具 commands (curl/ping/traceroute/节点列表) against a diagnostics backend"
)]
pub struct Cli {
    /// Command arguments, e.g. `ping example.com node1` or `节点列表`
    #[arg(value_name = "ARGS", conflicts_with = "stdin")]
    pub args: Vec<String>,

    /// Read chat lines from stdin and dispatch each of them
    #[arg(long)]
    pub stdin: bool,

    /// Path to config file (overrides NETTOOL_CONFIG)
    #[arg(short, long, value_name = "CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, value_name = "URL", value_hint = ValueHint::Url)]
    pub base_url: Option<String>,

    /// Backend request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Treat a non-image backend response as a failure
    #[arg(long)]
    pub require_image: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Id of the message being answered, quoted in CQ and JSON output
    #[arg(long, value_name = "ID")]
    pub message_id: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Tally of the invocations handled in one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub handled: usize,
    pub rejected: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub ignored: usize,
}

impl RunReport {
    pub fn record(&mut self, status: Option<CommandStatus>) {
        match status {
            Some(CommandStatus::Handled) => self.handled += 1,
            Some(CommandStatus::Rejected) => self.rejected += 1,
            Some(CommandStatus::Succeeded) => self.succeeded += 1,
            Some(CommandStatus::Failed) => self.failed += 1,
            None => self.ignored += 1,
        }
    }

    /// A failed fetch outweighs a rejected invocation
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            exitcode::UNAVAILABLE
        } else if self.rejected > 0 {
            exitcode::USAGE
        } else {
            exitcode::OK
        }
    }
}

impl Cli {
    /// Configuration from file and environment, with flags applied on top
    ///
    /// ## Errors
    /// - `CliError::ConfigError` - unreadable file or invalid value
    pub fn load_config(&self) -> Result<Config> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        let mut config = match path {
            Some(path) => Config::from_file(&path).map_err(|e| match e {
                BotError::Io(err) => CliError::ConfigError(BotError::Config(format!(
                    "Cannot read {}: {err}",
                    path.display()
                ))),
                other => other.into(),
            })?,
            None => Config::default(),
        };
        config.apply_env()?;

        if let Some(base_url) = &self.base_url {
            config.backend.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.backend.timeout_ms = timeout_ms;
        }
        if self.require_image {
            config.backend.require_image = true;
        }
        if self.verbose {
            config.logging.filter = "debug".into();
        }
        config.validate()?;
        Ok(config)
    }

    /// Dispatch the invocation(s) and print every reply
    ///
    /// ## Errors
    /// - `CliError::IoError` - stdin or stdout failure
    /// - `CliError::BotError` - dispatcher setup or reply delivery failure
    pub async fn run(&self, config: &Config) -> Result<RunReport> {
        let dispatcher = Dispatcher::from_config(config)?;
        let printer = ReplyPrinter::stdout(self.format, self.message_id.clone());
        let mut report = RunReport::default();

        if self.stdin {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                let status = dispatcher
                    .dispatch(&line, self.message_id.clone(), &printer)
                    .await?;
                report.record(status);
            }
        } else {
            let line = self.invocation_line(&config.command.name);
            debug!("Dispatching `{line}`");
            let status = dispatcher
                .dispatch(&line, self.message_id.clone(), &printer)
                .await?;
            report.record(status);
        }

        info!(?report, "Run finished");
        Ok(report)
    }

    fn invocation_line(&self, command_name: &str) -> String {
        std::iter::once(command_name)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args_and_flags() {
        let cli = Cli::try_parse_from([
            "nettool-cli",
            "--format",
            "cq",
            "--message-id",
            "42",
            "--timeout-ms",
            "500",
            "ping",
            "example.com",
            "node1",
        ])
        .unwrap();
        assert_eq!(cli.args, vec!["ping", "example.com", "node1"]);
        assert_eq!(cli.format, OutputFormat::Cq);
        assert_eq!(cli.message_id.as_deref(), Some("42"));
        assert_eq!(cli.timeout_ms, Some(500));
        assert!(!cli.stdin);
    }

    #[test]
    fn test_stdin_conflicts_with_args() {
        assert!(Cli::try_parse_from(["nettool-cli", "--stdin", "ping"]).is_err());
    }

    #[test]
    fn test_invocation_line() {
        let cli = Cli {
            args: vec!["节点列表".into()],
            ..Cli::default()
        };
        assert_eq!(cli.invocation_line("网络工具"), "网络工具 节点列表");
        assert_eq!(Cli::default().invocation_line("网络工具"), "网络工具");
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli {
            base_url: Some("http://10.1.2.3:8080".into()),
            timeout_ms: Some(1234),
            require_image: true,
            verbose: true,
            ..Cli::default()
        };
        let config = cli.load_config().unwrap();
        assert_eq!(config.backend.base_url, "http://10.1.2.3:8080");
        assert_eq!(config.backend.timeout_ms, 1234);
        assert!(config.backend.require_image);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_invalid_flag_value_is_config_error() {
        let cli = Cli {
            base_url: Some("ftp://10.1.2.3".into()),
            ..Cli::default()
        };
        let err = cli.load_config().unwrap_err();
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }

    #[test]
    fn test_report_exit_code() {
        let mut report = RunReport::default();
        report.record(None);
        report.record(Some(CommandStatus::Succeeded));
        assert_eq!(report.exit_code(), exitcode::OK);
        report.record(Some(CommandStatus::Rejected));
        assert_eq!(report.exit_code(), exitcode::USAGE);
        report.record(Some(CommandStatus::Failed));
        assert_eq!(report.exit_code(), exitcode::UNAVAILABLE);
    }
}
