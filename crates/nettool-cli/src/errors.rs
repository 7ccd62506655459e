use nettool_bot::error::BotError;
use std::fmt;

pub static CONFIG_ERROR: &str = "Config Error: ";
pub static BOT_ERROR: &str = "Bot Error: ";
pub static IO_ERROR: &str = "IO Error: ";

/// Failures that end a CLI run before every invocation was handled
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    ConfigError(BotError),
    /// Dispatcher setup or reply delivery failed
    BotError(BotError),
    /// Reading stdin or writing stdout failed
    IoError(String),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl From<BotError> for CliError {
    fn from(error: BotError) -> Self {
        match error {
            BotError::Config(_) | BotError::Toml(_) | BotError::Url(_) => {
                CliError::ConfigError(error)
            }
            BotError::Io(err) => CliError::IoError(err.to_string()),
            other => CliError::BotError(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::IoError(error.to_string())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigError(err) => write!(f, "{CONFIG_ERROR}{err}"),
            CliError::BotError(err) => write!(f, "{BOT_ERROR}{err}"),
            CliError::IoError(err) => write!(f, "{IO_ERROR}{err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigError(_) => exitcode::CONFIG,
            CliError::BotError(_) => exitcode::SOFTWARE,
            CliError::IoError(_) => exitcode::IOERR,
        }
    }
}

pub mod prelude {
    pub use super::{BOT_ERROR, CONFIG_ERROR, IO_ERROR};
    pub use super::{CliError, Result};
}
