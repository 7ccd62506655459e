use crate::api::types::{DEFAULT_BACKEND_URL, DEFAULT_COMMAND_NAME, DEFAULT_TIMEOUT_MS};
use serde::{self, Deserialize, Serialize};
use std::borrow::Cow;

/// Environment variable holding the path of the configuration file
pub static CONFIG_PATH_ENV: &str = "NETTOOL_CONFIG";
/// Prefix of environment overrides
pub static ENV_PREFIX: &str = "NETTOOL_";

/// Configuration file
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub command: CommandConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Diagnostics backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Base URL (scheme, host, port and optional path prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline for a single backend request in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// TCP connect timeout in milliseconds, capped by `timeout_ms`
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Only report success when the backend answers with `image/*`
    #[serde(default)]
    pub require_image: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Proxy URL; the backend is reached directly when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            require_image: false,
            user_agent: default_user_agent(),
            proxy: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_connect_timeout_ms() -> u64 {
    10_000
}
fn default_user_agent() -> String {
    concat!("nettool-bot/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Chat command registration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CommandConfig {
    #[serde(default = "default_command_name")]
    pub name: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            name: default_command_name(),
        }
    }
}

fn default_command_name() -> String {
    DEFAULT_COMMAND_NAME.to_string()
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Full,
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

/// `tracing` subscriber settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub filter: Cow<'static, str>,
    #[serde(default = "default_ansi")]
    pub ansi: bool,
    #[serde(default = "default_directives")]
    pub directives: Vec<Cow<'static, str>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
            ansi: default_ansi(),
            directives: default_directives(),
        }
    }
}

fn default_filter() -> Cow<'static, str> {
    Cow::Borrowed("info")
}
fn default_ansi() -> bool {
    true
}
fn default_directives() -> Vec<Cow<'static, str>> {
    vec![Cow::Borrowed("hyper=warn"), Cow::Borrowed("reqwest=info")]
}
