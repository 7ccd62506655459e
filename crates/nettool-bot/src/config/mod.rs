pub mod types;
use crate::error::{BotError, Result};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;
use url::Url;
pub use types::{
    BackendConfig, CONFIG_PATH_ENV, CommandConfig, Config, ENV_PREFIX, LogFormat, LoggingConfig,
};

impl Config {
    /// Load configuration from the file named by `NETTOOL_CONFIG` (defaults when unset),
    /// then apply environment overrides and validate
    ///
    /// ## Errors
    /// - `BotError::Io` - configured file cannot be read
    /// - `BotError::Toml` - file is not valid TOML for [`Config`]
    /// - `BotError::Config` - invalid override or value
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV);
        Self::load_from(path.as_deref().map(Path::new))
    }

    /// Same as [`Config::load`] with an explicit file path
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str::<Config>(raw).map_err(|e| e.into())
    }

    /// Overlay `NETTOOL_*` environment variables
    ///
    /// ## Errors
    /// - `BotError::Config` - variable is set but cannot be parsed
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = env_var("BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(timeout) = env_var("TIMEOUT_MS") {
            self.backend.timeout_ms = parse_env("TIMEOUT_MS", &timeout)?;
        }
        if let Some(require_image) = env_var("REQUIRE_IMAGE") {
            self.backend.require_image = parse_env("REQUIRE_IMAGE", &require_image)?;
        }
        if let Some(proxy) = env_var("PROXY") {
            self.backend.proxy = Some(proxy);
        }
        if let Some(filter) = env_var("LOG_FILTER") {
            self.logging.filter = Cow::Owned(filter);
        }
        if let Some(format) = env_var("LOG_FORMAT") {
            self.logging.format = format.parse().map_err(BotError::Config)?;
        }
        Ok(())
    }

    /// Check values that serde cannot check
    ///
    /// ## Errors
    /// - `BotError::Config` - invalid base URL, zero timeout or empty command name
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BotError::Config(format!(
                "Backend URL must use http or https: {url}"
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(BotError::Config(format!(
                "Backend URL must not carry a query or fragment: {url}"
            )));
        }
        if self.backend.timeout_ms == 0 {
            return Err(BotError::Config(
                "Backend timeout must be greater than zero".to_string(),
            ));
        }
        if self.command.name.trim().is_empty() || self.command.name.contains(char::is_whitespace)
        {
            return Err(BotError::Config(
                "Command name must be a single non-empty word".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed backend base URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(self.backend.base_url.trim()).map_err(|e| {
            BotError::Config(format!(
                "Invalid backend URL `{}`: {e}",
                self.backend.base_url
            ))
        })
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BotError::Config(e.to_string()))
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        BotError::Config(format!("Invalid value for {ENV_PREFIX}{key} `{value}`: {e}"))
    })
}
