use crate::api::resolve::ResolveError;
use crate::bot::net::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// Command arguments failed validation
    #[error("Validation Error: {0}")]
    Resolve(#[from] ResolveError),
    /// Backend request failed
    #[error("Fetch Error: {0}")]
    Fetch(#[from] FetchError),
    /// HTTP client could not be built
    #[error("Network Error: {0}")]
    Network(#[from] reqwest::Error),
    /// URL Error
    #[error("URL Error: {0}")]
    Url(#[from] url::ParseError),
    /// File System Error
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed
    #[error("Config Error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Configuration Error
    #[error("Config Error: {0}")]
    Config(String),
    /// Logging could not be initialised
    #[error("Logging Error: {0}")]
    Logging(String),
    /// Reply could not be delivered
    #[error("Reply Error: {0}")]
    Reply(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
