//! Commonly used imports and re-exports.
pub use crate::api::reply::*;
pub use crate::api::resolve::*;
pub use crate::api::types::*;
pub use crate::bot::command::*;
pub use crate::bot::net::{BoundedFetcher, FetchError, FetchOutcome};
pub use crate::bot::nettool::NetworkTool;
pub use crate::bot::*;
pub use crate::config::{BackendConfig, CommandConfig, Config, LogFormat, LoggingConfig};
pub use crate::error::*;
