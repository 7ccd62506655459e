//! Mapping of raw command arguments onto backend endpoints
use crate::api::types::*;
use crate::error::{BotError, Result};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Validation failure of a single invocation. No request is made for any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("subcommand is missing")]
    MissingSubcommand,
    #[error("address is missing for `{0}`")]
    MissingAddress(Command),
    #[error("node is missing for `{0}`")]
    MissingNode(Command),
    #[error("unknown subcommand `{0}`")]
    UnknownCommand(String),
}

impl DiagnosticRequest {
    /// Validate raw, untrimmed user tokens
    ///
    /// ## Errors
    /// - `ResolveError::MissingSubcommand` - subcommand is blank
    /// - `ResolveError::MissingAddress` - address is blank for curl/ping/traceroute
    /// - `ResolveError::MissingNode` - node is blank for curl/ping/traceroute
    /// - `ResolveError::UnknownCommand` - subcommand is not recognised
    pub fn parse(
        subcommand: &str,
        address: &str,
        node: &str,
    ) -> std::result::Result<Self, ResolveError> {
        let subcommand = subcommand.trim().to_lowercase();
        if subcommand.is_empty() {
            return Err(ResolveError::MissingSubcommand);
        }
        let command = Command::from_normalized(&subcommand)
            .ok_or(ResolveError::UnknownCommand(subcommand))?;

        if !command.requires_target() {
            return Ok(Self {
                command,
                target: None,
            });
        }

        let address = address.trim();
        if address.is_empty() {
            return Err(ResolveError::MissingAddress(command));
        }
        let node = node.trim();
        if node.is_empty() {
            return Err(ResolveError::MissingNode(command));
        }

        Ok(Self {
            command,
            target: Some(Target {
                address: address.to_string(),
                node: node.to_string(),
            }),
        })
    }
}

/// Builds backend URLs against a base URL fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResolver {
    base_url: Url,
}

impl RequestResolver {
    /// Create a resolver for the backend at `base_url`
    ///
    /// ## Errors
    /// - `BotError::Config` - base URL is not http(s), or carries a query or fragment
    pub fn new(base_url: Url) -> Result<Self> {
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(BotError::Config(format!(
                "Backend URL must be an http or https base URL: {base_url}"
            )));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(BotError::Config(format!(
                "Backend URL must not carry a query or fragment: {base_url}"
            )));
        }
        Ok(Self { base_url })
    }

    /// Parse `base_url` and create a resolver
    ///
    /// ## Errors
    /// - `BotError::Url` - URL parsing error
    /// - `BotError::Config` - see [`RequestResolver::new`]
    pub fn parse(base_url: &str) -> Result<Self> {
        Self::new(Url::parse(base_url)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Validate raw tokens and compose the backend URL in one step
    pub fn resolve(
        &self,
        subcommand: &str,
        address: &str,
        node: &str,
    ) -> std::result::Result<ResolvedEndpoint, ResolveError> {
        let request = DiagnosticRequest::parse(subcommand, address, node)?;
        Ok(self.endpoint(&request))
    }

    /// Compose the backend URL for an already validated request
    pub fn endpoint(&self, request: &DiagnosticRequest) -> ResolvedEndpoint {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{}", request.command.path()));

        match &request.target {
            Some(target) => {
                url.query_pairs_mut()
                    .append_pair("address", &target.address)
                    .append_pair("node", &target.node);
            }
            None => url.set_query(None),
        }

        debug!(command = %request.command, %url, "Resolved backend endpoint");
        ResolvedEndpoint {
            command: request.command,
            url,
        }
    }
}
