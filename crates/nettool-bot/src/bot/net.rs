//! Network module
use crate::api::types::*;
use crate::config::BackendConfig;
use crate::error::{BotError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Proxy, Response, StatusCode, redirect};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use url::Url;

/// Maximum number of redirects followed towards the result image
const MAX_REDIRECTS: usize = 10;

/// Why a backend request did not produce a result.
///
/// The `Display` output is the reason shown to the chat user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Backend answered with a non-success status
    #[error("服务器返回错误")]
    ServerError(StatusCode),
    /// Deadline elapsed before the backend answered
    #[error("请求超时")]
    Timeout(Duration),
    /// Transport failure (DNS, connection refused, TLS, ...).
    /// Holds no URL, so the backend address never reaches the chat.
    #[error("{0}")]
    Network(#[source] reqwest::Error),
    /// Backend answered, but not with an image
    #[error("返回内容不是图片")]
    NotAnImage(Option<String>),
}

/// Result of one bounded backend request. Never mutated after creation.
#[derive(Debug)]
pub enum FetchOutcome {
    Success { result_url: Url },
    Failure { reason: FetchError },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// User-readable reason of a failure
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchOutcome::Success { .. } => None,
            FetchOutcome::Failure { reason } => Some(reason.to_string()),
        }
    }

    pub fn into_result(self) -> std::result::Result<Url, FetchError> {
        match self {
            FetchOutcome::Success { result_url } => Ok(result_url),
            FetchOutcome::Failure { reason } => Err(reason),
        }
    }
}

impl From<FetchError> for FetchOutcome {
    fn from(reason: FetchError) -> Self {
        FetchOutcome::Failure { reason }
    }
}

/// Executes exactly one GET per call under a hard deadline
#[derive(Debug, Clone)]
pub struct BoundedFetcher {
    client: Client,
    timeout: Duration,
    require_image: bool,
}

impl Default for BoundedFetcher {
    fn default() -> Self {
        Self::new(Client::new(), Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }
}

impl BoundedFetcher {
    /// Create a fetcher with a custom client.
    ///
    /// The client must not carry a total request timeout shorter than `timeout`,
    /// or expiring requests are reported as network failures.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            require_image: false,
        }
    }

    /// Create a fetcher from the `[backend]` configuration section
    ///
    /// ## Errors
    /// - `BotError::Config` - zero timeout
    /// - `BotError::Network` - HTTP client creation error
    pub fn from_config(cfg: &BackendConfig) -> Result<Self> {
        if cfg.timeout_ms == 0 {
            return Err(BotError::Config(
                "Backend timeout must be greater than zero".to_string(),
            ));
        }
        let timeout = Duration::from_millis(cfg.timeout_ms);
        let client = build_client(cfg, timeout)?;
        Ok(Self::new(client, timeout).with_require_image(cfg.require_image))
    }

    /// Reject successful responses whose `Content-Type` is not `image/*`
    pub fn with_require_image(mut self, require_image: bool) -> Self {
        self.require_image = require_image;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn requires_image(&self) -> bool {
        self.require_image
    }

    /// Fetch the result location for `endpoint`.
    ///
    /// The request future is bound to the deadline; when the deadline wins it is
    /// dropped, which aborts the connection, so a late answer is never observed.
    /// The body is not read: only the final URL after redirects is reported.
    #[tracing::instrument(skip(self, endpoint), fields(command = %endpoint.command(), url = %endpoint.url()))]
    pub async fn fetch(&self, endpoint: &ResolvedEndpoint) -> FetchOutcome {
        info!("Sending backend request");
        let started = Instant::now();
        let request = self.client.get(endpoint.url().clone()).send();

        let outcome = match tokio::time::timeout(self.timeout, request).await {
            Err(_) => FetchError::Timeout(self.timeout).into(),
            Ok(Err(err)) => {
                debug!(error = %err, "Transport failure");
                FetchError::Network(err.without_url()).into()
            }
            Ok(Ok(response)) => self.classify(response),
        };

        match &outcome {
            FetchOutcome::Success { result_url } => {
                info!(elapsed = ?started.elapsed(), %result_url, "Backend request succeeded")
            }
            FetchOutcome::Failure { reason } => {
                warn!(elapsed = ?started.elapsed(), error = ?reason, "Backend request failed")
            }
        }
        outcome
    }

    fn classify(&self, response: Response) -> FetchOutcome {
        let status = response.status();
        trace!("Response status: {}", status);
        if let Err(err) = validate_response(&status) {
            return err.into();
        }

        if self.require_image {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            if !is_image(content_type.as_deref()) {
                debug!(?content_type, "Rejecting non-image response");
                return FetchError::NotAnImage(content_type).into();
            }
        }

        FetchOutcome::Success {
            result_url: response.url().clone(),
        }
    }
}

/// Validate HTTP response status
fn validate_response(status: &StatusCode) -> std::result::Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        if status.is_server_error() {
            warn!("Server error: {}", status);
        } else {
            debug!("Unexpected status code: {}", status);
        }
        Err(FetchError::ServerError(*status))
    }
}

fn is_image(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

/// Build a client for the backend.
///
/// No total request timeout is set: the deadline is enforced by [`BoundedFetcher::fetch`].
/// System proxy variables are ignored, only `cfg.proxy` is used.
fn build_client(cfg: &BackendConfig, timeout: Duration) -> Result<Client> {
    let connect_timeout = Duration::from_millis(cfg.connect_timeout_ms).min(timeout);
    let mut builder = ClientBuilder::new()
        .connect_timeout(connect_timeout)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(cfg.user_agent.as_str())
        .tcp_nodelay(true)
        .use_rustls_tls();

    builder = match cfg.proxy.as_deref().map(str::trim) {
        Some(proxy) if !proxy.is_empty() => {
            debug!("Using proxy {proxy}");
            builder.proxy(Proxy::all(proxy).map_err(BotError::Network)?)
        }
        _ => builder.no_proxy(),
    };

    builder.build().map_err(BotError::Network)
}
