//! The network tool command
use crate::api::reply::Reply;
use crate::api::resolve::{RequestResolver, ResolveError};
use crate::bot::command::{CommandHandler, CommandStatus, Invocation, ReplySink};
use crate::bot::net::BoundedFetcher;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// Forwards `curl`/`ping`/`traceroute`/node list invocations to the backend
#[derive(Debug, Clone)]
pub struct NetworkTool {
    name: String,
    resolver: RequestResolver,
    fetcher: BoundedFetcher,
}

impl NetworkTool {
    pub fn new(name: impl Into<String>, resolver: RequestResolver, fetcher: BoundedFetcher) -> Self {
        Self {
            name: name.into(),
            resolver,
            fetcher,
        }
    }

    /// Build the command from a validated [`Config`]
    ///
    /// ## Errors
    /// - `BotError::Config` - invalid backend URL or timeout
    /// - `BotError::Network` - HTTP client creation error
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = RequestResolver::new(config.base_url()?)?;
        let fetcher = BoundedFetcher::from_config(&config.backend)?;
        Ok(Self::new(config.command.name.trim(), resolver, fetcher))
    }

    pub fn resolver(&self) -> &RequestResolver {
        &self.resolver
    }

    pub fn fetcher(&self) -> &BoundedFetcher {
        &self.fetcher
    }
}

#[async_trait]
impl CommandHandler for NetworkTool {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip(self, sink), fields(command = %self.name))]
    async fn execute(
        &self,
        invocation: &Invocation,
        sink: &dyn ReplySink,
    ) -> Result<CommandStatus> {
        let endpoint =
            match self
                .resolver
                .resolve(invocation.arg(1), invocation.arg(2), invocation.arg(3))
            {
                Ok(endpoint) => endpoint,
                Err(ResolveError::MissingSubcommand) => {
                    sink.reply(Reply::help(&self.name)).await?;
                    return Ok(CommandStatus::Handled);
                }
                Err(err) => {
                    debug!(error = %err, "Rejected invocation");
                    sink.reply(Reply::rejected(&self.name, &err)).await?;
                    return Ok(CommandStatus::Rejected);
                }
            };

        // The acknowledgement must be out before the request starts.
        sink.reply(Reply::pending(endpoint.command())).await?;

        let outcome = self.fetcher.fetch(&endpoint).await;
        let status = if outcome.is_success() {
            CommandStatus::Succeeded
        } else {
            CommandStatus::Failed
        };
        info!(?status, "Invocation finished");
        sink.reply(Reply::from_outcome(endpoint.command(), outcome))
            .await?;
        Ok(status)
    }
}
