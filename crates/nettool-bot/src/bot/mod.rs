pub mod command;
pub mod net;
pub mod nettool;

use crate::config::Config;
use crate::error::Result;
use command::{CommandStatus, CommandTable, ReplySink};
use nettool::NetworkTool;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
/// Routes chat lines to the commands of a [`CommandTable`]
/// - `table`: [`CommandTable`] - commands, built once at startup and never mutated afterwards
pub struct Dispatcher {
    table: Arc<CommandTable>,
}

impl Dispatcher {
    pub fn new(table: CommandTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Dispatcher with the network tool registered under the configured name
    ///
    /// ## Errors
    /// - `BotError::Config` - invalid configuration
    /// - `BotError::Network` - HTTP client creation error
    pub fn from_config(config: &Config) -> Result<Self> {
        let table = CommandTable::new().with(Arc::new(NetworkTool::from_config(config)?))?;
        Ok(Self::new(table))
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Handle one chat line.
    ///
    /// Returns `None` when the line does not address a registered command.
    ///
    /// ## Errors
    /// - `BotError::Reply` - a reply could not be delivered
    #[tracing::instrument(skip(self, sink))]
    pub async fn dispatch(
        &self,
        line: &str,
        message_id: Option<String>,
        sink: &dyn ReplySink,
    ) -> Result<Option<CommandStatus>> {
        let Some((handler, invocation)) = self.table.parse_line(line, message_id) else {
            debug!("Ignoring line without a registered command");
            return Ok(None);
        };

        match handler.execute(&invocation, sink).await {
            Ok(status) => Ok(Some(status)),
            Err(err) => {
                warn!("Command `{}` failed: {}", handler.name(), err);
                Err(err)
            }
        }
    }
}
