//! Chat command table
use crate::api::reply::Reply;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Prefixes a chat line may start with before the command name
pub const COMMAND_PREFIXES: [char; 3] = ['.', '。', '/'];

/// Arguments of one chat command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Id of the chat message being answered, quoted in replies
    pub message_id: Option<String>,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(message_id: Option<String>, args: Vec<String>) -> Self {
        Self { message_id, args }
    }

    /// 1-based argument, empty when absent
    pub fn arg(&self, n: usize) -> &str {
        n.checked_sub(1)
            .and_then(|i| self.args.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Informational reply only (help)
    Handled,
    /// Arguments were rejected, no backend request made
    Rejected,
    /// Backend request succeeded
    Succeeded,
    /// Backend request failed
    Failed,
}

/// Destination of the replies of one invocation
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, reply: Reply) -> Result<()>;
}

/// Sink keeping replies in memory, in delivery order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    replies: Arc<Mutex<Vec<Reply>>>,
}

impl MemorySink {
    pub async fn replies(&self) -> Vec<Reply> {
        self.replies.lock().await.clone()
    }
}

#[async_trait]
impl ReplySink for MemorySink {
    async fn reply(&self, reply: Reply) -> Result<()> {
        self.replies.lock().await.push(reply);
        Ok(())
    }
}

/// A chat command
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Name the command is invoked by
    fn name(&self) -> &str;

    /// Run the command, sending every reply through `sink`
    async fn execute(&self, invocation: &Invocation, sink: &dyn ReplySink)
    -> Result<CommandStatus>;
}

/// Commands known to the bot, assembled once at startup
#[derive(Clone, Default)]
pub struct CommandTable {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler under its own name
    ///
    /// ## Errors
    /// - `BotError::Config` - name is empty or already taken
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<()> {
        let name = handler.name().trim().to_string();
        if name.is_empty() {
            return Err(BotError::Config("Command name must not be empty".to_string()));
        }
        if self.handlers.contains_key(&name) {
            return Err(BotError::Config(format!(
                "Command `{name}` is already registered"
            )));
        }
        debug!("Registered command `{}`", name);
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Builder-style [`CommandTable::register`]
    pub fn with(mut self, handler: Arc<dyn CommandHandler>) -> Result<Self> {
        self.register(handler)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Split a chat line into a registered handler and its arguments.
    ///
    /// A leading `.`, `。` or `/` is accepted. Lines whose first word is not a
    /// registered command yield `None`.
    pub fn parse_line(
        &self,
        line: &str,
        message_id: Option<String>,
    ) -> Option<(Arc<dyn CommandHandler>, Invocation)> {
        let line = line.trim_start();
        let line = line.strip_prefix(COMMAND_PREFIXES).unwrap_or(line);
        let mut words = line.split_whitespace();
        let handler = self.get(words.next()?)?;
        let args = words.map(str::to_string).collect();
        Some((handler, Invocation::new(message_id, args)))
    }
}
