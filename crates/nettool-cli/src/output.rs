//! Reply printing for the CLI

use async_trait::async_trait;
use clap::ValueEnum;
use nettool_bot::error::{BotError, Result};
use nettool_bot::prelude::{Reply, ReplyFormat, ReplySink};
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, images as `caption：url`
    #[default]
    Text,
    /// OneBot CQ codes, quoting `--message-id`
    Cq,
    /// One JSON object per reply
    Json,
}

#[derive(Serialize)]
struct JsonReply<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<&'a str>,
    #[serde(flatten)]
    reply: &'a Reply,
}

/// Writes every reply as soon as it is produced
pub struct ReplyPrinter<W> {
    out: Mutex<W>,
    format: OutputFormat,
    message_id: Option<String>,
}

impl ReplyPrinter<std::io::Stdout> {
    pub fn stdout(format: OutputFormat, message_id: Option<String>) -> Self {
        Self::new(std::io::stdout(), format, message_id)
    }
}

impl<W: Write> ReplyPrinter<W> {
    pub fn new(out: W, format: OutputFormat, message_id: Option<String>) -> Self {
        Self {
            out: Mutex::new(out),
            format,
            message_id,
        }
    }

    pub fn format(&self, reply: &Reply) -> Result<String> {
        let quote = self.message_id.as_deref();
        match self.format {
            OutputFormat::Text => Ok(reply.render(ReplyFormat::Text, quote)),
            OutputFormat::Cq => Ok(reply.render(ReplyFormat::Cq, quote)),
            OutputFormat::Json => serde_json::to_string(&JsonReply {
                message_id: quote,
                reply,
            })
            .map_err(|e| BotError::Reply(e.to_string())),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|e| BotError::Reply(e.to_string()))
    }
}

#[async_trait]
impl<W: Write + Send> ReplySink for ReplyPrinter<W> {
    async fn reply(&self, reply: Reply) -> Result<()> {
        let line = self.format(&reply)?;
        let mut out = self
            .out
            .lock()
            .map_err(|e| BotError::Reply(e.to_string()))?;
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}
