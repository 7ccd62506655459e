//! Types shared by the resolver, the fetcher and the command handlers
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Target name used for `tracing` filter directives
pub const SERVICE_NAME: &str = "nettool_bot";
/// Backend address when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:48081";
/// Deadline for a single backend request
pub const DEFAULT_TIMEOUT_MS: u64 = 40_000;
/// Chat command the bridge answers to
pub const DEFAULT_COMMAND_NAME: &str = "网络工具";
/// Accepted spellings of the node list subcommand
pub const NODE_LIST_ALIASES: [&str; 2] = ["节点", "节点列表"];

pub const CURL_PATH: &str = "/curl_ping_test";
pub const PING_PATH: &str = "/ping";
pub const TRACEROUTE_PATH: &str = "/traceroute";
pub const NODES_IMAGE_PATH: &str = "/nodes_image";

/// Backend operation selected by the first command argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Curl,
    Ping,
    Traceroute,
    ListNodes,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::Curl,
        Command::Ping,
        Command::Traceroute,
        Command::ListNodes,
    ];

    /// Match an already normalized (trimmed, lowercased) subcommand
    pub fn from_normalized(subcommand: &str) -> Option<Self> {
        match subcommand {
            "curl" => Some(Command::Curl),
            "ping" => Some(Command::Ping),
            "traceroute" => Some(Command::Traceroute),
            s if NODE_LIST_ALIASES.contains(&s) => Some(Command::ListNodes),
            _ => None,
        }
    }

    /// Backend path serving this command
    pub fn path(&self) -> &'static str {
        match self {
            Command::Curl => CURL_PATH,
            Command::Ping => PING_PATH,
            Command::Traceroute => TRACEROUTE_PATH,
            Command::ListNodes => NODES_IMAGE_PATH,
        }
    }

    /// Whether the command needs an address and a node
    pub fn requires_target(&self) -> bool {
        !matches!(self, Command::ListNodes)
    }

    /// Caption used for the result reply
    pub fn result_label(&self) -> String {
        match self {
            Command::ListNodes => self.to_string(),
            _ => format!("{self} 结果"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Curl => write!(f, "curl"),
            Command::Ping => write!(f, "ping"),
            Command::Traceroute => write!(f, "traceroute"),
            Command::ListNodes => write!(f, "节点列表"),
        }
    }
}

/// Validated command arguments.
///
/// `address` and `node` are present exactly when [`Command::requires_target`]
/// holds, and are already trimmed. Their content is not inspected; the backend
/// rejects malformed values itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRequest {
    pub(crate) command: Command,
    pub(crate) target: Option<Target>,
}

/// Address and vantage node of a diagnostic run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub address: String,
    pub node: String,
}

impl DiagnosticRequest {
    pub fn command(&self) -> Command {
        self.command
    }

    pub fn address(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.address.as_str())
    }

    pub fn node(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.node.as_str())
    }
}

/// Fully composed backend URL for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub(crate) command: Command,
    pub(crate) url: Url,
}

impl ResolvedEndpoint {
    pub fn command(&self) -> Command {
        self.command
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
