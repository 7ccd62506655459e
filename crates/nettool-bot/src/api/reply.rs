//! User-facing replies and their renderings
use crate::api::resolve::ResolveError;
use crate::api::types::*;
use crate::bot::net::FetchOutcome;
use serde::Serialize;

/// How a [`Reply`] is turned into a chat message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyFormat {
    /// Plain text, images as `caption: url`
    #[default]
    Text,
    /// OneBot CQ codes (`[CQ:reply,id=..]`, `[CQ:image,file=..]`)
    Cq,
}

/// One message sent back to the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Text { text: String },
    Image { caption: String, url: String },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text { text: text.into() }
    }

    pub fn image(caption: impl Into<String>, url: impl Into<String>) -> Self {
        Reply::Image {
            caption: caption.into(),
            url: url.into(),
        }
    }

    /// Usage help for `command_name`
    pub fn help(command_name: &str) -> Self {
        let aliases = NODE_LIST_ALIASES.join("/");
        Reply::text(format!(
            "{command_name}使用帮助：\n\
             - .{command_name} curl/ping/traceroute 地址 节点\n  \
             使用指定节点，向你提供的 IP 地址，执行 curl/ping/traceroute\n\
             - .{command_name} {aliases}\n  \
             获取节点列表"
        ))
    }

    /// Validation failure explained to the user
    pub fn rejected(command_name: &str, err: &ResolveError) -> Self {
        match err {
            ResolveError::MissingSubcommand => Self::help(command_name),
            ResolveError::MissingAddress(cmd) => Reply::text(format!(
                "请输入地址！格式：{command_name} {cmd} 地址 节点"
            )),
            ResolveError::MissingNode(cmd) => Reply::text(format!(
                "请输入节点！格式：{command_name} {cmd} 地址 节点\n\
                 你可以使用\"{command_name} {}\"获取可用节点",
                NODE_LIST_ALIASES[1]
            )),
            ResolveError::UnknownCommand(_) => Reply::text(format!(
                "未知命令，请使用\"{command_name}\"查看帮助"
            )),
        }
    }

    /// Acknowledgement sent before the backend request starts
    pub fn pending(command: Command) -> Self {
        match command {
            Command::ListNodes => Reply::text("正在获取节点列表，请稍等..."),
            _ => Reply::text(format!("{command} 请求已发送，正在执行，请稍等...")),
        }
    }

    /// Final result of a backend request
    pub fn from_outcome(command: Command, outcome: FetchOutcome) -> Self {
        let label = command.result_label();
        match outcome {
            FetchOutcome::Success { result_url } => Reply::image(label, result_url),
            FetchOutcome::Failure { reason } => Reply::text(format!("{label} 获取失败：{reason}")),
        }
    }

    /// Render for the chat, optionally quoting the message being answered
    pub fn render(&self, format: ReplyFormat, quote: Option<&str>) -> String {
        let rendered = match format {
            ReplyFormat::Text => match self {
                Reply::Text { text } => text.clone(),
                Reply::Image { caption, url } => format!("{caption}：{url}"),
            },
            ReplyFormat::Cq => {
                let quote = quote
                    .map(|id| format!("[CQ:reply,id={}]", cq_escape_param(id)))
                    .unwrap_or_default();
                match self {
                    Reply::Text { text } => format!("{quote}{}", cq_escape_text(text)),
                    Reply::Image { caption, url } => format!(
                        "{quote}{}：[CQ:image,file={}]",
                        cq_escape_text(caption),
                        cq_escape_param(url)
                    ),
                }
            }
        };
        rendered.trim().to_string()
    }
}

fn cq_escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('[', "&#91;")
        .replace(']', "&#93;")
}

fn cq_escape_param(value: &str) -> String {
    cq_escape_text(value).replace(',', "&#44;")
}
