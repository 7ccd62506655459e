#![forbid(unsafe_code)]
//! # Network tool bot
//! Command bridge between a chat bot and a network diagnostics backend.
//!
//! A chat invocation such as `网络工具 ping example.com node1` is validated and
//! resolved into a backend URL ([`RequestResolver`]), fetched once under a hard
//! deadline ([`BoundedFetcher`]) and relayed back as an image reply.
//! Asynchronous requests are based on [`reqwest`] and [`tokio`].
//!
//! ```no_run
//! use nettool_bot::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     let dispatcher = Dispatcher::from_config(&config)?;
//!     let sink = MemorySink::default();
//!     dispatcher.dispatch("网络工具 节点列表", None, &sink).await?;
//!     for reply in sink.replies().await {
//!         println!("{}", reply.render(ReplyFormat::Text, None));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`reqwest`]: https://docs.rs/reqwest
//! [`tokio`]: https://docs.rs/tokio

pub mod bot;
pub mod config;
pub mod error;
pub mod logging;
pub mod prelude;
/// Backend request model
pub mod api {
    pub mod reply;
    pub mod resolve;
    pub mod types;
}

pub use self::api::resolve::RequestResolver;
pub use self::bot::Dispatcher;
pub use self::bot::net::BoundedFetcher;
