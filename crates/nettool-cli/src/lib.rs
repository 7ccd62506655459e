//! Network tool bot CLI library
//!
//! Argument parsing, configuration layering and reply printing for the
//! `nettool-cli` binary.

pub mod cli;
pub mod errors;
pub mod output;

pub use cli::{Cli, RunReport};
pub use errors::prelude::*;
pub use output::{OutputFormat, ReplyPrinter};
