//! memos-session command line front end
//!
//! This module exposes the CLI components for use in integration tests.

mod cli;
mod commands;

pub use cli::{Cli, Command};
pub use commands::{build_adapter, run};
