//! CLI module
//!
//! Command-line interface for exporting the reviews of a title.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::{RunReport, Runner};
