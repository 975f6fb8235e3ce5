//! CLI module
//!
//! Command-line interface for inspecting OpenAPI security.
//!
//! # Commands
//!
//! - `schemes` - List the declared security schemes
//! - `resolve` - Show the requirement alternatives of an operation
//! - `decorate` - Apply credentials to a request and print it

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
