//! Cardshot command-line library.
//!
//! Argument definitions and command handlers. The binary is in main.rs.

pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use cli::{Cli, Commands, DetectArgs};
