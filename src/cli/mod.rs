//! Command-line interface for catalog_sync
//!
//! Argument definitions and command handlers. The binary in `main.rs` is a
//! thin shell over this module.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, GlobalArgs, StatusArgs, SyncArgs};
pub use commands::{handle_status, handle_sync};
