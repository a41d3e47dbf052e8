//! ui
//!
//! Text shown to users.
//!
//! # Modules
//!
//! - [`help`] - Help pages and usage tables for commands
//! - [`output`] - Output sinks for help and notices
//! - [`wrap`] - Word wrapping for usage columns

pub mod help;
pub mod output;
pub mod wrap;
