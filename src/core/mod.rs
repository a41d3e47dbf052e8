//! core
//!
//! The command tree.
//!
//! # Modules
//!
//! - [`command`] - Command nodes, registration and lookup
//! - [`errors`] - Registration and callback errors

pub mod command;
pub mod errors;

pub use command::{Callback, Command, UsageFn};
pub use errors::CommandError;
