//! core::errors
//!
//! Errors from building and running a command tree.
//!
//! # Design
//!
//! Registration errors are returned synchronously and leave the tree
//! unchanged. Parsing never fails; the only runtime error is a callback
//! returning one.

use std::error::Error as StdError;

use thiserror::Error;

/// Errors from command tree operations.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A subcommand was registered without a name.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A sibling with the same name is already registered.
    #[error("command with name '{0}' already exists")]
    DuplicateName(String),

    /// The callback selected for the invoked command failed.
    #[error("command '{command}' failed: {source}")]
    Callback {
        /// Name of the invoked (deepest active) command
        command: String,
        /// Error returned by the callback
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

impl CommandError {
    /// Check if this error was raised while registering commands.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            CommandError::InvalidCommand(_) | CommandError::DuplicateName(_)
        )
    }

    pub(crate) fn callback(command: &str, source: anyhow::Error) -> Self {
        CommandError::Callback {
            command: command.to_string(),
            source: source.into(),
        }
    }
}
