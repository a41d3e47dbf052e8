//! ui::help
//!
//! Help pages for commands.
//!
//! # Layout
//!
//! ```text
//! ! DEPRECATED !          (deprecated commands only)
//! <usage>
//! <description>
//! Commands:
//!   add      Add a remote.
//!   remove   Remove a remote.
//! Flags:
//!   -h, --help   Display help.
//! ```
//!
//! Sections with nothing to show are left out.

use std::fmt::Write as _;

use super::wrap::wrap;
use crate::core::Command;

/// Columns before a subcommand name.
const COMMAND_GAP: usize = 2;

/// Minimum columns between the longest subcommand name and its usage.
const COMMAND_USAGE_GAP: usize = 3;

impl Command {
    /// Table of visible subcommands, wrapped to `cols` columns (0 for no
    /// wrapping).
    pub fn command_usages_wrapped(&self, cols: usize) -> String {
        let visible: Vec<&Command> = self.visible_commands().collect();
        let max_name = visible.iter().map(|c| c.name().len()).max().unwrap_or(0);
        let indent = COMMAND_GAP + max_name + COMMAND_USAGE_GAP;

        let mut out = String::new();
        for command in visible {
            let _ = writeln!(
                out,
                "{}{}{}{}",
                " ".repeat(COMMAND_GAP),
                command.name(),
                " ".repeat(max_name - command.name().len() + COMMAND_USAGE_GAP),
                wrap(indent, cols, command.usage())
            );
        }
        out
    }

    /// Unwrapped [`Command::command_usages_wrapped`].
    pub fn command_usages(&self) -> String {
        self.command_usages_wrapped(0)
    }

    /// Flag table of this command; empty when it has no flag set.
    pub fn flag_usages_wrapped(&self, cols: usize) -> String {
        self.flags()
            .map(|flags| flags.flag_usages_wrapped(cols))
            .unwrap_or_default()
    }

    /// Unwrapped [`Command::flag_usages_wrapped`].
    pub fn flag_usages(&self) -> String {
        self.flag_usages_wrapped(0)
    }

    /// Full help page with tables wrapped to `cols` columns.
    pub fn command_usage_wrapped(&self, cols: usize) -> String {
        let mut out = String::new();
        if self.is_deprecated() {
            out.push_str("! DEPRECATED !\n");
        }
        if !self.usage().is_empty() {
            let _ = writeln!(out, "{}", self.usage());
        }
        if !self.description().is_empty() {
            let _ = writeln!(out, "{}", self.description());
        }
        if !self.commands().is_empty() {
            out.push_str("Commands:\n");
            out.push_str(&self.command_usages_wrapped(cols));
        }
        if self.flags().is_some_and(|flags| flags.has_available_flags()) {
            out.push_str("Flags:\n");
            out.push_str(&self.flag_usages_wrapped(cols));
        }
        out
    }

    /// Full help page without wrapping.
    pub fn command_usage(&self) -> String {
        self.command_usage_wrapped(0)
    }
}
