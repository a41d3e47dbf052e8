//! core::command
//!
//! The command node.
//!
//! # Structure
//!
//! A [`Command`] owns its flag set and its subcommands. Subcommands are kept
//! in registration order; that order is the tie-break whenever two names
//! could match. The root of a tree has an empty name.
//!
//! # Invariants
//!
//! - Sibling names are unique and non-empty
//! - A rejected registration leaves the tree unchanged
//! - Parsing never adds or removes commands; it only sets `active` flags and
//!   flag values
//!
//! # Example
//!
//! ```
//! use cmdtree::core::Command;
//! use cmdtree::flags::{Flag, FlagSet};
//!
//! let mut root = Command::root();
//! let foo = root
//!     .command("foo", "Foo command.", Some(FlagSet::new("foo").with(Flag::int("n", 1)).unwrap()))
//!     .unwrap();
//! foo.command("bar", "Bar command.", None).unwrap();
//!
//! root.parse(&["prog", "foo", "--n", "3", "bar"]);
//!
//! let foo = root.lookup("foo").unwrap();
//! assert!(foo.is_active());
//! assert!(foo.active("bar"));
//! assert_eq!(foo.flags().unwrap().get_int("n"), Ok(3));
//! ```

use std::fmt;
use std::sync::Arc;

use super::errors::CommandError;
use crate::flags::FlagSet;
use crate::ui::output::Output;

/// Function run for the invoked command.
///
/// It receives the deepest active command and that command's flag set, even
/// when the callback was registered on an ancestor.
pub type Callback = Arc<dyn Fn(&Command, &FlagSet) -> anyhow::Result<()> + Send + Sync>;

/// Function that prints help for a command to the given output.
pub type UsageFn = Arc<dyn Fn(&Command, &Output) + Send + Sync>;

/// A node in the command tree.
///
/// Cloning copies the whole subtree; callbacks and help functions are shared.
#[derive(Default, Clone)]
pub struct Command {
    pub(crate) name: String,
    usage: String,
    description: String,
    pub(crate) flags: Option<FlagSet>,
    pub(crate) commands: Vec<Command>,
    pub(crate) active: bool,
    hidden: bool,
    deprecated: bool,
    recurse_arguments: bool,
    callback: Option<Callback>,
    usage_fn: Option<UsageFn>,
    output: Option<Output>,
}

impl Command {
    /// Create a command for use with [`Command::add_command`].
    ///
    /// A root command has an empty name; a non-empty root name must match
    /// the first token when parsing.
    pub fn new(name: impl Into<String>, usage: impl Into<String>, flags: Option<FlagSet>) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            flags,
            ..Self::default()
        }
    }

    /// Create an anonymous root command.
    pub fn root() -> Self {
        Self::default()
    }

    /// Register `command` as a subcommand.
    ///
    /// # Errors
    ///
    /// - `CommandError::InvalidCommand` if the command has an empty name
    /// - `CommandError::DuplicateName` if a sibling with that name exists
    pub fn add_command(&mut self, command: Command) -> Result<&mut Command, CommandError> {
        if command.name.is_empty() {
            return Err(CommandError::InvalidCommand(
                "subcommand name cannot be empty".into(),
            ));
        }
        if self.lookup(&command.name).is_some() {
            return Err(CommandError::DuplicateName(command.name));
        }
        self.commands.push(command);
        let last = self.commands.len() - 1;
        Ok(&mut self.commands[last])
    }

    /// Create a subcommand and register it.
    ///
    /// Returns the new command so further subcommands can be chained onto it.
    pub fn command(
        &mut self,
        name: impl Into<String>,
        usage: impl Into<String>,
        flags: Option<FlagSet>,
    ) -> Result<&mut Command, CommandError> {
        self.add_command(Command::new(name, usage, flags))
    }

    /// Find a direct subcommand by name. Lookup is not recursive.
    pub fn lookup(&self, name: &str) -> Option<&Command> {
        if name.is_empty() {
            return None;
        }
        self.commands.iter().find(|c| c.name == name)
    }

    /// Mutable [`Command::lookup`].
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Command> {
        if name.is_empty() {
            return None;
        }
        self.commands.iter_mut().find(|c| c.name == name)
    }

    /// Report whether the direct subcommand `name` was activated.
    ///
    /// Unknown names are reported as inactive.
    pub fn active(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Command::is_active)
    }

    /// The name matched against tokens; empty for a root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line summary shown in the parent's command list.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Long description shown on this command's help page.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the long description shown on the help page.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// The flag set, if one was given or created by a parse.
    pub fn flags(&self) -> Option<&FlagSet> {
        self.flags.as_ref()
    }

    /// Mutable access to the flag set.
    pub fn flags_mut(&mut self) -> Option<&mut FlagSet> {
        self.flags.as_mut()
    }

    /// Replace the flag set.
    pub fn set_flags(&mut self, flags: FlagSet) {
        self.flags = Some(flags);
    }

    /// Subcommands in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Subcommands that are listed in help output.
    pub fn visible_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| !c.hidden)
    }

    /// Report whether this command was matched by the last parse.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Check if the command is left out of help output.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Check if the command prints a deprecation notice when run.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Keep the command working but leave it out of help output.
    pub fn mark_hidden(&mut self) {
        self.hidden = true;
    }

    /// Mark the command deprecated. It keeps working, prints a notice when
    /// run, and is hidden from help output.
    pub fn mark_deprecated(&mut self) {
        self.hidden = true;
        self.deprecated = true;
    }

    /// Check if arguments are replayed to ancestors.
    pub fn recurses_arguments(&self) -> bool {
        self.recurse_arguments
    }

    /// Replay this command's arguments through every ancestor's flag set.
    pub fn set_recurse_arguments(&mut self, recurse: bool) {
        self.recurse_arguments = recurse;
    }

    /// The callback set on this command itself.
    pub fn callback(&self) -> Option<&Callback> {
        self.callback.as_ref()
    }

    /// Set the function run when this command, or a descendant without its
    /// own callback, is invoked.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: Fn(&Command, &FlagSet) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
    }

    /// The help printer set on this command itself.
    pub fn usage_fn(&self) -> Option<&UsageFn> {
        self.usage_fn.as_ref()
    }

    /// Override how help is printed for this command.
    pub fn set_usage_fn<F>(&mut self, usage_fn: F)
    where
        F: Fn(&Command, &Output) + Send + Sync + 'static,
    {
        self.usage_fn = Some(Arc::new(usage_fn));
    }

    /// The sink set on this command itself; ancestors are not consulted.
    pub fn output(&self) -> Option<&Output> {
        self.output.as_ref()
    }

    /// Set where usage and deprecation text for this command and its
    /// descendants goes.
    pub fn set_output(&mut self, output: Output) {
        self.output = Some(output);
    }

    /// Clear the `active` flag on this command and all descendants.
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        for command in &mut self.commands {
            command.deactivate();
        }
    }

    /// Follow a path of subcommand indices from this command.
    pub(crate) fn descend(&self, path: &[usize]) -> Option<&Command> {
        path.iter()
            .try_fold(self, |command, &idx| command.commands.get(idx))
    }

    pub(crate) fn descend_mut(&mut self, path: &[usize]) -> Option<&mut Command> {
        path.iter()
            .try_fold(self, |command, &idx| command.commands.get_mut(idx))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("active", &self.active)
            .field("hidden", &self.hidden)
            .field("deprecated", &self.deprecated)
            .field("recurse_arguments", &self.recurse_arguments)
            .field("has_callback", &self.callback.is_some())
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}
