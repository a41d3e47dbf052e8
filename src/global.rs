//! global
//!
//! Command registries and the process-wide default one.
//!
//! # Design
//!
//! A [`Registry`] owns an anonymous root command together with the settings
//! that apply to the whole tree: a fallback callback, a help function
//! override and [`Config`]. Programs that do not want to pass a tree around
//! use the free functions of this module, which forward to one registry
//! shared by the process.
//!
//! The default registry sits behind a mutex. [`parse`] and [`execute`]
//! resolve under the lock, then release it before printing help or running
//! a callback, so user code may call back into this module. Such code sees
//! a copy of the invoked command; changes it makes to the registry do not
//! show up in the [`Command`] it was handed.
//!
//! # Example
//!
//! ```no_run
//! use cmdtree::flags::{Flag, FlagSet};
//! use cmdtree::global;
//!
//! global::command("serve", "Start the server.", None).unwrap();
//! let flags = FlagSet::new("app").with(Flag::bool("verbose", false)).unwrap();
//! let args: Vec<String> = std::env::args().collect();
//! global::parse(&args, Some(flags));
//!
//! if global::active("serve") {
//!     // ...
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::config::Config;
use crate::core::{Callback, Command, CommandError, UsageFn};
use crate::engine::dispatch::invoke;
use crate::engine::{Dispatched, Outcome, Parsed, Resolver};
use crate::flags::FlagSet;
use crate::ui::output::Output;

/// A command tree with its tree-wide settings.
#[derive(Default)]
pub struct Registry {
    root: Command,
    fallback: Option<Callback>,
    usage_fn: Option<UsageFn>,
    config: Config,
}

impl Registry {
    /// An empty registry with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry with the given config.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Settings used for parsing and help.
    pub fn config(&self) -> Config {
        self.config
    }

    /// The anonymous root command.
    pub fn root(&self) -> &Command {
        &self.root
    }

    /// Mutable access to the root command.
    pub fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }

    /// Register a top-level command.
    pub fn add_command(&mut self, command: Command) -> Result<&mut Command, CommandError> {
        self.root.add_command(command)
    }

    /// Create and register a top-level command.
    pub fn command(
        &mut self,
        name: impl Into<String>,
        usage: impl Into<String>,
        flags: Option<FlagSet>,
    ) -> Result<&mut Command, CommandError> {
        self.root.command(name, usage, flags)
    }

    /// Find a top-level command.
    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.root.lookup(name)
    }

    /// Follow `path` of command names from the root.
    ///
    /// An empty path yields the root.
    pub fn find_mut(&mut self, path: &[&str]) -> Option<&mut Command> {
        path.iter()
            .try_fold(&mut self.root, |command, name| command.lookup_mut(name))
    }

    /// Set the description shown on the root help page.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.root.set_description(description);
    }

    /// The root command's description.
    pub fn description(&self) -> &str {
        self.root.description()
    }

    /// Set where help and notices go for the whole tree unless a command
    /// overrides it.
    pub fn set_output(&mut self, output: Output) {
        self.root.set_output(output);
    }

    /// Replace the flags of the root command.
    pub fn set_flags(&mut self, flags: FlagSet) {
        self.root.set_flags(flags);
    }

    /// Set the callback run when no command of the chain has one.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: Fn(&Command, &FlagSet) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(callback));
    }

    /// Set the help printer used for commands without their own.
    pub fn set_usage_fn<F>(&mut self, usage_fn: F)
    where
        F: Fn(&Command, &Output) + Send + Sync + 'static,
    {
        self.usage_fn = Some(Arc::new(usage_fn));
    }

    /// Check if the root was activated by the last parse.
    pub fn is_active(&self) -> bool {
        self.root.is_active()
    }

    /// Check if the top-level command `name` was activated by the last parse.
    pub fn active(&self, name: &str) -> bool {
        self.root.active(name)
    }

    /// Resolve `args` against the tree.
    ///
    /// When `flags` is given it replaces the root's flag set first. The first
    /// token is the program path.
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S], flags: Option<FlagSet>) -> Parsed {
        let (parsed, pending) = self.prepare(args, flags);
        if let Some(Pending::Help(page)) = pending {
            page.show();
        }
        parsed
    }

    /// Parse `args` and run the callback of the invoked command, or the
    /// fallback.
    pub fn execute<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Outcome, CommandError> {
        let (parsed, pending) = self.prepare(args, None);
        if let Some(pending) = pending {
            pending.run()?;
        }
        Ok(parsed.outcome)
    }

    /// Resolve `args` without running any user code.
    ///
    /// The help page or callback the parse selected comes back detached from
    /// the tree, so it can run after the registry is released.
    pub(crate) fn prepare<S: AsRef<str>>(
        &mut self,
        args: &[S],
        flags: Option<FlagSet>,
    ) -> (Parsed, Option<Pending>) {
        if let Some(flags) = flags {
            self.root.set_flags(flags);
        }
        let parsed = Resolver::new(self.config)
            .defer_help()
            .resolve(&mut self.root, args);

        let pending = match parsed.outcome {
            Outcome::Help => parsed.chain.deepest(&self.root).map(|command| {
                Pending::Help(HelpPage {
                    command: command.clone(),
                    sink: parsed.chain.output(&self.root),
                    usage_fn: self.usage_fn.clone(),
                    config: self.config,
                })
            }),
            Outcome::Continue => {
                let selected = self.root.select(&parsed.chain, self.fallback.as_ref());
                if selected.is_none() {
                    debug!(chain = ?parsed.chain.names(&self.root), "nothing to run");
                }
                selected.map(|(selected, callback, command)| {
                    Pending::Run(Invocation {
                        selected,
                        command: command.clone(),
                        callback: Arc::clone(callback),
                    })
                })
            }
            Outcome::Skipped => None,
        };
        (parsed, pending)
    }

    /// [`Registry::execute`], exiting the process with status 0 when help
    /// was shown.
    pub fn run_or_exit<S: AsRef<str>>(&mut self, args: &[S]) -> Result<(), CommandError> {
        if self.execute(args)? == Outcome::Help {
            std::process::exit(0);
        }
        Ok(())
    }

    /// Drop every command and override, keeping the config.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }
}

/// User code selected by a parse, holding its own copy of the command.
pub(crate) enum Pending {
    Help(HelpPage),
    Run(Invocation),
}

impl Pending {
    fn run(self) -> Result<Dispatched, CommandError> {
        match self {
            Pending::Help(page) => {
                page.show();
                Ok(Dispatched::Nothing)
            }
            Pending::Run(invocation) => invocation.run(),
        }
    }
}

pub(crate) struct HelpPage {
    command: Command,
    sink: Output,
    usage_fn: Option<UsageFn>,
    config: Config,
}

impl HelpPage {
    fn show(self) {
        Resolver::new(self.config)
            .with_usage_fn(self.usage_fn.as_ref())
            .show_help(&self.command, &self.sink);
    }
}

pub(crate) struct Invocation {
    selected: Dispatched,
    command: Command,
    callback: Callback,
}

impl Invocation {
    fn run(self) -> Result<Dispatched, CommandError> {
        invoke(&self.callback, &self.command)?;
        Ok(self.selected)
    }
}

static REGISTRY: Lazy<Mutex<Registry>> =
    Lazy::new(|| Mutex::new(Registry::with_config(Config::from_env())));

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` with exclusive access to the default registry.
pub fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut registry())
}

/// Run `f` on the command at `path` (command names from the root).
///
/// Returns `None` when the path does not exist.
pub fn with_command<R>(path: &[&str], f: impl FnOnce(&mut Command) -> R) -> Option<R> {
    registry().find_mut(path).map(f)
}

/// Register a top-level command with the default registry.
pub fn add_command(command: Command) -> Result<(), CommandError> {
    registry().add_command(command).map(|_| ())
}

/// Create and register a top-level command with the default registry.
///
/// Use [`with_command`] to add subcommands to it.
pub fn command(
    name: impl Into<String>,
    usage: impl Into<String>,
    flags: Option<FlagSet>,
) -> Result<(), CommandError> {
    registry().command(name, usage, flags).map(|_| ())
}

/// Set the description of the default registry's root.
pub fn set_description(description: impl Into<String>) {
    registry().set_description(description);
}

/// The description of the default registry's root.
pub fn description() -> String {
    registry().description().to_string()
}

/// Set where help and notices of the default registry go.
pub fn set_output(output: Output) {
    registry().set_output(output);
}

/// Replace the application flags of the default registry.
pub fn set_flags(flags: FlagSet) {
    registry().set_flags(flags);
}

/// Set the fallback callback of the default registry.
pub fn set_callback<F>(callback: F)
where
    F: Fn(&Command, &FlagSet) -> anyhow::Result<()> + Send + Sync + 'static,
{
    registry().set_callback(callback);
}

/// Set the help printer of the default registry.
pub fn set_usage_fn<F>(usage_fn: F)
where
    F: Fn(&Command, &Output) + Send + Sync + 'static,
{
    registry().set_usage_fn(usage_fn);
}

/// Check if the last parse matched the default registry's root.
pub fn is_active() -> bool {
    registry().is_active()
}

/// Check if the top-level command `name` was activated by the last parse.
pub fn active(name: &str) -> bool {
    registry().active(name)
}

/// Check if a top-level command is registered.
pub fn contains(name: &str) -> bool {
    registry().lookup(name).is_some()
}

/// Help page of the root, wrapped to the configured width.
pub fn command_usage() -> String {
    let registry = registry();
    registry.root().command_usage_wrapped(registry.config().help_width)
}

/// Command list of the root.
pub fn command_usages() -> String {
    registry().root().command_usages()
}

/// Command list of the root, wrapped to `cols`.
pub fn command_usages_wrapped(cols: usize) -> String {
    registry().root().command_usages_wrapped(cols)
}

/// Option table of the application flags.
pub fn flag_usages() -> String {
    registry().root().flag_usages()
}

/// Parse `args` against the default registry, exiting with status 0 when
/// help was requested.
///
/// Help is printed after the registry lock is released.
pub fn parse<S: AsRef<str>>(args: &[S], flags: Option<FlagSet>) -> Parsed {
    let (parsed, pending) = registry().prepare(args, flags);
    if let Some(Pending::Help(page)) = pending {
        page.show();
        std::process::exit(0);
    }
    parsed
}

/// Parse `args` against the default registry and run the selected callback,
/// exiting with status 0 when help was requested.
///
/// The callback runs after the registry lock is released.
pub fn execute<S: AsRef<str>>(args: &[S]) -> Result<(), CommandError> {
    let (parsed, pending) = registry().prepare(args, None);
    if let Some(pending) = pending {
        pending.run()?;
    }
    if parsed.is_help() {
        std::process::exit(0);
    }
    Ok(())
}

/// Discard the default registry's commands and overrides.
pub fn reset() {
    registry().reset();
}
