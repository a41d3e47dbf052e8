//! cmdtree - Hierarchical subcommands on top of lenient flag sets
//!
//! A program describes its command line as a tree: every command owns a flag
//! set and any number of named subcommands. Parsing splits one flat token
//! stream at subcommand names and hands each piece to the flag set of the
//! command it belongs to, marking the matched commands active. The callback
//! of the deepest matched command (or of its nearest ancestor that has one)
//! then runs.
//!
//! # Architecture
//!
//! - [`flags`] - Lenient flag sets: typed options, parsing, usage tables
//! - [`core`] - Command nodes and registration errors
//! - [`engine`] - Tree resolution and callback dispatch
//! - [`ui`] - Help pages, output sinks and text wrapping
//! - [`config`] - Help width settings from the environment
//! - [`global`] - Registries and the process-wide default one
//! - [`cli`] - The demo binary
//!
//! # Correctness Invariants
//!
//! 1. Parsing never fails and never changes the shape of the tree
//! 2. After a parse, exactly the commands of the returned chain are active
//! 3. Only the global façade and [`global::Registry::run_or_exit`] exit the
//!    process, and only after help was shown
//!
//! # Example
//!
//! ```
//! use cmdtree::{Command, Flag, FlagSet, Outcome};
//!
//! let mut root = Command::root();
//! root.set_flags(FlagSet::new("app").with(Flag::bool("verbose", false).short('v')).unwrap());
//! root.command("build", "Build the project.", Some(
//!     FlagSet::new("build").with(Flag::int("jobs", 1).short('j')).unwrap(),
//! ))
//! .unwrap()
//! .set_callback(|command, flags| {
//!     assert_eq!(command.name(), "build");
//!     assert_eq!(flags.get_int("jobs")?, 4);
//!     Ok(())
//! });
//!
//! let outcome = root.execute(&["app", "-v", "build", "-j", "4"]).unwrap();
//! assert_eq!(outcome, Outcome::Continue);
//! assert!(root.active("build"));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod flags;
pub mod global;
pub mod ui;

pub use crate::config::Config;
pub use crate::core::{Callback, Command, CommandError, UsageFn};
pub use crate::engine::{Dispatched, Outcome, ParseChain, Parsed, Resolver};
pub use crate::flags::{Flag, FlagError, FlagSet, Kind, Value};
pub use crate::ui::output::{Output, SharedBuffer};
