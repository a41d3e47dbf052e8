//! engine::resolver
//!
//! Walks a command tree against a flat token stream.
//!
//! # Algorithm
//!
//! Starting at the root, each level:
//!
//! 1. Marks the command active and drops its leading token (the program
//!    path at the root, the command's own name below it).
//! 2. Scans the remaining tokens left to right for the first one equal to
//!    the name of a direct subcommand. Tokens before it belong to this
//!    command; the match and everything after it belong to the subcommand.
//!    Without a match every remaining token belongs to this command.
//! 3. Parses its segment with its flag set (created empty if missing, and
//!    given `-h` / `--help`).
//! 4. Stops with [`Outcome::Help`] if help was requested.
//! 5. Replays the segment through every ancestor's flag set, nearest first,
//!    when the command recurses arguments.
//! 6. Prints a notice if the command is deprecated.
//! 7. Descends into the matched subcommand, if any.
//!
//! # Known Ambiguity
//!
//! Matching is on raw token equality. An option value equal to a subcommand
//! name (`--name foo` with a `foo` subcommand) is taken as the subcommand.
//! Telling the two apart would require knowing every option's arity before
//! the scan.

use tracing::{debug, warn};

use super::chain::ParseChain;
use crate::config::Config;
use crate::core::{Command, UsageFn};
use crate::flags::FlagSet;
use crate::ui::output::{deprecation_notice, Output};

/// How a parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The chain was resolved; callbacks may run.
    Continue,
    /// Help was printed for the deepest command of the chain. The caller
    /// decides whether to exit.
    Help,
    /// The token stream was empty or the root name did not match; nothing
    /// was activated.
    Skipped,
}

/// Result of one parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub outcome: Outcome,
    pub chain: ParseChain,
}

impl Parsed {
    fn skipped() -> Self {
        Self {
            outcome: Outcome::Skipped,
            chain: ParseChain::default(),
        }
    }

    /// Check if help was requested.
    pub fn is_help(&self) -> bool {
        self.outcome == Outcome::Help
    }
}

/// Parses token streams against command trees.
///
/// The resolver holds presentation settings only; all parse state lives in
/// the tree.
#[derive(Default, Clone, Copy)]
pub struct Resolver<'a> {
    usage_fn: Option<&'a UsageFn>,
    config: Config,
    defer_help: bool,
}

impl<'a> Resolver<'a> {
    /// A resolver that prints help with the default page.
    pub fn new(config: Config) -> Self {
        Self {
            usage_fn: None,
            config,
            defer_help: false,
        }
    }

    /// Help printer used for commands without their own.
    pub fn with_usage_fn(mut self, usage_fn: Option<&'a UsageFn>) -> Self {
        self.usage_fn = usage_fn;
        self
    }

    /// Report [`Outcome::Help`] without printing; the caller prints it later
    /// with [`Resolver::show_help`].
    pub fn defer_help(mut self) -> Self {
        self.defer_help = true;
        self
    }

    /// Resolve `args` against the tree rooted at `root`.
    ///
    /// The first token is the program path (or, for a named root, the root's
    /// name). Every `active` flag in the tree is cleared first, so after the
    /// call exactly the commands of the returned chain are active.
    pub fn resolve<S: AsRef<str>>(&self, root: &mut Command, args: &[S]) -> Parsed {
        root.deactivate();

        let Some(first) = args.first() else {
            debug!("no arguments to parse");
            return Parsed::skipped();
        };
        if !root.name.is_empty() && root.name != first.as_ref() {
            debug!(command = %root.name, token = first.as_ref(), "root name does not match");
            return Parsed::skipped();
        }

        let mut remaining: Vec<String> = args[1..].iter().map(|a| a.as_ref().to_string()).collect();
        let mut chain = ParseChain::from_root();
        let mut sink = Output::default();

        loop {
            let depth = chain.path().len();
            let Some(command) = root.descend_mut(chain.path()) else {
                break;
            };
            command.active = true;
            if let Some(output) = command.output() {
                sink = output.clone();
            }

            let found = find_subcommand(command, &remaining);
            let (before, after) = match found {
                Some((pos, _)) => {
                    let after = remaining.split_off(pos + 1);
                    remaining.truncate(pos);
                    (remaining, after)
                }
                None => (remaining, Vec::new()),
            };
            debug!(command = %command.name, depth, segment = ?before, "parsing command segment");

            let name = command.name.clone();
            let flags = command.flags.get_or_insert_with(|| FlagSet::new(name));
            flags.ensure_help();
            flags.clear_help();
            if let Err(err) = flags.parse(&before) {
                warn!(command = %command.name, error = %err, "invalid flag in segment");
            }

            if command.flags().is_some_and(FlagSet::help_requested) {
                debug!(command = %command.name, "help requested");
                if !self.defer_help {
                    self.show_help(command, &sink);
                }
                return Parsed {
                    outcome: Outcome::Help,
                    chain,
                };
            }

            let recurse = command.recurses_arguments();
            let deprecated = command.is_deprecated().then(|| command.name.clone());

            if recurse && !before.is_empty() {
                replay(root, chain.path(), &before);
            }

            if let Some(name) = deprecated {
                sink.notice(deprecation_notice(&name));
            }

            match found {
                Some((_, idx)) => {
                    chain.push(idx);
                    remaining = after;
                }
                None => break,
            }
        }

        Parsed {
            outcome: Outcome::Continue,
            chain,
        }
    }

    /// Print help for `command`: its own help function, then the resolver's,
    /// then the default page wrapped to the configured width.
    pub fn show_help(&self, command: &Command, sink: &Output) {
        match command.usage_fn().or(self.usage_fn) {
            Some(usage_fn) => usage_fn(command, sink),
            None => {
                let text = command.command_usage_wrapped(self.config.help_width);
                if let Err(err) = sink.write_str(&text) {
                    warn!(error = %err, "failed to write help");
                }
            }
        }
    }
}

/// Position of the first token naming a direct subcommand, with that
/// subcommand's index. Earliest token wins; among subcommands registration
/// order decides.
fn find_subcommand(command: &Command, tokens: &[String]) -> Option<(usize, usize)> {
    if command.commands().is_empty() {
        return None;
    }
    tokens.iter().enumerate().find_map(|(pos, token)| {
        command
            .commands()
            .iter()
            .position(|sub| sub.name() == token)
            .map(|idx| (pos, idx))
    })
}

/// Apply `segment` to the flag sets of every ancestor of the command at
/// `path`, nearest first. Only flag values change; help and deprecation
/// handling are not repeated.
fn replay(root: &mut Command, path: &[usize], segment: &[String]) {
    for depth in (0..path.len()).rev() {
        let Some(ancestor) = root.descend_mut(&path[..depth]) else {
            continue;
        };
        debug!(ancestor = %ancestor.name, segment = ?segment, "replaying arguments");
        if let Some(flags) = ancestor.flags_mut() {
            let result = flags.apply(segment);
            flags.clear_help();
            if let Err(err) = result {
                debug!(ancestor = %ancestor.name, error = %err, "replay left flag errors");
            }
        }
    }
}

impl Command {
    /// Parse `args` against this tree with default settings.
    ///
    /// See [`Resolver::resolve`].
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> Parsed {
        Resolver::default().resolve(self, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Flag;
    use crate::ui::output::SharedBuffer;

    fn int_flags(name: &str, flag: &str, default: i64) -> Option<FlagSet> {
        Some(FlagSet::new(name).with(Flag::int(flag, default)).unwrap())
    }

    /// root(test0) -> foo(test1) -> bar(test2), root -> world(test3)
    fn tree() -> Command {
        let mut root = Command::root();
        root.set_flags(FlagSet::new("").with(Flag::int("test0", 0)).unwrap());
        root.command("foo", "Foo flags.", int_flags("foo", "test1", 1))
            .unwrap()
            .command("bar", "Bar flags.", int_flags("bar", "test2", 2))
            .unwrap();
        root.command("world", "World flags.", int_flags("world", "test3", 3))
            .unwrap();
        root
    }

    fn int_of(command: &Command, flag: &str) -> i64 {
        command.flags().unwrap().get_int(flag).unwrap()
    }

    #[test]
    fn nested_segments_reach_their_commands() {
        let mut root = tree();
        let parsed = root.parse(&[
            "prog", "--test0", "10", "foo", "--test1", "11", "bar", "--test2", "12", "--test3",
            "13",
        ]);

        assert_eq!(parsed.outcome, Outcome::Continue);
        assert_eq!(parsed.chain.names(&root), vec!["", "foo", "bar"]);
        assert!(root.is_active());
        let foo = root.lookup("foo").unwrap();
        let bar = foo.lookup("bar").unwrap();
        let world = root.lookup("world").unwrap();
        assert!(foo.is_active());
        assert!(bar.is_active());
        assert!(!world.is_active());
        assert_eq!(int_of(&root, "test0"), 10);
        assert_eq!(int_of(foo, "test1"), 11);
        assert_eq!(int_of(bar, "test2"), 12);
        assert_eq!(int_of(world, "test3"), 3);
        assert_eq!(bar.flags().unwrap().unknown(), &["--test3", "13"]);
    }

    #[test]
    fn program_only_activates_root() {
        let mut root = tree();
        let parsed = root.parse(&["prog"]);
        assert_eq!(parsed.outcome, Outcome::Continue);
        assert_eq!(parsed.chain.len(), 1);
        assert!(root.is_active());
        assert!(!root.active("foo"));
    }

    #[test]
    fn empty_args_skip() {
        let mut root = tree();
        let parsed = root.parse::<&str>(&[]);
        assert_eq!(parsed.outcome, Outcome::Skipped);
        assert!(parsed.chain.is_empty());
        assert!(!root.is_active());
    }

    #[test]
    fn named_root_must_match_first_token() {
        let mut command = Command::new("test", "Test.", int_flags("test", "test", 0));
        let parsed = command.parse(&["other", "--test", "1"]);
        assert_eq!(parsed.outcome, Outcome::Skipped);
        assert!(!command.is_active());

        let parsed = command.parse(&["test", "--test", "1"]);
        assert_eq!(parsed.outcome, Outcome::Continue);
        assert!(command.is_active());
        assert_eq!(int_of(&command, "test"), 1);
    }

    #[test]
    fn earliest_token_wins() {
        let mut root = tree();
        root.parse(&["prog", "world", "foo"]);
        assert!(root.active("world"));
        assert!(!root.active("foo"));
        assert_eq!(root.lookup("world").unwrap().flags().unwrap().args(), &["foo"]);
    }

    #[test]
    fn flag_value_equal_to_command_name_is_a_boundary() {
        let mut root = Command::root();
        root.set_flags(FlagSet::new("").with(Flag::string("name", "")).unwrap());
        root.command("foo", "", None).unwrap();

        root.parse(&["prog", "--name", "foo"]);
        assert!(root.active("foo"));
        assert_eq!(root.flags().unwrap().errors().len(), 1);
    }

    #[test]
    fn missing_flag_sets_are_created_with_help() {
        let mut root = Command::root();
        root.command("bare", "", None).unwrap();
        root.parse(&["prog", "bare", "x"]);

        let bare = root.lookup("bare").unwrap();
        let flags = bare.flags().unwrap();
        assert!(flags.lookup("help").is_some());
        assert_eq!(flags.args(), &["x"]);
        assert!(root.flags().unwrap().lookup("help").is_some());
    }

    #[test]
    fn recursive_arguments_reach_ancestors() {
        let mut root = tree();
        root.lookup_mut("foo")
            .and_then(|foo| foo.lookup_mut("bar"))
            .unwrap()
            .set_recurse_arguments(true);

        root.parse(&[
            "prog", "foo", "bar", "--test0", "10", "--test1", "11", "--test2", "12",
        ]);

        let foo = root.lookup("foo").unwrap();
        assert_eq!(int_of(&root, "test0"), 10);
        assert_eq!(int_of(foo, "test1"), 11);
        assert_eq!(int_of(foo.lookup("bar").unwrap(), "test2"), 12);
        assert!(root.flags().unwrap().changed("test0"));
    }

    #[test]
    fn without_recursion_ancestors_are_untouched() {
        let mut root = tree();
        root.parse(&["prog", "foo", "bar", "--test0", "10", "--test1", "11"]);
        assert_eq!(int_of(&root, "test0"), 0);
        assert_eq!(int_of(root.lookup("foo").unwrap(), "test1"), 1);
    }

    #[test]
    fn help_prints_usage_and_stops() {
        let buffer = SharedBuffer::new();
        let mut root = tree();
        root.set_output(buffer.clone().into());

        let parsed = root.parse(&["prog", "foo", "--help", "bar"]);
        assert_eq!(parsed.outcome, Outcome::Help);
        assert!(parsed.is_help());
        assert_eq!(parsed.chain.names(&root), vec!["", "foo"]);
        assert!(buffer.contents().contains("Foo flags."));
        assert!(buffer.contents().contains("--test1"));
        assert!(!root.lookup("foo").unwrap().active("bar"));
    }

    #[test]
    fn help_uses_override_in_order() {
        let buffer = SharedBuffer::new();
        let mut root = tree();
        root.set_output(buffer.clone().into());
        root.lookup_mut("world")
            .unwrap()
            .set_usage_fn(|command, out| out.notice(format!("custom {}", command.name())));
        let fallback: UsageFn = std::sync::Arc::new(|command: &Command, out: &Output| {
            out.notice(format!("registry {}", command.name()))
        });
        let resolver = Resolver::default().with_usage_fn(Some(&fallback));

        resolver.resolve(&mut root, &["prog", "world", "-h"]);
        resolver.resolve(&mut root, &["prog", "foo", "-h"]);
        assert_eq!(buffer.contents(), "custom world\nregistry foo\n");
    }

    #[test]
    fn help_does_not_leak_into_next_parse() {
        let mut root = tree();
        root.set_output(SharedBuffer::new().into());
        assert_eq!(root.parse(&["prog", "--help"]).outcome, Outcome::Help);
        assert_eq!(root.parse(&["prog", "foo"]).outcome, Outcome::Continue);
    }

    #[test]
    fn replayed_help_shorthand_leaves_ancestor_clean() {
        let mut root = Command::root();
        root.command(
            "child",
            "",
            Some(
                FlagSet::new("child")
                    .with(Flag::bool("host", false).short('h'))
                    .unwrap(),
            ),
        )
        .unwrap()
        .set_recurse_arguments(true);

        let parsed = root.parse(&["prog", "child", "-h"]);
        assert_eq!(parsed.outcome, Outcome::Continue);
        let child = root.lookup("child").unwrap();
        assert_eq!(child.flags().unwrap().get_bool("host"), Ok(true));
        assert!(!child.flags().unwrap().help_requested());
        assert!(!root.flags().unwrap().help_requested());
    }

    #[test]
    fn deferred_help_prints_nothing() {
        let buffer = SharedBuffer::new();
        let mut root = tree();
        root.set_output(buffer.clone().into());

        let parsed = Resolver::default()
            .defer_help()
            .resolve(&mut root, &["prog", "foo", "-h"]);
        assert_eq!(parsed.outcome, Outcome::Help);
        assert!(buffer.contents().is_empty());

        let foo = parsed.chain.deepest(&root).unwrap();
        Resolver::default().show_help(foo, &parsed.chain.output(&root));
        assert!(buffer.contents().starts_with("Foo flags."));
    }

    #[test]
    fn deprecated_command_prints_notice_once() {
        let buffer = SharedBuffer::new();
        let mut root = tree();
        root.set_output(buffer.clone().into());
        let foo = root.lookup_mut("foo").unwrap();
        foo.mark_deprecated();
        foo.set_recurse_arguments(true);

        root.parse(&["prog", "foo", "--test1", "4"]);
        assert_eq!(buffer.contents(), "Command \"foo\" is deprecated!\n");
    }

    #[test]
    fn nearest_output_is_used() {
        let root_buffer = SharedBuffer::new();
        let foo_buffer = SharedBuffer::new();
        let mut root = tree();
        root.set_output(root_buffer.clone().into());
        root.lookup_mut("foo").unwrap().set_output(foo_buffer.clone().into());

        root.parse(&["prog", "foo", "bar", "--help"]);
        assert!(root_buffer.contents().is_empty());
        assert!(foo_buffer.contents().contains("Bar flags."));
    }

    #[test]
    fn reparse_resets_activation() {
        let mut root = tree();
        root.parse(&["prog", "foo", "bar"]);
        assert!(root.active("foo"));
        root.parse(&["prog", "world"]);
        assert!(!root.active("foo"));
        assert!(!root.lookup("foo").unwrap().active("bar"));
        assert!(root.active("world"));
    }

    #[test]
    fn repeated_name_descends_only_once_per_level() {
        let mut root = tree();
        root.parse(&["prog", "foo", "foo", "--test1", "5"]);
        let foo = root.lookup("foo").unwrap();
        assert!(foo.is_active());
        assert_eq!(foo.flags().unwrap().args(), &["foo"]);
        assert_eq!(int_of(foo, "test1"), 5);
    }
}
