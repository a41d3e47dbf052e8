//! engine::chain
//!
//! The commands activated by one parse, root first.

use crate::core::Command;
use crate::ui::output::Output;

/// Root-to-deepest sequence of commands activated by one parse.
///
/// The chain stores subcommand indices rather than references so the tree
/// can be borrowed again after parsing. It is only meaningful for the tree
/// it was produced from, and only until that tree is modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseChain {
    root: bool,
    path: Vec<usize>,
}

impl ParseChain {
    /// A chain holding only the root.
    pub(crate) fn from_root() -> Self {
        Self {
            root: true,
            path: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, idx: usize) {
        self.path.push(idx);
    }

    /// Subcommand indices below the root.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Number of activated commands, root included.
    pub fn len(&self) -> usize {
        if self.root {
            self.path.len() + 1
        } else {
            0
        }
    }

    /// True when the root itself was not matched.
    pub fn is_empty(&self) -> bool {
        !self.root
    }

    /// Resolve the chain against `root`, root first.
    pub fn commands<'c>(&self, root: &'c Command) -> Vec<&'c Command> {
        if !self.root {
            return Vec::new();
        }
        let mut commands = Vec::with_capacity(self.len());
        let mut current = root;
        commands.push(current);
        for &idx in &self.path {
            match current.commands().get(idx) {
                Some(next) => {
                    current = next;
                    commands.push(current);
                }
                None => break,
            }
        }
        commands
    }

    /// The deepest activated command.
    pub fn deepest<'c>(&self, root: &'c Command) -> Option<&'c Command> {
        if !self.root {
            return None;
        }
        root.descend(&self.path)
    }

    /// Output of the nearest command along the chain that sets one, or
    /// standard error.
    pub fn output(&self, root: &Command) -> Output {
        self.commands(root)
            .into_iter()
            .rev()
            .find_map(Command::output)
            .cloned()
            .unwrap_or_default()
    }

    /// Names along the chain, root first (the root name is usually empty).
    pub fn names<'c>(&self, root: &'c Command) -> Vec<&'c str> {
        self.commands(root).into_iter().map(Command::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Command {
        let mut root = Command::root();
        root.command("a", "", None).unwrap();
        root.command("b", "", None)
            .unwrap()
            .command("c", "", None)
            .unwrap();
        root
    }

    #[test]
    fn empty_chain_resolves_to_nothing() {
        let root = tree();
        let chain = ParseChain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.commands(&root).is_empty());
        assert!(chain.deepest(&root).is_none());
    }

    #[test]
    fn chain_resolves_names() {
        let root = tree();
        let mut chain = ParseChain::from_root();
        chain.push(1);
        chain.push(0);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.names(&root), vec!["", "b", "c"]);
        assert_eq!(chain.deepest(&root).map(Command::name), Some("c"));
    }

    #[test]
    fn output_is_inherited_from_nearest_ancestor() {
        let mut root = tree();
        let mut chain = ParseChain::from_root();
        chain.push(1);
        chain.push(0);
        assert!(matches!(chain.output(&root), Output::Stderr));

        root.set_output(Output::Stdout);
        assert!(matches!(chain.output(&root), Output::Stdout));

        root.lookup_mut("b").unwrap().set_output(Output::Stderr);
        assert!(matches!(chain.output(&root), Output::Stderr));
    }
}
