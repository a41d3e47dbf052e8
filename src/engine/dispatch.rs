//! engine::dispatch
//!
//! Callback selection for a resolved chain.
//!
//! # Rules
//!
//! The chain is walked from the deepest command towards the root. The first
//! command with a callback runs it, passing the deepest command and that
//! command's flag set. A callback therefore acts as a default for every
//! descendant without its own. When no command in the chain has one, the
//! fallback runs with the same arguments.

use tracing::debug;

use super::chain::ParseChain;
use super::resolver::{Outcome, Parsed};
use crate::core::{Callback, Command, CommandError};
use crate::flags::FlagSet;

/// Which callback, if any, ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// The callback registered on the named command.
    Command(String),
    /// The fallback passed to [`Command::dispatch`].
    Fallback,
    /// No callback was available.
    Nothing,
}

impl Command {
    /// Run the callback for the deepest command of `chain`.
    ///
    /// # Errors
    ///
    /// `CommandError::Callback` with the deepest command's name if the
    /// selected callback fails.
    pub fn dispatch(
        &self,
        chain: &ParseChain,
        fallback: Option<&Callback>,
    ) -> Result<Dispatched, CommandError> {
        match self.select(chain, fallback) {
            Some((selected, callback, deepest)) => {
                invoke(callback, deepest)?;
                Ok(selected)
            }
            None => Ok(Dispatched::Nothing),
        }
    }

    /// Pick the callback for `chain` without running it.
    ///
    /// Returns the selection, the callback and the deepest command.
    pub(crate) fn select<'c>(
        &'c self,
        chain: &ParseChain,
        fallback: Option<&'c Callback>,
    ) -> Option<(Dispatched, &'c Callback, &'c Command)> {
        let commands = chain.commands(self);
        let Some(deepest) = commands.last().copied() else {
            debug!("empty chain, nothing to dispatch");
            return None;
        };

        let owner = commands
            .iter()
            .rev()
            .find_map(|&command| command.callback().map(|cb| (command.name(), cb)));
        let (selected, callback) = match (owner, fallback) {
            (Some((name, callback)), _) => (Dispatched::Command(name.to_string()), callback),
            (None, Some(fallback)) => (Dispatched::Fallback, fallback),
            (None, None) => {
                debug!(command = %deepest.name(), "no callback in chain");
                return None;
            }
        };
        debug!(command = %deepest.name(), selected = ?selected, "dispatching");
        Some((selected, callback, deepest))
    }

    /// Parse `args` and, unless help was shown or the root did not match,
    /// dispatch the resulting chain.
    ///
    /// Callbacks set on this tree are the only ones considered; there is no
    /// fallback.
    pub fn execute<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Outcome, CommandError> {
        let Parsed { outcome, chain } = self.parse(args);
        if outcome == Outcome::Continue {
            self.dispatch(&chain, None)?;
        }
        Ok(outcome)
    }
}

/// Run `callback` for `deepest` with its flag set, or an empty one.
pub(crate) fn invoke(callback: &Callback, deepest: &Command) -> Result<(), CommandError> {
    let empty;
    let flags = match deepest.flags() {
        Some(flags) => flags,
        None => {
            empty = FlagSet::new(deepest.name());
            &empty
        }
    };
    callback(deepest, flags).map_err(|err| CommandError::callback(deepest.name(), err))
}
