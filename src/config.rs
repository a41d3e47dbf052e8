//! config
//!
//! Runtime settings for help output.
//!
//! # Precedence
//!
//! Values are resolved in this order (first match wins):
//! 1. `$CMDTREE_HELP_WIDTH`
//! 2. Width of the terminal attached to standard output
//! 3. Default (0, no wrapping)
//!
//! An override that is not a non-negative integer is ignored with a warning.
//!
//! # Example
//!
//! ```
//! use cmdtree::config::Config;
//!
//! let config = Config::from_sources(|_| None, || Some(100));
//! assert_eq!(config.help_width, 100);
//! ```

use console::Term;
use tracing::warn;

/// Environment variable overriding the help wrap width.
pub const HELP_WIDTH_ENV: &str = "CMDTREE_HELP_WIDTH";

/// Settings shared by every command of a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Column count help text is wrapped to (0 disables wrapping).
    pub help_width: usize,
}

impl Config {
    /// Load settings from the process environment and terminal.
    pub fn from_env() -> Self {
        Self::from_sources(|key| std::env::var(key).ok(), terminal_width)
    }

    /// Load settings through an arbitrary variable lookup and terminal size source.
    pub fn from_sources(
        lookup: impl Fn(&str) -> Option<String>,
        terminal: impl FnOnce() -> Option<usize>,
    ) -> Self {
        let help_width = lookup(HELP_WIDTH_ENV)
            .and_then(|raw| match raw.trim().parse::<usize>() {
                Ok(width) => Some(width),
                Err(err) => {
                    warn!(variable = HELP_WIDTH_ENV, value = %raw, error = %err, "ignoring invalid help width");
                    None
                }
            })
            .or_else(terminal)
            .unwrap_or_default();

        Self { help_width }
    }

    /// Set the help width; 0 disables wrapping.
    pub fn with_help_width(mut self, help_width: usize) -> Self {
        self.help_width = help_width;
        self
    }
}

/// Columns of the terminal on standard output, if it is one.
fn terminal_width() -> Option<usize> {
    Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| usize::from(cols))
}
