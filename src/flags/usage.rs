//! flags::usage
//!
//! The option table printed under `Flags:` in help output.

use std::fmt::Write as _;

use super::set::FlagSet;
use crate::ui::wrap::wrap;

/// Columns between the widest flag column and the usage text.
const USAGE_GAP: usize = 3;

impl FlagSet {
    /// Usage table of all visible flags, wrapped to `cols` columns
    /// (0 for no wrapping).
    ///
    /// ```text
    ///   -j, --jobs int   Parallel jobs. (default 4)
    ///       --dry-run    Print actions only.
    /// ```
    pub fn flag_usages_wrapped(&self, cols: usize) -> String {
        let rows: Vec<(String, String)> = self
            .display_order()
            .into_iter()
            .filter(|flag| flag.is_visible())
            .map(|flag| {
                let mut left = match flag.shorthand() {
                    Some(c) => format!("  -{}, --{}", c, flag.name()),
                    None => format!("      --{}", flag.name()),
                };
                if let Some(placeholder) = flag.kind().placeholder() {
                    left.push(' ');
                    left.push_str(placeholder);
                }

                let mut right = flag.usage().to_string();
                if !flag.default_value().is_zero() {
                    let _ = write!(right, " (default {})", flag.default_value().default_text());
                }
                (left, right)
            })
            .collect();

        let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);

        let mut out = String::new();
        for (left, right) in rows {
            let pad = " ".repeat(width - left.len() + USAGE_GAP);
            let _ = writeln!(
                out,
                "{}{}{}",
                left,
                pad,
                wrap(width + USAGE_GAP, cols, &right)
            );
        }
        out
    }

    /// Usage table of all visible flags without wrapping.
    pub fn flag_usages(&self) -> String {
        self.flag_usages_wrapped(0)
    }
}
