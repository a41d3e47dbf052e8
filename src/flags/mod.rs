//! flags
//!
//! Lenient flag sets, the option parser every command level delegates to.
//!
//! # Responsibilities
//!
//! - Define typed options with long names and optional shorthands
//! - Parse a token slice, tolerating options defined at other levels
//! - Expose parsed values by name through typed getters
//! - Render the option table for help output
//!
//! # Design
//!
//! A flag set never decides which command is running. The resolver in
//! [`crate::engine`] splits the token stream and hands each segment to the
//! flag set of the command it belongs to. Because a segment can still hold
//! options meant for an ancestor, unknown options are recorded instead of
//! rejected.
//!
//! # Example
//!
//! ```
//! use cmdtree::flags::{Flag, FlagSet};
//!
//! let mut flags = FlagSet::new("serve")
//!     .with(Flag::uint("port", 8080).short('p').describe("Listen port."))
//!     .unwrap();
//!
//! flags.parse(&["-p", "9000", "--other", "x", "file.txt"]).unwrap();
//!
//! assert_eq!(flags.get_uint("port"), Ok(9000));
//! assert_eq!(flags.unknown(), &["--other", "x"]);
//! assert_eq!(flags.args(), &["file.txt"]);
//! ```

mod errors;
mod flag;
mod set;
mod usage;
mod value;

pub use errors::FlagError;
pub use flag::Flag;
pub use set::{FlagSet, HELP_FLAG};
pub use value::{Kind, Value};
