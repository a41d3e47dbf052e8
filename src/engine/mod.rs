//! engine
//!
//! Resolves token streams against command trees and runs callbacks.
//!
//! # Architecture
//!
//! ```text
//! args -> Resolver -> Parsed { Outcome, ParseChain } -> dispatch -> callback
//! ```
//!
//! - [`resolver`] - Splits the token stream into per-command segments, feeds
//!   each segment to its command's flag set and records the activated chain
//! - [`chain`] - The activated commands, stored as an index path
//! - [`dispatch`] - Selects and runs the callback for the deepest command
//!
//! # Invariants
//!
//! - Parsing never fails; flag problems are recorded on the flag sets
//! - After a parse, the active commands are exactly those of the chain
//! - Help never exits the process; it is reported as [`Outcome::Help`]

pub mod chain;
pub mod dispatch;
pub mod resolver;

pub use chain::ParseChain;
pub use dispatch::Dispatched;
pub use resolver::{Outcome, Parsed, Resolver};
