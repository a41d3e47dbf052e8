//! flags::flag
//!
//! A single named option.

use super::value::{Kind, Value};

/// One option of a [`FlagSet`](super::FlagSet).
///
/// Flags are built with the typed constructors and refined with the
/// builder methods before being added to a set:
///
/// ```
/// use cmdtree::flags::{Flag, FlagSet};
///
/// let mut flags = FlagSet::new("build");
/// flags.add(Flag::int("jobs", 4).short('j').describe("Parallel jobs.")).unwrap();
/// flags.parse(&["-j", "8"]).unwrap();
/// assert_eq!(flags.get_int("jobs"), Ok(8));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    name: String,
    shorthand: Option<char>,
    usage: String,
    default: Value,
    value: Value,
    changed: bool,
    hidden: bool,
    deprecated: Option<String>,
}

impl Flag {
    /// Create a flag with an explicit default value.
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            shorthand: None,
            usage: String::new(),
            value: default.clone(),
            default,
            changed: false,
            hidden: false,
            deprecated: None,
        }
    }

    /// A boolean flag. It takes no value unless given as `--name=value`.
    pub fn bool(name: impl Into<String>, default: bool) -> Self {
        Self::new(name, Value::Bool(default))
    }

    /// A signed integer flag.
    pub fn int(name: impl Into<String>, default: i64) -> Self {
        Self::new(name, Value::Int(default))
    }

    /// An unsigned integer flag.
    pub fn uint(name: impl Into<String>, default: u64) -> Self {
        Self::new(name, Value::Uint(default))
    }

    /// A floating point flag.
    pub fn float(name: impl Into<String>, default: f64) -> Self {
        Self::new(name, Value::Float(default))
    }

    /// A string flag.
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(name, Value::Str(default.into()))
    }

    /// A list flag. Each occurrence appends comma-separated items.
    pub fn strings<I, S>(name: impl Into<String>, default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, Value::List(default.into_iter().map(Into::into).collect()))
    }

    /// Set the one-character shorthand (`-x`).
    pub fn short(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    /// Set the usage text shown in help output.
    pub fn describe(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Keep the flag working but leave it out of usage tables.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Long name, without dashes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-character shorthand, if any.
    pub fn shorthand(&self) -> Option<char> {
        self.shorthand
    }

    /// Usage text shown in the option table.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Kind of value the flag holds.
    pub fn kind(&self) -> Kind {
        self.default.kind()
    }

    /// Value the flag starts with.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Current value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Check if the value was set from the command line or [`FlagSet::set`](super::FlagSet::set).
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Check if the flag is left out of usage tables.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Deprecation message, if the flag is deprecated.
    pub fn deprecation(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    /// Whether the flag consumes a value token.
    pub fn takes_value(&self) -> bool {
        self.kind() != Kind::Bool
    }

    /// Whether the flag is listed in usage tables.
    pub fn is_visible(&self) -> bool {
        !self.hidden && self.deprecated.is_none()
    }

    pub(crate) fn set_hidden(&mut self) {
        self.hidden = true;
    }

    pub(crate) fn set_deprecated(&mut self, message: String) {
        self.deprecated = Some(message);
    }

    /// Restore the default value and clear the changed mark.
    pub(crate) fn reset(&mut self) {
        self.value = self.default.clone();
        self.changed = false;
    }

    /// Convert and store a raw value.
    ///
    /// The first assignment to a list replaces its default; later ones append.
    pub(crate) fn assign(&mut self, raw: &str) -> Result<(), String> {
        let parsed = Value::parse(self.kind(), raw)?;
        match parsed {
            Value::List(items) if self.changed => {
                if let Value::List(current) = &mut self.value {
                    current.extend(items);
                }
            }
            parsed => self.value = parsed,
        }
        self.changed = true;
        Ok(())
    }
}
