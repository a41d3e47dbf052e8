//! flags::set
//!
//! The lenient flag set.
//!
//! # Token Syntax
//!
//! - `--name value`, `--name=value`, `--bool`, `--bool=false`
//! - `-n value`, `-nvalue`, `-n=value`, clustered booleans `-abc`
//! - `--` ends option parsing; every later token is positional
//! - a lone `-` and any token not starting with `-` is positional
//!
//! # Leniency
//!
//! Unknown options never stop parsing. They are recorded in
//! [`FlagSet::unknown`]. An unknown option without an inline `=value`
//! swallows the next token when that token does not start with `-`, since
//! it is most likely the option's value.
//!
//! Malformed tokens and unparsable values are recorded in
//! [`FlagSet::errors`] and parsing continues with the next token.

use tracing::trace;

use super::errors::FlagError;
use super::flag::Flag;
use super::value::{Kind, Value};

/// Name of the help flag registered on every command.
pub const HELP_FLAG: &str = "help";

/// A named collection of flags and the result of the last parse.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    name: String,
    flags: Vec<Flag>,
    args: Vec<String>,
    unknown: Vec<String>,
    errors: Vec<FlagError>,
    parsed: bool,
    sort_flags: bool,
}

/// What one pass over a token slice produced.
#[derive(Debug, Default)]
struct Pass {
    positional: Vec<String>,
    unknown: Vec<String>,
    errors: Vec<FlagError>,
}

impl Pass {
    fn first_error(&self) -> Result<(), FlagError> {
        match self.errors.first() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Walks a token slice front to back.
struct Cursor<'a, S> {
    tokens: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> Cursor<'a, S> {
    fn new(tokens: &'a [S]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_ref())
    }

    fn rest(&mut self) -> impl Iterator<Item = &'a str> {
        let rest = &self.tokens[self.pos.min(self.tokens.len())..];
        self.pos = self.tokens.len();
        rest.iter().map(|token| token.as_ref())
    }

    /// Take the next token if it can be the value of an unknown option.
    fn next_unknown_value(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?.as_ref();
        if token.starts_with('-') {
            return None;
        }
        self.pos += 1;
        Some(token)
    }
}

impl FlagSet {
    /// Create an empty flag set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`FlagSet::add`].
    pub fn with(mut self, flag: Flag) -> Result<Self, FlagError> {
        self.add(flag)?;
        Ok(self)
    }

    /// Name used in messages about this set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define a flag.
    ///
    /// # Errors
    ///
    /// - `FlagError::InvalidName` for an empty name, a name starting with `-`
    ///   or containing `=`, or a `-` shorthand
    /// - `FlagError::Redefined` if the name or shorthand is already taken
    pub fn add(&mut self, flag: Flag) -> Result<&mut Flag, FlagError> {
        let name = flag.name();
        if name.is_empty() || name.starts_with('-') || name.contains('=') {
            return Err(FlagError::InvalidName(name.to_string()));
        }
        if flag.shorthand() == Some('-') {
            return Err(FlagError::InvalidName(format!("{} (shorthand '-')", name)));
        }
        if self.lookup(name).is_some() {
            return Err(FlagError::Redefined(name.to_string()));
        }
        if let Some(c) = flag.shorthand() {
            if let Some(existing) = self.flags.iter().find(|f| f.shorthand() == Some(c)) {
                return Err(FlagError::Redefined(format!(
                    "shorthand '{}' for '{}' is already used by '{}'",
                    c,
                    name,
                    existing.name()
                )));
            }
        }
        self.flags.push(flag);
        let last = self.flags.len() - 1;
        Ok(&mut self.flags[last])
    }

    /// Find a flag by its long name.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name() == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|f| f.name() == name)
    }

    fn position_short(&self, c: char) -> Option<usize> {
        self.flags.iter().position(|f| f.shorthand() == Some(c))
    }

    /// Iterate flags in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    /// Flags in display order (sorted by name if enabled).
    pub fn display_order(&self) -> Vec<&Flag> {
        let mut flags: Vec<&Flag> = self.flags.iter().collect();
        if self.sort_flags {
            flags.sort_by(|a, b| a.name().cmp(b.name()));
        }
        flags
    }

    /// Sort usage tables by flag name instead of definition order.
    pub fn set_sort_flags(&mut self, sort: bool) {
        self.sort_flags = sort;
    }

    /// Check if any flag is defined, hidden ones included.
    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Check if any flag would be listed in a usage table.
    pub fn has_available_flags(&self) -> bool {
        self.flags.iter().any(Flag::is_visible)
    }

    /// Register `-h` / `--help` unless a `help` flag already exists.
    ///
    /// The shorthand is skipped when another flag already uses `h`.
    pub fn ensure_help(&mut self) {
        if self.lookup(HELP_FLAG).is_some() {
            return;
        }
        let mut help = Flag::bool(HELP_FLAG, false).describe("Display help.");
        if self.position_short('h').is_none() {
            help = help.short('h');
        }
        self.flags.push(help);
    }

    /// Put the help flag back to false so a reused set does not report a
    /// previous request.
    pub(crate) fn clear_help(&mut self) {
        if let Some(idx) = self.position(HELP_FLAG) {
            self.flags[idx].reset();
        }
    }

    /// Check if the help flag was set by a parse.
    pub fn help_requested(&self) -> bool {
        matches!(self.get_bool(HELP_FLAG), Ok(true))
    }

    /// Parse a token slice.
    ///
    /// Values of recognized flags are stored; positional tokens, unknown
    /// options and errors of this parse replace those of the previous one.
    /// All tokens are processed even when some fail; the first failure is
    /// returned.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), FlagError> {
        let pass = self.consume(tokens);
        let result = pass.first_error();
        self.args = pass.positional;
        self.unknown = pass.unknown;
        self.errors = pass.errors;
        self.parsed = true;
        result
    }

    /// Apply a token slice to flag values only.
    ///
    /// Unlike [`FlagSet::parse`] the positional, unknown and error records of
    /// the last parse are left untouched.
    pub fn apply<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), FlagError> {
        self.consume(tokens).first_error()
    }

    /// Check if [`FlagSet::parse`] has been called.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Positional tokens of the last parse.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Unknown options (and their swallowed values) of the last parse.
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    /// Errors recorded by the last parse.
    pub fn errors(&self) -> &[FlagError] {
        &self.errors
    }

    /// Check if a flag was set on the command line.
    pub fn changed(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Flag::is_changed)
    }

    /// Set a flag from its string form, as if given on the command line.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), FlagError> {
        let idx = self
            .position(name)
            .ok_or_else(|| FlagError::NotDefined(name.to_string()))?;
        self.flags[idx]
            .assign(raw)
            .map_err(|reason| FlagError::InvalidValue {
                flag: format!("--{}", name),
                value: raw.to_string(),
                reason,
            })
    }

    /// Keep a flag working but leave it out of usage tables.
    pub fn mark_hidden(&mut self, name: &str) -> Result<(), FlagError> {
        let idx = self
            .position(name)
            .ok_or_else(|| FlagError::NotDefined(name.to_string()))?;
        self.flags[idx].set_hidden();
        Ok(())
    }

    /// Deprecate a flag. It keeps working but is left out of usage tables.
    pub fn mark_deprecated(
        &mut self,
        name: &str,
        message: impl Into<String>,
    ) -> Result<(), FlagError> {
        let message = message.into();
        if message.is_empty() {
            return Err(FlagError::InvalidName(format!(
                "{} (deprecation message must not be empty)",
                name
            )));
        }
        let idx = self
            .position(name)
            .ok_or_else(|| FlagError::NotDefined(name.to_string()))?;
        self.flags[idx].set_deprecated(message);
        Ok(())
    }

    fn typed(&self, name: &str, requested: Kind) -> Result<&Value, FlagError> {
        let flag = self
            .lookup(name)
            .ok_or_else(|| FlagError::NotDefined(name.to_string()))?;
        if flag.kind() != requested {
            return Err(FlagError::TypeMismatch {
                name: name.to_string(),
                requested,
                actual: flag.kind(),
            });
        }
        Ok(flag.value())
    }

    /// Value of a boolean flag.
    pub fn get_bool(&self, name: &str) -> Result<bool, FlagError> {
        match self.typed(name, Kind::Bool)? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.mismatch(name, Kind::Bool, other)),
        }
    }

    /// Value of a signed integer flag.
    pub fn get_int(&self, name: &str) -> Result<i64, FlagError> {
        match self.typed(name, Kind::Int)? {
            Value::Int(i) => Ok(*i),
            other => Err(self.mismatch(name, Kind::Int, other)),
        }
    }

    /// Value of an unsigned integer flag.
    pub fn get_uint(&self, name: &str) -> Result<u64, FlagError> {
        match self.typed(name, Kind::Uint)? {
            Value::Uint(u) => Ok(*u),
            other => Err(self.mismatch(name, Kind::Uint, other)),
        }
    }

    /// Value of a floating point flag.
    pub fn get_float(&self, name: &str) -> Result<f64, FlagError> {
        match self.typed(name, Kind::Float)? {
            Value::Float(x) => Ok(*x),
            other => Err(self.mismatch(name, Kind::Float, other)),
        }
    }

    /// Value of a string flag.
    pub fn get_string(&self, name: &str) -> Result<&str, FlagError> {
        match self.typed(name, Kind::Str)? {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch(name, Kind::Str, other)),
        }
    }

    /// Items of a list flag.
    pub fn get_strings(&self, name: &str) -> Result<&[String], FlagError> {
        match self.typed(name, Kind::List)? {
            Value::List(items) => Ok(items),
            other => Err(self.mismatch(name, Kind::List, other)),
        }
    }

    fn mismatch(&self, name: &str, requested: Kind, actual: &Value) -> FlagError {
        FlagError::TypeMismatch {
            name: name.to_string(),
            requested,
            actual: actual.kind(),
        }
    }

    fn consume<S: AsRef<str>>(&mut self, tokens: &[S]) -> Pass {
        let mut pass = Pass::default();
        let mut cursor = Cursor::new(tokens);

        while let Some(token) = cursor.next() {
            if token == "--" {
                pass.positional.extend(cursor.rest().map(str::to_string));
                break;
            }
            if token.len() < 2 || !token.starts_with('-') {
                pass.positional.push(token.to_string());
                continue;
            }
            match token.strip_prefix("--") {
                Some(body) => self.consume_long(body, &mut cursor, &mut pass),
                None => self.consume_shorts(&token[1..], &mut cursor, &mut pass),
            }
        }

        pass
    }

    fn consume_long<S: AsRef<str>>(
        &mut self,
        body: &str,
        cursor: &mut Cursor<'_, S>,
        pass: &mut Pass,
    ) {
        if body.starts_with('-') || body.starts_with('=') {
            pass.errors.push(FlagError::BadSyntax(format!("--{}", body)));
            return;
        }

        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let label = format!("--{}", name);

        let Some(idx) = self.position(name) else {
            trace!(flag = %label, set = %self.name, "unknown flag");
            pass.unknown.push(format!("--{}", body));
            if inline.is_none() {
                if let Some(value) = cursor.next_unknown_value() {
                    pass.unknown.push(value.to_string());
                }
            }
            return;
        };

        let value = match inline {
            Some(value) => value,
            None if !self.flags[idx].takes_value() => "true",
            None => match cursor.next() {
                Some(value) => value,
                None => {
                    pass.errors.push(FlagError::MissingValue(label));
                    return;
                }
            },
        };
        self.assign(idx, label, value, pass);
    }

    fn consume_shorts<S: AsRef<str>>(
        &mut self,
        cluster: &str,
        cursor: &mut Cursor<'_, S>,
        pass: &mut Pass,
    ) {
        let mut rest = cluster;

        while let Some(c) = rest.chars().next() {
            let after = &rest[c.len_utf8()..];
            let label = format!("-{}", c);

            let Some(idx) = self.position_short(c) else {
                trace!(flag = %label, set = %self.name, "unknown shorthand");
                pass.unknown.push(label);
                if let Some(value) = after.strip_prefix('=') {
                    pass.unknown.push(value.to_string());
                    return;
                }
                if after.is_empty() {
                    if let Some(value) = cursor.next_unknown_value() {
                        pass.unknown.push(value.to_string());
                    }
                    return;
                }
                rest = after;
                continue;
            };

            if let Some(value) = after.strip_prefix('=') {
                self.assign(idx, label, value, pass);
                return;
            }
            if !self.flags[idx].takes_value() {
                self.assign(idx, label, "true", pass);
                rest = after;
                continue;
            }
            if !after.is_empty() {
                self.assign(idx, label, after, pass);
                return;
            }
            match cursor.next() {
                Some(value) => self.assign(idx, label, value, pass),
                None => pass.errors.push(FlagError::MissingValue(label)),
            }
            return;
        }
    }

    fn assign(&mut self, idx: usize, label: String, value: &str, pass: &mut Pass) {
        trace!(flag = %label, value, set = %self.name, "set flag");
        if let Err(reason) = self.flags[idx].assign(value) {
            pass.errors.push(FlagError::InvalidValue {
                flag: label,
                value: value.to_string(),
                reason,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types_set() -> FlagSet {
        FlagSet::new("types")
            .with(Flag::bool("bool", false).short('b').describe("Bool flag."))
            .and_then(|s| s.with(Flag::int("int", 0).short('i').describe("Int flag.")))
            .and_then(|s| s.with(Flag::string("str", "").short('s').describe("String flag.")))
            .unwrap()
    }

    #[test]
    fn parses_long_and_short_forms() {
        let mut flags = types_set();
        flags.parse(&["-b", "-i", "1", "-s", "foobar"]).unwrap();
        assert_eq!(flags.get_bool("bool"), Ok(true));
        assert_eq!(flags.get_int("int"), Ok(1));
        assert_eq!(flags.get_string("str"), Ok("foobar"));
        assert!(flags.changed("int"));
    }

    #[test]
    fn parses_inline_values() {
        let mut flags = types_set();
        flags.parse(&["--int=5", "-sabc", "--bool=false"]).unwrap();
        assert_eq!(flags.get_int("int"), Ok(5));
        assert_eq!(flags.get_string("str"), Ok("abc"));
        assert_eq!(flags.get_bool("bool"), Ok(false));
        assert!(flags.changed("bool"));
    }

    #[test]
    fn clustered_shorthands() {
        let mut flags = types_set();
        flags.parse(&["-bi", "7"]).unwrap();
        assert_eq!(flags.get_bool("bool"), Ok(true));
        assert_eq!(flags.get_int("int"), Ok(7));

        let mut flags = types_set();
        flags.parse(&["-bi9"]).unwrap();
        assert_eq!(flags.get_int("int"), Ok(9));
    }

    #[test]
    fn positional_tokens_are_kept_in_order() {
        let mut flags = types_set();
        flags.parse(&["a", "-b", "-", "b", "--", "-i", "3"]).unwrap();
        assert_eq!(flags.args(), &["a", "-", "b", "-i", "3"]);
        assert_eq!(flags.get_int("int"), Ok(0));
    }

    #[test]
    fn unknown_long_flag_swallows_value() {
        let mut flags = types_set();
        flags.parse(&["--test1", "11", "--int", "2", "rest"]).unwrap();
        assert_eq!(flags.unknown(), &["--test1", "11"]);
        assert_eq!(flags.get_int("int"), Ok(2));
        assert_eq!(flags.args(), &["rest"]);
    }

    #[test]
    fn unknown_flag_does_not_swallow_following_flag() {
        let mut flags = types_set();
        flags.parse(&["--verbose", "-b"]).unwrap();
        assert_eq!(flags.unknown(), &["--verbose"]);
        assert_eq!(flags.get_bool("bool"), Ok(true));
    }

    #[test]
    fn unknown_inline_value_is_not_swallowed_twice() {
        let mut flags = types_set();
        flags.parse(&["--x=1", "pos"]).unwrap();
        assert_eq!(flags.unknown(), &["--x=1"]);
        assert_eq!(flags.args(), &["pos"]);
    }

    #[test]
    fn unknown_shorthand_in_cluster() {
        let mut flags = types_set();
        flags.parse(&["-zb"]).unwrap();
        assert_eq!(flags.unknown(), &["-z"]);
        assert_eq!(flags.get_bool("bool"), Ok(true));

        let mut flags = types_set();
        flags.parse(&["-z", "v", "p"]).unwrap();
        assert_eq!(flags.unknown(), &["-z", "v"]);
        assert_eq!(flags.args(), &["p"]);
    }

    #[test]
    fn invalid_value_is_recorded_and_parsing_continues() {
        let mut flags = types_set();
        let err = flags.parse(&["--int", "abc", "-b"]).unwrap_err();
        assert!(matches!(err, FlagError::InvalidValue { .. }));
        assert_eq!(flags.errors().len(), 1);
        assert_eq!(flags.get_bool("bool"), Ok(true));
        assert_eq!(flags.get_int("int"), Ok(0));
    }

    #[test]
    fn missing_value_is_recorded() {
        let mut flags = types_set();
        assert_eq!(
            flags.parse(&["--str"]),
            Err(FlagError::MissingValue("--str".into()))
        );
        assert_eq!(
            flags.parse(&["-i"]),
            Err(FlagError::MissingValue("-i".into()))
        );
    }

    #[test]
    fn bad_syntax() {
        let mut flags = types_set();
        assert!(matches!(
            flags.parse(&["---x"]),
            Err(FlagError::BadSyntax(_))
        ));
        assert!(matches!(
            flags.parse(&["--=x"]),
            Err(FlagError::BadSyntax(_))
        ));
    }

    #[test]
    fn value_taking_flag_accepts_dash_value() {
        let mut flags = types_set();
        flags.parse(&["--int", "-4"]).unwrap();
        assert_eq!(flags.get_int("int"), Ok(-4));
    }

    #[test]
    fn redefinition_rejected() {
        let mut flags = types_set();
        assert!(matches!(
            flags.add(Flag::int("int", 0)),
            Err(FlagError::Redefined(_))
        ));
        assert!(matches!(
            flags.add(Flag::int("other", 0).short('b')),
            Err(FlagError::Redefined(_))
        ));
        assert!(matches!(
            flags.add(Flag::int("", 0)),
            Err(FlagError::InvalidName(_))
        ));
        assert!(matches!(
            flags.add(Flag::int("a=b", 0)),
            Err(FlagError::InvalidName(_))
        ));
    }

    #[test]
    fn getters_check_kind_and_existence() {
        let flags = types_set();
        assert!(matches!(
            flags.get_int("bool"),
            Err(FlagError::TypeMismatch { .. })
        ));
        assert_eq!(
            flags.get_bool("nope"),
            Err(FlagError::NotDefined("nope".into()))
        );
    }

    #[test]
    fn ensure_help_is_idempotent_and_respects_shorthand() {
        let mut flags = FlagSet::new("x");
        flags.ensure_help();
        flags.ensure_help();
        assert_eq!(flags.iter().count(), 1);
        assert_eq!(flags.lookup(HELP_FLAG).and_then(Flag::shorthand), Some('h'));

        let mut flags = FlagSet::new("y")
            .with(Flag::string("host", "").short('h'))
            .unwrap();
        flags.ensure_help();
        assert_eq!(flags.lookup(HELP_FLAG).and_then(Flag::shorthand), None);
        flags.parse(&["--help"]).unwrap();
        assert!(flags.help_requested());
    }

    #[test]
    fn apply_keeps_previous_records() {
        let mut flags = types_set();
        flags.parse(&["pos", "--unknown"]).unwrap();
        flags.apply(&["--int", "3", "other"]).unwrap();
        assert_eq!(flags.get_int("int"), Ok(3));
        assert_eq!(flags.args(), &["pos"]);
        assert_eq!(flags.unknown(), &["--unknown"]);
    }

    #[test]
    fn set_and_visibility() {
        let mut flags = types_set();
        flags.set("int", "12").unwrap();
        assert_eq!(flags.get_int("int"), Ok(12));
        assert!(flags.set("int", "x").is_err());
        assert!(flags.set("missing", "1").is_err());

        assert!(flags.has_available_flags());
        flags.mark_hidden("bool").unwrap();
        flags.mark_hidden("int").unwrap();
        flags.mark_deprecated("str", "use --text").unwrap();
        assert!(!flags.has_available_flags());
        assert!(flags.has_flags());
        assert!(flags.mark_deprecated("bool", "").is_err());
    }

    #[test]
    fn list_flag_accumulates() {
        let mut flags = FlagSet::new("l")
            .with(Flag::strings("tag", ["x"]).short('t'))
            .unwrap();
        flags.parse(&["--tag", "a,b", "-t", "c"]).unwrap();
        assert_eq!(flags.get_strings("tag").unwrap(), &["a", "b", "c"]);
    }
}
