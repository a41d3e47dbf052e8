//! flags::errors
//!
//! Error types for flag definition, parsing and lookup.
//!
//! # Design
//!
//! Unknown options are not errors: a flag set is shared between tree levels
//! and tokens it does not recognize are expected to belong to another level.
//! Only definition mistakes, malformed tokens and unparsable values are
//! reported here.

use thiserror::Error;

use super::value::Kind;

/// Errors from flag set operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlagError {
    /// A flag was defined with an empty or malformed name.
    #[error("invalid flag name '{0}'")]
    InvalidName(String),

    /// A long name or shorthand is already taken in this set.
    #[error("flag redefined: {0}")]
    Redefined(String),

    /// Lookup of a flag that was never defined.
    #[error("flag accessed but not defined: {0}")]
    NotDefined(String),

    /// A typed getter was used on a flag of another kind.
    #[error("trying to get {requested} value of flag '{name}' of type {actual}")]
    TypeMismatch {
        /// Flag name
        name: String,
        /// Kind asked for by the caller
        requested: Kind,
        /// Kind the flag was defined with
        actual: Kind,
    },

    /// A value could not be converted to the flag's kind.
    #[error("invalid argument \"{value}\" for \"{flag}\" flag: {reason}")]
    InvalidValue {
        /// Flag as written on the command line (e.g. `--count` or `-c`)
        flag: String,
        /// Offending value
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// A value-taking flag was the last token.
    #[error("flag needs an argument: {0}")]
    MissingValue(String),

    /// Tokens like `---x` or `--=x`.
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
}

impl FlagError {
    /// Check if this error comes from the token stream rather than from
    /// how the flag set was defined or queried.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            FlagError::InvalidValue { .. } | FlagError::MissingValue(_) | FlagError::BadSyntax(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_mentions_flag_and_value() {
        let err = FlagError::InvalidValue {
            flag: "--count".into(),
            value: "abc".into(),
            reason: "invalid digit found in string".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("--count"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn type_mismatch_names_both_kinds() {
        let err = FlagError::TypeMismatch {
            name: "verbose".into(),
            requested: Kind::Int,
            actual: Kind::Bool,
        };
        let msg = err.to_string();
        assert!(msg.contains("int"));
        assert!(msg.contains("bool"));
        assert!(msg.contains("verbose"));
    }

    #[test]
    fn parse_error_classification() {
        assert!(FlagError::MissingValue("--name".into()).is_parse_error());
        assert!(FlagError::BadSyntax("---x".into()).is_parse_error());
        assert!(!FlagError::NotDefined("x".into()).is_parse_error());
        assert!(!FlagError::Redefined("x".into()).is_parse_error());
    }
}
