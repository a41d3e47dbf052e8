//! flags::value
//!
//! Typed flag values and their string conversions.

use std::fmt;

/// The kind of value a flag holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    Str,
    List,
}

impl Kind {
    /// Placeholder printed after the flag name in usage tables.
    ///
    /// Boolean flags take no value and therefore have none.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Kind::Bool => None,
            Kind::Int => Some("int"),
            Kind::Uint => Some("uint"),
            Kind::Float => Some("float"),
            Kind::Str => Some("string"),
            Kind::List => Some("strings"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::List => "strings",
        };
        f.write_str(name)
    }
}

/// A flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
        }
    }

    /// Check if this is the zero value of its kind.
    ///
    /// Zero defaults are not printed in usage tables.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Uint(u) => *u == 0,
            Value::Float(x) => *x == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
        }
    }

    /// Convert a raw token into a value of the given kind.
    ///
    /// Lists are split on commas. The error is a human readable reason.
    pub fn parse(kind: Kind, raw: &str) -> Result<Value, String> {
        match kind {
            Kind::Bool => parse_bool(raw).map(Value::Bool),
            Kind::Int => parse_int(raw).map(Value::Int),
            Kind::Uint => parse_uint(raw).map(Value::Uint),
            Kind::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| e.to_string()),
            Kind::Str => Ok(Value::Str(raw.to_string())),
            Kind::List => Ok(Value::List(split_list(raw))),
        }
    }

    /// Text used for `(default ...)` in usage tables.
    pub fn default_text(&self) -> String {
        match self {
            Value::Str(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("invalid syntax".to_string()),
    }
}

/// Split off a `0x` / `0o` / `0b` prefix.
fn split_radix(digits: &str) -> (u32, &str) {
    let prefixes: [(&str, &str, u32); 3] = [("0x", "0X", 16), ("0o", "0O", 8), ("0b", "0B", 2)];
    for (lower, upper, radix) in prefixes {
        if let Some(rest) = digits
            .strip_prefix(lower)
            .or_else(|| digits.strip_prefix(upper))
        {
            return (radix, rest);
        }
    }
    (10, digits)
}

fn parse_int(raw: &str) -> Result<i64, String> {
    let (sign, body) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (radix, digits) = split_radix(body);
    if digits.starts_with(['+', '-']) {
        return Err("invalid syntax".to_string());
    }
    i64::from_str_radix(&format!("{}{}", sign, digits), radix).map_err(|e| e.to_string())
}

fn parse_uint(raw: &str) -> Result<u64, String> {
    let (radix, digits) = split_radix(raw);
    if digits.starts_with(['+', '-']) {
        return Err("invalid syntax".to_string());
    }
    u64::from_str_radix(digits, radix).map_err(|e| e.to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}
