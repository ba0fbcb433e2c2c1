//! The closed set of flag kinds and the values and slots that carry them.
//!
//! Every bindable leaf field is one of eight Rust types. [`Kind`] names them,
//! [`Value`] holds an owned value of one of them, and [`Slot`] is a mutable
//! reference into a config struct's field. The [`Leaf`] trait ties a Rust type
//! to its variant; it is implemented for exactly these eight types.

use std::fmt;
use std::time::Duration;

use crate::duration;
use crate::error::ParseError;

/// The kinds a generated flag can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Kind {
    Bool,
    Duration,
    Float64,
    Int,
    Int64,
    String,
    Uint,
    Uint64,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Duration => "duration",
            Kind::Float64 => "float64",
            Kind::Int => "int",
            Kind::Int64 => "int64",
            Kind::String => "string",
            Kind::Uint => "uint",
            Kind::Uint64 => "uint64",
        }
    }

    /// Parse text into a value of this kind.
    ///
    /// Integers take an optional sign and a `0x`, `0o`, `0b` or leading-`0`
    /// (octal) prefix; `_` separators are allowed after a prefix. Booleans use
    /// [`parse_bool`]. Durations use the `1h30m` / `1.5s` / `300ms` grammar.
    pub fn parse(self, text: &str) -> Result<Value, ParseError> {
        let err = |reason: &str| ParseError::new(text, self, reason);
        match self {
            Kind::Bool => parse_bool(text)
                .map(Value::Bool)
                .ok_or_else(|| err("invalid syntax")),
            Kind::Duration => duration::parse(text).map(Value::Duration).map_err(err),
            Kind::Float64 => text
                .parse::<f64>()
                .map(Value::Float64)
                .map_err(|_| err("invalid syntax")),
            Kind::Int => {
                let n = parse_signed(text).map_err(err)?;
                i32::try_from(n)
                    .map(Value::Int)
                    .map_err(|_| err("value out of range"))
            }
            Kind::Int64 => {
                let n = parse_signed(text).map_err(err)?;
                i64::try_from(n)
                    .map(Value::Int64)
                    .map_err(|_| err("value out of range"))
            }
            Kind::String => Ok(Value::String(text.to_string())),
            Kind::Uint => {
                let n = parse_unsigned(text).map_err(err)?;
                u32::try_from(n)
                    .map(Value::Uint)
                    .map_err(|_| err("value out of range"))
            }
            Kind::Uint64 => parse_unsigned(text).map(Value::Uint64).map_err(err),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An owned value of one of the flag kinds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_duration"))]
    Duration(Duration),
    Float64(f64),
    Int(i32),
    Int64(i64),
    String(String),
    Uint(u32),
    Uint64(u64),
}

#[cfg(feature = "serde")]
fn serialize_duration<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&duration::Display(*d))
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Duration(_) => Kind::Duration,
            Value::Float64(_) => Kind::Float64,
            Value::Int(_) => Kind::Int,
            Value::Int64(_) => Kind::Int64,
            Value::String(_) => Kind::String,
            Value::Uint(_) => Kind::Uint,
            Value::Uint64(_) => Kind::Uint64,
        }
    }

    /// Whether this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Duration(d) => d.is_zero(),
            Value::Float64(f) => *f == 0.0,
            Value::Int(n) => *n == 0,
            Value::Int64(n) => *n == 0,
            Value::String(s) => s.is_empty(),
            Value::Uint(n) => *n == 0,
            Value::Uint64(n) => *n == 0,
        }
    }
}

/// Renders in the same grammar [`Kind::parse`] accepts.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Duration(d) => write!(f, "{}", duration::Display(*d)),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Int64(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Uint64(n) => write!(f, "{n}"),
        }
    }
}

/// A settable reference to a leaf field inside a config struct.
#[derive(Debug)]
pub enum Slot<'a> {
    Bool(&'a mut bool),
    Duration(&'a mut Duration),
    Float64(&'a mut f64),
    Int(&'a mut i32),
    Int64(&'a mut i64),
    String(&'a mut String),
    Uint(&'a mut u32),
    Uint64(&'a mut u64),
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        self.get().kind()
    }

    /// Snapshot of the field's current value.
    pub fn get(&self) -> Value {
        match self {
            Slot::Bool(v) => Value::Bool(**v),
            Slot::Duration(v) => Value::Duration(**v),
            Slot::Float64(v) => Value::Float64(**v),
            Slot::Int(v) => Value::Int(**v),
            Slot::Int64(v) => Value::Int64(**v),
            Slot::String(v) => Value::String((**v).clone()),
            Slot::Uint(v) => Value::Uint(**v),
            Slot::Uint64(v) => Value::Uint64(**v),
        }
    }

    /// Store `value` into the field. Returns `false`, leaving the field
    /// untouched, if the value's kind does not match the slot's.
    pub fn set(&mut self, value: Value) -> bool {
        match (self, value) {
            (Slot::Bool(slot), Value::Bool(v)) => **slot = v,
            (Slot::Duration(slot), Value::Duration(v)) => **slot = v,
            (Slot::Float64(slot), Value::Float64(v)) => **slot = v,
            (Slot::Int(slot), Value::Int(v)) => **slot = v,
            (Slot::Int64(slot), Value::Int64(v)) => **slot = v,
            (Slot::String(slot), Value::String(v)) => **slot = v,
            (Slot::Uint(slot), Value::Uint(v)) => **slot = v,
            (Slot::Uint64(slot), Value::Uint64(v)) => **slot = v,
            _ => return false,
        }
        true
    }
}

/// A Rust type that maps to one flag kind.
pub trait Leaf {
    fn slot(&mut self) -> Slot<'_>;

    fn value(&self) -> Value;
}

macro_rules! impl_leaf {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Leaf for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }

                fn value(&self) -> Value {
                    Value::$variant(self.clone())
                }
            }
        )*
    };
}

impl_leaf! {
    bool => Bool,
    Duration => Duration,
    f64 => Float64,
    i32 => Int,
    i64 => Int64,
    String => String,
    u32 => Uint,
    u64 => Uint64,
}

/// Static description of one struct field, generated by `#[derive(Conf)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// The Rust field name.
    pub ident: &'static str,
    /// `#[conf(name = "...")]`; `Some("-")` marks the field as skipped.
    pub name: Option<&'static str>,
    /// `#[conf(usage = "...")]`.
    pub usage: Option<&'static str>,
    /// `#[conf(redact = "...")]`, unparsed.
    pub redact: Option<&'static str>,
    /// `false` for private fields.
    pub exported: bool,
    /// `#[conf(nested)]`.
    pub nested: bool,
}

/// Alias value that drops a field from flag and env generation.
pub const SKIP: &str = "-";

impl FieldMeta {
    pub fn is_skipped(&self) -> bool {
        self.name == Some(SKIP)
    }

    /// The path segment for this field: its alias, or its Rust name.
    pub fn segment(&self) -> &'static str {
        self.name.unwrap_or(self.ident)
    }
}

/// Parse a boolean literal: `1`, `t`, `true`, `0`, `f`, `false`. The
/// alphabetic forms are case-insensitive.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" => Some(true),
        "0" => Some(false),
        t if t.eq_ignore_ascii_case("t") || t.eq_ignore_ascii_case("true") => Some(true),
        f if f.eq_ignore_ascii_case("f") || f.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn parse_signed(text: &str) -> Result<i128, &'static str> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = parse_unsigned(digits)? as i128;
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_unsigned(text: &str) -> Result<u64, &'static str> {
    let lower = text.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };

    if !underscores_ok(&lower) {
        return Err("invalid syntax");
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() || cleaned.starts_with(['+', '-']) {
        return Err("invalid syntax");
    }
    u64::from_str_radix(&cleaned, radix).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => "value out of range",
        _ => "invalid syntax",
    })
}

/// `_` may only sit between two digits, or between a base prefix and a
/// digit: `1_000` and `0x_ff` are fine, `_1`, `1__0` and `1_` are not.
fn underscores_ok(text: &str) -> bool {
    #[derive(PartialEq)]
    enum Saw {
        Start,
        Digit,
        Underscore,
        Other,
    }

    let bytes = text.as_bytes();
    let mut saw = Saw::Start;
    let mut i = 0;
    let mut hex = false;
    if bytes.len() >= 2 && bytes[0] == b'0' && matches!(bytes[1], b'b' | b'o' | b'x') {
        saw = Saw::Digit;
        hex = bytes[1] == b'x';
        i = 2;
    }
    for &b in &bytes[i..] {
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            saw = Saw::Digit;
        } else if b == b'_' {
            if saw != Saw::Digit {
                return false;
            }
            saw = Saw::Underscore;
        } else if saw == Saw::Underscore {
            return false;
        } else {
            saw = Saw::Other;
        }
    }
    saw != Saw::Underscore
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_grammar() {
        for t in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool(t), Some(true), "{t}");
        }
        for f in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool(f), Some(false), "{f}");
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("notbool"), None);
    }

    #[test]
    fn int_accepts_prefixes() {
        assert_eq!(Kind::Int.parse("42").unwrap(), Value::Int(42));
        assert_eq!(Kind::Int.parse("-42").unwrap(), Value::Int(-42));
        assert_eq!(Kind::Int.parse("+7").unwrap(), Value::Int(7));
        assert_eq!(Kind::Int.parse("0x1F").unwrap(), Value::Int(31));
        assert_eq!(Kind::Int.parse("0o17").unwrap(), Value::Int(15));
        assert_eq!(Kind::Int.parse("017").unwrap(), Value::Int(15));
        assert_eq!(Kind::Int.parse("0b101").unwrap(), Value::Int(5));
        assert_eq!(Kind::Int.parse("0x_ff").unwrap(), Value::Int(255));
        assert_eq!(Kind::Int.parse("0").unwrap(), Value::Int(0));
    }

    #[test]
    fn underscores_separate_digits() {
        assert_eq!(Kind::Int.parse("1_000").unwrap(), Value::Int(1000));
        assert_eq!(Kind::Int.parse("-1_000").unwrap(), Value::Int(-1000));
        assert_eq!(Kind::Uint64.parse("0x_ff_ff").unwrap(), Value::Uint64(0xffff));
        assert_eq!(Kind::Int64.parse("0_17").unwrap(), Value::Int64(15));
        for bad in ["_1", "1_", "1__0", "0x__ff", "0x_", "0b1_"] {
            assert!(Kind::Int.parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn int_rejects_garbage() {
        let err = Kind::Int.parse("notanint").unwrap_err();
        assert_eq!(err.value, "notanint");
        assert_eq!(err.kind, Kind::Int);
        assert!(err.to_string().contains("invalid syntax"));
        assert!(Kind::Int.parse("").is_err());
        assert!(Kind::Int.parse("--1").is_err());
    }

    #[test]
    fn int_range_is_checked() {
        let err = Kind::Int.parse("3000000000").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert_eq!(
            Kind::Int64.parse("3000000000").unwrap(),
            Value::Int64(3_000_000_000)
        );
        assert_eq!(
            Kind::Int64.parse("-9223372036854775808").unwrap(),
            Value::Int64(i64::MIN)
        );
    }

    #[test]
    fn unsigned_rejects_sign() {
        assert!(Kind::Uint.parse("-1").is_err());
        assert!(Kind::Uint64.parse("+1").is_err());
        assert_eq!(
            Kind::Uint64.parse("18446744073709551615").unwrap(),
            Value::Uint64(u64::MAX)
        );
        assert!(Kind::Uint.parse("4294967296").is_err());
    }

    #[test]
    fn float_and_string() {
        assert_eq!(Kind::Float64.parse("1.5").unwrap(), Value::Float64(1.5));
        assert_eq!(Kind::Float64.parse("1e3").unwrap(), Value::Float64(1000.0));
        assert!(Kind::Float64.parse("abc").is_err());
        assert_eq!(
            Kind::String.parse("hello world").unwrap(),
            Value::String("hello world".into())
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let values = [
            Value::Bool(true),
            Value::Duration(Duration::from_millis(1500)),
            Value::Float64(0.25),
            Value::Int(-3),
            Value::Uint64(7),
        ];
        for v in values {
            assert_eq!(v.kind().parse(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn slot_set_checks_kind() {
        let mut port: u32 = 80;
        let mut slot = port.slot();
        assert!(!slot.set(Value::Int(1)));
        assert!(slot.set(Value::Uint(8080)));
        assert_eq!(slot.get(), Value::Uint(8080));
        assert_eq!(port, 8080);
    }

    #[test]
    fn zero_values() {
        assert!(Value::String(String::new()).is_zero());
        assert!(Value::Duration(Duration::ZERO).is_zero());
        assert!(!Value::Bool(true).is_zero());
    }

    #[test]
    fn skip_sentinel() {
        let meta = FieldMeta {
            ident: "extra",
            name: Some("-"),
            usage: None,
            redact: None,
            exported: true,
            nested: false,
        };
        assert!(meta.is_skipped());
        let aliased = FieldMeta {
            name: Some("x"),
            ..meta
        };
        assert!(!aliased.is_skipped());
        assert_eq!(aliased.segment(), "x");
    }
}
