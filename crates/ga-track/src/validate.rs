//! Attribute validation
//!
//! Pure predicates over raw field values. `None` means the attribute was
//! absent. Validators never fail loudly; the argument builder turns a
//! `false` into a [`TrackError::Validation`].

use crate::{TrackError, Value};
use std::fmt;
use std::str::FromStr;

/// Checks that `value` is a non-empty, non-whitespace string
pub fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Str(s)) if !s.trim().is_empty())
}

pub fn optional_string(value: Option<&Value>) -> bool {
    value.is_none() || is_string(value)
}

/// Checks for an integer literal (`-12`, `+3`, `42`) or an integral number
pub fn is_int(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Str(s)) => is_int_literal(s),
        Some(Value::Int(_)) => true,
        Some(Value::Float(x)) => x.is_finite() && x.fract() == 0.0,
        _ => false,
    }
}

pub fn optional_int(value: Option<&Value>) -> bool {
    value.is_none() || is_int(value)
}

/// Checks for a decimal literal with a fractional part (`4.2`, `-0.5`) or
/// a non-integral number. Integer-shaped strings are not floats.
pub fn is_float(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Str(s)) => is_float_literal(s),
        Some(Value::Float(x)) => x.is_finite() && x.fract() != 0.0,
        _ => false,
    }
}

pub fn optional_float(value: Option<&Value>) -> bool {
    value.is_none() || is_float(value)
}

/// Checks for `true`/`false` as a boolean or a string
pub fn is_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(_)) => true,
        Some(Value::Str(s)) => s == "true" || s == "false",
        _ => false,
    }
}

pub fn optional_bool(value: Option<&Value>) -> bool {
    value.is_none() || is_bool(value)
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['-', '+']).unwrap_or(s)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_int_literal(s: &str) -> bool {
    all_digits(strip_sign(s))
}

fn is_float_literal(s: &str) -> bool {
    match strip_sign(s).split_once('.') {
        Some((whole, frac)) => all_digits(whole) && all_digits(frac),
        None => false,
    }
}

/// Value type a field is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    String,
    Integer,
    Float,
    Boolean,
}

/// Named validator referenced by a field descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    IsString,
    OptionalString,
    IsInt,
    OptionalInt,
    IsFloat,
    OptionalFloat,
    IsBool,
    OptionalBool,
}

impl ValidatorKind {
    pub const ALL: [ValidatorKind; 8] = [
        Self::IsString,
        Self::OptionalString,
        Self::IsInt,
        Self::OptionalInt,
        Self::IsFloat,
        Self::OptionalFloat,
        Self::IsBool,
        Self::OptionalBool,
    ];

    /// Run the validator
    pub fn check(self, value: Option<&Value>) -> bool {
        match self {
            Self::IsString => is_string(value),
            Self::OptionalString => optional_string(value),
            Self::IsInt => is_int(value),
            Self::OptionalInt => optional_int(value),
            Self::IsFloat => is_float(value),
            Self::OptionalFloat => optional_float(value),
            Self::IsBool => is_bool(value),
            Self::OptionalBool => optional_bool(value),
        }
    }

    /// Whether an absent value passes
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Self::OptionalString | Self::OptionalInt | Self::OptionalFloat | Self::OptionalBool
        )
    }

    pub fn return_type(self) -> ReturnType {
        match self {
            Self::IsString | Self::OptionalString => ReturnType::String,
            Self::IsInt | Self::OptionalInt => ReturnType::Integer,
            Self::IsFloat | Self::OptionalFloat => ReturnType::Float,
            Self::IsBool | Self::OptionalBool => ReturnType::Boolean,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::IsString => "isString",
            Self::OptionalString => "optionalString",
            Self::IsInt => "isInt",
            Self::OptionalInt => "optionalInt",
            Self::IsFloat => "isFloat",
            Self::OptionalFloat => "optionalFloat",
            Self::IsBool => "isBool",
            Self::OptionalBool => "optionalBool",
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lookup by the page-facing validator name (`"isString"`, `"optionalInt"`, ...).
/// Descriptor tables use the enum directly; this is the entry point for
/// names that arrive as text, and the only source of `UnknownValidator`.
impl FromStr for ValidatorKind {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| TrackError::UnknownValidator(s.to_string()))
    }
}
