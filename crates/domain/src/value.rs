//! Attribute values
//!
//! A closed set of scalar kinds an attribute may carry. The zero-value
//! policy and the encoder both match on it exhaustively.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A scalar attribute value.
///
/// Serializes as the bare JSON scalar; times use RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Absent value (`None`, null reference).
    Null,
    /// Text.
    String(String),
    /// Signed integer.
    Integer(i64),
    /// Unsigned integer.
    Unsigned(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Instant in UTC.
    ///
    /// The UNIX epoch is the zero time, so an attribute holding exactly
    /// `1970-01-01T00:00:00Z` is omitted like an unset one.
    Time(DateTime<Utc>),
}

impl AttributeValue {
    /// The zero time instant (the UNIX epoch).
    ///
    /// This is what `DateTime::<Utc>::default()` produces, so a
    /// `#[derive(Default)]` record carries it until a time is assigned.
    #[must_use]
    pub fn zero_time() -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }

    /// Returns true if this is the zero value of its kind.
    ///
    /// Zero attributes are left out of the resource's `attributes`. For
    /// times that includes a genuine `1970-01-01T00:00:00Z`, which cannot be
    /// told apart from an unset `DateTime::<Utc>::default()`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::Integer(n) => *n == 0,
            Self::Unsigned(n) => *n == 0,
            Self::Float(n) => *n == 0.0,
            Self::Bool(b) => !*b,
            Self::Time(t) => *t == Self::zero_time(),
        }
    }

    /// Returns the name of this value's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Unsigned(_) => "unsigned",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Time(_) => "time",
        }
    }

    /// Returns the string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for AttributeValue {
            fn from(value: $ty) -> Self {
                Self::Integer(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for AttributeValue {
            fn from(value: $ty) -> Self {
                Self::Unsigned(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        Self::Unsigned(u64::try_from(value).unwrap_or(u64::MAX))
    }
}

impl From<isize> for AttributeValue {
    fn from(value: isize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
