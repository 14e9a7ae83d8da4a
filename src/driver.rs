//! The database driver boundary.
//!
//! Drivers hand rows to applications as loosely typed values: SQL NULL, a
//! few scalar kinds, and raw byte strings whose interpretation depends on
//! the column. [`DriverValue`] models that universe, and the [`Scan`] and
//! [`ToDriverValue`] traits are the two halves of the adapter contract every
//! nullable type in this crate implements: scan a driver value in, produce
//! a driver value out.
//!
//! Scanning is strict. Each type accepts a small closed set of input kinds
//! (documented on its `Scan` impl) and rejects everything else with a
//! [`ConversionError`] instead of guessing.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that occur while converting between driver values and nullable
/// column types.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The driver value's kind has no conversion into the target type.
    #[error("cannot convert driver {actual} into {expected}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An integer other than 0 or 1 was scanned into a boolean.
    #[error("integer {0} is not a boolean (expected 0 or 1)")]
    NonBooleanInteger(i64),

    /// Driver text that is neither `true` nor `false` was scanned into a
    /// boolean.
    #[error("{0:?} is not a boolean literal (expected \"true\" or \"false\")")]
    NonBooleanLiteral(String),

    /// Driver text could not be parsed as the target numeric type.
    #[error("cannot parse {text:?} as {target}")]
    InvalidNumber {
        text: String,
        target: &'static str,
    },

    /// Driver text could not be parsed as a datetime in any supported
    /// format.
    #[error("cannot parse {0:?} as a datetime")]
    InvalidDateTime(String),

    /// Driver text or bytes did not hold a valid UUID.
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    /// Driver bytes for a textual column were not valid UTF-8.
    #[error("invalid UTF-8 in driver bytes: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// A raw value exchanged with a database driver.
///
/// This is the closed set of shapes a driver row value can take. Drivers
/// that distinguish more column types on the wire (unsigned widths, decimal
/// text, enum labels) still surface them through one of these: anything
/// textual arrives as [`Bytes`](DriverValue::Bytes) or
/// [`Text`](DriverValue::Text), and the receiving type decides whether the
/// content parses.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverValue {
    /// SQL NULL.
    Null,
    /// A boolean column value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating point number.
    Double(f64),
    /// A raw byte string, possibly UTF-8 text.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// A timezone-aware timestamp.
    DateTime(DateTime<Utc>),
}

impl DriverValue {
    /// Whether this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, DriverValue::Null)
    }

    /// A stable name for the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DriverValue::Null => "null",
            DriverValue::Bool(_) => "boolean",
            DriverValue::Int(_) => "integer",
            DriverValue::Double(_) => "double",
            DriverValue::Bytes(_) => "bytes",
            DriverValue::Text(_) => "text",
            DriverValue::DateTime(_) => "datetime",
        }
    }
}

/// The scan half of the driver contract: build a nullable value from a
/// driver-supplied [`DriverValue`].
///
/// [`DriverValue::Null`] always scans to the null state. The other accepted
/// kinds form a closed per-type set; see each implementation.
pub trait Scan: Sized {
    /// Convert a driver-supplied value into a fully formed instance.
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError>;

    /// Scan a driver-supplied value into an existing instance.
    ///
    /// The replacement is fully constructed before the receiver is touched,
    /// so a failed scan returns the error and leaves `self` unchanged.
    fn scan(&mut self, value: DriverValue) -> Result<(), ConversionError> {
        *self = Self::from_driver(value)?;
        Ok(())
    }
}

/// The write half of the driver contract: produce the value handed to the
/// driver for parameters and inserts.
pub trait ToDriverValue {
    /// The driver-facing representation of this value.
    ///
    /// The null state maps to [`DriverValue::Null`]. None of the types in
    /// this crate can fail here; the `Result` is part of the shared contract
    /// so adapters with fallible encodings fit the same signature.
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_detection() {
        assert!(DriverValue::Null.is_null());
        assert!(!DriverValue::Bool(false).is_null());
        assert!(!DriverValue::Bytes(vec![]).is_null());
    }

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(DriverValue::Null.kind(), "null");
        assert_eq!(DriverValue::Bool(true).kind(), "boolean");
        assert_eq!(DriverValue::Int(7).kind(), "integer");
        assert_eq!(DriverValue::Double(0.5).kind(), "double");
        assert_eq!(DriverValue::Bytes(b"x".to_vec()).kind(), "bytes");
        assert_eq!(DriverValue::Text("x".to_string()).kind(), "text");
        assert_eq!(DriverValue::DateTime(Utc::now()).kind(), "datetime");
    }

    #[test]
    fn test_type_mismatch_message_names_both_sides() {
        let err = ConversionError::TypeMismatch {
            expected: "boolean",
            actual: "double",
        };
        assert_eq!(err.to_string(), "cannot convert driver double into boolean");
    }
}
