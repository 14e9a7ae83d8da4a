//! A nullable 64-bit integer column value.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
use crate::xml::{XmlElement, XmlError};

/// A 64-bit signed integer that may be SQL NULL.
///
/// Unlike [`NullBool`](crate::NullBool), the JSON boundary here is strict:
/// a wrong-typed JSON value is a deserialization error, not a silent null.
/// The boolean's leniency is a compatibility guarantee specific to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInt64 {
    /// The integer payload, meaningful only when `valid` is true.
    pub value: i64,
    /// True iff the represented value is present (non-NULL).
    pub valid: bool,
}

impl NullInt64 {
    /// A present integer.
    pub fn new(value: i64) -> Self {
        NullInt64 { value, valid: true }
    }

    /// The null state.
    pub fn null() -> Self {
        NullInt64::default()
    }

    /// `Some(value)` when present, `None` when null.
    pub fn as_option(&self) -> Option<i64> {
        if self.valid {
            Some(self.value)
        } else {
            None
        }
    }

    /// Deserialize from a parsed XML element.
    pub fn from_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Self::try_from(element)
    }

    fn parse(text: String) -> Result<Self, ConversionError> {
        text.parse()
            .map(NullInt64::new)
            .map_err(|_| ConversionError::InvalidNumber {
                text,
                target: "integer",
            })
    }
}

impl PartialEq for NullInt64 {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl Eq for NullInt64 {}

impl Hash for NullInt64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.value.hash(state);
        }
    }
}

impl From<i64> for NullInt64 {
    fn from(value: i64) -> Self {
        NullInt64::new(value)
    }
}

impl From<Option<i64>> for NullInt64 {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(value) => NullInt64::new(value),
            None => NullInt64::null(),
        }
    }
}

impl From<NullInt64> for Option<i64> {
    fn from(value: NullInt64) -> Self {
        value.as_option()
    }
}

impl Scan for NullInt64 {
    /// Accepted driver kinds: NULL, integers, and text or bytes holding a
    /// decimal integer. Doubles are not silently truncated.
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError> {
        match value {
            DriverValue::Null => Ok(NullInt64::null()),
            DriverValue::Int(value) => Ok(NullInt64::new(value)),
            DriverValue::Bytes(bytes) => Self::parse(String::from_utf8(bytes)?),
            DriverValue::Text(text) => Self::parse(text),
            other => Err(ConversionError::TypeMismatch {
                expected: "integer",
                actual: other.kind(),
            }),
        }
    }
}

impl ToDriverValue for NullInt64 {
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError> {
        if self.valid {
            Ok(DriverValue::Int(self.value))
        } else {
            Ok(DriverValue::Null)
        }
    }
}

impl Serialize for NullInt64 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            serializer.serialize_i64(self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullInt64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer).map(NullInt64::from)
    }
}

impl TryFrom<&XmlElement> for NullInt64 {
    type Error = XmlError;

    /// Element text is parsed as a decimal integer, whitespace trimmed.
    /// Empty text is the canonical 0. Undecodable text is an error even
    /// when the element is nil.
    fn try_from(element: &XmlElement) -> Result<Self, XmlError> {
        let trimmed = element.text().trim();
        let value = if trimmed.is_empty() {
            0
        } else {
            trimmed.parse().map_err(|_| XmlError::Decode {
                text: trimmed.to_string(),
                target: "integer",
            })?
        };
        if element.is_nil() {
            Ok(NullInt64 { value, valid: false })
        } else {
            Ok(NullInt64::new(value))
        }
    }
}
