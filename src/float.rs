//! A nullable double-precision float column value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
use crate::xml::{XmlElement, XmlError};

/// A 64-bit float that may be SQL NULL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFloat64 {
    /// The float payload, meaningful only when `valid` is true.
    pub value: f64,
    /// True iff the represented value is present (non-NULL).
    pub valid: bool,
}

impl NullFloat64 {
    /// A present float.
    pub fn new(value: f64) -> Self {
        NullFloat64 { value, valid: true }
    }

    /// The null state.
    pub fn null() -> Self {
        NullFloat64::default()
    }

    /// `Some(value)` when present, `None` when null.
    pub fn as_option(&self) -> Option<f64> {
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
            .map(NullFloat64::new)
            .map_err(|_| ConversionError::InvalidNumber {
                text,
                target: "double",
            })
    }
}

// Payload comparison keeps f64 semantics (NaN != NaN), so no Eq or Hash.
impl PartialEq for NullFloat64 {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl From<f64> for NullFloat64 {
    fn from(value: f64) -> Self {
        NullFloat64::new(value)
    }
}

impl From<Option<f64>> for NullFloat64 {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(value) => NullFloat64::new(value),
            None => NullFloat64::null(),
        }
    }
}

impl From<NullFloat64> for Option<f64> {
    fn from(value: NullFloat64) -> Self {
        value.as_option()
    }
}

impl Scan for NullFloat64 {
    /// Accepted driver kinds: NULL, doubles, integers (widened to f64),
    /// and text or bytes holding a decimal float.
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError> {
        match value {
            DriverValue::Null => Ok(NullFloat64::null()),
            DriverValue::Double(value) => Ok(NullFloat64::new(value)),
            DriverValue::Int(value) => Ok(NullFloat64::new(value as f64)),
            DriverValue::Bytes(bytes) => Self::parse(String::from_utf8(bytes)?),
            DriverValue::Text(text) => Self::parse(text),
            other => Err(ConversionError::TypeMismatch {
                expected: "double",
                actual: other.kind(),
            }),
        }
    }
}

impl ToDriverValue for NullFloat64 {
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError> {
        if self.valid {
            Ok(DriverValue::Double(self.value))
        } else {
            Ok(DriverValue::Null)
        }
    }
}

impl Serialize for NullFloat64 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            serializer.serialize_f64(self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullFloat64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f64>::deserialize(deserializer).map(NullFloat64::from)
    }
}

impl TryFrom<&XmlElement> for NullFloat64 {
    type Error = XmlError;

    /// Element text is parsed as a decimal float, whitespace trimmed.
    /// Empty text is the canonical 0.0. Undecodable text is an error even
    /// when the element is nil.
    fn try_from(element: &XmlElement) -> Result<Self, XmlError> {
        let trimmed = element.text().trim();
        let value = if trimmed.is_empty() {
            0.0
        } else {
            trimmed.parse().map_err(|_| XmlError::Decode {
                text: trimmed.to_string(),
                target: "double",
            })?
        };
        if element.is_nil() {
            Ok(NullFloat64 { value, valid: false })
        } else {
            Ok(NullFloat64::new(value))
        }
    }
}
