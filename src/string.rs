//! A nullable text column value.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
use crate::xml::{XmlElement, XmlError};

/// A string that may be SQL NULL.
///
/// The distinction between NULL and the empty string is the whole point of
/// this type: both occur in real columns and they are not the same value.
#[derive(Debug, Clone, Default)]
pub struct NullString {
    /// The text payload, meaningful only when `valid` is true.
    pub value: String,
    /// True iff the represented value is present (non-NULL).
    pub valid: bool,
}

impl NullString {
    /// A present string.
    pub fn new(value: impl Into<String>) -> Self {
        NullString {
            value: value.into(),
            valid: true,
        }
    }

    /// The null state.
    pub fn null() -> Self {
        NullString::default()
    }

    /// `Some(&value)` when present, `None` when null.
    pub fn as_option(&self) -> Option<&str> {
        if self.valid {
            Some(&self.value)
        } else {
            None
        }
    }

    /// Deserialize from a parsed XML element.
    pub fn from_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Self::try_from(element)
    }
}

impl PartialEq for NullString {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl Eq for NullString {}

impl Hash for NullString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.value.hash(state);
        }
    }
}

impl From<String> for NullString {
    fn from(value: String) -> Self {
        NullString::new(value)
    }
}

impl From<&str> for NullString {
    fn from(value: &str) -> Self {
        NullString::new(value)
    }
}

impl From<Option<String>> for NullString {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => NullString::new(value),
            None => NullString::null(),
        }
    }
}

impl From<NullString> for Option<String> {
    fn from(value: NullString) -> Self {
        if value.valid {
            Some(value.value)
        } else {
            None
        }
    }
}

impl Scan for NullString {
    /// Accepted driver kinds: NULL, text, and bytes holding UTF-8.
    /// Numeric and boolean driver values are not implicitly stringified;
    /// a column that scans into text should arrive as text.
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError> {
        match value {
            DriverValue::Null => Ok(NullString::null()),
            DriverValue::Text(text) => Ok(NullString::new(text)),
            DriverValue::Bytes(bytes) => Ok(NullString::new(String::from_utf8(bytes)?)),
            other => Err(ConversionError::TypeMismatch {
                expected: "text",
                actual: other.kind(),
            }),
        }
    }
}

impl ToDriverValue for NullString {
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError> {
        if self.valid {
            Ok(DriverValue::Text(self.value.clone()))
        } else {
            Ok(DriverValue::Null)
        }
    }
}

impl Serialize for NullString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            serializer.serialize_str(&self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(NullString::from)
    }
}

impl TryFrom<&XmlElement> for NullString {
    type Error = XmlError;

    /// Element text is taken verbatim: whitespace is content for a text
    /// column, so nothing is trimmed and empty text is the empty string.
    /// Decoding cannot fail; the `Result` is the family-wide signature.
    fn try_from(element: &XmlElement) -> Result<Self, XmlError> {
        if element.is_nil() {
            Ok(NullString {
                value: element.text().to_string(),
                valid: false,
            })
        } else {
            Ok(NullString::new(element.text()))
        }
    }
}
