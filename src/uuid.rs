//! A nullable UUID column value.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
use crate::xml::{XmlElement, XmlError};

/// A UUID that may be SQL NULL.
///
/// The null state carries the all-zero UUID as its inert payload. That is
/// distinct from a present all-zero UUID, which some schemas do store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullUuid {
    /// The UUID payload, meaningful only when `valid` is true.
    pub value: Uuid,
    /// True iff the represented value is present (non-NULL).
    pub valid: bool,
}

impl NullUuid {
    /// A present UUID.
    pub fn new(value: Uuid) -> Self {
        NullUuid { value, valid: true }
    }

    /// The null state.
    pub fn null() -> Self {
        NullUuid::default()
    }

    /// `Some(value)` when present, `None` when null.
    pub fn as_option(&self) -> Option<Uuid> {
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
}

impl PartialEq for NullUuid {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl Eq for NullUuid {}

impl Hash for NullUuid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.value.hash(state);
        }
    }
}

impl From<Uuid> for NullUuid {
    fn from(value: Uuid) -> Self {
        NullUuid::new(value)
    }
}

impl From<Option<Uuid>> for NullUuid {
    fn from(value: Option<Uuid>) -> Self {
        match value {
            Some(value) => NullUuid::new(value),
            None => NullUuid::null(),
        }
    }
}

impl From<NullUuid> for Option<Uuid> {
    fn from(value: NullUuid) -> Self {
        value.as_option()
    }
}

impl Scan for NullUuid {
    /// Accepted driver kinds: NULL, UUID text, and bytes. Byte strings of
    /// exactly 16 bytes are taken as the raw big-endian UUID; any other
    /// length is parsed as UUID text.
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError> {
        match value {
            DriverValue::Null => Ok(NullUuid::null()),
            DriverValue::Text(text) => Ok(NullUuid::new(Uuid::parse_str(&text)?)),
            DriverValue::Bytes(bytes) => {
                if bytes.len() == 16 {
                    Ok(NullUuid::new(Uuid::from_slice(&bytes)?))
                } else {
                    Ok(NullUuid::new(Uuid::parse_str(&String::from_utf8(bytes)?)?))
                }
            }
            other => Err(ConversionError::TypeMismatch {
                expected: "UUID",
                actual: other.kind(),
            }),
        }
    }
}

impl ToDriverValue for NullUuid {
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError> {
        if self.valid {
            Ok(DriverValue::Text(self.value.to_string()))
        } else {
            Ok(DriverValue::Null)
        }
    }
}

impl Serialize for NullUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            self.value.serialize(serializer)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Uuid>::deserialize(deserializer).map(NullUuid::from)
    }
}

impl TryFrom<&XmlElement> for NullUuid {
    type Error = XmlError;

    /// Element text is parsed as a UUID, whitespace trimmed. There is no
    /// canonical zero spelling, so empty text is an error unless the
    /// element is nil, in which case the payload is the all-zero UUID.
    /// Undecodable non-empty text is an error even when nil.
    fn try_from(element: &XmlElement) -> Result<Self, XmlError> {
        let trimmed = element.text().trim();
        if trimmed.is_empty() {
            if element.is_nil() {
                return Ok(NullUuid::null());
            }
            return Err(XmlError::Decode {
                text: String::new(),
                target: "UUID",
            });
        }
        let value = Uuid::parse_str(trimmed).map_err(|_| XmlError::Decode {
            text: trimmed.to_string(),
            target: "UUID",
        })?;
        if element.is_nil() {
            Ok(NullUuid { value, valid: false })
        } else {
            Ok(NullUuid::new(value))
        }
    }
}
