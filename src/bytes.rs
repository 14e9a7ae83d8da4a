//! A nullable binary column value.

use std::hash::{Hash, Hasher};

use base64::Engine;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
use crate::xml::{XmlElement, XmlError};

/// A byte string that may be SQL NULL.
///
/// Binary payloads cross the text boundaries (JSON and XML) as standard
/// base64 with padding; the driver boundary carries them raw.
#[derive(Debug, Clone, Default)]
pub struct NullBytes {
    /// The binary payload, meaningful only when `valid` is true.
    pub value: Vec<u8>,
    /// True iff the represented value is present (non-NULL).
    pub valid: bool,
}

impl NullBytes {
    /// A present byte string.
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        NullBytes {
            value: value.into(),
            valid: true,
        }
    }

    /// The null state.
    pub fn null() -> Self {
        NullBytes::default()
    }

    /// `Some(&value)` when present, `None` when null.
    pub fn as_option(&self) -> Option<&[u8]> {
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

impl PartialEq for NullBytes {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl Eq for NullBytes {}

impl Hash for NullBytes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.value.hash(state);
        }
    }
}

impl From<Vec<u8>> for NullBytes {
    fn from(value: Vec<u8>) -> Self {
        NullBytes::new(value)
    }
}

impl From<&[u8]> for NullBytes {
    fn from(value: &[u8]) -> Self {
        NullBytes::new(value)
    }
}

impl From<Option<Vec<u8>>> for NullBytes {
    fn from(value: Option<Vec<u8>>) -> Self {
        match value {
            Some(value) => NullBytes::new(value),
            None => NullBytes::null(),
        }
    }
}

impl From<NullBytes> for Option<Vec<u8>> {
    fn from(value: NullBytes) -> Self {
        if value.valid {
            Some(value.value)
        } else {
            None
        }
    }
}

impl Scan for NullBytes {
    /// Accepted driver kinds: NULL, bytes, and text (taken as its UTF-8
    /// bytes). This is the one type where any byte content is welcome.
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError> {
        match value {
            DriverValue::Null => Ok(NullBytes::null()),
            DriverValue::Bytes(bytes) => Ok(NullBytes::new(bytes)),
            DriverValue::Text(text) => Ok(NullBytes::new(text.into_bytes())),
            other => Err(ConversionError::TypeMismatch {
                expected: "bytes",
                actual: other.kind(),
            }),
        }
    }
}

impl ToDriverValue for NullBytes {
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError> {
        if self.valid {
            Ok(DriverValue::Bytes(self.value.clone()))
        } else {
            Ok(DriverValue::Null)
        }
    }
}

impl Serialize for NullBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&self.value);
            serializer.serialize_str(&encoded)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => base64::engine::general_purpose::STANDARD
                .decode(&encoded)
                .map(NullBytes::new)
                .map_err(de::Error::custom),
            None => Ok(NullBytes::null()),
        }
    }
}

impl TryFrom<&XmlElement> for NullBytes {
    type Error = XmlError;

    /// Element text is base64-decoded, whitespace trimmed. Empty text is
    /// the empty byte string. Undecodable text is an error even when the
    /// element is nil.
    fn try_from(element: &XmlElement) -> Result<Self, XmlError> {
        let trimmed = element.text().trim();
        let value = if trimmed.is_empty() {
            Vec::new()
        } else {
            base64::engine::general_purpose::STANDARD
                .decode(trimmed)
                .map_err(|_| XmlError::Decode {
                    text: trimmed.to_string(),
                    target: "base64 binary",
                })?
        };
        if element.is_nil() {
            Ok(NullBytes { value, valid: false })
        } else {
            Ok(NullBytes::new(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_takes_bytes_and_text() {
        assert_eq!(
            NullBytes::from_driver(DriverValue::Bytes(vec![0x01, 0x02])).unwrap(),
            NullBytes::new(vec![0x01, 0x02])
        );
        assert_eq!(
            NullBytes::from_driver(DriverValue::Text("abc".to_string())).unwrap(),
            NullBytes::new(b"abc".to_vec())
        );
        assert!(matches!(
            NullBytes::from_driver(DriverValue::Bool(true)),
            Err(ConversionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_json_is_standard_base64() {
        let payload = NullBytes::new(vec![0x01, 0x02, 0x03]);
        assert_eq!(serde_json::to_string(&payload).unwrap(), "\"AQID\"");
        assert_eq!(
            serde_json::from_str::<NullBytes>("\"AQID\"").unwrap(),
            payload
        );
        assert_eq!(
            serde_json::from_str::<NullBytes>("null").unwrap(),
            NullBytes::null()
        );
        assert!(serde_json::from_str::<NullBytes>("\"not base64!\"").is_err());
    }

    #[test]
    fn test_null_is_not_the_empty_byte_string() {
        assert_ne!(NullBytes::null(), NullBytes::new(Vec::new()));
    }

    #[test]
    fn test_xml_base64_decoding() {
        let element = XmlElement::parse("<blob>AQID</blob>").unwrap();
        assert_eq!(
            NullBytes::from_xml(&element).unwrap(),
            NullBytes::new(vec![0x01, 0x02, 0x03])
        );

        let empty = XmlElement::parse("<blob></blob>").unwrap();
        assert_eq!(
            NullBytes::from_xml(&empty).unwrap(),
            NullBytes::new(Vec::new())
        );

        let nil = XmlElement::parse(r#"<blob nil="true"/>"#).unwrap();
        assert_eq!(NullBytes::from_xml(&nil).unwrap(), NullBytes::null());

        let junk = XmlElement::parse(r#"<blob nil="true">???</blob>"#).unwrap();
        assert!(matches!(
            NullBytes::from_xml(&junk),
            Err(XmlError::Decode { .. })
        ));
    }
}
