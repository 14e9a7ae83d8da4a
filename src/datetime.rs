//! A nullable timestamp column value.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
use crate::xml::{XmlElement, XmlError};

/// Parse datetime text in the formats drivers actually emit. Values
/// without an explicit offset are taken as UTC.
fn parse_datetime_text(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC 3339 first (ISO 8601 with timezone)
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try timestamp format without fractional seconds
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    // Try timestamp format with fractional seconds
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    // Try timestamp format with timezone offset
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    None
}

/// A timezone-aware timestamp that may be SQL NULL.
///
/// Everything is normalized to UTC on the way in. The null state carries
/// the Unix epoch as its inert payload.
#[derive(Debug, Clone, Copy)]
pub struct NullDateTime {
    /// The timestamp payload, meaningful only when `valid` is true.
    pub value: DateTime<Utc>,
    /// True iff the represented value is present (non-NULL).
    pub valid: bool,
}

impl NullDateTime {
    /// A present timestamp.
    pub fn new(value: DateTime<Utc>) -> Self {
        NullDateTime { value, valid: true }
    }

    /// The null state.
    pub fn null() -> Self {
        NullDateTime::default()
    }

    /// `Some(value)` when present, `None` when null.
    pub fn as_option(&self) -> Option<DateTime<Utc>> {
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
        parse_datetime_text(&text)
            .map(NullDateTime::new)
            .ok_or(ConversionError::InvalidDateTime(text))
    }
}

impl Default for NullDateTime {
    fn default() -> Self {
        NullDateTime {
            value: DateTime::<Utc>::UNIX_EPOCH,
            valid: false,
        }
    }
}

impl PartialEq for NullDateTime {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl Eq for NullDateTime {}

impl Hash for NullDateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.value.hash(state);
        }
    }
}

impl From<DateTime<Utc>> for NullDateTime {
    fn from(value: DateTime<Utc>) -> Self {
        NullDateTime::new(value)
    }
}

impl From<Option<DateTime<Utc>>> for NullDateTime {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        match value {
            Some(value) => NullDateTime::new(value),
            None => NullDateTime::null(),
        }
    }
}

impl From<NullDateTime> for Option<DateTime<Utc>> {
    fn from(value: NullDateTime) -> Self {
        value.as_option()
    }
}

impl Scan for NullDateTime {
    /// Accepted driver kinds: NULL, datetimes, and text or bytes in one of
    /// the supported formats (RFC 3339, `%Y-%m-%d %H:%M:%S` with optional
    /// fractional seconds or offset).
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError> {
        match value {
            DriverValue::Null => Ok(NullDateTime::null()),
            DriverValue::DateTime(value) => Ok(NullDateTime::new(value)),
            DriverValue::Bytes(bytes) => Self::parse(String::from_utf8(bytes)?),
            DriverValue::Text(text) => Self::parse(text),
            other => Err(ConversionError::TypeMismatch {
                expected: "datetime",
                actual: other.kind(),
            }),
        }
    }
}

impl ToDriverValue for NullDateTime {
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError> {
        if self.valid {
            Ok(DriverValue::DateTime(self.value))
        } else {
            Ok(DriverValue::Null)
        }
    }
}

impl Serialize for NullDateTime {
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

impl<'de> Deserialize<'de> for NullDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer).map(NullDateTime::from)
    }
}

impl TryFrom<&XmlElement> for NullDateTime {
    type Error = XmlError;

    /// Element text goes through the same format ladder as driver text.
    /// There is no canonical zero spelling for a timestamp, so empty text
    /// is an error unless the element is nil, in which case the payload is
    /// the epoch. Undecodable non-empty text is an error even when nil.
    fn try_from(element: &XmlElement) -> Result<Self, XmlError> {
        let trimmed = element.text().trim();
        if trimmed.is_empty() {
            if element.is_nil() {
                return Ok(NullDateTime::null());
            }
            return Err(XmlError::Decode {
                text: String::new(),
                target: "datetime",
            });
        }
        let value = parse_datetime_text(trimmed).ok_or_else(|| XmlError::Decode {
            text: trimmed.to_string(),
            target: "datetime",
        })?;
        if element.is_nil() {
            Ok(NullDateTime { value, valid: false })
        } else {
            Ok(NullDateTime::new(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_parse_ladder_accepts_driver_formats() {
        assert_eq!(
            parse_datetime_text("2024-06-15T10:30:00Z").unwrap(),
            june_15()
        );
        assert_eq!(
            parse_datetime_text("2024-06-15T12:30:00+02:00").unwrap(),
            june_15()
        );
        assert_eq!(
            parse_datetime_text("2024-06-15 10:30:00").unwrap(),
            june_15()
        );
        assert_eq!(
            parse_datetime_text("2024-06-15 10:30:00.000").unwrap(),
            june_15()
        );
        assert_eq!(
            parse_datetime_text("2024-06-15 12:30:00+02").unwrap(),
            june_15()
        );
        assert!(parse_datetime_text("June 15th").is_none());
    }

    #[test]
    fn test_scan_accepts_datetimes_and_text() {
        assert_eq!(
            NullDateTime::from_driver(DriverValue::DateTime(june_15())).unwrap(),
            NullDateTime::new(june_15())
        );
        assert_eq!(
            NullDateTime::from_driver(DriverValue::Text("2024-06-15 10:30:00".to_string()))
                .unwrap(),
            NullDateTime::new(june_15())
        );
        assert!(matches!(
            NullDateTime::from_driver(DriverValue::Text("soon".to_string())),
            Err(ConversionError::InvalidDateTime(_))
        ));
        assert!(matches!(
            NullDateTime::from_driver(DriverValue::Int(0)),
            Err(ConversionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_json_uses_rfc3339() {
        assert_eq!(
            serde_json::to_string(&NullDateTime::new(june_15())).unwrap(),
            "\"2024-06-15T10:30:00Z\""
        );
        assert_eq!(
            serde_json::from_str::<NullDateTime>("\"2024-06-15T10:30:00Z\"").unwrap(),
            NullDateTime::new(june_15())
        );
        assert_eq!(
            serde_json::from_str::<NullDateTime>("null").unwrap(),
            NullDateTime::null()
        );
    }

    #[test]
    fn test_xml_empty_text_needs_nil() {
        let nil = XmlElement::parse(r#"<at nil="true"/>"#).unwrap();
        let decoded = NullDateTime::from_xml(&nil).unwrap();
        assert_eq!(decoded, NullDateTime::null());
        assert_eq!(decoded.value, DateTime::<Utc>::UNIX_EPOCH);

        let empty = XmlElement::parse("<at></at>").unwrap();
        assert!(matches!(
            NullDateTime::from_xml(&empty),
            Err(XmlError::Decode { .. })
        ));
    }

    #[test]
    fn test_xml_malformed_text_fails_even_when_nil() {
        let element = XmlElement::parse(r#"<at nil="true">yesterday</at>"#).unwrap();
        assert!(NullDateTime::from_xml(&element).is_err());
    }
}
