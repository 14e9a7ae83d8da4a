//! A nullable boolean column value.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
use crate::xml::{XmlElement, XmlError};

/// A boolean that may be SQL NULL.
///
/// The payload and the validity flag are public, matching how driver row
/// buffers are filled in: when `valid` is false the value represents NULL
/// and `value` is inert. Construct present values with [`NullBool::new`]
/// and the null state with [`NullBool::null`].
///
/// Three boundaries are covered. The driver boundary ([`Scan`] and
/// [`ToDriverValue`]) is strict and accepts a closed set of input kinds.
/// The XML boundary (`TryFrom<&XmlElement>`) honors the `nil` attribute but
/// still decodes element text. The JSON boundary is deliberately lenient on
/// input: unrecognized input becomes the null state instead of an error,
/// and long-standing consumers rely on that.
///
/// ```
/// use nullable_types::NullBool;
///
/// assert_eq!(NullBool::from_json(b"t"), NullBool::new(true));
/// assert_eq!(NullBool::from_json(b"null"), NullBool::null());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBool {
    /// The boolean payload, meaningful only when `valid` is true.
    pub value: bool,
    /// True iff the represented value is present (non-NULL).
    pub valid: bool,
}

impl NullBool {
    /// A present boolean.
    pub fn new(value: bool) -> Self {
        NullBool { value, valid: true }
    }

    /// The null state.
    pub fn null() -> Self {
        NullBool::default()
    }

    /// `Some(value)` when present, `None` when null.
    pub fn as_option(&self) -> Option<bool> {
        if self.valid {
            Some(self.value)
        } else {
            None
        }
    }

    /// Serialize to JSON bytes: `true`, `false`, or `null`.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from raw JSON bytes.
    ///
    /// The input is compared byte for byte against exactly four literal
    /// forms: `true` and `t` give a present true, `false` and `f` give a
    /// present false. Every other input, including the JSON literal
    /// `null`, quoted strings, and malformed text, yields the null state.
    ///
    /// This lenient fallback never fails, hence no `Result`. Do not
    /// tighten it: existing consumers depend on unrecognized input mapping
    /// to NULL rather than aborting a decode.
    pub fn from_json(text: &[u8]) -> Self {
        match text {
            b"true" | b"t" => NullBool::new(true),
            b"false" | b"f" => NullBool::new(false),
            _ => NullBool::null(),
        }
    }

    /// Deserialize from a parsed XML element. See the `TryFrom` impl for
    /// the decoding rules.
    pub fn from_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Self::try_from(element)
    }
}

// All null values are the same NULL: equality and hashing look at the
// payload only when the value is present.
impl PartialEq for NullBool {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl Eq for NullBool {}

impl Hash for NullBool {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.value.hash(state);
        }
    }
}

impl From<bool> for NullBool {
    fn from(value: bool) -> Self {
        NullBool::new(value)
    }
}

impl From<Option<bool>> for NullBool {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(value) => NullBool::new(value),
            None => NullBool::null(),
        }
    }
}

impl From<NullBool> for Option<bool> {
    fn from(value: NullBool) -> Self {
        value.as_option()
    }
}

impl Scan for NullBool {
    /// Accepted driver kinds: NULL, booleans, the integers 0 and 1, and
    /// text or bytes holding exactly `true` or `false`. Anything else is a
    /// [`ConversionError`].
    fn from_driver(value: DriverValue) -> Result<Self, ConversionError> {
        match value {
            DriverValue::Null => Ok(NullBool::null()),
            DriverValue::Bool(value) => Ok(NullBool::new(value)),
            DriverValue::Int(0) => Ok(NullBool::new(false)),
            DriverValue::Int(1) => Ok(NullBool::new(true)),
            DriverValue::Int(other) => Err(ConversionError::NonBooleanInteger(other)),
            DriverValue::Bytes(bytes) => Self::from_literal(String::from_utf8(bytes)?),
            DriverValue::Text(text) => Self::from_literal(text),
            other => Err(ConversionError::TypeMismatch {
                expected: "boolean",
                actual: other.kind(),
            }),
        }
    }
}

impl NullBool {
    fn from_literal(text: String) -> Result<Self, ConversionError> {
        match text.as_str() {
            "true" => Ok(NullBool::new(true)),
            "false" => Ok(NullBool::new(false)),
            _ => Err(ConversionError::NonBooleanLiteral(text)),
        }
    }
}

impl ToDriverValue for NullBool {
    fn to_driver_value(&self) -> Result<DriverValue, ConversionError> {
        if self.valid {
            Ok(DriverValue::Bool(self.value))
        } else {
            Ok(DriverValue::Null)
        }
    }
}

impl Serialize for NullBool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            serializer.serialize_bool(self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

struct LenientVisitor;

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = NullBool;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean or null")
    }

    fn visit_bool<E>(self, value: bool) -> Result<NullBool, E>
    where
        E: de::Error,
    {
        Ok(NullBool::new(value))
    }

    fn visit_unit<E>(self) -> Result<NullBool, E>
    where
        E: de::Error,
    {
        Ok(NullBool::null())
    }

    fn visit_none<E>(self) -> Result<NullBool, E>
    where
        E: de::Error,
    {
        Ok(NullBool::null())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<NullBool, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientVisitor)
    }

    // Strings stay null even when they spell a boolean: the byte-level
    // table matches raw literals, and a JSON string is not one.
    fn visit_str<E>(self, _: &str) -> Result<NullBool, E>
    where
        E: de::Error,
    {
        Ok(NullBool::null())
    }

    fn visit_i64<E>(self, _: i64) -> Result<NullBool, E>
    where
        E: de::Error,
    {
        Ok(NullBool::null())
    }

    fn visit_u64<E>(self, _: u64) -> Result<NullBool, E>
    where
        E: de::Error,
    {
        Ok(NullBool::null())
    }

    fn visit_f64<E>(self, _: f64) -> Result<NullBool, E>
    where
        E: de::Error,
    {
        Ok(NullBool::null())
    }

    // Composite values are drained so the stream stays positioned, then
    // treated like any other unrecognized input.
    fn visit_seq<A>(self, mut seq: A) -> Result<NullBool, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(NullBool::null())
    }

    fn visit_map<A>(self, mut map: A) -> Result<NullBool, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(NullBool::null())
    }
}

impl<'de> Deserialize<'de> for NullBool {
    /// JSON booleans deserialize as present values. Null and every other
    /// value shape deserialize as the null state, mirroring the lenient
    /// byte-level parser in [`NullBool::from_json`].
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientVisitor)
    }
}

impl TryFrom<&XmlElement> for NullBool {
    type Error = XmlError;

    /// Element text decodes as `true`, `1`, `false`, or `0` with
    /// surrounding whitespace ignored; empty text is the canonical false.
    /// A `nil` attribute makes the result null, but the text must still
    /// decode: malformed content is an error even on nil elements.
    fn try_from(element: &XmlElement) -> Result<Self, XmlError> {
        let value = match element.text().trim() {
            "" | "false" | "0" => false,
            "true" | "1" => true,
            other => {
                return Err(XmlError::Decode {
                    text: other.to_string(),
                    target: "boolean",
                })
            }
        };
        if element.is_nil() {
            Ok(NullBool { value, valid: false })
        } else {
            Ok(NullBool::new(value))
        }
    }
}
