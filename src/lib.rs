//! Nullable column types that round-trip through SQL drivers, JSON, and XML.
//!
//! Database NULL has no direct host-language value: a nullable column needs
//! a payload plus the knowledge of whether the payload is there at all.
//! Each type in this crate pairs the two behind the same adapter contract:
//!
//! - [`NullBool`] - nullable boolean, with a lenient JSON input policy
//! - [`NullInt64`] / [`NullFloat64`] - nullable numerics
//! - [`NullString`] - nullable text (NULL and `""` stay distinct)
//! - [`NullDateTime`] - nullable UTC timestamp
//! - [`NullUuid`] - nullable UUID
//! - [`NullBytes`] - nullable binary, base64 across text boundaries
//!
//! # Architecture
//!
//! Every type implements the same three boundaries:
//!
//! ```text
//! driver  ───  Scan / ToDriverValue     (driver module, strict closed sets)
//! JSON    ───  serde Serialize / Deserialize
//! XML     ───  TryFrom<&XmlElement>     (xml module, nil-attribute protocol)
//! ```
//!
//! The driver boundary is transactional: a failed scan leaves the receiver
//! untouched. The XML boundary treats the `nil` attribute as presence-only
//! and still decodes element text, so malformed documents surface as errors
//! instead of disappearing into NULL.
//!
//! # Example
//!
//! ```rust
//! use nullable_types::{DriverValue, NullBool, Scan, ToDriverValue};
//!
//! // Scan a driver row value; NULL becomes the null state.
//! let absent = NullBool::from_driver(DriverValue::Null)?;
//! assert_eq!(absent.as_option(), None);
//!
//! // Present values hand their payload back to the driver.
//! let flag = NullBool::new(true);
//! assert_eq!(flag.to_driver_value()?, DriverValue::Bool(true));
//!
//! // JSON input is lenient for booleans: unrecognized text is null.
//! assert_eq!(NullBool::from_json(b"t"), NullBool::new(true));
//! assert_eq!(NullBool::from_json(b"maybe"), NullBool::null());
//! # Ok::<(), nullable_types::ConversionError>(())
//! ```

pub mod driver;
pub mod xml;

mod bool;
mod bytes;
mod datetime;
mod float;
mod int;
mod string;
mod uuid;

// Re-exports for convenience
pub use self::bool::NullBool;
pub use self::bytes::NullBytes;
pub use self::datetime::NullDateTime;
pub use self::driver::{ConversionError, DriverValue, Scan, ToDriverValue};
pub use self::float::NullFloat64;
pub use self::int::NullInt64;
pub use self::string::NullString;
pub use self::uuid::NullUuid;
pub use self::xml::{XmlElement, XmlError};
