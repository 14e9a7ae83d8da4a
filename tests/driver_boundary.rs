//! Scanning whole rows across the driver boundary and writing them back.

use chrono::{TimeZone, Utc};
use nullable_types::{
    ConversionError, DriverValue, NullBool, NullBytes, NullDateTime, NullFloat64, NullInt64,
    NullString, NullUuid, Scan, ToDriverValue,
};
use uuid::Uuid;

#[derive(Debug, Default, PartialEq)]
struct UserRow {
    name: NullString,
    age: NullInt64,
    score: NullFloat64,
    active: NullBool,
    last_seen: NullDateTime,
    session: NullUuid,
    avatar: NullBytes,
}

impl UserRow {
    fn scan_column(&mut self, column: &str, value: DriverValue) -> Result<(), ConversionError> {
        match column {
            "name" => self.name.scan(value),
            "age" => self.age.scan(value),
            "score" => self.score.scan(value),
            "active" => self.active.scan(value),
            "last_seen" => self.last_seen.scan(value),
            "session" => self.session.scan(value),
            "avatar" => self.avatar.scan(value),
            other => panic!("no such column: {other}"),
        }
    }
}

fn sample_session() -> Uuid {
    Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
}

#[test]
fn test_scan_a_typed_row() {
    let mut row = UserRow::default();
    row.scan_column("name", DriverValue::Text("alice".to_string()))
        .unwrap();
    row.scan_column("age", DriverValue::Int(34)).unwrap();
    row.scan_column("score", DriverValue::Double(0.75)).unwrap();
    row.scan_column("active", DriverValue::Bool(true)).unwrap();
    row.scan_column(
        "last_seen",
        DriverValue::DateTime(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()),
    )
    .unwrap();
    row.scan_column("session", DriverValue::Text(sample_session().to_string()))
        .unwrap();
    row.scan_column("avatar", DriverValue::Bytes(vec![0x89, 0x50, 0x4e, 0x47]))
        .unwrap();

    assert_eq!(row.name, NullString::new("alice"));
    assert_eq!(row.age, NullInt64::new(34));
    assert_eq!(row.score, NullFloat64::new(0.75));
    assert_eq!(row.active, NullBool::new(true));
    assert_eq!(
        row.last_seen,
        NullDateTime::new(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap())
    );
    assert_eq!(row.session, NullUuid::new(sample_session()));
    assert_eq!(row.avatar, NullBytes::new(vec![0x89, 0x50, 0x4e, 0x47]));
}

#[test]
fn test_scan_a_row_of_nulls() {
    let mut row = UserRow::default();
    for column in [
        "name",
        "age",
        "score",
        "active",
        "last_seen",
        "session",
        "avatar",
    ] {
        row.scan_column(column, DriverValue::Null).unwrap();
    }

    assert_eq!(row.name.as_option(), None);
    assert_eq!(row.age.as_option(), None);
    assert_eq!(row.score.as_option(), None);
    assert_eq!(row.active.as_option(), None);
    assert_eq!(row.last_seen.as_option(), None);
    assert_eq!(row.session.as_option(), None);
    assert_eq!(row.avatar.as_option(), None);
}

#[test]
fn test_text_protocol_rows_scan_through_byte_strings() {
    // Text-protocol drivers deliver every column as a byte string.
    let mut row = UserRow::default();
    row.scan_column("name", DriverValue::Bytes(b"bob".to_vec()))
        .unwrap();
    row.scan_column("age", DriverValue::Bytes(b"-3".to_vec()))
        .unwrap();
    row.scan_column("score", DriverValue::Bytes(b"2.5e-1".to_vec()))
        .unwrap();
    row.scan_column("active", DriverValue::Bytes(b"false".to_vec()))
        .unwrap();
    row.scan_column(
        "last_seen",
        DriverValue::Bytes(b"2024-06-15 10:30:00".to_vec()),
    )
    .unwrap();
    row.scan_column(
        "session",
        DriverValue::Bytes(sample_session().to_string().into_bytes()),
    )
    .unwrap();

    assert_eq!(row.name, NullString::new("bob"));
    assert_eq!(row.age, NullInt64::new(-3));
    assert_eq!(row.score, NullFloat64::new(0.25));
    assert_eq!(row.active, NullBool::new(false));
    assert_eq!(
        row.last_seen,
        NullDateTime::new(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap())
    );
    assert_eq!(row.session, NullUuid::new(sample_session()));
}

#[test]
fn test_values_round_trip_back_through_the_driver() {
    let original = UserRow {
        name: NullString::new("carol"),
        age: NullInt64::null(),
        score: NullFloat64::new(1.5),
        active: NullBool::new(false),
        last_seen: NullDateTime::new(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap()),
        session: NullUuid::new(Uuid::new_v4()),
        avatar: NullBytes::null(),
    };

    let mut rescanned = UserRow::default();
    rescanned
        .scan_column("name", original.name.to_driver_value().unwrap())
        .unwrap();
    rescanned
        .scan_column("age", original.age.to_driver_value().unwrap())
        .unwrap();
    rescanned
        .scan_column("score", original.score.to_driver_value().unwrap())
        .unwrap();
    rescanned
        .scan_column("active", original.active.to_driver_value().unwrap())
        .unwrap();
    rescanned
        .scan_column("last_seen", original.last_seen.to_driver_value().unwrap())
        .unwrap();
    rescanned
        .scan_column("session", original.session.to_driver_value().unwrap())
        .unwrap();
    rescanned
        .scan_column("avatar", original.avatar.to_driver_value().unwrap())
        .unwrap();

    assert_eq!(rescanned, original);
}

#[test]
fn test_failed_scan_does_not_disturb_the_row() {
    let mut row = UserRow {
        active: NullBool::new(true),
        age: NullInt64::new(7),
        ..UserRow::default()
    };

    assert!(matches!(
        row.scan_column("active", DriverValue::Int(2)),
        Err(ConversionError::NonBooleanInteger(2))
    ));
    assert!(matches!(
        row.scan_column("age", DriverValue::Text("seven".to_string())),
        Err(ConversionError::InvalidNumber { .. })
    ));

    // Both fields still hold their pre-scan values.
    assert_eq!(row.active, NullBool::new(true));
    assert_eq!(row.age, NullInt64::new(7));
}
