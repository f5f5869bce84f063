use crate::calendar::{MAX_DAY_NUMBER, SQL_BASE_DAY_NUMBER};
use crate::{
    DateTime64, DateTimeOffset64, MAX_TICKS, TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_MINUTE,
    TICKS_PER_SECOND, TimeSpan64,
};
use chrono::{NaiveDate, NaiveDateTime};

// ============================================================================
// DateTime64
// ============================================================================

#[test]
fn test_datetime_construction() {
    let dt = DateTime64::from_ymd_hms(2023, 12, 25, 14, 30, 45).unwrap();
    assert_eq!(dt.year(), 2023);
    assert_eq!(dt.month(), 12);
    assert_eq!(dt.day(), 25);
    assert_eq!(dt.hour(), 14);
    assert_eq!(dt.minute(), 30);
    assert_eq!(dt.second(), 45);
    assert_eq!(dt.fraction(), 0);
    assert_eq!(dt.to_string(), "2023-12-25 14:30:45");

    assert_eq!(DateTime64::from_ymd(1, 1, 1).unwrap(), DateTime64::MIN);
    assert_eq!(
        DateTime64::from_ymd_hms_fraction(9999, 12, 31, 23, 59, 59, 9999999).unwrap(),
        DateTime64::MAX
    );
    assert_eq!(DateTime64::MAX.ticks(), MAX_TICKS);
}

#[test]
fn test_datetime_invalid_components() {
    assert!(DateTime64::from_ymd(2023, 2, 29).is_err());
    assert!(DateTime64::from_ymd_hms(2023, 1, 1, 24, 0, 0).is_err());
    assert!(DateTime64::from_ymd_hms(2023, 1, 1, 0, 60, 0).is_err());
    assert!(DateTime64::from_ymd_hms_fraction(2023, 1, 1, 0, 0, 0, TICKS_PER_SECOND).is_err());
    assert!(DateTime64::try_from_ticks(MAX_TICKS + 1).unwrap_err().is_out_of_range());
    assert!(DateTime64::try_from_ticks(-1).is_err());
}

#[test]
fn test_datetime_parts() {
    let dt = DateTime64::from_ymd_hms_fraction(1900, 1, 1, 6, 0, 0, 5).unwrap();
    assert_eq!(dt.day_number(), SQL_BASE_DAY_NUMBER);
    assert_eq!(dt.time_of_day().ticks(), 6 * TICKS_PER_HOUR + 5);
    assert_eq!(dt.date(), DateTime64::from_ymd(1900, 1, 1).unwrap());
    assert_eq!(
        DateTime64::from_parts(dt.day_number(), dt.time_of_day()).unwrap(),
        dt
    );
    assert!(DateTime64::from_parts(MAX_DAY_NUMBER + 1, TimeSpan64::ZERO).is_err());
    assert!(DateTime64::from_parts(0, TimeSpan64::from_days(1)).is_err());
    assert!(DateTime64::from_parts(0, TimeSpan64::from_ticks(-1)).is_err());
}

#[test]
fn test_datetime_arithmetic() {
    let dt = DateTime64::from_ymd(2000, 2, 28).unwrap();
    let next = dt.checked_add(TimeSpan64::from_days(1)).unwrap();
    assert_eq!((next.month(), next.day()), (2, 29));
    assert!(DateTime64::MAX.checked_add(TimeSpan64::from_ticks(1)).is_err());
    assert!(DateTime64::MIN.checked_sub(TimeSpan64::from_ticks(1)).is_err());
    assert!(DateTime64::MIN.checked_sub(TimeSpan64::MIN).is_err());
}

#[test]
fn test_datetime_chrono_interop() {
    let naive: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_nano_opt(13, 14, 15, 123_456_700)
        .unwrap();
    let dt = DateTime64::try_from(naive).unwrap();
    assert_eq!(dt.to_string(), "2024-02-29 13:14:15.1234567");
    assert_eq!(NaiveDateTime::from(dt), naive);

    let min: NaiveDateTime = DateTime64::MIN.into();
    assert_eq!(min, NaiveDate::from_ymd_opt(1, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(DateTime64::try_from(min).unwrap(), DateTime64::MIN);

    let too_early = NaiveDate::from_ymd_opt(0, 12, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert!(DateTime64::try_from(too_early).is_err());
}

#[test]
fn test_datetime_random_chrono_round_trip() {
    fastrand::seed(77);
    for _ in 0..10000 {
        let dt = DateTime64::try_from_ticks(fastrand::i64(0..=MAX_TICKS)).unwrap();
        assert_eq!(DateTime64::try_from(dt.to_naive()).unwrap(), dt);
    }
}

// ============================================================================
// TimeSpan64
// ============================================================================

#[test]
fn test_timespan_components() {
    let ts = TimeSpan64::from_hms(23, 59, 59, 9999999).unwrap();
    assert!(ts.is_time_of_day());
    assert_eq!(ts.ticks(), TICKS_PER_DAY - 1);
    assert_eq!((ts.hours(), ts.minutes(), ts.seconds()), (23, 59, 59));
    assert_eq!(ts.fraction(), 9999999);
    assert_eq!(ts.to_string(), "23:59:59.9999999");

    assert!(!TimeSpan64::from_days(1).is_time_of_day());
    assert!(!TimeSpan64::from_ticks(-1).is_time_of_day());
    assert_eq!(TimeSpan64::from_minutes(90).total_minutes(), 90);
    assert_eq!(TimeSpan64::from_millis(1).ticks(), 10000);
    assert_eq!(
        (TimeSpan64::from_days(1) + TimeSpan64::from_minutes(1)).to_string(),
        "1.00:01:00"
    );
    assert_eq!((-TimeSpan64::from_minutes(1)).to_string(), "-00:01:00");
    assert_eq!(
        TimeSpan64::from_minutes(2) - TimeSpan64::from_minutes(1),
        TimeSpan64::from_ticks(TICKS_PER_MINUTE)
    );
    assert!(TimeSpan64::MAX.checked_add(TimeSpan64::from_ticks(1)).is_none());
    assert!(TimeSpan64::from_hms(0, 0, 60, 0).is_err());
}

#[test]
fn test_timespan_from_naive_time() {
    let t = chrono::NaiveTime::from_hms_nano_opt(1, 2, 3, 400).unwrap();
    assert_eq!(
        TimeSpan64::from(t),
        TimeSpan64::from_hms(1, 2, 3, 4).unwrap()
    );
}

// ============================================================================
// DateTimeOffset64
// ============================================================================

#[test]
fn test_offset_local_and_utc() {
    let local = DateTime64::from_ymd_hms(2024, 1, 1, 1, 30, 0).unwrap();
    let dto = DateTimeOffset64::from_local(local, 120).unwrap();
    assert_eq!(dto.local(), local);
    assert_eq!(dto.utc(), DateTime64::from_ymd_hms(2023, 12, 31, 23, 30, 0).unwrap());
    assert_eq!(dto.offset_minutes(), 120);
    assert_eq!(dto.to_string(), "2024-01-01 01:30:00 +02:00");

    let same = DateTimeOffset64::from_utc(dto.utc(), 120).unwrap();
    assert_eq!(same, dto);

    let west = DateTimeOffset64::from_utc(dto.utc(), -330).unwrap();
    assert_eq!(west.to_string(), "2023-12-31 18:00:00 -05:30");
    assert_ne!(west, dto);
}

#[test]
fn test_offset_limits() {
    let dt = DateTime64::from_ymd(2000, 1, 1).unwrap();
    assert!(DateTimeOffset64::from_local(dt, 840).is_ok());
    assert!(DateTimeOffset64::from_local(dt, -840).is_ok());
    assert!(DateTimeOffset64::from_local(dt, 841).unwrap_err().is_out_of_range());
    assert!(DateTimeOffset64::from_utc(dt, -841).is_err());

    // Local reading valid, UTC instant before year 1.
    assert!(DateTimeOffset64::from_local(DateTime64::MIN, 60).is_err());
    // UTC instant valid, local reading past year 9999.
    assert!(DateTimeOffset64::from_utc(DateTime64::MAX, 60).is_err());
}

// ============================================================================
// Serde
// ============================================================================

#[test]
fn test_datetime_serde_validates_ticks() {
    let dt = DateTime64::from_ymd_hms(2000, 1, 1, 0, 0, 1).unwrap();
    let json = serde_json::to_string(&dt).unwrap();
    assert_eq!(json, dt.ticks().to_string());
    assert_eq!(serde_json::from_str::<DateTime64>(&json).unwrap(), dt);

    assert_eq!(serde_json::from_str::<DateTime64>("0").unwrap(), DateTime64::MIN);
    assert_eq!(
        serde_json::from_str::<DateTime64>(&MAX_TICKS.to_string()).unwrap(),
        DateTime64::MAX
    );
    assert!(serde_json::from_str::<DateTime64>("-864000000000").is_err());
    assert!(serde_json::from_str::<DateTime64>("-1").is_err());
    assert!(serde_json::from_str::<DateTime64>(&(MAX_TICKS + 1).to_string()).is_err());
    assert!(serde_json::from_str::<DateTime64>(r#"{"ticks":-1}"#).is_err());
}

#[test]
fn test_offset_serde_validates_fields() {
    let utc = DateTime64::from_ymd(2000, 1, 1).unwrap();
    let dto = DateTimeOffset64::from_utc(utc, -330).unwrap();
    let json = serde_json::to_string(&dto).unwrap();
    assert_eq!(
        json,
        format!(r#"{{"utc":{},"offset_minutes":-330}}"#, utc.ticks())
    );
    assert_eq!(serde_json::from_str::<DateTimeOffset64>(&json).unwrap(), dto);

    let out_of_range = format!(r#"{{"utc":{},"offset_minutes":5000}}"#, utc.ticks());
    assert!(serde_json::from_str::<DateTimeOffset64>(&out_of_range).is_err());
    let past_max = format!(r#"{{"utc":{MAX_TICKS},"offset_minutes":60}}"#);
    assert!(serde_json::from_str::<DateTimeOffset64>(&past_max).is_err());
    assert!(serde_json::from_str::<DateTimeOffset64>(r#"{"utc":-1,"offset_minutes":0}"#).is_err());
}
