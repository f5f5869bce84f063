//! Calendar and time-of-day codecs.
//!
//! Every layout here is a combination of two building blocks:
//!
//! - a date: the day number since 0001-01-01 as a 3-byte little-endian integer;
//! - a time: the time of day in units of `10^-scale` seconds, truncated, as a
//!   3, 4 or 5-byte little-endian integer depending on the scale.
//!
//! The legacy `datetime` and `smalldatetime` layouts count days from 1900-01-01
//! instead and live in [`legacy`].

use byteorder::{ByteOrder, LE};
use sqlnorm_common::{Result, error::Error, verify_range};
use sqlnorm_datetime::calendar::MAX_DAY_NUMBER;
use sqlnorm_datetime::{DateTime64, TICKS_PER_DAY, TimeSpan64};

pub mod date;
pub mod datetime2;
pub mod legacy;

pub use date::DateCodec;
pub use datetime2::{DateTime2Codec, DateTimeOffsetCodec, TimeCodec};
pub use legacy::{DateTimeCodec, SmallDateTimeCodec};

/// Length of the date part of `date`, `datetime2` and `datetimeoffset`.
pub const DATE_LEN: usize = 3;

/// Length of the offset part of `datetimeoffset`.
pub const OFFSET_LEN: usize = 2;

pub const MAX_TIME_SCALE: u8 = 7;
pub const DEFAULT_TIME_SCALE: u8 = MAX_TIME_SCALE;

/// Validates a fractional-seconds scale taken from column metadata.
pub(crate) fn verify_time_scale(scale: i32) -> Result<u8> {
    verify_range!(scale, (0..=MAX_TIME_SCALE as i32).contains(&scale));
    Ok(scale as u8)
}

/// Number of bytes holding a time of day at `scale`.
pub const fn time_len(scale: u8) -> usize {
    match scale {
        0..=2 => 3,
        3..=4 => 4,
        _ => 5,
    }
}

/// 100-nanosecond ticks per time unit at `scale`.
const fn ticks_per_unit(scale: u8) -> i64 {
    10i64.pow((MAX_TIME_SCALE - scale) as u32)
}

/// Appends the time of day at `scale`, dropping sub-scale digits.
pub(crate) fn write_time(
    element: &str,
    buf: &mut Vec<u8>,
    time_of_day: TimeSpan64,
    scale: u8,
) -> Result<()> {
    if !time_of_day.is_time_of_day() {
        log::trace!("{element}: {time_of_day} is not a time of day");
        return Err(Error::out_of_range(
            "time",
            format!("{element} time {time_of_day} is outside 00:00:00 ..= 23:59:59.9999999"),
        ));
    }
    let len = time_len(scale);
    let units = (time_of_day.ticks() / ticks_per_unit(scale)) as u64;
    let start = buf.len();
    buf.resize(start + len, 0);
    LE::write_uint(&mut buf[start..], units, len);
    Ok(())
}

/// Reads a time of day written by [`write_time`]. `bytes` must be exactly
/// [`time_len`] long.
pub(crate) fn read_time(element: &str, bytes: &[u8], scale: u8) -> Result<TimeSpan64> {
    let units = LE::read_uint(bytes, bytes.len()) as i64;
    let ticks = units * ticks_per_unit(scale);
    if ticks >= TICKS_PER_DAY {
        log::trace!("{element}: time of day {units} at scale {scale} exceeds a day");
        return Err(Error::out_of_range(
            "time",
            format!("{element} time of day {units} at scale {scale} is not below 24 hours"),
        ));
    }
    Ok(TimeSpan64::from_ticks(ticks))
}

/// Appends the 3-byte day number of `value`.
pub(crate) fn write_date(element: &str, buf: &mut Vec<u8>, value: DateTime64) -> Result<()> {
    let day_number = u32::try_from(value.day_number())
        .ok()
        .filter(|&day| day <= MAX_DAY_NUMBER as u32)
        .ok_or_else(|| {
            log::trace!("{element}: day number {} is outside the calendar", value.day_number());
            Error::out_of_range(
                "date",
                format!(
                    "{element} day number {} is outside 0..={MAX_DAY_NUMBER}",
                    value.day_number()
                ),
            )
        })?;
    let start = buf.len();
    buf.resize(start + DATE_LEN, 0);
    LE::write_u24(&mut buf[start..], day_number);
    Ok(())
}

/// Reads a 3-byte day number, rejecting days past 9999-12-31.
pub(crate) fn read_date(element: &str, bytes: &[u8]) -> Result<i32> {
    let day_number = LE::read_u24(bytes) as i32;
    if day_number > MAX_DAY_NUMBER {
        log::trace!("{element}: day number {day_number} is past 9999-12-31");
        return Err(Error::out_of_range(
            "date",
            format!("{element} day number {day_number} exceeds {MAX_DAY_NUMBER}"),
        ));
    }
    Ok(day_number)
}

/// Implements the `scale` facet accessors of a codec struct with a `scale: u8`
/// field.
macro_rules! impl_time_scale {
    ($codec:ident) => {
        impl $codec {
            /// Creates a codec keeping `scale` fractional-second digits (`0..=7`).
            pub fn new(scale: i32) -> sqlnorm_common::Result<Self> {
                Ok($codec {
                    scale: $crate::temporal::verify_time_scale(scale)?,
                })
            }

            pub fn scale(&self) -> u8 {
                self.scale
            }

            pub fn set_scale(&mut self, scale: i32) -> sqlnorm_common::Result<()> {
                self.scale = $crate::temporal::verify_time_scale(scale)?;
                Ok(())
            }

            pub fn with_scale(mut self, scale: i32) -> sqlnorm_common::Result<Self> {
                self.set_scale(scale)?;
                Ok(self)
            }
        }

        impl Default for $codec {
            fn default() -> Self {
                $codec {
                    scale: $crate::temporal::DEFAULT_TIME_SCALE,
                }
            }
        }
    };
}

pub(crate) use impl_time_scale;

#[cfg(test)]
mod tests {
    use super::*;
    use sqlnorm_datetime::TICKS_PER_SECOND;

    #[test]
    fn test_time_len() {
        let lens: Vec<usize> = (0..=7).map(time_len).collect();
        assert_eq!(lens, [3, 3, 3, 4, 4, 5, 5, 5]);
    }

    #[test]
    fn test_scale_validation() {
        assert_eq!(verify_time_scale(0).unwrap(), 0);
        assert_eq!(verify_time_scale(7).unwrap(), 7);
        assert!(verify_time_scale(8).unwrap_err().is_out_of_range());
        assert!(verify_time_scale(-1).is_err());
    }

    #[test]
    fn test_time_truncation() {
        let t = TimeSpan64::from_ticks(TICKS_PER_SECOND + 1_999_999);
        let mut buf = Vec::new();
        write_time("t", &mut buf, t, 1).unwrap();
        assert_eq!(buf, [11, 0, 0]);
        assert_eq!(
            read_time("t", &buf, 1).unwrap(),
            TimeSpan64::from_ticks(TICKS_PER_SECOND + 1_000_000)
        );

        let last = TimeSpan64::from_ticks(TICKS_PER_DAY - 1);
        let mut buf = Vec::new();
        write_time("t", &mut buf, last, 7).unwrap();
        assert_eq!(buf.len(), 5);
        assert_eq!(read_time("t", &buf, 7).unwrap(), last);
    }

    #[test]
    fn test_time_past_midnight_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(86_400u32).to_le_bytes()[..3]);
        assert!(read_time("t", &buf, 0).unwrap_err().is_out_of_range());
        buf.clear();
        buf.extend_from_slice(&(86_399u32).to_le_bytes()[..3]);
        assert!(read_time("t", &buf, 0).is_ok());
    }

    #[test]
    fn test_date_part() {
        let mut buf = Vec::new();
        write_date("d", &mut buf, DateTime64::MAX).unwrap();
        assert_eq!(read_date("d", &buf).unwrap(), MAX_DAY_NUMBER);
        let past = (MAX_DAY_NUMBER as u32 + 1).to_le_bytes();
        assert!(read_date("d", &past[..3]).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_write_rejects_out_of_range() {
        let mut buf = Vec::new();
        for time in [
            TimeSpan64::from_ticks(-1),
            TimeSpan64::from_ticks(TICKS_PER_DAY),
            TimeSpan64::MIN,
        ] {
            for scale in [0, 3, 7] {
                assert!(write_time("t", &mut buf, time, scale).unwrap_err().is_out_of_range());
            }
        }
        assert!(buf.is_empty());
    }
}
