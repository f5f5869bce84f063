//! `datetime` and `smalldatetime`, both counting days from 1900-01-01.

use byteorder::{ByteOrder, LE};
use sqlnorm_common::{Result, error::Error, verify_len};
use sqlnorm_datetime::calendar::{MAX_DAY_NUMBER, SQL_BASE_DAY_NUMBER};
use sqlnorm_datetime::{DateTime64, TICKS_PER_MILLISECOND, TICKS_PER_MINUTE, TimeSpan64};

use crate::codec::{Codec, require_bytes};

pub const DATETIME_LEN: usize = 8;
pub const SMALL_DATETIME_LEN: usize = 4;

/// Days from 1900-01-01 to 1753-01-01.
const DATETIME_MIN_DAYS: i32 = -53690;

/// Days from 1900-01-01 to 9999-12-31.
const DATETIME_MAX_DAYS: i32 = MAX_DAY_NUMBER - SQL_BASE_DAY_NUMBER;

/// `datetime` counts the time of day in 1/300 second ticks.
const DATETIME_TICKS_PER_DAY: i64 = 300 * 60 * 60 * 24;

/// Largest time-of-day tick value (23:59:59.997).
pub const DATETIME_MAX_TIME: u32 = (DATETIME_TICKS_PER_DAY - 1) as u32;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A remainder this far into a minute rounds `smalldatetime` up.
const SMALL_DATETIME_ROUND_UP: i64 = 29_998 * TICKS_PER_MILLISECOND;

fn out_of_range(element: &str, value: impl std::fmt::Display, range: &str) -> Error {
    log::trace!("{element}: {value} outside {range}");
    Error::out_of_range(
        "value",
        format!("{value} is outside the {element} range {range}"),
    )
}

/// `datetime`: signed 4-byte day count since 1900-01-01, then a 4-byte count of
/// 1/300 second ticks since midnight.
///
/// Times are rounded to the nearest tick; a time that rounds up to midnight
/// moves to the next day. Decoding rounds each tick to the nearest millisecond,
/// which reproduces the familiar `.000`, `.003` and `.007` endings.
#[derive(Clone, Debug, Default)]
pub struct DateTimeCodec;

impl DateTimeCodec {
    pub const IDENTIFIER: &'static str = "SQL_DateTime";
    const RANGE: &'static str = "1753-01-01 ..= 9999-12-31 23:59:59.997";

    pub const fn new() -> Self {
        DateTimeCodec
    }

    /// Splits a value into its day and tick fields.
    fn fields(value: &DateTime64) -> Result<(i32, u32)> {
        let mut days = value.day_number() - SQL_BASE_DAY_NUMBER;
        let time = value.time_of_day().ticks();
        // round(ms * 0.3), computed on 100 ns ticks.
        let mut ticks = (time * 3 + 50_000) / 100_000;
        if ticks >= DATETIME_TICKS_PER_DAY {
            ticks = 0;
            days += 1;
        }
        if !(DATETIME_MIN_DAYS..=DATETIME_MAX_DAYS).contains(&days) {
            return Err(out_of_range(Self::IDENTIFIER, value, Self::RANGE));
        }
        Ok((days, ticks as u32))
    }
}

impl Codec for DateTimeCodec {
    type Value = DateTime64;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &DateTime64) -> Result<Option<Vec<u8>>> {
        let (days, ticks) = Self::fields(value)?;
        let mut buf = vec![0u8; DATETIME_LEN];
        LE::write_i32(&mut buf[..4], days);
        LE::write_u32(&mut buf[4..], ticks);
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<DateTime64> {
        let bytes = require_bytes(Self::IDENTIFIER, bytes)?;
        verify_len!(Self::IDENTIFIER, bytes, DATETIME_LEN);
        let days = LE::read_i32(&bytes[..4]);
        let ticks = LE::read_u32(&bytes[4..]);
        if !(DATETIME_MIN_DAYS..=DATETIME_MAX_DAYS).contains(&days) {
            return Err(out_of_range(
                Self::IDENTIFIER,
                format_args!("day {days}"),
                Self::RANGE,
            ));
        }
        if ticks > DATETIME_MAX_TIME {
            return Err(out_of_range(
                Self::IDENTIFIER,
                format_args!("tick {ticks}"),
                Self::RANGE,
            ));
        }
        // round(ticks / 0.3) in whole milliseconds; never a tie.
        let millis = (ticks as i64 * 20 + 3) / 6;
        DateTime64::from_parts(
            SQL_BASE_DAY_NUMBER + days,
            TimeSpan64::from_millis(millis),
        )
    }
}

/// `smalldatetime`: 2-byte day count since 1900-01-01, then 2-byte minutes
/// since midnight.
///
/// Values are rounded to the minute: 29.998 seconds or more rounds up.
#[derive(Clone, Debug, Default)]
pub struct SmallDateTimeCodec;

impl SmallDateTimeCodec {
    pub const IDENTIFIER: &'static str = "SQL_SmallDateTime";
    const RANGE: &'static str = "1900-01-01 ..= 2079-06-06 23:59";

    pub const fn new() -> Self {
        SmallDateTimeCodec
    }

    fn fields(value: &DateTime64) -> Result<(u16, u16)> {
        let mut days = (value.day_number() - SQL_BASE_DAY_NUMBER) as i64;
        let time = value.time_of_day().ticks();
        let mut minutes = time / TICKS_PER_MINUTE;
        if time % TICKS_PER_MINUTE >= SMALL_DATETIME_ROUND_UP {
            minutes += 1;
        }
        if minutes == MINUTES_PER_DAY {
            minutes = 0;
            days += 1;
        }
        let days = u16::try_from(days)
            .map_err(|_| out_of_range(Self::IDENTIFIER, value, Self::RANGE))?;
        Ok((days, minutes as u16))
    }
}

impl Codec for SmallDateTimeCodec {
    type Value = DateTime64;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &DateTime64) -> Result<Option<Vec<u8>>> {
        let (days, minutes) = Self::fields(value)?;
        let mut buf = vec![0u8; SMALL_DATETIME_LEN];
        LE::write_u16(&mut buf[..2], days);
        LE::write_u16(&mut buf[2..], minutes);
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<DateTime64> {
        let bytes = require_bytes(Self::IDENTIFIER, bytes)?;
        verify_len!(Self::IDENTIFIER, bytes, SMALL_DATETIME_LEN);
        let days = LE::read_u16(&bytes[..2]);
        let minutes = LE::read_u16(&bytes[2..]);
        if minutes as i64 >= MINUTES_PER_DAY {
            return Err(out_of_range(
                Self::IDENTIFIER,
                format_args!("minute {minutes}"),
                Self::RANGE,
            ));
        }
        DateTime64::from_parts(
            SQL_BASE_DAY_NUMBER + days as i32,
            TimeSpan64::from_minutes(minutes as i64),
        )
    }
}
