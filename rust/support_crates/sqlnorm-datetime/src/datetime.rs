use super::*;
use crate::calendar;
use crate::timespan::TimeSpan64;
use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlnorm_common::{Result, error::Error};
use std::fmt;

/// A calendar date and time of day, stored as 100-nanosecond ticks since
/// January 1, 0001 at 00:00:00 (compatible with .NET `DateTime`).
///
/// Serializes as the bare tick count; deserialization rejects ticks outside
/// `0..=MAX_TICKS`.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
#[serde(try_from = "i64", into = "i64")]
#[repr(C)]
pub struct DateTime64 {
    ticks: i64,
}

impl DateTime64 {
    pub const MIN: DateTime64 = DateTime64 { ticks: 0 };
    pub const MAX: DateTime64 = DateTime64 { ticks: MAX_TICKS };

    /// Returns the number of 100-nanosecond ticks since January 1, 0001.
    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Creates a `DateTime64` from ticks, failing outside `0..=MAX_TICKS`.
    ///
    /// ```
    /// # use sqlnorm_datetime::DateTime64;
    /// assert!(DateTime64::try_from_ticks(636000000000000000).is_ok());
    /// assert!(DateTime64::try_from_ticks(-1).is_err());
    /// ```
    pub fn try_from_ticks(ticks: i64) -> Result<DateTime64> {
        if !Self::is_valid_ticks(ticks) {
            return Err(Error::out_of_range(
                "datetime",
                "a valid datetime value must be between '0001-01-01 00:00:00' and '9999-12-31 23:59:59.9999999'",
            ));
        }
        Ok(DateTime64 { ticks })
    }

    pub fn is_valid_ticks(ticks: i64) -> bool {
        (0..=MAX_TICKS).contains(&ticks)
    }

    /// Creates a `DateTime64` at midnight of the given civil date.
    pub fn from_ymd(year: i32, month: i32, day: i32) -> Result<DateTime64> {
        let day_number = calendar::days_from_civil(year, month, day)?;
        Ok(DateTime64 {
            ticks: day_number as i64 * TICKS_PER_DAY,
        })
    }

    pub fn from_ymd_hms(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<DateTime64> {
        Self::from_ymd_hms_fraction(year, month, day, hour, minute, second, 0)
    }

    /// Like [`DateTime64::from_ymd_hms`], with a sub-second `fraction` in ticks.
    ///
    /// ```
    /// # use sqlnorm_datetime::DateTime64;
    /// let dt = DateTime64::from_ymd_hms_fraction(2023, 5, 15, 14, 30, 45, 1234567).unwrap();
    /// assert_eq!(dt.to_string(), "2023-05-15 14:30:45.1234567");
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn from_ymd_hms_fraction(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        fraction: i64,
    ) -> Result<DateTime64> {
        let date = Self::from_ymd(year, month, day)?;
        let time = TimeSpan64::from_hms(hour, minute, second, fraction)?;
        Ok(DateTime64 {
            ticks: date.ticks + time.ticks(),
        })
    }

    /// Combines a day number and a time of day.
    pub fn from_parts(day_number: i32, time_of_day: TimeSpan64) -> Result<DateTime64> {
        if !(0..=calendar::MAX_DAY_NUMBER).contains(&day_number) {
            return Err(Error::out_of_range("day number", day_number.to_string()));
        }
        if !time_of_day.is_time_of_day() {
            return Err(Error::out_of_range("time of day", time_of_day.to_string()));
        }
        Ok(DateTime64 {
            ticks: day_number as i64 * TICKS_PER_DAY + time_of_day.ticks(),
        })
    }

    /// Days since January 1, 0001.
    pub fn day_number(&self) -> i32 {
        (self.ticks / TICKS_PER_DAY) as i32
    }

    pub fn time_of_day(&self) -> TimeSpan64 {
        TimeSpan64::from_ticks(self.ticks % TICKS_PER_DAY)
    }

    /// Returns midnight of the same day.
    pub fn date(&self) -> DateTime64 {
        DateTime64 {
            ticks: self.ticks - self.ticks % TICKS_PER_DAY,
        }
    }

    /// Returns `(year, month, day)`.
    pub fn ymd(&self) -> (i32, i32, i32) {
        // Ticks are validated on construction, so the day number is always in range.
        calendar::civil_from_days(self.day_number()).unwrap_or((1, 1, 1))
    }

    pub fn year(&self) -> i32 {
        self.ymd().0
    }

    pub fn month(&self) -> i32 {
        self.ymd().1
    }

    pub fn day(&self) -> i32 {
        self.ymd().2
    }

    pub fn hour(&self) -> i32 {
        self.time_of_day().hours() as i32
    }

    pub fn minute(&self) -> i32 {
        self.time_of_day().minutes() as i32
    }

    pub fn second(&self) -> i32 {
        self.time_of_day().seconds() as i32
    }

    /// Sub-second part in ticks.
    pub fn fraction(&self) -> i64 {
        self.ticks % TICKS_PER_SECOND
    }

    pub fn checked_add(self, timespan: TimeSpan64) -> Result<DateTime64> {
        DateTime64::try_from_ticks(self.ticks.saturating_add(timespan.ticks()))
    }

    pub fn checked_sub(self, timespan: TimeSpan64) -> Result<DateTime64> {
        DateTime64::try_from_ticks(self.ticks.saturating_sub(timespan.ticks()))
    }

    /// Converts to a chrono `NaiveDateTime` with the same wall-clock reading.
    pub fn to_naive(&self) -> NaiveDateTime {
        let ticks = self.ticks - TICKS_TILL_UNIX_TIME;
        NaiveDateTime::default()
            + Duration::seconds(ticks.div_euclid(TICKS_PER_SECOND))
            + Duration::nanoseconds(ticks.rem_euclid(TICKS_PER_SECOND) * NANOSECONDS_PER_TICK)
    }
}

impl TryFrom<i64> for DateTime64 {
    type Error = Error;

    fn try_from(ticks: i64) -> Result<DateTime64> {
        DateTime64::try_from_ticks(ticks)
    }
}

impl From<DateTime64> for i64 {
    fn from(value: DateTime64) -> i64 {
        value.ticks
    }
}

impl TryFrom<NaiveDateTime> for DateTime64 {
    type Error = Error;

    fn try_from(value: NaiveDateTime) -> Result<Self> {
        let day_number = value.date().num_days_from_ce() - 1;
        DateTime64::from_parts(day_number, TimeSpan64::from(value.time()))
    }
}

impl From<DateTime64> for NaiveDateTime {
    fn from(value: DateTime64) -> Self {
        value.to_naive()
    }
}

impl fmt::Display for DateTime64 {
    /// Formats as `yyyy-MM-dd HH:mm:ss[.fffffff]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.ymd();
        write!(
            f,
            "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )?;
        let fraction = self.fraction();
        if fraction != 0 {
            write!(f, ".{fraction:07}")?;
        }
        Ok(())
    }
}
