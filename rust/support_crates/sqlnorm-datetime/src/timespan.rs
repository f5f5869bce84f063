use super::*;
use serde::{Deserialize, Serialize};
use sqlnorm_common::{Result, error::Error};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A signed duration in 100-nanosecond ticks, compatible with .NET `TimeSpan`.
///
/// A `TimeSpan64` in `[0, 24h)` is also the logical value of a `time` column.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
#[repr(C)]
pub struct TimeSpan64 {
    ticks: i64,
}

impl TimeSpan64 {
    pub const ZERO: TimeSpan64 = TimeSpan64 { ticks: 0 };
    pub const MIN: TimeSpan64 = TimeSpan64 { ticks: i64::MIN };
    pub const MAX: TimeSpan64 = TimeSpan64 { ticks: i64::MAX };

    pub const fn from_ticks(ticks: i64) -> TimeSpan64 {
        TimeSpan64 { ticks }
    }

    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Builds a time-of-day value; each component must be within its clock range
    /// and `fraction` is given in ticks (`0..10_000_000`).
    pub fn from_hms(hour: i32, minute: i32, second: i32, fraction: i64) -> Result<TimeSpan64> {
        if !(0..=23).contains(&hour) {
            return Err(Error::out_of_range("hour", hour.to_string()));
        }
        if !(0..=59).contains(&minute) {
            return Err(Error::out_of_range("minute", minute.to_string()));
        }
        if !(0..=59).contains(&second) {
            return Err(Error::out_of_range("second", second.to_string()));
        }
        if !(0..TICKS_PER_SECOND).contains(&fraction) {
            return Err(Error::out_of_range("fraction", fraction.to_string()));
        }
        Ok(TimeSpan64 {
            ticks: hour as i64 * TICKS_PER_HOUR
                + minute as i64 * TICKS_PER_MINUTE
                + second as i64 * TICKS_PER_SECOND
                + fraction,
        })
    }

    pub const fn from_days(days: i64) -> TimeSpan64 {
        TimeSpan64 {
            ticks: days * TICKS_PER_DAY,
        }
    }

    pub const fn from_minutes(minutes: i64) -> TimeSpan64 {
        TimeSpan64 {
            ticks: minutes * TICKS_PER_MINUTE,
        }
    }

    pub const fn from_millis(milliseconds: i64) -> TimeSpan64 {
        TimeSpan64 {
            ticks: milliseconds * TICKS_PER_MILLISECOND,
        }
    }

    /// Returns `true` when the span is a valid time of day, `[00:00, 24:00)`.
    pub fn is_time_of_day(&self) -> bool {
        (0..TICKS_PER_DAY).contains(&self.ticks)
    }

    pub fn days(&self) -> i64 {
        self.ticks / TICKS_PER_DAY
    }

    pub fn hours(&self) -> i64 {
        (self.ticks / TICKS_PER_HOUR) % 24
    }

    pub fn minutes(&self) -> i64 {
        (self.ticks / TICKS_PER_MINUTE) % 60
    }

    pub fn seconds(&self) -> i64 {
        (self.ticks / TICKS_PER_SECOND) % 60
    }

    /// Sub-second part in ticks.
    pub fn fraction(&self) -> i64 {
        self.ticks % TICKS_PER_SECOND
    }

    pub fn total_minutes(&self) -> i64 {
        self.ticks / TICKS_PER_MINUTE
    }

    pub fn checked_add(self, other: TimeSpan64) -> Option<TimeSpan64> {
        self.ticks.checked_add(other.ticks).map(TimeSpan64::from_ticks)
    }

    pub fn checked_sub(self, other: TimeSpan64) -> Option<TimeSpan64> {
        self.ticks.checked_sub(other.ticks).map(TimeSpan64::from_ticks)
    }
}

impl Add for TimeSpan64 {
    type Output = TimeSpan64;

    fn add(self, other: TimeSpan64) -> TimeSpan64 {
        TimeSpan64::from_ticks(self.ticks + other.ticks)
    }
}

impl Sub for TimeSpan64 {
    type Output = TimeSpan64;

    fn sub(self, other: TimeSpan64) -> TimeSpan64 {
        TimeSpan64::from_ticks(self.ticks - other.ticks)
    }
}

impl Neg for TimeSpan64 {
    type Output = TimeSpan64;

    fn neg(self) -> TimeSpan64 {
        TimeSpan64::from_ticks(-self.ticks)
    }
}

impl From<chrono::NaiveTime> for TimeSpan64 {
    fn from(t: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        // Leap-second nanoseconds (>= 1e9) are folded into the last tick of the second.
        let nanos = (t.nanosecond() as i64).min(999_999_999);
        TimeSpan64::from_ticks(
            t.num_seconds_from_midnight() as i64 * TICKS_PER_SECOND + nanos / NANOSECONDS_PER_TICK,
        )
    }
}

impl fmt::Display for TimeSpan64 {
    /// Formats as `[-][d.]hh:mm:ss[.fffffff]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.ticks < 0 { "-" } else { "" };
        let abs = self.ticks.unsigned_abs();
        let days = abs / TICKS_PER_DAY as u64;
        let hours = (abs / TICKS_PER_HOUR as u64) % 24;
        let minutes = (abs / TICKS_PER_MINUTE as u64) % 60;
        let seconds = (abs / TICKS_PER_SECOND as u64) % 60;
        let fraction = abs % TICKS_PER_SECOND as u64;
        write!(f, "{sign}")?;
        if days != 0 {
            write!(f, "{days}.")?;
        }
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;
        if fraction != 0 {
            write!(f, ".{fraction:07}")?;
        }
        Ok(())
    }
}
