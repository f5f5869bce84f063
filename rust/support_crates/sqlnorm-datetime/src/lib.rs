//! Calendar and clock values in the 100-nanosecond tick model shared by the
//! database engine's date/time types and .NET `DateTime`.
//!
//! Day 0 is January 1, 0001 of the proleptic Gregorian calendar.

pub mod calendar;
pub mod datetime;
pub mod offset;
pub mod timespan;

#[cfg(test)]
mod tests;

pub use datetime::DateTime64;
pub use offset::DateTimeOffset64;
pub use timespan::TimeSpan64;

pub const TICKS_PER_MICROSECOND: i64 = 10;
pub const TICKS_PER_MILLISECOND: i64 = 10000;
pub const TICKS_PER_SECOND: i64 = TICKS_PER_MILLISECOND * 1000;
pub const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
pub const TICKS_PER_HOUR: i64 = TICKS_PER_MINUTE * 60;
pub const TICKS_PER_DAY: i64 = TICKS_PER_HOUR * 24;
pub const TICKS_TILL_UNIX_TIME: i64 = 621355968000000000;

pub const NANOSECONDS_PER_TICK: i64 = 100;

pub const DAYS_PER_YEAR: i32 = 365;
pub const DAYS_PER_4_YEARS: i32 = DAYS_PER_YEAR * 4 + 1; // 1461
pub const DAYS_PER_100_YEARS: i32 = DAYS_PER_4_YEARS * 25 - 1; // 36524
pub const DAYS_PER_400_YEARS: i32 = DAYS_PER_100_YEARS * 4 + 1; // 146097
pub const DAYS_TO_10000: i32 = DAYS_PER_400_YEARS * 25 - 366; // 3652059
pub const MAX_TICKS: i64 = DAYS_TO_10000 as i64 * TICKS_PER_DAY - 1;
