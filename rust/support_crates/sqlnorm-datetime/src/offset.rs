use crate::datetime::DateTime64;
use crate::timespan::TimeSpan64;
use serde::{Deserialize, Serialize};
use sqlnorm_common::{Result, error::Error};
use std::fmt;

/// Largest offset from UTC accepted by `datetimeoffset` (14 hours).
pub const MAX_OFFSET_MINUTES: i16 = 14 * 60;

/// A point in time together with the UTC offset it was observed at.
///
/// Stored as the UTC instant plus the offset, the way `datetimeoffset` columns
/// hold it. Both the UTC and the local reading must be valid `DateTime64` values.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Serialize, Deserialize, Hash)]
#[serde(try_from = "OffsetFields", into = "OffsetFields")]
pub struct DateTimeOffset64 {
    utc: DateTime64,
    offset_minutes: i16,
}

/// Serialized form of [`DateTimeOffset64`], validated through
/// [`DateTimeOffset64::from_utc`] on the way in.
#[derive(Copy, Clone, Serialize, Deserialize)]
struct OffsetFields {
    utc: DateTime64,
    offset_minutes: i16,
}

impl TryFrom<OffsetFields> for DateTimeOffset64 {
    type Error = Error;

    fn try_from(fields: OffsetFields) -> Result<DateTimeOffset64> {
        DateTimeOffset64::from_utc(fields.utc, fields.offset_minutes)
    }
}

impl From<DateTimeOffset64> for OffsetFields {
    fn from(value: DateTimeOffset64) -> OffsetFields {
        OffsetFields {
            utc: value.utc,
            offset_minutes: value.offset_minutes,
        }
    }
}

impl DateTimeOffset64 {
    /// Creates a value from the local wall-clock reading and its offset.
    pub fn from_local(local: DateTime64, offset_minutes: i16) -> Result<DateTimeOffset64> {
        Self::verify_offset(offset_minutes)?;
        let utc = local.checked_sub(TimeSpan64::from_minutes(offset_minutes as i64))?;
        Ok(DateTimeOffset64 {
            utc,
            offset_minutes,
        })
    }

    /// Creates a value from a UTC instant and the offset to present it in.
    pub fn from_utc(utc: DateTime64, offset_minutes: i16) -> Result<DateTimeOffset64> {
        Self::verify_offset(offset_minutes)?;
        utc.checked_add(TimeSpan64::from_minutes(offset_minutes as i64))?;
        Ok(DateTimeOffset64 {
            utc,
            offset_minutes,
        })
    }

    fn verify_offset(offset_minutes: i16) -> Result<()> {
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset_minutes) {
            return Err(Error::out_of_range(
                "offset",
                format!("{offset_minutes} minutes is outside +/-{MAX_OFFSET_MINUTES}"),
            ));
        }
        Ok(())
    }

    pub fn utc(&self) -> DateTime64 {
        self.utc
    }

    pub fn offset_minutes(&self) -> i16 {
        self.offset_minutes
    }

    /// The local wall-clock reading.
    pub fn local(&self) -> DateTime64 {
        // Validated in the constructors.
        self.utc
            .checked_add(TimeSpan64::from_minutes(self.offset_minutes as i64))
            .unwrap_or(self.utc)
    }
}

impl fmt::Display for DateTimeOffset64 {
    /// Formats as `yyyy-MM-dd HH:mm:ss[.fffffff] +hh:mm` (local time).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let abs = self.offset_minutes.unsigned_abs();
        write!(f, "{} {sign}{:02}:{:02}", self.local(), abs / 60, abs % 60)
    }
}
