use sqlnorm_common::{Result, error::Error, verify_len};
use sqlnorm_datetime::{DateTime64, TimeSpan64};

use super::{DATE_LEN, read_date, write_date};
use crate::codec::{Codec, require_bytes};

/// `date`: the day number since 0001-01-01 in 3 bytes.
///
/// Only midnight values are accepted, since the column holds no time of day.
#[derive(Clone, Debug, Default)]
pub struct DateCodec;

impl DateCodec {
    pub const IDENTIFIER: &'static str = "SQL_Date";

    pub const fn new() -> Self {
        DateCodec
    }
}

impl Codec for DateCodec {
    type Value = DateTime64;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &DateTime64) -> Result<Option<Vec<u8>>> {
        if value.time_of_day() != TimeSpan64::ZERO {
            log::trace!("{}: rejected time of day in {value}", Self::IDENTIFIER);
            return Err(Error::out_of_range(
                "value",
                format!("{value} has a time of day, {} stores dates only", Self::IDENTIFIER),
            ));
        }
        let mut buf = Vec::with_capacity(DATE_LEN);
        write_date(Self::IDENTIFIER, &mut buf, *value)?;
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<DateTime64> {
        let bytes = require_bytes(Self::IDENTIFIER, bytes)?;
        verify_len!(Self::IDENTIFIER, bytes, DATE_LEN);
        let day_number = read_date(Self::IDENTIFIER, bytes)?;
        DateTime64::from_parts(day_number, TimeSpan64::ZERO)
    }
}
