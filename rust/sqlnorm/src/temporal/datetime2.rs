//! `datetime2(s)`, `time(s)` and `datetimeoffset(s)`.

use byteorder::{ByteOrder, LE};
use sqlnorm_common::{Result, verify_len};
use sqlnorm_datetime::{DateTime64, DateTimeOffset64, TimeSpan64};

use super::{
    DATE_LEN, OFFSET_LEN, impl_time_scale, read_date, read_time, time_len, write_date, write_time,
};
use crate::codec::{Codec, require_bytes};

/// Time of day followed by the 3-byte date.
fn write_datetime2(
    element: &str,
    buf: &mut Vec<u8>,
    value: DateTime64,
    scale: u8,
) -> Result<()> {
    write_time(element, buf, value.time_of_day(), scale)?;
    write_date(element, buf, value)
}

fn read_datetime2(element: &str, bytes: &[u8], scale: u8) -> Result<DateTime64> {
    let (time, date) = bytes.split_at(time_len(scale));
    let time_of_day = read_time(element, time, scale)?;
    let day_number = read_date(element, date)?;
    DateTime64::from_parts(day_number, time_of_day)
}

/// `datetime2(scale)`: the time of day at `scale` (3 to 5 bytes), then the
/// 3-byte day number. Sub-scale digits are truncated.
#[derive(Clone, Debug)]
pub struct DateTime2Codec {
    scale: u8,
}

impl_time_scale!(DateTime2Codec);

impl DateTime2Codec {
    pub const IDENTIFIER: &'static str = "SQL_DateTime2";

    /// Encoded length at the current scale.
    pub fn encoded_len(&self) -> usize {
        time_len(self.scale) + DATE_LEN
    }
}

impl Codec for DateTime2Codec {
    type Value = DateTime64;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &DateTime64) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        write_datetime2(Self::IDENTIFIER, &mut buf, *value, self.scale)?;
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<DateTime64> {
        let bytes = require_bytes(Self::IDENTIFIER, bytes)?;
        verify_len!(Self::IDENTIFIER, bytes, self.encoded_len());
        read_datetime2(Self::IDENTIFIER, bytes, self.scale)
    }
}

/// `time(scale)`: a time of day in 3 to 5 bytes.
#[derive(Clone, Debug)]
pub struct TimeCodec {
    scale: u8,
}

impl_time_scale!(TimeCodec);

impl TimeCodec {
    pub const IDENTIFIER: &'static str = "SQL_Time";

    pub fn encoded_len(&self) -> usize {
        time_len(self.scale)
    }
}

impl Codec for TimeCodec {
    type Value = TimeSpan64;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &TimeSpan64) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        write_time(Self::IDENTIFIER, &mut buf, *value, self.scale)?;
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<TimeSpan64> {
        let bytes = require_bytes(Self::IDENTIFIER, bytes)?;
        verify_len!(Self::IDENTIFIER, bytes, self.encoded_len());
        read_time(Self::IDENTIFIER, bytes, self.scale)
    }
}

/// `datetimeoffset(scale)`: the `datetime2(scale)` encoding of the UTC instant,
/// then the offset in minutes as a signed 2-byte integer.
///
/// Two values denoting the same instant with different offsets encode
/// differently.
#[derive(Clone, Debug)]
pub struct DateTimeOffsetCodec {
    scale: u8,
}

impl_time_scale!(DateTimeOffsetCodec);

impl DateTimeOffsetCodec {
    pub const IDENTIFIER: &'static str = "SQL_DateTimeOffset";

    pub fn encoded_len(&self) -> usize {
        time_len(self.scale) + DATE_LEN + OFFSET_LEN
    }
}

impl Codec for DateTimeOffsetCodec {
    type Value = DateTimeOffset64;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &DateTimeOffset64) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        write_datetime2(Self::IDENTIFIER, &mut buf, value.utc(), self.scale)?;
        let start = buf.len();
        buf.resize(start + OFFSET_LEN, 0);
        LE::write_i16(&mut buf[start..], value.offset_minutes());
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<DateTimeOffset64> {
        let bytes = require_bytes(Self::IDENTIFIER, bytes)?;
        verify_len!(Self::IDENTIFIER, bytes, self.encoded_len());
        let (datetime, offset) = bytes.split_at(bytes.len() - OFFSET_LEN);
        let utc = read_datetime2(Self::IDENTIFIER, datetime, self.scale)?;
        DateTimeOffset64::from_utc(utc, LE::read_i16(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::test_util::{assert_missing_input, assert_rejects_wrong_lengths, round_trip};
    use sqlnorm_datetime::calendar::MAX_DAY_NUMBER;
    use sqlnorm_datetime::{MAX_TICKS, TICKS_PER_DAY};

    #[test]
    fn test_datetime2_layout() {
        let codec = DateTime2Codec::default();
        assert_eq!(codec.scale(), 7);
        assert_eq!(round_trip(&codec, DateTime64::MIN, 8), [0u8; 8]);

        let value = DateTime64::from_ymd_hms_fraction(2000, 1, 1, 0, 0, 1, 5).unwrap();
        let bytes = round_trip(&codec, value, 8);
        assert_eq!(bytes, [0x85, 0x96, 0x98, 0x00, 0x00, 0x07, 0x24, 0x0B]);

        round_trip(&codec, DateTime64::MAX, 8);
        assert_missing_input(&codec);
        assert_rejects_wrong_lengths(&codec, 8);
    }

    #[test]
    fn test_datetime2_lengths_by_scale() {
        for (scale, len) in [(0, 6), (2, 6), (3, 7), (4, 7), (5, 8), (7, 8)] {
            let codec = DateTime2Codec::new(scale).unwrap();
            assert_eq!(codec.encoded_len(), len);
            let bytes = codec.serialize(&DateTime64::MAX).unwrap().unwrap();
            assert_eq!(bytes.len(), len, "scale {scale}");
            assert_rejects_wrong_lengths(&codec, len);
        }
    }

    #[test]
    fn test_datetime2_truncates() {
        let codec = DateTime2Codec::new(3).unwrap();
        let value = DateTime64::from_ymd_hms_fraction(2021, 3, 4, 5, 6, 7, 1_239_999).unwrap();
        let bytes = codec.serialize(&value).unwrap();
        let decoded = codec.deserialize(bytes.as_deref()).unwrap();
        assert_eq!(
            decoded,
            DateTime64::from_ymd_hms_fraction(2021, 3, 4, 5, 6, 7, 1_230_000).unwrap()
        );
        assert_eq!(codec.serialize(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_datetime2_invalid_bytes() {
        let codec = DateTime2Codec::new(0).unwrap();
        let mut bytes = [0u8; 6];
        bytes[..3].copy_from_slice(&86_400u32.to_le_bytes()[..3]);
        assert!(codec.deserialize(Some(&bytes)).unwrap_err().is_out_of_range());

        let mut bytes = [0u8; 6];
        bytes[3..].copy_from_slice(&(MAX_DAY_NUMBER as u32 + 1).to_le_bytes()[..3]);
        assert!(codec.deserialize(Some(&bytes)).is_err());
    }

    #[test]
    fn test_scale_facet() {
        assert!(DateTime2Codec::new(8).unwrap_err().is_out_of_range());
        assert!(TimeCodec::new(-1).is_err());
        let mut codec = DateTimeOffsetCodec::new(2).unwrap();
        assert!(codec.set_scale(9).is_err());
        assert_eq!(codec.scale(), 2);
        let codec = codec.with_scale(5).unwrap();
        assert_eq!(codec.encoded_len(), 10);
    }

    #[test]
    fn test_time() {
        let codec = TimeCodec::default();
        let noon = TimeSpan64::from_hms(12, 0, 0, 0).unwrap();
        let half_day = (TICKS_PER_DAY as u64 / 2).to_le_bytes();
        assert_eq!(round_trip(&codec, noon, 5), &half_day[..5]);
        round_trip(&codec, TimeSpan64::from_ticks(TICKS_PER_DAY - 1), 5);

        let seconds = TimeCodec::new(0).unwrap();
        let bytes = round_trip(&seconds, TimeSpan64::from_hms(23, 59, 59, 0).unwrap(), 3);
        assert_eq!(bytes, [0x7F, 0x51, 0x01]);

        assert!(codec.serialize(&TimeSpan64::from_days(1)).unwrap_err().is_out_of_range());
        assert!(codec.serialize(&TimeSpan64::from_ticks(-1)).is_err());
        assert_missing_input(&codec);
        assert_rejects_wrong_lengths(&TimeCodec::new(3).unwrap(), 4);
    }

    #[test]
    fn test_datetimeoffset() {
        let codec = DateTimeOffsetCodec::default();
        let local = DateTime64::from_ymd_hms(2024, 1, 1, 1, 30, 0).unwrap();
        let value = DateTimeOffset64::from_local(local, 120).unwrap();
        let bytes = round_trip(&codec, value, 10);
        assert_eq!(&bytes[8..], &[120, 0]);

        // Same instant, different offset: different bytes.
        let utc = DateTimeOffset64::from_utc(value.utc(), 0).unwrap();
        let utc_bytes = round_trip(&codec, utc, 10);
        assert_eq!(bytes[..8], utc_bytes[..8]);
        assert_ne!(bytes, utc_bytes);

        let west = DateTimeOffset64::from_utc(value.utc(), -840).unwrap();
        let bytes = round_trip(&codec, west, 10);
        assert_eq!(LE::read_i16(&bytes[8..]), -840);

        assert_missing_input(&codec);
        assert_rejects_wrong_lengths(&codec, 10);
    }

    #[test]
    fn test_datetimeoffset_invalid_offset() {
        let codec = DateTimeOffsetCodec::new(0).unwrap();
        let value = DateTimeOffset64::from_utc(DateTime64::from_ymd(2000, 1, 1).unwrap(), 0).unwrap();
        let mut bytes = codec.serialize(&value).unwrap().unwrap();
        LE::write_i16(&mut bytes[6..], 841);
        assert!(codec.deserialize(Some(&bytes)).unwrap_err().is_out_of_range());

        // The local reading of the maximum UTC instant must exist too.
        let max = DateTimeOffset64::from_utc(DateTime64::MAX, 0).unwrap();
        let mut bytes = codec.serialize(&max).unwrap().unwrap();
        LE::write_i16(&mut bytes[6..], 60);
        assert!(codec.deserialize(Some(&bytes)).is_err());
    }

    #[test]
    fn test_random_datetime2() {
        fastrand::seed(2222);
        for scale in 0..=7 {
            let codec = DateTime2Codec::new(scale).unwrap();
            let unit = 10i64.pow(7 - scale as u32);
            for _ in 0..200 {
                let ticks = fastrand::i64(0..=MAX_TICKS) / unit * unit;
                let value = DateTime64::try_from_ticks(ticks).unwrap();
                round_trip(&codec, value, codec.encoded_len());
            }
        }
    }

    #[test]
    fn test_values_from_host_metadata() {
        use crate::value::SqlValue;

        // Values arriving through serde are validated before any codec sees them.
        for json in [
            r#"{"DateTime":-864000000000}"#,
            r#"{"DateTime":-1}"#,
            r#"{"DateTimeOffset":{"utc":630822816000000000,"offset_minutes":5000}}"#,
        ] {
            assert!(serde_json::from_str::<SqlValue>(json).is_err(), "{json}");
        }

        let json = r#"{"DateTimeOffset":{"utc":630822816000000000,"offset_minutes":-300}}"#;
        let SqlValue::DateTimeOffset(value) = serde_json::from_str::<SqlValue>(json).unwrap() else {
            panic!("expected a datetimeoffset value");
        };
        let codec = DateTimeOffsetCodec::default();
        round_trip(&codec, value, codec.encoded_len());
        let SqlValue::DateTime(value) = serde_json::from_str::<SqlValue>(r#"{"DateTime":0}"#).unwrap()
        else {
            panic!("expected a datetime value");
        };
        round_trip(&DateTime2Codec::default(), value, 8);

        // A time outside one day fails instead of overflowing the time field.
        let codec = TimeCodec::new(0).unwrap();
        assert!(codec.serialize(&TimeSpan64::MIN).unwrap_err().is_out_of_range());
        assert!(codec.serialize(&TimeSpan64::MAX).unwrap_err().is_out_of_range());
    }
}
