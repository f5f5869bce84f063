//! `money` and `smallmoney`.
//!
//! Both store the amount in ten-thousandths as an 8-byte little-endian signed
//! integer. Amounts with more than four fractional digits are rounded half away
//! from zero before the range check.

use std::marker::PhantomData;

use byteorder::{ByteOrder, LE};
use sqlnorm_common::{Result, error::Error, verify_len};
use sqlnorm_decimal::SqlDecimal;

use crate::codec::{Codec, require_bytes};

pub const MONEY_LEN: usize = 8;

/// Fractional digits kept by both currency types.
pub const MONEY_SCALE: u8 = 4;

/// Range of a currency column, in ten-thousandths.
pub trait CurrencyRange: Send + Sync + 'static {
    const IDENTIFIER: &'static str;
    const MIN: i64;
    const MAX: i64;
}

/// `-922,337,203,685,477.5808 ..= 922,337,203,685,477.5807`
pub struct Money;

/// `-214,748.3648 ..= 214,748.3647`
pub struct SmallMoney;

impl CurrencyRange for Money {
    const IDENTIFIER: &'static str = "SQL_Money";
    const MIN: i64 = i64::MIN;
    const MAX: i64 = i64::MAX;
}

impl CurrencyRange for SmallMoney {
    const IDENTIFIER: &'static str = "SQL_SmallMoney";
    const MIN: i64 = i32::MIN as i64;
    const MAX: i64 = i32::MAX as i64;
}

pub struct CurrencyCodec<R>(PhantomData<R>);

pub type MoneyCodec = CurrencyCodec<Money>;
pub type SmallMoneyCodec = CurrencyCodec<SmallMoney>;

impl<R> CurrencyCodec<R> {
    pub const fn new() -> Self {
        CurrencyCodec(PhantomData)
    }
}

impl<R: CurrencyRange> CurrencyCodec<R> {
    pub const IDENTIFIER: &'static str = R::IDENTIFIER;
}

impl<R> Default for CurrencyCodec<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for CurrencyCodec<R> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<R: CurrencyRange> std::fmt::Debug for CurrencyCodec<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(R::IDENTIFIER)
    }
}

impl<R: CurrencyRange> CurrencyCodec<R> {
    fn out_of_range(value: impl std::fmt::Display) -> Error {
        log::trace!("{}: {value} is out of range", R::IDENTIFIER);
        Error::out_of_range(
            "value",
            format!("{value} is outside the range of {}", R::IDENTIFIER),
        )
    }

    /// The amount in ten-thousandths, rounded and range-checked.
    fn units(value: &SqlDecimal) -> Result<i64> {
        let scaled = value
            .rescale(MONEY_SCALE)
            .map_err(|_| Self::out_of_range(value))?;
        i64::try_from(scaled.mantissa())
            .ok()
            .filter(|units| (R::MIN..=R::MAX).contains(units))
            .ok_or_else(|| Self::out_of_range(value))
    }
}

impl<R: CurrencyRange> Codec for CurrencyCodec<R> {
    type Value = SqlDecimal;

    fn identifier(&self) -> &str {
        R::IDENTIFIER
    }

    fn serialize(&self, value: &SqlDecimal) -> Result<Option<Vec<u8>>> {
        let units = Self::units(value)?;
        let mut buf = vec![0u8; MONEY_LEN];
        LE::write_i64(&mut buf, units);
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<SqlDecimal> {
        let bytes = require_bytes(R::IDENTIFIER, bytes)?;
        verify_len!(R::IDENTIFIER, bytes, MONEY_LEN);
        let units = LE::read_i64(bytes);
        if !(R::MIN..=R::MAX).contains(&units) {
            return Err(Self::out_of_range(format!("{units} ten-thousandths")));
        }
        SqlDecimal::new(units as i128, MONEY_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::test_util::{assert_missing_input, assert_rejects_wrong_lengths, round_trip};

    fn dec(s: &str) -> SqlDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_money_encoding() {
        let codec = MoneyCodec::new();
        let bytes = round_trip(&codec, dec("1.5"), MONEY_LEN);
        assert_eq!(bytes, 15000i64.to_le_bytes());
        let decoded = codec.deserialize(Some(&bytes)).unwrap();
        assert_eq!(decoded.scale(), MONEY_SCALE);
        assert_eq!(decoded.to_string(), "1.5000");

        round_trip(&codec, dec("-0.0001"), MONEY_LEN);
        round_trip(&codec, SqlDecimal::ZERO, MONEY_LEN);
        assert_missing_input(&codec);
        assert_rejects_wrong_lengths(&codec, MONEY_LEN);
    }

    #[test]
    fn test_money_limits() {
        let codec = MoneyCodec::new();
        let max = round_trip(&codec, dec("922337203685477.5807"), MONEY_LEN);
        assert_eq!(max, i64::MAX.to_le_bytes());
        let min = round_trip(&codec, dec("-922337203685477.5808"), MONEY_LEN);
        assert_eq!(min, i64::MIN.to_le_bytes());

        assert!(codec.serialize(&dec("922337203685477.5808")).unwrap_err().is_out_of_range());
        assert!(codec.serialize(&dec("-922337203685477.5809")).is_err());
        assert!(codec.serialize(&dec("99999999999999999999999999999999.9")).is_err());
    }

    #[test]
    fn test_money_rounding() {
        let codec = MoneyCodec::new();
        let encode = |s: &str| LE::read_i64(&codec.serialize(&dec(s)).unwrap().unwrap());
        assert_eq!(encode("0.00005"), 1);
        assert_eq!(encode("0.00004"), 0);
        assert_eq!(encode("-0.00005"), -1);
        assert_eq!(encode("2.12345"), 21235);
        // Rounding up past the limit is rejected.
        assert!(codec.serialize(&dec("922337203685477.58075")).is_err());
    }

    #[test]
    fn test_small_money() {
        let codec = SmallMoneyCodec::new();
        round_trip(&codec, dec("214748.3647"), MONEY_LEN);
        round_trip(&codec, dec("-214748.3648"), MONEY_LEN);
        assert!(codec.serialize(&dec("214748.3648")).unwrap_err().is_out_of_range());
        assert!(codec.serialize(&dec("-214748.3649")).is_err());

        // Same bytes as `money` for amounts both can hold.
        let small = codec.serialize(&dec("12.34")).unwrap();
        assert_eq!(small, MoneyCodec::new().serialize(&dec("12.34")).unwrap());

        let large = MoneyCodec::new().serialize(&dec("300000")).unwrap().unwrap();
        assert!(codec.deserialize(Some(&large)).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_random_amounts() {
        fastrand::seed(4004);
        let codec = MoneyCodec::new();
        for _ in 0..1000 {
            let value = SqlDecimal::new(fastrand::i64(..) as i128, MONEY_SCALE).unwrap();
            round_trip(&codec, value, MONEY_LEN);
        }
    }
}
