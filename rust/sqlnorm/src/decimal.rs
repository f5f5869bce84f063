//! `decimal(p, s)` and `numeric(p, s)`.
//!
//! Encoding (17 bytes):
//!
//! | offset | size | field                                         |
//! |--------|------|-----------------------------------------------|
//! | 0      | 1    | sign: 0 negative, 1 zero or positive          |
//! | 1      | 16   | magnitude at scale `s`, four u32 words, LE,   |
//! |        |      | least significant word first                  |

use std::marker::PhantomData;

use byteorder::{ByteOrder, LE};
use sqlnorm_common::{Result, error::Error, verify_len, verify_range};
use sqlnorm_decimal::{MAX_PRECISION, SqlDecimal, pow10};

use crate::codec::{Codec, require_bytes};

pub const DECIMAL_LEN: usize = 17;

pub const DEFAULT_PRECISION: u8 = 18;
pub const DEFAULT_SCALE: u8 = 0;

const SIGN_NEGATIVE: u8 = 0;
const SIGN_POSITIVE: u8 = 1;

/// Distinguishes `decimal` from `numeric`; the two share every rule.
pub trait ExactNumericKind: Send + Sync + 'static {
    const IDENTIFIER: &'static str;
}

pub struct DecimalKind;
pub struct NumericKind;

impl ExactNumericKind for DecimalKind {
    const IDENTIFIER: &'static str = "SQL_Decimal";
}

impl ExactNumericKind for NumericKind {
    const IDENTIFIER: &'static str = "SQL_Numeric";
}

/// Fixed-point codec with a validated `(precision, scale)` facet.
pub struct ExactNumericCodec<K> {
    precision: u8,
    scale: u8,
    _kind: PhantomData<K>,
}

pub type DecimalCodec = ExactNumericCodec<DecimalKind>;
pub type NumericCodec = ExactNumericCodec<NumericKind>;

fn verify_facets(precision: i32, scale: i32) -> Result<(u8, u8)> {
    verify_range!(precision, (1..=MAX_PRECISION as i32).contains(&precision));
    verify_range!(scale, (0..=precision).contains(&scale));
    Ok((precision as u8, scale as u8))
}

impl<K: ExactNumericKind> ExactNumericCodec<K> {
    /// Creates a codec for `decimal(precision, scale)`.
    ///
    /// Precision must be in `1..=38` and scale in `0..=precision`.
    pub fn new(precision: i32, scale: i32) -> Result<Self> {
        let (precision, scale) = verify_facets(precision, scale)?;
        Ok(ExactNumericCodec {
            precision,
            scale,
            _kind: PhantomData,
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Changes the precision. The current scale must still fit.
    pub fn set_precision(&mut self, precision: i32) -> Result<()> {
        self.set_facets(precision, self.scale as i32)
    }

    pub fn set_scale(&mut self, scale: i32) -> Result<()> {
        self.set_facets(self.precision as i32, scale)
    }

    /// Changes both facets at once; nothing changes if either is invalid.
    pub fn set_facets(&mut self, precision: i32, scale: i32) -> Result<()> {
        let (precision, scale) = verify_facets(precision, scale)?;
        self.precision = precision;
        self.scale = scale;
        Ok(())
    }

    pub fn with_precision(mut self, precision: i32) -> Result<Self> {
        self.set_precision(precision)?;
        Ok(self)
    }

    pub fn with_scale(mut self, scale: i32) -> Result<Self> {
        self.set_scale(scale)?;
        Ok(self)
    }

    fn overflow(&self, value: impl std::fmt::Display) -> Error {
        log::trace!(
            "{}: {value} does not fit ({}, {})",
            K::IDENTIFIER,
            self.precision,
            self.scale
        );
        Error::out_of_range(
            "value",
            format!(
                "{value} does not fit in {}({}, {})",
                K::IDENTIFIER,
                self.precision,
                self.scale
            ),
        )
    }
}

impl<K: ExactNumericKind> ExactNumericCodec<K> {
    pub const IDENTIFIER: &'static str = K::IDENTIFIER;
}

impl<K> Default for ExactNumericCodec<K> {
    fn default() -> Self {
        ExactNumericCodec {
            precision: DEFAULT_PRECISION,
            scale: DEFAULT_SCALE,
            _kind: PhantomData,
        }
    }
}

impl<K> Clone for ExactNumericCodec<K> {
    fn clone(&self) -> Self {
        ExactNumericCodec {
            precision: self.precision,
            scale: self.scale,
            _kind: PhantomData,
        }
    }
}

impl<K: ExactNumericKind> std::fmt::Debug for ExactNumericCodec<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", K::IDENTIFIER, self.precision, self.scale)
    }
}

impl<K: ExactNumericKind> Codec for ExactNumericCodec<K> {
    type Value = SqlDecimal;

    fn identifier(&self) -> &str {
        K::IDENTIFIER
    }

    fn serialize(&self, value: &SqlDecimal) -> Result<Option<Vec<u8>>> {
        let scaled = value
            .rescale(self.scale)
            .map_err(|_| self.overflow(value))?;
        let magnitude = scaled.mantissa().unsigned_abs();
        if magnitude >= pow10(self.precision) as u128 {
            return Err(self.overflow(value));
        }

        let mut buf = vec![0u8; DECIMAL_LEN];
        buf[0] = if scaled.is_negative() {
            SIGN_NEGATIVE
        } else {
            SIGN_POSITIVE
        };
        for (i, word) in buf[1..].chunks_exact_mut(4).enumerate() {
            LE::write_u32(word, (magnitude >> (32 * i)) as u32);
        }
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<SqlDecimal> {
        let bytes = require_bytes(K::IDENTIFIER, bytes)?;
        verify_len!(K::IDENTIFIER, bytes, DECIMAL_LEN);

        let negative = match bytes[0] {
            SIGN_NEGATIVE => true,
            SIGN_POSITIVE => false,
            sign => {
                return Err(Error::out_of_range(
                    "sign",
                    format!("{} sign byte must be 0 or 1, got {sign}", K::IDENTIFIER),
                ));
            }
        };
        let magnitude = bytes[1..]
            .chunks_exact(4)
            .enumerate()
            .fold(0u128, |acc, (i, word)| {
                acc | (LE::read_u32(word) as u128) << (32 * i)
            });
        if magnitude >= pow10(self.precision) as u128 {
            return Err(self.overflow(format!("magnitude {magnitude}")));
        }

        let mantissa = magnitude as i128;
        SqlDecimal::new(if negative { -mantissa } else { mantissa }, self.scale)
    }
}
