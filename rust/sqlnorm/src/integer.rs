//! `bit`, `tinyint`, `smallint`, `int` and `bigint`.
//!
//! All five widths normalize to the same 8-byte little-endian two's complement
//! integer, so equal numbers encrypt identically regardless of column width.

use std::marker::PhantomData;

use byteorder::{ByteOrder, LE};
use sqlnorm_common::{Result, error::Error, verify_len};

use crate::codec::{Codec, require_bytes};

/// Encoded length of every integer codec.
pub const INTEGER_LEN: usize = 8;

/// A Rust integer type that a SQL integer column maps to.
pub trait IntegerValue: Copy + Send + Sync + 'static {
    const IDENTIFIER: &'static str;

    fn to_i64(self) -> i64;

    /// Narrows a decoded value, returning `None` when it does not fit.
    fn from_i64(value: i64) -> Option<Self>;
}

impl IntegerValue for bool {
    const IDENTIFIER: &'static str = "SQL_Bit";

    fn to_i64(self) -> i64 {
        self as i64
    }

    fn from_i64(value: i64) -> Option<Self> {
        Some(value != 0)
    }
}

macro_rules! impl_integer_value {
    ($($ty:ty => $id:literal),* $(,)?) => {
        $(
            impl IntegerValue for $ty {
                const IDENTIFIER: &'static str = $id;

                fn to_i64(self) -> i64 {
                    self as i64
                }

                fn from_i64(value: i64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }
            }
        )*
    };
}

impl_integer_value! {
    u8 => "SQL_TinyInt",
    i16 => "SQL_SmallInt",
    i32 => "SQL_Int",
    i64 => "SQL_BigInt",
}

/// Integer codec parameterized by the column's Rust type.
pub struct IntegerCodec<T>(PhantomData<T>);

pub type BitCodec = IntegerCodec<bool>;
pub type TinyIntCodec = IntegerCodec<u8>;
pub type SmallIntCodec = IntegerCodec<i16>;
pub type IntCodec = IntegerCodec<i32>;
pub type BigIntCodec = IntegerCodec<i64>;

impl<T> IntegerCodec<T> {
    pub const fn new() -> Self {
        IntegerCodec(PhantomData)
    }
}

impl<T: IntegerValue> IntegerCodec<T> {
    pub const IDENTIFIER: &'static str = T::IDENTIFIER;
}

impl<T> Default for IntegerCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for IntegerCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: IntegerValue> std::fmt::Debug for IntegerCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(T::IDENTIFIER)
    }
}

impl<T: IntegerValue> Codec for IntegerCodec<T> {
    type Value = T;

    fn identifier(&self) -> &str {
        T::IDENTIFIER
    }

    fn serialize(&self, value: &T) -> Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; INTEGER_LEN];
        LE::write_i64(&mut buf, value.to_i64());
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<T> {
        let bytes = require_bytes(T::IDENTIFIER, bytes)?;
        verify_len!(T::IDENTIFIER, bytes, INTEGER_LEN);
        let value = LE::read_i64(bytes);
        T::from_i64(value).ok_or_else(|| {
            log::trace!("{}: {value} does not fit", T::IDENTIFIER);
            Error::out_of_range(
                "value",
                format!("{value} does not fit in {}", T::IDENTIFIER),
            )
        })
    }
}
