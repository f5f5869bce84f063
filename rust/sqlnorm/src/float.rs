//! `real` and `float`.
//!
//! Both normalize to the 8-byte IEEE-754 double. A `real` is widened exactly
//! before encoding, so a `real` and a `float` holding the same number match.

use std::marker::PhantomData;

use byteorder::{ByteOrder, LE};
use sqlnorm_common::{Result, error::Error, verify_len};

use crate::codec::{Codec, require_bytes};

pub const FLOAT_LEN: usize = 8;

/// A Rust floating-point type that a SQL approximate-numeric column maps to.
pub trait FloatValue: Copy + Send + Sync + 'static {
    const IDENTIFIER: &'static str;

    fn to_f64(self) -> f64;

    /// Narrows a decoded finite double, returning `None` when it overflows.
    fn from_f64(value: f64) -> Option<Self>;
}

impl FloatValue for f32 {
    const IDENTIFIER: &'static str = "SQL_Real";

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Option<Self> {
        let narrowed = value as f32;
        narrowed.is_finite().then_some(narrowed)
    }
}

impl FloatValue for f64 {
    const IDENTIFIER: &'static str = "SQL_Float";

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Option<Self> {
        Some(value)
    }
}

pub struct FloatingCodec<T>(PhantomData<T>);

pub type RealCodec = FloatingCodec<f32>;
pub type FloatCodec = FloatingCodec<f64>;

impl<T> FloatingCodec<T> {
    pub const fn new() -> Self {
        FloatingCodec(PhantomData)
    }
}

impl<T: FloatValue> FloatingCodec<T> {
    pub const IDENTIFIER: &'static str = T::IDENTIFIER;
}

impl<T> Default for FloatingCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FloatingCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: FloatValue> std::fmt::Debug for FloatingCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(T::IDENTIFIER)
    }
}

fn verify_finite(identifier: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        log::trace!("{identifier}: rejected non-finite {value}");
        Err(Error::out_of_range(
            "value",
            format!("{identifier} does not store {value}"),
        ))
    }
}

impl<T: FloatValue> Codec for FloatingCodec<T> {
    type Value = T;

    fn identifier(&self) -> &str {
        T::IDENTIFIER
    }

    fn serialize(&self, value: &T) -> Result<Option<Vec<u8>>> {
        let value = verify_finite(T::IDENTIFIER, value.to_f64())?;
        let mut buf = vec![0u8; FLOAT_LEN];
        LE::write_f64(&mut buf, value);
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<T> {
        let bytes = require_bytes(T::IDENTIFIER, bytes)?;
        verify_len!(T::IDENTIFIER, bytes, FLOAT_LEN);
        let value = verify_finite(T::IDENTIFIER, LE::read_f64(bytes))?;
        T::from_f64(value).ok_or_else(|| {
            log::trace!("{}: {value} overflows", T::IDENTIFIER);
            Error::out_of_range(
                "value",
                format!("{value} does not fit in {}", T::IDENTIFIER),
            )
        })
    }
}
