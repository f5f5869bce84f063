//! The serialize/deserialize contract shared by every codec.

use sqlnorm_common::{Result, error::Error};

/// Converts one logical column value to and from its normalized byte form.
///
/// `serialize` returns `None` only for a null value, which only codecs with an
/// optional `Value` (text, binary, [`Nullable`](crate::nullable::Nullable)) can
/// receive. `deserialize` treats `None` as "no bytes": codecs whose value is not
/// optional fail with a missing-input error, the others return their null value.
///
/// Codecs are immutable while shared; reconfiguring one requires `&mut self`.
pub trait Codec: Send + Sync {
    type Value;

    /// Stable identifier of the codec, e.g. `SQL_Int` or `SQL_Int_Nullable`.
    fn identifier(&self) -> &str;

    fn serialize(&self, value: &Self::Value) -> Result<Option<Vec<u8>>>;

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Self::Value>;
}

/// Unwraps the input of a codec whose value is never null.
#[inline]
pub(crate) fn require_bytes<'a>(identifier: &str, bytes: Option<&'a [u8]>) -> Result<&'a [u8]> {
    bytes.ok_or_else(|| {
        log::trace!("{identifier}: deserialize called without bytes");
        Error::missing_input(identifier)
    })
}
