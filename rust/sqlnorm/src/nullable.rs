use sqlnorm_common::Result;

use crate::codec::Codec;

/// Adds null handling to a codec whose value is never null.
///
/// `None` serializes to no bytes and no bytes deserialize to `None`; everything
/// else is delegated to the wrapped codec. The identifier is the wrapped
/// codec's identifier with a `_Nullable` suffix.
#[derive(Clone, Debug)]
pub struct Nullable<C> {
    inner: C,
    identifier: String,
}

impl<C: Codec> Nullable<C> {
    pub fn new(inner: C) -> Self {
        let identifier = format!("{}_Nullable", inner.identifier());
        Nullable { inner, identifier }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Gives access to the wrapped codec's configuration (scale, precision).
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Codec + Default> Default for Nullable<C> {
    fn default() -> Self {
        Nullable::new(C::default())
    }
}

impl<C: Codec> Codec for Nullable<C> {
    type Value = Option<C::Value>;

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn serialize(&self, value: &Option<C::Value>) -> Result<Option<Vec<u8>>> {
        match value {
            Some(value) => self.inner.serialize(value),
            None => Ok(None),
        }
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<C::Value>> {
        match bytes {
            Some(bytes) => self.inner.deserialize(Some(bytes)).map(Some),
            None => Ok(None),
        }
    }
}
