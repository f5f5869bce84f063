//! `uniqueidentifier`.

use sqlnorm_common::{Result, verify_len};
use sqlnorm_guid::Guid;

use crate::codec::{Codec, require_bytes};

pub const GUID_LEN: usize = 16;

/// The 16 bytes of a [`Guid`] in the engine's mixed-endian order: the first
/// three fields little-endian, the trailing eight bytes as they are.
#[derive(Clone, Debug, Default)]
pub struct UniqueIdentifierCodec;

impl UniqueIdentifierCodec {
    pub const IDENTIFIER: &'static str = "SQL_UniqueIdentifier";

    pub const fn new() -> Self {
        UniqueIdentifierCodec
    }
}

impl Codec for UniqueIdentifierCodec {
    type Value = Guid;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &Guid) -> Result<Option<Vec<u8>>> {
        Ok(Some(value.as_slice().to_vec()))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Guid> {
        let bytes = require_bytes(Self::IDENTIFIER, bytes)?;
        verify_len!(Self::IDENTIFIER, bytes, GUID_LEN);
        Guid::from_slice(bytes)
    }
}
