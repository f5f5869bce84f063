//! `binary(n)` and `varbinary(n)`.

use sqlnorm_common::{Result, error::Error};

use crate::codec::Codec;
use crate::size::{MAX_NARROW_SIZE, SizeLimit, verify_fits};

/// Declared size of `binary(n)` when none is given.
pub const DEFAULT_BINARY_SIZE: i32 = 30;

fn verify_stored(element: &str, bytes: &[u8], limit: SizeLimit) -> Result<()> {
    if limit.admits(bytes.len()) {
        return Ok(());
    }
    log::trace!("{element}: {} stored bytes exceed {limit:?}", bytes.len());
    Err(Error::out_of_range(
        "bytes",
        format!(
            "{element} holds {} bytes, more than the declared size {}",
            bytes.len(),
            limit.declared()
        ),
    ))
}

/// `binary(size)`: input is zero-padded to exactly `size` bytes.
///
/// Decoding keeps the padding, so only inputs of exactly `size` bytes decode to
/// themselves.
#[derive(Clone, Debug)]
pub struct BinaryCodec {
    size: usize,
}

impl BinaryCodec {
    pub const IDENTIFIER: &'static str = "SQL_Binary";

    /// `size` must be in `1..=8000`.
    pub fn new(size: i32) -> Result<Self> {
        Ok(BinaryCodec {
            size: SizeLimit::fixed(Self::IDENTIFIER, size, MAX_NARROW_SIZE)?,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set_size(&mut self, size: i32) -> Result<()> {
        self.size = SizeLimit::fixed(Self::IDENTIFIER, size, MAX_NARROW_SIZE)?;
        Ok(())
    }

    pub fn with_size(mut self, size: i32) -> Result<Self> {
        self.set_size(size)?;
        Ok(self)
    }
}

impl Default for BinaryCodec {
    fn default() -> Self {
        BinaryCodec {
            size: DEFAULT_BINARY_SIZE as usize,
        }
    }
}

impl Codec for BinaryCodec {
    type Value = Option<Vec<u8>>;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &Option<Vec<u8>>) -> Result<Option<Vec<u8>>> {
        let Some(data) = value else {
            return Ok(None);
        };
        verify_fits(Self::IDENTIFIER, SizeLimit::Bounded(self.size), data.len())?;
        let mut buf = data.clone();
        buf.resize(self.size, 0);
        Ok(Some(buf))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        verify_stored(Self::IDENTIFIER, bytes, SizeLimit::Bounded(self.size))?;
        Ok(Some(bytes.to_vec()))
    }
}

/// `varbinary(size)`: input passes through unchanged; `size` may be MAX.
#[derive(Clone, Debug)]
pub struct VarBinaryCodec {
    size: SizeLimit,
}

impl VarBinaryCodec {
    pub const IDENTIFIER: &'static str = "SQL_VarBinary";

    pub fn new(size: i32) -> Result<Self> {
        Ok(VarBinaryCodec {
            size: SizeLimit::from_declared(Self::IDENTIFIER, size, MAX_NARROW_SIZE, true)?,
        })
    }

    pub fn size(&self) -> SizeLimit {
        self.size
    }

    pub fn set_size(&mut self, size: i32) -> Result<()> {
        self.size = SizeLimit::from_declared(Self::IDENTIFIER, size, MAX_NARROW_SIZE, true)?;
        Ok(())
    }

    pub fn with_size(mut self, size: i32) -> Result<Self> {
        self.set_size(size)?;
        Ok(self)
    }
}

impl Default for VarBinaryCodec {
    fn default() -> Self {
        VarBinaryCodec {
            size: SizeLimit::Max,
        }
    }
}

impl Codec for VarBinaryCodec {
    type Value = Option<Vec<u8>>;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &Option<Vec<u8>>) -> Result<Option<Vec<u8>>> {
        let Some(data) = value else {
            return Ok(None);
        };
        verify_fits(Self::IDENTIFIER, self.size, data.len())?;
        Ok(Some(data.clone()))
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        verify_stored(Self::IDENTIFIER, bytes, self.size)?;
        Ok(Some(bytes.to_vec()))
    }
}
