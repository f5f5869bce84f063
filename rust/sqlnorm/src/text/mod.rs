//! `char`, `varchar`, `nchar` and `nvarchar`.
//!
//! Non-Unicode columns store one byte per character of their [`Codepage`]
//! (or the UTF-8 bytes); Unicode columns store UTF-16LE code units. Sizes count
//! stored units: bytes for the narrow types, code units for the wide ones.
//!
//! Fixed-length variants pad with spaces up to the declared size and hand the
//! padding back on decode, exactly as a `char(n)` column would.

use sqlnorm_common::{Result, error::Error};

use crate::codec::Codec;
use crate::size::{MAX_NARROW_SIZE, MAX_WIDE_SIZE, SizeLimit, verify_fits};

pub mod codepage;

pub use codepage::Codepage;

/// Declared size of `char(n)` and `nchar(n)` when none is given.
pub const DEFAULT_FIXED_SIZE: i32 = 30;

fn encode_wide(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn decode_wide(element: &str, bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        log::trace!("{element}: odd UTF-16 byte length {}", bytes.len());
        return Err(Error::out_of_range(
            "bytes",
            format!("{element} expects UTF-16LE, got an odd length {}", bytes.len()),
        ));
    }
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| {
            log::trace!("{element}: {e}");
            Error::out_of_range("bytes", format!("{element} holds invalid UTF-16: {e}"))
        })
}

/// Checks the encoded length against the declared size and pads fixed-length
/// values with `pad`, one unit at a time.
fn finish(
    element: &str,
    mut encoded: Vec<u8>,
    limit: SizeLimit,
    unit: usize,
    pad: &[u8],
    fixed: bool,
) -> Result<Vec<u8>> {
    verify_fits(element, limit, encoded.len() / unit)?;
    if let (true, SizeLimit::Bounded(size)) = (fixed, limit) {
        while encoded.len() < size * unit {
            encoded.extend_from_slice(pad);
        }
    }
    Ok(encoded)
}

/// Rejects stored values longer than the declared size.
fn verify_stored(element: &str, bytes: &[u8], limit: SizeLimit, unit: usize) -> Result<()> {
    if limit.admits(bytes.len() / unit) {
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

/// `char(size)` under a codepage.
///
/// Short values are padded with spaces and decode with the padding kept, so
/// only values already `size` characters long decode to exactly the input.
/// Re-encoding a decoded value always reproduces the stored bytes.
#[derive(Clone, Debug)]
pub struct CharCodec {
    size: usize,
    codepage: Codepage,
}

impl CharCodec {
    pub const IDENTIFIER: &'static str = "SQL_Char_Non_Unicode";

    /// `size` must be in `1..=8000`; `codepage` is a numeric codepage id.
    pub fn new(size: i32, codepage: i32) -> Result<Self> {
        Ok(CharCodec {
            size: Self::verify_size(size)?,
            codepage: Codepage::try_from(codepage)?,
        })
    }

    fn verify_size(size: i32) -> Result<usize> {
        SizeLimit::fixed(Self::IDENTIFIER, size, MAX_NARROW_SIZE)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn codepage(&self) -> Codepage {
        self.codepage
    }

    pub fn set_size(&mut self, size: i32) -> Result<()> {
        self.size = Self::verify_size(size)?;
        Ok(())
    }

    pub fn set_codepage(&mut self, codepage: i32) -> Result<()> {
        self.codepage = Codepage::try_from(codepage)?;
        Ok(())
    }

    pub fn with_size(mut self, size: i32) -> Result<Self> {
        self.set_size(size)?;
        Ok(self)
    }

    pub fn with_codepage(mut self, codepage: i32) -> Result<Self> {
        self.set_codepage(codepage)?;
        Ok(self)
    }
}

impl Default for CharCodec {
    fn default() -> Self {
        CharCodec {
            size: DEFAULT_FIXED_SIZE as usize,
            codepage: Codepage::default(),
        }
    }
}

impl Codec for CharCodec {
    type Value = Option<String>;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &Option<String>) -> Result<Option<Vec<u8>>> {
        let Some(text) = value else {
            return Ok(None);
        };
        let encoded = self.codepage.encode(text);
        let limit = SizeLimit::Bounded(self.size);
        finish(Self::IDENTIFIER, encoded, limit, 1, b" ", true).map(Some)
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<String>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        verify_stored(Self::IDENTIFIER, bytes, SizeLimit::Bounded(self.size), 1)?;
        self.codepage.decode(bytes).map(Some)
    }
}

/// `varchar(size)` under a codepage; `size` may be MAX.
#[derive(Clone, Debug)]
pub struct VarCharCodec {
    size: SizeLimit,
    codepage: Codepage,
}

impl VarCharCodec {
    pub const IDENTIFIER: &'static str = "SQL_VarChar_Non_Unicode";

    /// `size` must be in `1..=8000` or the MAX sentinel.
    pub fn new(size: i32, codepage: i32) -> Result<Self> {
        Ok(VarCharCodec {
            size: SizeLimit::from_declared(Self::IDENTIFIER, size, MAX_NARROW_SIZE, true)?,
            codepage: Codepage::try_from(codepage)?,
        })
    }

    pub fn size(&self) -> SizeLimit {
        self.size
    }

    pub fn codepage(&self) -> Codepage {
        self.codepage
    }

    pub fn set_size(&mut self, size: i32) -> Result<()> {
        self.size = SizeLimit::from_declared(Self::IDENTIFIER, size, MAX_NARROW_SIZE, true)?;
        Ok(())
    }

    pub fn set_codepage(&mut self, codepage: i32) -> Result<()> {
        self.codepage = Codepage::try_from(codepage)?;
        Ok(())
    }

    pub fn with_size(mut self, size: i32) -> Result<Self> {
        self.set_size(size)?;
        Ok(self)
    }

    pub fn with_codepage(mut self, codepage: i32) -> Result<Self> {
        self.set_codepage(codepage)?;
        Ok(self)
    }
}

impl Default for VarCharCodec {
    fn default() -> Self {
        VarCharCodec {
            size: SizeLimit::Max,
            codepage: Codepage::default(),
        }
    }
}

impl Codec for VarCharCodec {
    type Value = Option<String>;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &Option<String>) -> Result<Option<Vec<u8>>> {
        let Some(text) = value else {
            return Ok(None);
        };
        let encoded = self.codepage.encode(text);
        finish(Self::IDENTIFIER, encoded, self.size, 1, b" ", false).map(Some)
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<String>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        verify_stored(Self::IDENTIFIER, bytes, self.size, 1)?;
        self.codepage.decode(bytes).map(Some)
    }
}

/// `nchar(size)`: UTF-16LE padded to `size` code units.
///
/// Like [`CharCodec`], decoding keeps the padding.
#[derive(Clone, Debug)]
pub struct NCharCodec {
    size: usize,
}

impl NCharCodec {
    pub const IDENTIFIER: &'static str = "SQL_NChar";

    /// `size` must be in `1..=4000`.
    pub fn new(size: i32) -> Result<Self> {
        Ok(NCharCodec {
            size: Self::verify_size(size)?,
        })
    }

    fn verify_size(size: i32) -> Result<usize> {
        SizeLimit::fixed(Self::IDENTIFIER, size, MAX_WIDE_SIZE)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set_size(&mut self, size: i32) -> Result<()> {
        self.size = Self::verify_size(size)?;
        Ok(())
    }

    pub fn with_size(mut self, size: i32) -> Result<Self> {
        self.set_size(size)?;
        Ok(self)
    }
}

impl Default for NCharCodec {
    fn default() -> Self {
        NCharCodec {
            size: DEFAULT_FIXED_SIZE as usize,
        }
    }
}

impl Codec for NCharCodec {
    type Value = Option<String>;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &Option<String>) -> Result<Option<Vec<u8>>> {
        let Some(text) = value else {
            return Ok(None);
        };
        let limit = SizeLimit::Bounded(self.size);
        finish(Self::IDENTIFIER, encode_wide(text), limit, 2, &[b' ', 0], true).map(Some)
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<String>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        verify_stored(Self::IDENTIFIER, bytes, SizeLimit::Bounded(self.size), 2)?;
        decode_wide(Self::IDENTIFIER, bytes).map(Some)
    }
}

/// `nvarchar(size)`: UTF-16LE, `size` code units or MAX.
#[derive(Clone, Debug)]
pub struct NVarCharCodec {
    size: SizeLimit,
}

impl NVarCharCodec {
    pub const IDENTIFIER: &'static str = "SQL_NVarChar";

    pub fn new(size: i32) -> Result<Self> {
        Ok(NVarCharCodec {
            size: SizeLimit::from_declared(Self::IDENTIFIER, size, MAX_WIDE_SIZE, true)?,
        })
    }

    pub fn size(&self) -> SizeLimit {
        self.size
    }

    pub fn set_size(&mut self, size: i32) -> Result<()> {
        self.size = SizeLimit::from_declared(Self::IDENTIFIER, size, MAX_WIDE_SIZE, true)?;
        Ok(())
    }

    pub fn with_size(mut self, size: i32) -> Result<Self> {
        self.set_size(size)?;
        Ok(self)
    }
}

impl Default for NVarCharCodec {
    fn default() -> Self {
        NVarCharCodec {
            size: SizeLimit::Max,
        }
    }
}

impl Codec for NVarCharCodec {
    type Value = Option<String>;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn serialize(&self, value: &Option<String>) -> Result<Option<Vec<u8>>> {
        let Some(text) = value else {
            return Ok(None);
        };
        finish(Self::IDENTIFIER, encode_wide(text), self.size, 2, &[b' ', 0], false).map(Some)
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<String>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        verify_stored(Self::IDENTIFIER, bytes, self.size, 2)?;
        decode_wide(Self::IDENTIFIER, bytes).map(Some)
    }
}
