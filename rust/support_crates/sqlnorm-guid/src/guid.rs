use byteorder::{ByteOrder, LE};
use serde::{Deserialize, Serialize};
use sqlnorm_common::{Result, error::Error};
use std::cmp::Ordering;

/// 16-byte GUID in the database engine's mixed-endian layout: the 32-bit and
/// the two 16-bit leading fields little-endian, the trailing 8 bytes in order.
///
/// This is the layout `uniqueidentifier` values take inside the engine, and the
/// one .NET `Guid::ToByteArray` produces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "uuid::Uuid", into = "uuid::Uuid")]
#[repr(C)]
pub struct Guid([u8; 16]);

impl Guid {
    /// Returns the NIL (all zero) GUID.
    pub const fn nil() -> Guid {
        Guid([0; 16])
    }

    /// Parses a GUID from a canonical or hyphen-less hexadecimal string,
    /// optionally enclosed in braces.
    pub fn parse_str(input: &str) -> Result<Guid> {
        uuid::Uuid::try_parse(input)
            .map(Guid::from)
            .map_err(|e| Error::out_of_range("guid", e.to_string()))
    }

    /// Constructs a GUID from individual field components (a, b, c, d).
    pub fn from_fields(a: u32, b: u16, c: u16, d: &[u8; 8]) -> Guid {
        let mut buf = [0u8; 16];
        LE::write_u32(&mut buf[0..4], a);
        LE::write_u16(&mut buf[4..6], b);
        LE::write_u16(&mut buf[6..8], c);
        buf[8..].copy_from_slice(d);
        Guid(buf)
    }

    /// Decomposes the GUID into its field components.
    pub fn to_fields(&self) -> (u32, u16, u16, [u8; 8]) {
        let mut d = [0u8; 8];
        d.copy_from_slice(&self.0[8..]);
        (
            LE::read_u32(&self.0[0..4]),
            LE::read_u16(&self.0[4..6]),
            LE::read_u16(&self.0[6..8]),
            d,
        )
    }

    /// Creates a GUID from bytes already in the mixed-endian layout.
    pub const fn from_bytes(bytes: &[u8; 16]) -> Guid {
        Guid(*bytes)
    }

    /// Returns the mixed-endian bytes.
    pub const fn bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Builds a GUID from a slice in the mixed-endian layout, validating length.
    pub fn from_slice(s: &[u8]) -> Result<Guid> {
        let bytes: [u8; 16] = s
            .try_into()
            .map_err(|_| Error::byte_length("guid", 16, s.len()))?;
        Ok(Guid(bytes))
    }

    /// Returns the underlying bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns true if this GUID equals the NIL GUID.
    pub fn is_nil(&self) -> bool {
        *self == Guid::nil()
    }

    /// Compares two GUIDs field by field (a, b, c, then d).
    pub fn compare(&self, other: &Guid) -> Ordering {
        self.to_fields().cmp(&other.to_fields())
    }
}

impl std::fmt::Debug for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        uuid::Uuid::from(*self).fmt(f)
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        uuid::Uuid::from(*self).fmt(f)
    }
}

impl From<uuid::Uuid> for Guid {
    fn from(u: uuid::Uuid) -> Self {
        let (a, b, c, d) = u.as_fields();
        Guid::from_fields(a, b, c, d)
    }
}

impl From<Guid> for uuid::Uuid {
    fn from(g: Guid) -> Self {
        let (a, b, c, d) = g.to_fields();
        uuid::Uuid::from_fields(a, b, c, &d)
    }
}

impl AsRef<[u8]> for Guid {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::str::FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Guid::parse_str(s)
    }
}

impl Default for Guid {
    #[inline]
    fn default() -> Self {
        Guid::nil()
    }
}
