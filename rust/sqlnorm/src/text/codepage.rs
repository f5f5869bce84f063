//! Character encodings of non-Unicode (`char`, `varchar`) columns.

use sqlnorm_common::{Result, error::Error};

/// Byte written for a character the codepage cannot represent.
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Windows-1252 assignments of `0x80..=0x9F`. Undefined positions map to the C1
/// control character of the same value.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Codepage {
    /// Windows Latin-1 (1252), the default collation codepage.
    #[default]
    Windows1252,
    /// ISO-8859-1 (28591).
    Latin1,
    /// US-ASCII (20127).
    Ascii,
    /// UTF-8 (65001).
    Utf8,
}

impl Codepage {
    pub const DEFAULT_ID: i32 = 1252;

    pub fn id(&self) -> i32 {
        match self {
            Codepage::Windows1252 => 1252,
            Codepage::Latin1 => 28591,
            Codepage::Ascii => 20127,
            Codepage::Utf8 => 65001,
        }
    }

    /// Encodes `text`, replacing characters the codepage lacks with `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Codepage::Utf8 => text.as_bytes().to_vec(),
            Codepage::Latin1 => text.chars().map(|c| narrow(c, 0xFF)).collect(),
            Codepage::Ascii => text.chars().map(|c| narrow(c, 0x7F)).collect(),
            Codepage::Windows1252 => text.chars().map(encode_1252).collect(),
        }
    }

    /// Decodes bytes stored under this codepage.
    ///
    /// Only UTF-8 can be malformed. US-ASCII decodes bytes above `0x7F` as `?`.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Codepage::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                log::trace!("invalid UTF-8: {e}");
                Error::out_of_range("bytes", format!("invalid UTF-8: {e}"))
            }),
            Codepage::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Codepage::Ascii => Ok(bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect()),
            Codepage::Windows1252 => Ok(bytes.iter().map(|&b| decode_1252(b)).collect()),
        }
    }
}

impl TryFrom<i32> for Codepage {
    type Error = Error;

    fn try_from(id: i32) -> Result<Codepage> {
        match id {
            1252 => Ok(Codepage::Windows1252),
            28591 => Ok(Codepage::Latin1),
            20127 => Ok(Codepage::Ascii),
            65001 => Ok(Codepage::Utf8),
            _ => {
                log::trace!("unsupported codepage {id}");
                Err(Error::out_of_range(
                    "codepage",
                    format!("{id} is not one of 1252, 28591, 20127, 65001"),
                ))
            }
        }
    }
}

fn narrow(c: char, max: u32) -> u8 {
    let code = c as u32;
    if code <= max {
        code as u8
    } else {
        REPLACEMENT_BYTE
    }
}

fn encode_1252(c: char) -> u8 {
    let code = c as u32;
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return code as u8;
    }
    WINDOWS_1252_HIGH
        .iter()
        .position(|&h| h == c)
        .map_or(REPLACEMENT_BYTE, |i| 0x80 + i as u8)
}

fn decode_1252(b: u8) -> char {
    match b {
        0x80..=0x9F => WINDOWS_1252_HIGH[(b - 0x80) as usize],
        _ => b as char,
    }
}
