//! Declared sizes of character and binary columns.

use sqlnorm_common::{Result, error::Error};

/// Size value that stands for `MAX` (`varchar(max)`, `varbinary(max)`, ...).
pub const SIZE_MAX_SENTINEL: i32 = -1;

/// Largest declared size of `char`, `varchar`, `binary` and `varbinary`.
pub const MAX_NARROW_SIZE: usize = 8000;

/// Largest declared size of `nchar` and `nvarchar`, in UTF-16 code units.
pub const MAX_WIDE_SIZE: usize = 4000;

/// Upper bound on the encoded length of a variable-length value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SizeLimit {
    Bounded(usize),
    Max,
}

impl SizeLimit {
    /// Validates a declared size against `1..=limit`, accepting the MAX sentinel
    /// only when `allow_max` is set.
    pub fn from_declared(element: &str, size: i32, limit: usize, allow_max: bool) -> Result<SizeLimit> {
        if size == SIZE_MAX_SENTINEL && allow_max {
            return Ok(SizeLimit::Max);
        }
        verify_bounded(element, size, limit, allow_max).map(SizeLimit::Bounded)
    }

    /// Validates the declared size of a fixed-length column, which has no MAX
    /// form.
    pub fn fixed(element: &str, size: i32, limit: usize) -> Result<usize> {
        verify_bounded(element, size, limit, false)
    }

    /// Returns `true` when a value of `len` units fits.
    pub fn admits(&self, len: usize) -> bool {
        match self {
            SizeLimit::Bounded(size) => len <= *size,
            SizeLimit::Max => true,
        }
    }

    /// The declared size, with MAX reported as the sentinel.
    pub fn declared(&self) -> i32 {
        match self {
            SizeLimit::Bounded(size) => *size as i32,
            SizeLimit::Max => SIZE_MAX_SENTINEL,
        }
    }
}

/// Checks `size` against `1..=limit`; `allow_max` only shapes the message.
fn verify_bounded(element: &str, size: i32, limit: usize, allow_max: bool) -> Result<usize> {
    match usize::try_from(size) {
        Ok(size) if (1..=limit).contains(&size) => Ok(size),
        _ => {
            log::trace!("{element}: rejected size {size}");
            let accepted = if allow_max {
                format!("1..={limit} or {SIZE_MAX_SENTINEL} (MAX)")
            } else {
                format!("1..={limit}")
            };
            Err(Error::out_of_range(
                "size",
                format!("{element} size {size} is outside {accepted}"),
            ))
        }
    }
}

/// Fails when a value of `len` units does not fit in `limit`.
pub(crate) fn verify_fits(element: &str, limit: SizeLimit, len: usize) -> Result<()> {
    if limit.admits(len) {
        Ok(())
    } else {
        log::trace!("{element}: value of {len} units exceeds {limit:?}");
        Err(Error::out_of_range(
            "value",
            format!(
                "{element} value of length {len} exceeds the declared size {}",
                limit.declared()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_sizes() {
        assert_eq!(
            SizeLimit::from_declared("SQL_Binary", 1, MAX_NARROW_SIZE, false).unwrap(),
            SizeLimit::Bounded(1)
        );
        assert_eq!(
            SizeLimit::from_declared("SQL_VarBinary", -1, MAX_NARROW_SIZE, true).unwrap(),
            SizeLimit::Max
        );
        assert!(SizeLimit::from_declared("SQL_Binary", -1, MAX_NARROW_SIZE, false).is_err());
        assert!(SizeLimit::from_declared("SQL_VarBinary", -2, MAX_NARROW_SIZE, true).is_err());
        assert!(SizeLimit::from_declared("SQL_VarBinary", 0, MAX_NARROW_SIZE, true).is_err());
        assert!(SizeLimit::from_declared("SQL_NChar", 4001, MAX_WIDE_SIZE, false).is_err());
        assert!(SizeLimit::from_declared("SQL_NChar", 4000, MAX_WIDE_SIZE, false).is_ok());
        assert_eq!(SizeLimit::fixed("SQL_Char", 10, MAX_NARROW_SIZE).unwrap(), 10);
        assert!(SizeLimit::fixed("SQL_Char", -1, MAX_NARROW_SIZE).is_err());
    }

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(SizeLimit::fixed("SQL_Binary", 1, MAX_NARROW_SIZE).unwrap(), 1);
        assert_eq!(SizeLimit::fixed("SQL_NChar", 4000, MAX_WIDE_SIZE).unwrap(), 4000);
        for size in [SIZE_MAX_SENTINEL, 0, -2, i32::MIN, 4001, i32::MAX] {
            let err = SizeLimit::fixed("SQL_NChar", size, MAX_WIDE_SIZE).unwrap_err();
            assert!(err.is_out_of_range(), "{size}");
        }
    }

    #[test]
    fn test_admits() {
        assert!(SizeLimit::Bounded(3).admits(3));
        assert!(!SizeLimit::Bounded(3).admits(4));
        assert!(SizeLimit::Max.admits(usize::MAX));
        assert_eq!(SizeLimit::Max.declared(), SIZE_MAX_SENTINEL);
        assert!(verify_fits("SQL_VarChar", SizeLimit::Bounded(2), 3).unwrap_err().is_out_of_range());
    }
}
