pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns an out-of-range error from the enclosing function when the predicate
/// does not hold.
///
/// ```
/// # use sqlnorm_common::verify_range;
/// fn check(precision: i32) -> sqlnorm_common::Result<()> {
///     verify_range!(precision, (1..=38).contains(&precision));
///     Ok(())
/// }
/// assert!(check(18).is_ok());
/// assert!(check(39).is_err());
/// ```
#[macro_export]
macro_rules! verify_range {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_range(result, stringify!($name), stringify!($expr))?;
    }};
}

/// Returns an out-of-range error when a byte sequence is not exactly `$len` long.
#[macro_export]
macro_rules! verify_len {
    ($element:expr, $bytes:expr, $len:expr) => {{
        let actual = $bytes.len();
        if actual != $len {
            return Err($crate::result::wrong_length($element, $len, actual));
        }
    }};
}

#[inline]
pub fn verify_range(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        out_of_range(name, condition)
    }
}

#[cold]
pub fn out_of_range(name: &str, condition: &str) -> Result<()> {
    log::trace!("{name} out of range: {condition}");
    Err(crate::error::ErrorKind::OutOfRange {
        name: name.to_string(),
        message: format!("condition `{condition}` does not hold"),
    }
    .into())
}

#[cold]
pub fn wrong_length(element: &str, expected: usize, actual: usize) -> crate::error::Error {
    log::trace!("{element}: rejected {actual} bytes, expected {expected}");
    crate::error::Error::byte_length(element, expected, actual)
}
