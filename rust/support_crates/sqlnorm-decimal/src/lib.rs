//! Fixed-point decimal values as stored by SQL `decimal`/`numeric`/`money` columns.
//!
//! A [`SqlDecimal`] is a signed unscaled integer (up to 38 decimal digits) and a
//! scale: the value is `mantissa / 10^scale`.

mod dec;


pub use dec::{MAX_PRECISION, SqlDecimal, pow10};
