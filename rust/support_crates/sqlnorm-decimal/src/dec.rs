use sqlnorm_common::{Result, error::Error};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::str::FromStr;

/// Maximum number of significant digits a decimal column can hold.
pub const MAX_PRECISION: u8 = 38;

const POW10: [i128; 39] = {
    let mut table = [1i128; 39];
    let mut i = 1;
    while i < table.len() {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
};

/// Returns `10^exp` for `exp` in `0..=38`.
#[inline]
pub const fn pow10(exp: u8) -> i128 {
    POW10[exp as usize]
}

/// A signed decimal number: `mantissa / 10^scale`.
///
/// Equality and ordering are numeric, so `1.50` equals `1.5`.
#[derive(Copy, Clone, Default)]
pub struct SqlDecimal {
    mantissa: i128,
    scale: u8,
}

impl SqlDecimal {
    pub const ZERO: SqlDecimal = SqlDecimal {
        mantissa: 0,
        scale: 0,
    };

    /// Creates a decimal from an unscaled mantissa and a scale.
    ///
    /// Fails when the scale exceeds 38 or the mantissa needs more than 38 digits.
    pub fn new(mantissa: i128, scale: u8) -> Result<SqlDecimal> {
        if scale > MAX_PRECISION {
            return Err(Error::out_of_range(
                "scale",
                format!("{scale} exceeds {MAX_PRECISION}"),
            ));
        }
        if mantissa.unsigned_abs() >= pow10(MAX_PRECISION) as u128 {
            return Err(Error::out_of_range(
                "mantissa",
                format!("{mantissa} has more than {MAX_PRECISION} digits"),
            ));
        }
        Ok(SqlDecimal { mantissa, scale })
    }

    pub fn from_i64(value: i64) -> SqlDecimal {
        SqlDecimal {
            mantissa: value as i128,
            scale: 0,
        }
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Number of decimal digits in the unscaled magnitude (0 has one digit).
    pub fn digits(&self) -> u8 {
        let abs = self.mantissa.unsigned_abs();
        let mut n = 1u8;
        while n <= MAX_PRECISION && abs >= pow10(n) as u128 {
            n += 1;
        }
        n
    }

    /// Returns the value at `scale` fractional digits.
    ///
    /// Dropped digits are rounded half away from zero. Fails if the result needs
    /// more than 38 digits.
    pub fn rescale(&self, scale: u8) -> Result<SqlDecimal> {
        if scale > MAX_PRECISION {
            return Err(Error::out_of_range(
                "scale",
                format!("{scale} exceeds {MAX_PRECISION}"),
            ));
        }
        match scale.cmp(&self.scale) {
            Ordering::Equal => Ok(*self),
            Ordering::Greater => {
                let mantissa = self
                    .mantissa
                    .checked_mul(pow10(scale - self.scale))
                    .filter(|m| m.unsigned_abs() < pow10(MAX_PRECISION) as u128)
                    .ok_or_else(|| {
                        Error::out_of_range(
                            "decimal",
                            format!("{self} cannot be represented with scale {scale}"),
                        )
                    })?;
                Ok(SqlDecimal { mantissa, scale })
            }
            Ordering::Less => {
                let divisor = pow10(self.scale - scale);
                let quotient = self.mantissa / divisor;
                let remainder = (self.mantissa % divisor).unsigned_abs();
                let mantissa = if remainder * 2 >= divisor as u128 {
                    quotient + self.mantissa.signum()
                } else {
                    quotient
                };
                SqlDecimal::new(mantissa, scale)
            }
        }
    }

    /// Removes trailing fractional zeros.
    pub fn normalize(&self) -> SqlDecimal {
        let mut result = *self;
        while result.scale > 0 && result.mantissa % 10 == 0 {
            result.mantissa /= 10;
            result.scale -= 1;
        }
        result
    }

    /// Returns the integral part, truncated toward zero.
    pub fn trunc(&self) -> i128 {
        self.mantissa / pow10(self.scale)
    }

    /// Lossy conversion to `f64`.
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / pow10(self.scale) as f64
    }
}

impl From<i64> for SqlDecimal {
    fn from(value: i64) -> Self {
        SqlDecimal::from_i64(value)
    }
}

impl From<i32> for SqlDecimal {
    fn from(value: i32) -> Self {
        SqlDecimal::from_i64(value as i64)
    }
}

impl Neg for SqlDecimal {
    type Output = SqlDecimal;

    fn neg(self) -> SqlDecimal {
        SqlDecimal {
            mantissa: -self.mantissa,
            scale: self.scale,
        }
    }
}

impl PartialEq for SqlDecimal {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.normalize(), other.normalize());
        a.mantissa == b.mantissa && a.scale == b.scale
    }
}

impl Eq for SqlDecimal {}

impl Hash for SqlDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let n = self.normalize();
        n.mantissa.hash(state);
        n.scale.hash(state);
    }
}

impl PartialOrd for SqlDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SqlDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = self.mantissa.signum().cmp(&other.mantissa.signum());
        if sign != Ordering::Equal {
            return sign;
        }
        let (a, b) = (self.normalize(), other.normalize());
        let scale = a.scale.max(b.scale);
        // Upscaling can only overflow the side with the larger magnitude.
        match (
            a.mantissa.checked_mul(pow10(scale - a.scale)),
            b.mantissa.checked_mul(pow10(scale - b.scale)),
        ) {
            (Some(x), Some(y)) => x.cmp(&y),
            (None, _) => {
                if a.mantissa < 0 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (_, None) => {
                if b.mantissa < 0 {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        }
    }
}

impl fmt::Display for SqlDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.mantissa.unsigned_abs();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        if self.scale == 0 {
            return write!(f, "{sign}{abs}");
        }
        let divisor = pow10(self.scale) as u128;
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / divisor,
            abs % divisor,
            width = self.scale as usize
        )
    }
}

impl fmt::Debug for SqlDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlDecimal({self})")
    }
}

impl FromStr for SqlDecimal {
    type Err = Error;

    /// Parses `[+-]digits[.digits]`; the scale is the number of fractional digits.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::out_of_range("decimal", format!("'{s}' is not a decimal number"));
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part
            .bytes()
            .chain(frac_part.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let scale = u8::try_from(frac_part.len())
            .ok()
            .filter(|&scale| scale <= MAX_PRECISION)
            .ok_or_else(invalid)?;

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((b - b'0') as i128))
                .ok_or_else(invalid)?;
        }
        if negative {
            mantissa = -mantissa;
        }
        SqlDecimal::new(mantissa, scale)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SqlDecimal {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SqlDecimal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<SqlDecimal, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
