//! Dynamically typed values and the object-safe codec interface.
//!
//! Hosts that pick codecs from column metadata at runtime cannot name the
//! codec's `Value` type. They exchange [`SqlValue`]s with a [`DynCodec`]
//! instead; every [`Codec`] whose value type implements [`SqlValueType`] is a
//! `DynCodec`.

use serde::{Deserialize, Serialize};
use sqlnorm_common::{Result, error::Error};
use sqlnorm_datetime::{DateTime64, DateTimeOffset64, TimeSpan64};
use sqlnorm_decimal::SqlDecimal;
use sqlnorm_guid::Guid;

use crate::codec::Codec;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Bit(bool),
    TinyInt(u8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Real(f32),
    Float(f64),
    Decimal(SqlDecimal),
    DateTime(DateTime64),
    DateTimeOffset(DateTimeOffset64),
    Time(TimeSpan64),
    Guid(Guid),
    String(String),
    Binary(Vec<u8>),
}

impl SqlValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "Null",
            SqlValue::Bit(_) => "Bit",
            SqlValue::TinyInt(_) => "TinyInt",
            SqlValue::SmallInt(_) => "SmallInt",
            SqlValue::Int(_) => "Int",
            SqlValue::BigInt(_) => "BigInt",
            SqlValue::Real(_) => "Real",
            SqlValue::Float(_) => "Float",
            SqlValue::Decimal(_) => "Decimal",
            SqlValue::DateTime(_) => "DateTime",
            SqlValue::DateTimeOffset(_) => "DateTimeOffset",
            SqlValue::Time(_) => "Time",
            SqlValue::Guid(_) => "Guid",
            SqlValue::String(_) => "String",
            SqlValue::Binary(_) => "Binary",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

/// A Rust type with a [`SqlValue`] counterpart.
pub trait SqlValueType: Sized + Send + Sync + 'static {
    /// Name of the matching [`SqlValue`] variant.
    const TYPE_NAME: &'static str;

    fn from_sql_value(value: &SqlValue) -> Result<Self>;

    fn into_sql_value(self) -> SqlValue;
}

fn mismatch(expected: &str, actual: &SqlValue) -> Error {
    log::trace!("expected a {expected} value, got {}", actual.type_name());
    Error::type_mismatch(expected, actual.type_name())
}

macro_rules! impl_sql_value_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl SqlValueType for $ty {
                const TYPE_NAME: &'static str = stringify!($variant);

                fn from_sql_value(value: &SqlValue) -> Result<Self> {
                    match value {
                        SqlValue::$variant(v) => Ok(v.clone()),
                        other => Err(mismatch(Self::TYPE_NAME, other)),
                    }
                }

                fn into_sql_value(self) -> SqlValue {
                    SqlValue::$variant(self)
                }
            }

            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> SqlValue {
                    SqlValue::$variant(value)
                }
            }
        )*
    };
}

impl_sql_value_type! {
    bool => Bit,
    u8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Real,
    f64 => Float,
    SqlDecimal => Decimal,
    DateTime64 => DateTime,
    DateTimeOffset64 => DateTimeOffset,
    TimeSpan64 => Time,
    Guid => Guid,
    String => String,
    Vec<u8> => Binary,
}

impl<T: SqlValueType> SqlValueType for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_sql_value(value: &SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }

    fn into_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, T::into_sql_value)
    }
}

/// Object-safe view of a [`Codec`] over [`SqlValue`]s.
pub trait DynCodec: Send + Sync {
    fn identifier(&self) -> &str;

    /// Serializes `value`, failing with a type mismatch if it is not of the
    /// codec's value type. `SqlValue::Null` is only accepted by codecs whose
    /// value is optional.
    fn serialize_value(&self, value: &SqlValue) -> Result<Option<Vec<u8>>>;

    fn deserialize_value(&self, bytes: Option<&[u8]>) -> Result<SqlValue>;
}

impl<C> DynCodec for C
where
    C: Codec,
    C::Value: SqlValueType,
{
    fn identifier(&self) -> &str {
        Codec::identifier(self)
    }

    fn serialize_value(&self, value: &SqlValue) -> Result<Option<Vec<u8>>> {
        let value = C::Value::from_sql_value(value)?;
        self.serialize(&value)
    }

    fn deserialize_value(&self, bytes: Option<&[u8]>) -> Result<SqlValue> {
        self.deserialize(bytes).map(SqlValueType::into_sql_value)
    }
}

impl std::fmt::Debug for dyn DynCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DynCodec").field(&self.identifier()).finish()
    }
}
