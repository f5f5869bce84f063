//! Column metadata and codec construction from it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlnorm_common::Result;

use crate::binary::{BinaryCodec, DEFAULT_BINARY_SIZE, VarBinaryCodec};
use crate::codec::Codec;
use crate::decimal::{DEFAULT_PRECISION, DEFAULT_SCALE, DecimalCodec, NumericCodec};
use crate::float::{FloatCodec, RealCodec};
use crate::guid::UniqueIdentifierCodec;
use crate::integer::{BigIntCodec, BitCodec, IntCodec, SmallIntCodec, TinyIntCodec};
use crate::money::{MoneyCodec, SmallMoneyCodec};
use crate::nullable::Nullable;
use crate::size::SIZE_MAX_SENTINEL;
use crate::temporal::{
    DEFAULT_TIME_SCALE, DateCodec, DateTime2Codec, DateTimeCodec, DateTimeOffsetCodec,
    SmallDateTimeCodec, TimeCodec,
};
use crate::text::{
    CharCodec, Codepage, DEFAULT_FIXED_SIZE, NCharCodec, NVarCharCodec, VarCharCodec,
};
use crate::value::{DynCodec, SqlValueType};

/// Column types with a normalized encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Real,
    Float,
    Money,
    SmallMoney,
    Decimal,
    Numeric,
    Date,
    SmallDateTime,
    DateTime,
    DateTime2,
    Time,
    DateTimeOffset,
    Char,
    VarChar,
    NChar,
    NVarChar,
    Binary,
    VarBinary,
    UniqueIdentifier,
}

impl SqlType {
    pub const ALL: [SqlType; 24] = [
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::Int,
        SqlType::BigInt,
        SqlType::Real,
        SqlType::Float,
        SqlType::Money,
        SqlType::SmallMoney,
        SqlType::Decimal,
        SqlType::Numeric,
        SqlType::Date,
        SqlType::SmallDateTime,
        SqlType::DateTime,
        SqlType::DateTime2,
        SqlType::Time,
        SqlType::DateTimeOffset,
        SqlType::Char,
        SqlType::VarChar,
        SqlType::NChar,
        SqlType::NVarChar,
        SqlType::Binary,
        SqlType::VarBinary,
        SqlType::UniqueIdentifier,
    ];

    /// Identifier of the codec for a column of this type.
    pub fn identifier(&self) -> &'static str {
        match self {
            SqlType::Bit => BitCodec::IDENTIFIER,
            SqlType::TinyInt => TinyIntCodec::IDENTIFIER,
            SqlType::SmallInt => SmallIntCodec::IDENTIFIER,
            SqlType::Int => IntCodec::IDENTIFIER,
            SqlType::BigInt => BigIntCodec::IDENTIFIER,
            SqlType::Real => RealCodec::IDENTIFIER,
            SqlType::Float => FloatCodec::IDENTIFIER,
            SqlType::Money => MoneyCodec::IDENTIFIER,
            SqlType::SmallMoney => SmallMoneyCodec::IDENTIFIER,
            SqlType::Decimal => DecimalCodec::IDENTIFIER,
            SqlType::Numeric => NumericCodec::IDENTIFIER,
            SqlType::Date => DateCodec::IDENTIFIER,
            SqlType::SmallDateTime => SmallDateTimeCodec::IDENTIFIER,
            SqlType::DateTime => DateTimeCodec::IDENTIFIER,
            SqlType::DateTime2 => DateTime2Codec::IDENTIFIER,
            SqlType::Time => TimeCodec::IDENTIFIER,
            SqlType::DateTimeOffset => DateTimeOffsetCodec::IDENTIFIER,
            SqlType::Char => CharCodec::IDENTIFIER,
            SqlType::VarChar => VarCharCodec::IDENTIFIER,
            SqlType::NChar => NCharCodec::IDENTIFIER,
            SqlType::NVarChar => NVarCharCodec::IDENTIFIER,
            SqlType::Binary => BinaryCodec::IDENTIFIER,
            SqlType::VarBinary => VarBinaryCodec::IDENTIFIER,
            SqlType::UniqueIdentifier => UniqueIdentifierCodec::IDENTIFIER,
        }
    }

    /// Character and binary codecs take optional values themselves and are
    /// never wrapped in [`Nullable`].
    pub fn has_null_value(&self) -> bool {
        matches!(
            self,
            SqlType::Char
                | SqlType::VarChar
                | SqlType::NChar
                | SqlType::NVarChar
                | SqlType::Binary
                | SqlType::VarBinary
        )
    }
}

/// Metadata of one encrypted column, as the host reads it from the catalog.
///
/// Facets left as `None` take the type's default: 30 for `char`, `nchar` and
/// `binary`, MAX for the variable-length types, `(18, 0)` for `decimal` and
/// `numeric`, scale 7 for the time types and codepage 1252. Facets that do not
/// apply to the type are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub sql_type: SqlType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codepage: Option<i32>,
}

impl ColumnDescriptor {
    pub fn new(sql_type: SqlType) -> Self {
        ColumnDescriptor {
            sql_type,
            nullable: false,
            size: None,
            precision: None,
            scale: None,
            codepage: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_codepage(mut self, codepage: i32) -> Self {
        self.codepage = Some(codepage);
        self
    }

    /// Builds a new codec for this column.
    ///
    /// Fails with an out-of-range error when a facet is invalid for the type.
    pub fn create_codec(&self) -> Result<Arc<dyn DynCodec>> {
        let nullable = self.nullable;
        let time_scale = self.scale.unwrap_or(DEFAULT_TIME_SCALE as i32);
        let codepage = self.codepage.unwrap_or(Codepage::DEFAULT_ID);
        let fixed_size = self.size.unwrap_or(DEFAULT_FIXED_SIZE);
        let var_size = self.size.unwrap_or(SIZE_MAX_SENTINEL);

        let codec = match self.sql_type {
            SqlType::Bit => wrap(BitCodec::new(), nullable),
            SqlType::TinyInt => wrap(TinyIntCodec::new(), nullable),
            SqlType::SmallInt => wrap(SmallIntCodec::new(), nullable),
            SqlType::Int => wrap(IntCodec::new(), nullable),
            SqlType::BigInt => wrap(BigIntCodec::new(), nullable),
            SqlType::Real => wrap(RealCodec::new(), nullable),
            SqlType::Float => wrap(FloatCodec::new(), nullable),
            SqlType::Money => wrap(MoneyCodec::new(), nullable),
            SqlType::SmallMoney => wrap(SmallMoneyCodec::new(), nullable),
            SqlType::Decimal => {
                let codec = DecimalCodec::new(self.precision(), self.decimal_scale())?;
                wrap(codec, nullable)
            }
            SqlType::Numeric => {
                let codec = NumericCodec::new(self.precision(), self.decimal_scale())?;
                wrap(codec, nullable)
            }
            SqlType::Date => wrap(DateCodec::new(), nullable),
            SqlType::SmallDateTime => wrap(SmallDateTimeCodec::new(), nullable),
            SqlType::DateTime => wrap(DateTimeCodec::new(), nullable),
            SqlType::DateTime2 => wrap(DateTime2Codec::new(time_scale)?, nullable),
            SqlType::Time => wrap(TimeCodec::new(time_scale)?, nullable),
            SqlType::DateTimeOffset => wrap(DateTimeOffsetCodec::new(time_scale)?, nullable),
            SqlType::Char => wrap(CharCodec::new(fixed_size, codepage)?, false),
            SqlType::VarChar => wrap(VarCharCodec::new(var_size, codepage)?, false),
            SqlType::NChar => wrap(NCharCodec::new(fixed_size)?, false),
            SqlType::NVarChar => wrap(NVarCharCodec::new(var_size)?, false),
            SqlType::Binary => {
                let size = self.size.unwrap_or(DEFAULT_BINARY_SIZE);
                wrap(BinaryCodec::new(size)?, false)
            }
            SqlType::VarBinary => wrap(VarBinaryCodec::new(var_size)?, false),
            SqlType::UniqueIdentifier => wrap(UniqueIdentifierCodec::new(), nullable),
        };
        Ok(codec)
    }

    fn precision(&self) -> i32 {
        self.precision.unwrap_or(DEFAULT_PRECISION as i32)
    }

    fn decimal_scale(&self) -> i32 {
        self.scale.unwrap_or(DEFAULT_SCALE as i32)
    }
}

fn wrap<C>(codec: C, nullable: bool) -> Arc<dyn DynCodec>
where
    C: Codec + 'static,
    C::Value: SqlValueType,
{
    if nullable {
        Arc::new(Nullable::new(codec))
    } else {
        Arc::new(codec)
    }
}
