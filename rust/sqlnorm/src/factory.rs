//! Registry of codecs, looked up by identifier or by value type.
//!
//! A [`CodecFactory`] holds two maps:
//!
//! - every registered codec by its identifier, as a [`DynCodec`];
//! - one default codec per Rust value type, as a typed `Arc<dyn Codec<Value = T>>`.
//!
//! [`CodecFactory::new`] pre-registers the standard set: one default per value
//! type, plus the codecs that share a value type with a default (`money`
//! shares `SqlDecimal` with `decimal`, `date` shares `DateTime64` with
//! `datetime2`, and so on) and can only be found by identifier.
//!
//! Lookups take a read lock; registration takes a write lock, so concurrent
//! readers never block each other.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use sqlnorm_common::Result;

use crate::binary::{BinaryCodec, VarBinaryCodec};
use crate::codec::Codec;
use crate::decimal::{DecimalCodec, NumericCodec};
use crate::descriptor::ColumnDescriptor;
use crate::float::{FloatCodec, RealCodec};
use crate::guid::UniqueIdentifierCodec;
use crate::integer::{BigIntCodec, BitCodec, IntCodec, SmallIntCodec, TinyIntCodec};
use crate::money::{MoneyCodec, SmallMoneyCodec};
use crate::nullable::Nullable;
use crate::temporal::{
    DateCodec, DateTime2Codec, DateTimeCodec, DateTimeOffsetCodec, SmallDateTimeCodec, TimeCodec,
};
use crate::text::{CharCodec, NCharCodec, NVarCharCodec, VarCharCodec};
use crate::value::{DynCodec, SqlValueType};

type TypedEntry = Arc<dyn Any + Send + Sync>;

pub struct CodecFactory {
    by_identifier: RwLock<ahash::HashMap<String, Arc<dyn DynCodec>>>,
    defaults: RwLock<ahash::HashMap<TypeId, TypedEntry>>,
}

impl CodecFactory {
    /// Creates a factory with the standard codec set registered.
    pub fn new() -> CodecFactory {
        let factory = CodecFactory::empty();
        factory.register_standard();
        factory
    }

    /// Creates a factory with no codecs at all.
    pub fn empty() -> CodecFactory {
        CodecFactory {
            by_identifier: Default::default(),
            defaults: Default::default(),
        }
    }

    /// The process-wide factory, created with [`CodecFactory::new`] on first use.
    pub fn global() -> &'static CodecFactory {
        static GLOBAL: OnceLock<CodecFactory> = OnceLock::new();
        GLOBAL.get_or_init(CodecFactory::new)
    }

    /// Registers `codec` under its identifier, replacing any codec already
    /// registered under the same identifier.
    ///
    /// With `override_default` set, the codec also becomes the default for its
    /// value type. Without it, the codec becomes the default only when its value
    /// type has none yet.
    pub fn register<C>(&self, codec: C, override_default: bool)
    where
        C: Codec + 'static,
        C::Value: SqlValueType,
    {
        let identifier = Codec::identifier(&codec).to_string();
        let codec = Arc::new(codec);

        let type_id = TypeId::of::<C::Value>();
        let typed: Arc<dyn Codec<Value = C::Value>> = codec.clone();
        {
            let mut defaults = self.defaults.write().unwrap_or_else(PoisonError::into_inner);
            if override_default || !defaults.contains_key(&type_id) {
                log::debug!(
                    "default codec for {} is now {identifier}",
                    std::any::type_name::<C::Value>()
                );
                defaults.insert(type_id, Arc::new(typed));
            }
        }

        log::debug!("registered codec {identifier}");
        self.by_identifier
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identifier, codec);
    }

    /// Looks a codec up by identifier.
    pub fn get(&self, identifier: &str) -> Option<Arc<dyn DynCodec>> {
        self.by_identifier
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }

    /// The default codec for values of type `T`.
    pub fn default_codec<T: SqlValueType>(&self) -> Option<Arc<dyn Codec<Value = T>>> {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn Codec<Value = T>>>())
            .cloned()
    }

    /// Identifiers of all registered codecs, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self
            .by_identifier
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        identifiers.sort();
        identifiers
    }

    /// Returns a shared codec for `column`, building it on first request.
    ///
    /// Codecs are cached per distinct descriptor for the life of the process;
    /// the cache holds one entry per descriptor ever requested and is never
    /// evicted. Invalid descriptors fail every time and are never cached.
    pub fn get_or_create(column: &ColumnDescriptor) -> Result<Arc<dyn DynCodec>> {
        if let Some(codec) = COLUMN_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(column)
        {
            return Ok(codec.clone());
        }

        log::trace!("building codec for {column:?}");
        let codec = column.create_codec()?;
        let mut cache = COLUMN_CACHE.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have built one meanwhile; keep the first.
        Ok(cache.entry(column.clone()).or_insert(codec).clone())
    }

    fn register_standard(&self) {
        fn with_nullable<C>(factory: &CodecFactory, codec: C, override_default: bool)
        where
            C: Codec + Clone + 'static,
            C::Value: SqlValueType,
        {
            factory.register(Nullable::new(codec.clone()), override_default);
            factory.register(codec, override_default);
        }

        with_nullable(self, BitCodec::new(), true);
        with_nullable(self, TinyIntCodec::new(), true);
        with_nullable(self, SmallIntCodec::new(), true);
        with_nullable(self, IntCodec::new(), true);
        with_nullable(self, BigIntCodec::new(), true);
        with_nullable(self, RealCodec::new(), true);
        with_nullable(self, FloatCodec::new(), true);
        with_nullable(self, DecimalCodec::default(), true);
        with_nullable(self, DateTime2Codec::default(), true);
        with_nullable(self, DateTimeOffsetCodec::default(), true);
        with_nullable(self, TimeCodec::default(), true);
        with_nullable(self, UniqueIdentifierCodec::new(), true);
        self.register(NVarCharCodec::default(), true);
        self.register(VarBinaryCodec::default(), true);

        with_nullable(self, DateCodec::new(), false);
        with_nullable(self, DateTimeCodec::new(), false);
        with_nullable(self, SmallDateTimeCodec::new(), false);
        with_nullable(self, MoneyCodec::new(), false);
        with_nullable(self, SmallMoneyCodec::new(), false);
        with_nullable(self, NumericCodec::default(), false);
        self.register(BinaryCodec::default(), false);
        self.register(NCharCodec::default(), false);
        self.register(CharCodec::default(), false);
        self.register(VarCharCodec::default(), false);
    }
}

impl Default for CodecFactory {
    fn default() -> Self {
        CodecFactory::new()
    }
}

impl std::fmt::Debug for CodecFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecFactory")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

static COLUMN_CACHE: RwLock<ahash::HashMap<ColumnDescriptor, Arc<dyn DynCodec>>> =
    RwLock::new(ahash::HashMap::with_hasher(ahash::RandomState::with_seeds(
        18233412, 5509813377, 734112093, 2966501184,
    )));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::SqlType;
    use crate::value::SqlValue;
    use sqlnorm_datetime::DateTime64;
    use sqlnorm_decimal::SqlDecimal;

    #[test]
    fn test_standard_set() {
        let factory = CodecFactory::new();
        for sql_type in SqlType::ALL {
            let codec = factory.get(sql_type.identifier());
            assert!(codec.is_some(), "{sql_type:?} missing");
            if sql_type.has_null_value() {
                assert!(factory.get(&format!("{}_Nullable", sql_type.identifier())).is_none());
            } else {
                assert!(factory.get(&format!("{}_Nullable", sql_type.identifier())).is_some());
            }
        }
        assert_eq!(factory.identifiers().len(), 24 + 18);
        assert!(factory.get("SQL_Unknown").is_none());
        assert!(CodecFactory::empty().get("SQL_Int").is_none());
    }

    #[test]
    fn test_defaults_by_value_type() {
        let factory = CodecFactory::new();
        assert_eq!(factory.default_codec::<i32>().unwrap().identifier(), "SQL_Int");
        assert_eq!(
            factory.default_codec::<Option<i32>>().unwrap().identifier(),
            "SQL_Int_Nullable"
        );
        assert_eq!(
            factory.default_codec::<SqlDecimal>().unwrap().identifier(),
            "SQL_Decimal"
        );
        assert_eq!(
            factory.default_codec::<DateTime64>().unwrap().identifier(),
            "SQL_DateTime2"
        );
        assert_eq!(
            factory.default_codec::<Option<String>>().unwrap().identifier(),
            "SQL_NVarChar"
        );
        assert_eq!(
            factory.default_codec::<Option<Vec<u8>>>().unwrap().identifier(),
            "SQL_VarBinary"
        );
        assert!(factory.default_codec::<String>().is_none());

        let codec = factory.default_codec::<i16>().unwrap();
        let bytes = codec.serialize(&-7).unwrap();
        assert_eq!(codec.deserialize(bytes.as_deref()).unwrap(), -7);
    }

    #[test]
    fn test_register_override() {
        let factory = CodecFactory::empty();
        factory.register(MoneyCodec::new(), false);
        assert_eq!(
            factory.default_codec::<SqlDecimal>().unwrap().identifier(),
            "SQL_Money"
        );
        // A second codec for the same value type does not displace the first...
        factory.register(NumericCodec::default(), false);
        assert_eq!(
            factory.default_codec::<SqlDecimal>().unwrap().identifier(),
            "SQL_Money"
        );
        // ...unless asked to.
        factory.register(DecimalCodec::new(10, 2).unwrap(), true);
        let codec = factory.default_codec::<SqlDecimal>().unwrap();
        assert_eq!(codec.identifier(), "SQL_Decimal");
        let bytes = codec.serialize(&"1.234".parse().unwrap()).unwrap();
        assert_eq!(codec.deserialize(bytes.as_deref()).unwrap().to_string(), "1.23");

        assert!(factory.get("SQL_Numeric").is_some());
        assert_eq!(factory.identifiers(), ["SQL_Decimal", "SQL_Money", "SQL_Numeric"]);
    }

    #[test]
    fn test_register_replaces_identifier() {
        let factory = CodecFactory::empty();
        factory.register(CharCodec::new(4, 1252).unwrap(), true);
        factory.register(CharCodec::new(8, 1252).unwrap(), false);
        let bytes = factory
            .get("SQL_Char_Non_Unicode")
            .unwrap()
            .serialize_value(&SqlValue::String("ab".into()))
            .unwrap();
        assert_eq!(bytes.unwrap().len(), 8);
        // The typed default still points at the first registration.
        let bytes = factory
            .default_codec::<Option<String>>()
            .unwrap()
            .serialize(&Some("ab".into()))
            .unwrap();
        assert_eq!(bytes.unwrap().len(), 4);
    }

    #[test]
    fn test_get_or_create_caches() {
        let column = ColumnDescriptor::new(SqlType::Decimal)
            .with_precision(12)
            .with_scale(3)
            .with_nullable(true);
        let first = CodecFactory::get_or_create(&column).unwrap();
        let second = CodecFactory::get_or_create(&column.clone()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.identifier(), "SQL_Decimal_Nullable");

        let other = CodecFactory::get_or_create(&column.clone().with_scale(4)).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));

        let invalid = ColumnDescriptor::new(SqlType::Decimal).with_precision(40);
        assert!(CodecFactory::get_or_create(&invalid).unwrap_err().is_out_of_range());
        assert!(CodecFactory::get_or_create(&invalid).is_err());
    }

    #[test]
    fn test_global() {
        let factory = CodecFactory::global();
        assert!(std::ptr::eq(factory, CodecFactory::global()));
        let codec = factory.get("SQL_UniqueIdentifier_Nullable").unwrap();
        assert_eq!(codec.serialize_value(&SqlValue::Null).unwrap(), None);
    }
}
