//! Normalization codecs for client-side column encryption.
//!
//! Every codec turns a typed column value into the exact byte sequence the
//! database engine produces internally before it encrypts that value, and turns
//! decrypted bytes back into the typed value. Deterministic encryption only
//! preserves equality when both sides agree on these bytes, so every layout here
//! is fixed down to the byte order of each field.
//!
//! - [`codec::Codec`] is the shared serialize/deserialize contract.
//! - The type families live in [`integer`], [`float`], [`money`], [`decimal`],
//!   [`temporal`], [`text`], [`binary`] and [`guid`].
//! - [`nullable::Nullable`] adds optional-value semantics to any codec.
//! - [`value::DynCodec`], [`descriptor::ColumnDescriptor`] and
//!   [`factory::CodecFactory`] select and drive codecs from column metadata.

pub mod binary;
pub mod codec;
pub mod decimal;
pub mod descriptor;
pub mod factory;
pub mod float;
pub mod guid;
pub mod integer;
pub mod money;
pub mod nullable;
pub mod size;
pub mod temporal;
pub mod text;
pub mod value;

pub use codec::Codec;
pub use descriptor::{ColumnDescriptor, SqlType};
pub use factory::CodecFactory;
pub use nullable::Nullable;
pub use value::{DynCodec, SqlValue};

pub use sqlnorm_common::{Result, error::Error, error::ErrorKind};
pub use sqlnorm_datetime::{DateTime64, DateTimeOffset64, TimeSpan64};
pub use sqlnorm_decimal::SqlDecimal;
pub use sqlnorm_guid::Guid;
