//! Core definitions (error type, result alias and validation helpers), relied upon
//! by all sqlnorm-* crates.

pub mod error;
pub mod result;

pub use result::Result;
