//! Schema inference for JSON records.
//!
//! - [`FieldValue`]: tagged view over one JSON value
//! - [`infer_column_type`]: type lattice over a column of values
//! - [`build_schema`]: union schema across a record sequence

mod builder;
mod infer;
mod value;

pub use builder::{build_schema, Column, Record, Schema};
pub use infer::{infer_column_type, TypeTag};
pub use value::FieldValue;
