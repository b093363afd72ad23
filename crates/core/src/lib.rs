//! rowtable Core - Core types and schema definitions for rowtable.
//!
//! This crate provides the foundational types for the rowtable in-memory table:
//!
//! - `Value`: Scalar values stored in row cells
//! - `Row`: An ordered column → value record with free-form attributes
//! - `schema`: The column schema and its order-insensitive signature
//! - `Error`: Error types for table operations
//!
//! # Example
//!
//! ```rust
//! use rowtable_core::schema::{Columns, SchemaSignature};
//! use rowtable_core::{Row, Value};
//!
//! let columns = Columns::new(["id", "name"]).unwrap();
//! assert_eq!(columns.signature(), &SchemaSignature::compute(&["name", "id"]).unwrap());
//!
//! let mut row = Row::from_columns(["id", "name"]).unwrap();
//! row.set("name", "Alice");
//! assert_eq!(row.get("name"), Some(&Value::from("Alice")));
//! assert_eq!(row.get("id"), Some(&Value::empty()));
//! ```

mod error;
mod row;
pub mod schema;
mod value;

pub use error::{Error, Result};
pub use row::Row;
pub use value::Value;
