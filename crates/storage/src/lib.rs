//! rowtable Storage - Row store, key space and query scope for rowtable.
//!
//! This crate provides the table engine:
//!
//! - `KeySpaceRegistry`: Per-kind namespaces and collision-resistant row keys
//! - `RowFiller`: Reconciles keyed or positional input with the column schema
//! - `QueryScope` / `Selection`: Single-use filter and pagination pipeline
//! - `RowStore`: Insertion-ordered rows with update, delete and bulk load
//! - `TableExport`: Structural view of the whole table
//!
//! # Example
//!
//! ```rust
//! use rowtable_core::Value;
//! use rowtable_storage::{RowData, RowStore};
//!
//! let mut table = RowStore::new(["id", "first_name", "last_name"], Some("people")).unwrap();
//! table
//!     .populate([
//!         vec![Value::from(1), Value::from(2)],
//!         vec![Value::from("Bob"), Value::from("Tim")],
//!         vec![Value::from("Dylan"), Value::from("Mcgraw")],
//!     ])
//!     .unwrap();
//!
//! let renamed = table
//!     .where_(|_, row| row.get("first_name") == Some(&Value::from("Tim")))
//!     .update_all(&[("last_name", Value::from("McGraw"))]);
//! assert_eq!(renamed, 1);
//!
//! table.new_row(RowData::keyed([("first_name", "Joan")]), None).unwrap();
//! assert_eq!(table.bottom(1).delete(), 1);
//! assert_eq!(table.deleted_rows().len(), 1);
//! assert_eq!(table.row_count(), 2);
//! ```

pub mod export;
pub mod fill;
pub mod keyspace;
pub mod row_store;
pub mod scope;

pub use export::{Metadata, TableExport};
pub use fill::{RowData, RowFiller};
pub use keyspace::{KeySpaceRegistry, NamespaceId, RowKey};
pub use row_store::{RowStore, RowStoreBuilder, DEFAULT_KIND};
pub use scope::{QueryScope, Selection};
