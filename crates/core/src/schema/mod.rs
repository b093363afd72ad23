//! Schema module for rowtable.
//!
//! This module contains the column schema and its signature.

mod columns;
mod signature;

pub use columns::Columns;
pub use signature::{SchemaSignature, Signed};
