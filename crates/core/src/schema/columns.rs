//! Column schema for rowtable.

use super::signature::{SchemaSignature, Signed};
use crate::error::{Error, Result};

/// The ordered, validated column list of a table.
///
/// Fixed at construction: it defines both the shape of every row and the
/// order positional input is assigned in.
#[derive(Clone, Debug)]
pub struct Columns {
    /// Column names in declaration order.
    names: Vec<String>,
    /// Signature of the column set.
    signature: SchemaSignature,
}

impl Columns {
    /// Creates a column schema from an ordered list of names.
    ///
    /// The list must be non-empty and its names unique and non-blank.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let signature = SchemaSignature::compute(&names)?;

        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::invalid_schema(format!(
                    "column {i} has a blank name"
                )));
            }
            if names[..i].contains(name) {
                return Err(Error::invalid_schema(format!(
                    "column already exists: {name}"
                )));
            }
        }

        Ok(Self { names, signature })
    }

    /// Returns the column names in declaration order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: a schema has at least one column.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Gets a column position by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|c| c == name)
    }

    /// Returns true if `name` is a declared column.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Returns true if every key names a declared column.
    pub fn has_column_keys<I, K>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter().all(|k| self.contains(k.as_ref()))
    }

    /// Returns the schema signature.
    #[inline]
    pub fn signature(&self) -> &SchemaSignature {
        &self.signature
    }
}

impl Signed for Columns {
    fn definition(&self) -> &[String] {
        &self.names
    }

    fn signature(&self) -> &SchemaSignature {
        &self.signature
    }
}

impl PartialEq for Columns {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for Columns {}
