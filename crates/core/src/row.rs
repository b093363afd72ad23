//! Row structure for rowtable.
//!
//! A `Row` is a record holding exactly one value per declared column, in
//! schema order. Fields outside the schema can be attached as free-form
//! attributes; they are reachable through the same accessors but never
//! become columns and are never exported.

use crate::error::{Error, Result};
use crate::schema::{Columns, SchemaSignature};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A row in a table.
#[derive(Clone, Debug)]
pub struct Row {
    /// Shared column schema.
    columns: Arc<Columns>,
    /// Values stored in this row, indexed by column position.
    values: Vec<Value>,
    /// Free-form attributes that are not part of the schema.
    attributes: BTreeMap<String, Value>,
}

impl Row {
    /// Creates a row with every column set to the empty sentinel.
    pub fn blank(columns: Arc<Columns>) -> Self {
        let values = vec![Value::empty(); columns.len()];
        Self {
            columns,
            values,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a standalone blank row from column names.
    pub fn from_columns<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::blank(Arc::new(Columns::new(names)?)))
    }

    /// Creates a standalone row from `(column, value)` pairs. The pairs
    /// define both the schema and the initial values.
    pub fn from_fields<I, S, V>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let (names, values): (Vec<String>, Vec<Value>) = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .unzip();
        if names.is_empty() {
            return Err(Error::DefinitionMissing);
        }
        Ok(Self {
            columns: Arc::new(Columns::new(names)?),
            values,
            attributes: BTreeMap::new(),
        })
    }

    /// Returns the row's column schema.
    #[inline]
    pub fn columns(&self) -> &Arc<Columns> {
        &self.columns
    }

    /// Returns the signature of the row's column definition.
    #[inline]
    pub fn signature(&self) -> &SchemaSignature {
        self.columns.signature()
    }

    /// Returns the declared values in schema order.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value by name: declared columns first, then attributes.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.columns.index_of(name) {
            Some(i) => self.values.get(i),
            None => self.attributes.get(name),
        }
    }

    /// Sets a value by name. Declared columns are written in place; any
    /// other name lands in the attribute map.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.columns.index_of(name) {
            Some(i) => self.values[i] = value,
            None => {
                self.attributes.insert(name.to_string(), value);
            }
        }
    }

    /// Gets a value by column position.
    #[inline]
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Replaces the value at a column position, returning true when the
    /// stored value actually changed.
    pub(crate) fn replace_at(&mut self, index: usize, value: Value) -> bool {
        match self.values.get_mut(index) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    /// Returns true if `name` is a declared column or an attribute.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains(name) || self.attributes.contains_key(name)
    }

    /// Removes a free-form attribute. Declared columns cannot be removed.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Returns the free-form attributes.
    #[inline]
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Iterates declared `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.columns
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Copies the declared fields out as owned pairs.
    pub fn to_pairs(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Returns the number of declared columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no declared columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sets a declared column by position. Used by the filling code that has
    /// already resolved names against the schema.
    pub fn set_at(&mut self, index: usize, value: Value) -> bool {
        if index < self.values.len() {
            self.values[index] = value;
            true
        } else {
            false
        }
    }

    /// Overwrites every named column present in `fields`, returning the
    /// number of values that changed. Names outside the schema are ignored.
    pub fn merge<'a, I>(&mut self, fields: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut changed = 0;
        for (name, value) in fields {
            if let Some(i) = self.columns.index_of(name) {
                if self.replace_at(i, value.clone()) {
                    changed += 1;
                }
            }
        }
        changed
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.columns.names() == other.columns.names() && self.values == other.values
    }
}

impl Eq for Row {}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Arc<Columns> {
        Arc::new(Columns::new(["id", "first_name", "last_name"]).unwrap())
    }

    #[test]
    fn test_blank_row() {
        let row = Row::blank(columns());
        assert_eq!(row.len(), 3);
        assert!(row.values().iter().all(Value::is_empty_sentinel));
        assert_eq!(row.get("id"), Some(&Value::empty()));
    }

    #[test]
    fn test_from_columns_requires_definition() {
        assert!(matches!(
            Row::from_columns(Vec::<String>::new()),
            Err(Error::DefinitionMissing)
        ));
        assert!(!Row::from_columns(["id"]).unwrap().signature().as_str().is_empty());
    }

    #[test]
    fn test_same_columns_same_signature() {
        let a = Row::from_columns(["id", "first_name", "last_name"]).unwrap();
        let b = Row::from_columns(["last_name", "id", "first_name"]).unwrap();
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_from_fields() {
        let row = Row::from_fields([("id", Value::from(1)), ("name", Value::from("test"))]).unwrap();
        assert_eq!(row.get("id"), Some(&Value::Int64(1)));
        assert_eq!(row.get("name").and_then(Value::as_str), Some("test"));
        assert!(Row::from_fields(Vec::<(String, Value)>::new()).is_err());
    }

    #[test]
    fn test_two_tier_access() {
        let mut row = Row::blank(columns());
        row.set("id", 1);
        row.set("nickname", "bobby");

        assert_eq!(row.get("id"), Some(&Value::Int64(1)));
        assert_eq!(row.get("nickname"), Some(&Value::from("bobby")));
        assert_eq!(row.len(), 3);
        assert!(row.contains("nickname"));
        assert!(!row.contains("age"));
        assert_eq!(row.get("age"), None);

        assert_eq!(row.remove_attribute("nickname"), Some(Value::from("bobby")));
        assert!(!row.contains("nickname"));
    }

    #[test]
    fn test_attributes_ignored_by_equality_and_export() {
        let mut a = Row::blank(columns());
        let b = Row::blank(columns());
        a.set("extra", true);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"id":"","first_name":"","last_name":""}"#
        );
    }

    #[test]
    fn test_merge_counts_changed_values() {
        let mut row = Row::blank(columns());
        let id = Value::from(1);
        let blank = Value::empty();
        let changed = row.merge([("id", &id), ("first_name", &blank), ("unknown", &id)]);
        assert_eq!(changed, 1);
        assert_eq!(row.get("id"), Some(&id));
    }

    #[test]
    fn test_set_at() {
        let mut row = Row::blank(columns());
        assert!(row.set_at(2, Value::from("Dylan")));
        assert!(!row.set_at(10, Value::Null));
        assert_eq!(row.value_at(2), Some(&Value::from("Dylan")));
    }
}
