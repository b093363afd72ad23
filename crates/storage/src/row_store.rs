//! Row storage for rowtable.
//!
//! This module provides the `RowStore` struct which holds the rows of a single
//! table in insertion order, together with its deleted ledger.

use crate::export::{Metadata, TableExport};
use crate::fill::{RowData, RowFiller};
use crate::keyspace::{KeySpaceRegistry, RowKey};
use crate::scope::Selection;
use ordered::RowMap;
use log::{debug, trace};
use rowtable_core::schema::{Columns, SchemaSignature};
use rowtable_core::{Error, Result, Row, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Kind used by tables that do not configure one.
pub const DEFAULT_KIND: &str = "rowtable.RowStore";

mod ordered {
    use crate::keyspace::RowKey;
    use hashbrown::HashMap;
    use rowtable_core::Row;
    use std::collections::BTreeMap;

    #[derive(Debug)]
    struct Slot {
        seq: u64,
        row: Row,
    }

    /// Key → row map that iterates in insertion order.
    ///
    /// Each key gets a sequence number on first insert; the ordering tree
    /// maps sequence numbers back to keys. Replacing an existing key keeps
    /// its sequence number, and with it its position.
    #[derive(Debug, Default)]
    pub(crate) struct RowMap {
        slots: HashMap<RowKey, Slot>,
        order: BTreeMap<u64, RowKey>,
        next_seq: u64,
    }

    impl RowMap {
        pub(crate) fn len(&self) -> usize {
            self.slots.len()
        }

        pub(crate) fn contains_key(&self, key: &str) -> bool {
            self.slots.contains_key(key)
        }

        pub(crate) fn get(&self, key: &str) -> Option<&Row> {
            self.slots.get(key).map(|slot| &slot.row)
        }

        pub(crate) fn get_key_value(&self, key: &str) -> Option<(&RowKey, &Row)> {
            self.slots.get_key_value(key).map(|(k, slot)| (k, &slot.row))
        }

        pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Row> {
            self.slots.get_mut(key).map(|slot| &mut slot.row)
        }

        /// Inserts or replaces a row. Returns the replaced row, if any.
        pub(crate) fn insert(&mut self, key: RowKey, row: Row) -> Option<Row> {
            if let Some(slot) = self.slots.get_mut(key.as_str()) {
                return Some(core::mem::replace(&mut slot.row, row));
            }
            let seq = self.next_seq;
            self.next_seq += 1;
            self.order.insert(seq, key.clone());
            self.slots.insert(key, Slot { seq, row });
            None
        }

        pub(crate) fn remove(&mut self, key: &str) -> Option<(RowKey, Row)> {
            let (key, slot) = self.slots.remove_entry(key)?;
            self.order.remove(&slot.seq);
            Some((key, slot.row))
        }

        pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = (&RowKey, &Row)> + '_ {
            self.order.values().filter_map(move |key| self.get_key_value(key.as_str()))
        }

        pub(crate) fn keys(&self) -> impl DoubleEndedIterator<Item = &RowKey> + '_ {
            self.order.values()
        }
    }
}

/// Row storage for a single table.
#[derive(Debug)]
pub struct RowStore {
    columns: Arc<Columns>,
    name: String,
    kind: String,
    keyspace: Arc<KeySpaceRegistry>,
    rows: RowMap,
    deleted: Vec<(RowKey, Row)>,
}

/// Builder for configuring a [`RowStore`].
#[derive(Debug)]
pub struct RowStoreBuilder {
    columns: Vec<String>,
    name: Option<String>,
    kind: Option<String>,
    keyspace: Option<Arc<KeySpaceRegistry>>,
}

impl RowStoreBuilder {
    /// Sets the table name. Defaults to a random UUID.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the table kind sharing a key space namespace.
    /// Defaults to [`DEFAULT_KIND`].
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets the key space registry. Defaults to
    /// [`KeySpaceRegistry::process_default`].
    pub fn keyspace(mut self, keyspace: Arc<KeySpaceRegistry>) -> Self {
        self.keyspace = Some(keyspace);
        self
    }

    /// Builds the row store.
    pub fn build(self) -> Result<RowStore> {
        let columns = Arc::new(Columns::new(self.columns)?);
        let name = self
            .name
            .unwrap_or_else(|| Uuid::new_v4().hyphenated().to_string());
        let kind = self.kind.unwrap_or_else(|| DEFAULT_KIND.to_string());
        let keyspace = self
            .keyspace
            .unwrap_or_else(KeySpaceRegistry::process_default);
        keyspace.ensure_namespace(&kind);

        debug!(
            "created table {name} of kind {kind} with {} columns, signature {}",
            columns.len(),
            columns.signature()
        );

        Ok(RowStore {
            columns,
            name,
            kind,
            keyspace,
            rows: RowMap::default(),
            deleted: Vec::new(),
        })
    }
}

impl RowStore {
    /// Creates a row store with the default kind and key space.
    pub fn new<I, S>(columns: I, name: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let builder = Self::builder(columns);
        match name {
            Some(name) => builder.name(name).build(),
            None => builder.build(),
        }
    }

    /// Starts configuring a row store over `columns`.
    pub fn builder<I, S>(columns: I) -> RowStoreBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RowStoreBuilder {
            columns: columns.into_iter().map(Into::into).collect(),
            name: None,
            kind: None,
            keyspace: None,
        }
    }

    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table kind.
    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the column schema.
    #[inline]
    pub fn columns(&self) -> &Arc<Columns> {
        &self.columns
    }

    /// Returns the column names the signature is derived from.
    #[inline]
    pub fn definition(&self) -> &[String] {
        self.columns.names()
    }

    /// Returns the schema signature.
    #[inline]
    pub fn signature(&self) -> &SchemaSignature {
        self.columns.signature()
    }

    /// Returns the table metadata.
    pub fn metadata(&self) -> Metadata<'_> {
        Metadata { name: &self.name }
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the store is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.len() == 0
    }

    /// Returns true if a row with this key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// Gets a row by key.
    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.get(key)
    }

    /// Gets a row together with its stored key.
    pub fn entry(&self, key: &str) -> Option<(&RowKey, &Row)> {
        self.rows.get_key_value(key)
    }

    /// Iterates all rows in insertion order.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = (&RowKey, &Row)> + '_ {
        self.rows.iter()
    }

    /// Returns all keys in insertion order.
    pub fn keys(&self) -> Vec<RowKey> {
        self.rows.keys().cloned().collect()
    }

    /// Generates a fresh key in this table's key space.
    pub fn generate_key(&self) -> RowKey {
        self.keyspace.generate_row_key(&self.kind, &self.name)
    }

    /// Adds a row. A missing key is generated; an existing key is replaced
    /// in place with the new row.
    ///
    /// Input with more values than columns fails before anything is stored.
    pub fn new_row(&mut self, data: impl Into<RowData>, key: Option<RowKey>) -> Result<&mut Self> {
        let data = data.into();
        RowFiller::new(&self.columns).check(&data)?;
        self.insert_filled(&data, key)?;
        Ok(self)
    }

    fn insert_filled(&mut self, data: &RowData, key: Option<RowKey>) -> Result<()> {
        let key = key.unwrap_or_else(|| self.generate_key());
        let mut row = Row::blank(Arc::clone(&self.columns));
        if !data.is_empty() {
            RowFiller::new(&self.columns).fill(&mut row, data)?;
        }
        trace!("insert row {key} into {}", self.name);
        self.rows.insert(key, row);
        Ok(())
    }

    /// Adds every row of a collection. All rows are checked first, so a bad
    /// row leaves the table unchanged.
    pub fn add_collection<I, R>(&mut self, rows: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<RowData>,
    {
        let rows: Vec<RowData> = rows.into_iter().map(Into::into).collect();
        let filler = RowFiller::new(&self.columns);
        for data in &rows {
            filler.check(data)?;
        }
        for data in &rows {
            self.insert_filled(data, None)?;
        }
        Ok(self)
    }

    /// Adds every JSON array or object in `items` as a row, skipping any
    /// other element.
    #[cfg(feature = "json")]
    pub fn add_json_collection(&mut self, items: &[serde_json::Value]) -> Result<&mut Self> {
        self.add_collection(items.iter().filter_map(RowData::from_json))
    }

    /// Replaces every row with rows zipped from parallel value sequences,
    /// one sequence per column in declaration order.
    pub fn populate<I, C, V>(&mut self, sequences: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let sequences: Vec<Vec<Value>> = sequences
            .into_iter()
            .map(|seq| seq.into_iter().map(Into::into).collect())
            .collect();

        if sequences.len() != self.columns.len() {
            return Err(Error::arity(sequences.len(), self.columns.len()));
        }
        let row_count = sequences[0].len();
        for (name, seq) in self.columns.names().iter().zip(&sequences) {
            if seq.len() != row_count {
                return Err(Error::column_length(name.as_str(), row_count, seq.len()));
            }
        }

        let mut rows = RowMap::default();
        let mut cursors: Vec<std::vec::IntoIter<Value>> =
            sequences.into_iter().map(Vec::into_iter).collect();
        for _ in 0..row_count {
            let mut row = Row::blank(Arc::clone(&self.columns));
            for (i, seq) in cursors.iter_mut().enumerate() {
                if let Some(value) = seq.next() {
                    row.set_at(i, value);
                }
            }
            rows.insert(self.generate_key(), row);
        }

        debug!(
            "populate replaced {} rows of {} with {row_count}",
            self.rows.len(),
            self.name
        );
        self.rows = rows;
        Ok(self)
    }

    /// Starts a selection over the whole table.
    pub fn select(&mut self) -> Selection<'_> {
        Selection::new(self)
    }

    /// Selects the rows for which `predicate` returns true.
    pub fn where_<F>(&mut self, predicate: F) -> Selection<'_>
    where
        F: FnMut(&RowKey, &Row) -> bool,
    {
        self.select().where_(predicate)
    }

    /// Selects the first `n` rows.
    pub fn top(&mut self, n: usize) -> Selection<'_> {
        self.select().top(n)
    }

    /// Selects the last `n` rows, kept in table order.
    pub fn bottom(&mut self, n: usize) -> Selection<'_> {
        self.select().bottom(n)
    }

    /// Returns every row in insertion order.
    pub fn get(&self) -> Vec<(&RowKey, &Row)> {
        self.rows.iter().collect()
    }

    /// Returns the first row.
    pub fn first(&self) -> Option<(&RowKey, &Row)> {
        self.rows.iter().next()
    }

    /// Returns the last row.
    pub fn last(&self) -> Option<(&RowKey, &Row)> {
        self.rows.iter().next_back()
    }

    /// Counts every row.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Updates one row. Returns the number of fields whose value changed.
    ///
    /// Nothing happens (and 0 is returned) when the row does not exist or any
    /// criteria key is not a column.
    pub fn update_row<S: AsRef<str>>(&mut self, key: &str, criteria: &[(S, Value)]) -> usize {
        if !self.columns.has_column_keys(criteria.iter().map(|(k, _)| k)) {
            return 0;
        }
        match self.rows.get_mut(key) {
            Some(row) => row.merge(criteria.iter().map(|(k, v)| (k.as_ref(), v))),
            None => 0,
        }
    }

    /// Applies `criteria` to every row. Returns the number of rows with at
    /// least one changed field.
    pub fn update_all<S: AsRef<str>>(&mut self, criteria: &[(S, Value)]) -> usize {
        self.select().update_all(criteria)
    }

    /// Moves a row into the deleted ledger. Returns whether a row was removed.
    pub fn delete_row(&mut self, key: &str) -> bool {
        match self.rows.remove(key) {
            Some(entry) => {
                trace!("delete row {} from {}", entry.0, self.name);
                self.deleted.push(entry);
                true
            }
            None => false,
        }
    }

    /// Deletes every row. Returns the number of rows removed.
    pub fn delete(&mut self) -> usize {
        self.select().delete()
    }

    /// Returns the deleted ledger, oldest first.
    pub fn deleted_rows(&self) -> &[(RowKey, Row)] {
        &self.deleted
    }

    /// Empties the deleted ledger.
    pub fn clear_deleted(&mut self) {
        debug!("cleared {} deleted rows of {}", self.deleted.len(), self.name);
        self.deleted.clear();
    }

    /// Returns a structural view of the whole table.
    pub fn export_table(&self) -> TableExport<'_> {
        TableExport {
            metadata: self.metadata(),
            columns: self.columns.names(),
            data: self.get(),
        }
    }

    /// Renders the exported table as compact JSON.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.export_table())?)
    }

    /// Renders the exported table as indented JSON.
    #[cfg(feature = "json")]
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_table())?)
    }
}
