//! Query scope and fluent selections.
//!
//! A [`Selection`] is returned by `where_`, `top`, `bottom` and `select` on a
//! [`RowStore`]. It holds an exclusive borrow of the store, so nothing can
//! change the table between narrowing the scope and acting on it, and its
//! terminal calls (`get`, `first`, `last`, `row_count`, `update_all`,
//! `delete`) take `self`, so every scope is consumed exactly once.
//!
//! ```rust
//! use rowtable_core::Value;
//! use rowtable_storage::{RowData, RowStore};
//!
//! let mut table = RowStore::new(["id", "name"], Some("people")).unwrap();
//! table
//!     .new_row(RowData::positional([Value::from(1), Value::from("Bob")]), None).unwrap()
//!     .new_row(RowData::positional([Value::from(2), Value::from("Tim")]), None).unwrap();
//!
//! let matches = table
//!     .where_(|_, row| row.get("name") == Some(&Value::from("Tim")))
//!     .get();
//! assert_eq!(matches.len(), 1);
//!
//! // The next query starts from the whole table again.
//! assert_eq!(table.get().len(), 2);
//! ```

use crate::keyspace::RowKey;
use crate::row_store::RowStore;
use log::{debug, trace};
use rowtable_core::{Row, Value};

/// Which rows the next terminal call acts on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QueryScope {
    /// The whole table.
    #[default]
    Unset,
    /// The keys captured by the last filter or pagination step, in table
    /// order. May be empty: reads and updates then select nothing, while
    /// `delete` falls back to the whole table.
    Filtered(Vec<RowKey>),
}

impl QueryScope {
    /// Starts a fresh, empty result set.
    pub fn begin_filter(&mut self) {
        *self = QueryScope::Filtered(Vec::new());
    }

    /// Appends a match to the pending result set.
    pub fn record_match(&mut self, key: RowKey) {
        match self {
            QueryScope::Filtered(keys) => keys.push(key),
            QueryScope::Unset => *self = QueryScope::Filtered(vec![key]),
        }
    }

    /// Returns true while a filtered result is pending.
    pub fn is_filtered(&self) -> bool {
        matches!(self, QueryScope::Filtered(_))
    }

    /// Looks at the pending result without consuming it.
    pub fn peek(&self) -> Option<&[RowKey]> {
        match self {
            QueryScope::Filtered(keys) => Some(keys),
            QueryScope::Unset => None,
        }
    }

    /// Hands off the pending result and resets to `Unset`. Returns None when
    /// no filter was pending, meaning the whole table applies.
    pub fn consume(&mut self) -> Option<Vec<RowKey>> {
        match core::mem::take(self) {
            QueryScope::Filtered(keys) => Some(keys),
            QueryScope::Unset => None,
        }
    }
}

/// A scoped view over a [`RowStore`], consumed by exactly one terminal call.
#[must_use = "a selection does nothing until it is consumed"]
pub struct Selection<'a> {
    store: &'a mut RowStore,
    scope: QueryScope,
}

impl<'a> Selection<'a> {
    pub(crate) fn new(store: &'a mut RowStore) -> Self {
        Self {
            store,
            scope: QueryScope::Unset,
        }
    }

    /// Keys in the current scope, in table order.
    fn scoped_keys(&self) -> Vec<RowKey> {
        match self.scope.peek() {
            Some(keys) => keys.to_vec(),
            None => self.store.keys(),
        }
    }

    /// Keeps the rows in scope for which `predicate` returns true.
    ///
    /// The predicate sees a snapshot of each row and cannot touch the table;
    /// mutations happen afterwards through `update_all` or `delete`.
    pub fn where_<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&RowKey, &Row) -> bool,
    {
        let candidates = self.scoped_keys();
        self.scope.begin_filter();
        for key in candidates {
            let matched = match self.store.row(key.as_str()) {
                Some(row) => predicate(&key, row),
                None => false,
            };
            if matched {
                self.scope.record_match(key);
            }
        }
        trace!(
            "where_ on {} matched {} rows",
            self.store.name(),
            self.scope.peek().map_or(0, <[RowKey]>::len)
        );
        self
    }

    /// Narrows the scope to its first `n` rows.
    pub fn top(self, n: usize) -> Self {
        self.window(n, Edge::Top)
    }

    /// Narrows the scope to its last `n` rows, kept in table order.
    pub fn bottom(self, n: usize) -> Self {
        self.window(n, Edge::Bottom)
    }

    fn window(mut self, n: usize, edge: Edge) -> Self {
        let mut keys = self.scoped_keys();
        let take = n.min(keys.len());
        let keys = match edge {
            Edge::Top => {
                keys.truncate(take);
                keys
            }
            Edge::Bottom => keys.split_off(keys.len() - take),
        };
        self.scope = QueryScope::Filtered(keys);
        self
    }

    /// Splits the selection into the store and the consumed key set.
    fn finish(mut self) -> (&'a mut RowStore, Vec<RowKey>) {
        let keys = match self.scope.consume() {
            Some(keys) => keys,
            None => self.store.keys(),
        };
        (self.store, keys)
    }

    /// Returns the rows in scope, in table order.
    pub fn get(self) -> Vec<(&'a RowKey, &'a Row)> {
        let (store, keys) = self.finish();
        let store: &'a RowStore = store;
        keys.iter()
            .filter_map(move |key| store.entry(key.as_str()))
            .collect()
    }

    /// Returns the keys in scope, in table order.
    pub fn keys(self) -> Vec<RowKey> {
        self.finish().1
    }

    /// Returns the first row in scope.
    pub fn first(self) -> Option<(&'a RowKey, &'a Row)> {
        let (store, keys) = self.finish();
        let store: &'a RowStore = store;
        keys.first().and_then(|key| store.entry(key.as_str()))
    }

    /// Returns the last row in scope.
    pub fn last(self) -> Option<(&'a RowKey, &'a Row)> {
        let (store, keys) = self.finish();
        let store: &'a RowStore = store;
        keys.last().and_then(|key| store.entry(key.as_str()))
    }

    /// Counts the rows in scope.
    pub fn row_count(self) -> usize {
        self.finish().1.len()
    }

    /// Applies `criteria` to every row in scope. Returns the number of rows
    /// with at least one changed field.
    pub fn update_all<S: AsRef<str>>(self, criteria: &[(S, Value)]) -> usize {
        let (store, keys) = self.finish();
        let updated = keys
            .iter()
            .filter(|key| store.update_row(key.as_str(), criteria) > 0)
            .count();
        debug!("update_all on {} changed {updated} rows", store.name());
        updated
    }

    /// Deletes every row in scope into the deleted ledger. Returns the number
    /// of rows removed.
    ///
    /// A filter or window that captured no rows does not narrow a delete:
    /// the whole table is removed.
    pub fn delete(self) -> usize {
        let (store, mut keys) = self.finish();
        if keys.is_empty() {
            keys = store.keys();
        }
        let deleted = keys
            .iter()
            .filter(|key| store.delete_row(key.as_str()))
            .count();
        debug!("delete on {} removed {deleted} rows", store.name());
        deleted
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Top,
    Bottom,
}
