//! Property-based tests for rowtable-storage using proptest.

use hashbrown::HashSet;
use proptest::prelude::*;
use rowtable_core::Value;
use rowtable_storage::{KeySpaceRegistry, RowData, RowKey, RowStore};
use std::sync::Arc;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Row keys never collide across kinds and table instances sharing a
    /// registry.
    #[test]
    fn row_keys_are_unique(kinds in 1usize..4, tables in 1usize..4, per_table in 100usize..1000) {
        let registry = Arc::new(KeySpaceRegistry::new());
        let mut seen = HashSet::new();
        let mut total = 0;
        for kind in 0..kinds {
            for table in 0..tables {
                let store = RowStore::builder(["id"])
                    .kind(format!("kind{kind}"))
                    .name(format!("table{table}"))
                    .keyspace(Arc::clone(&registry))
                    .build()
                    .unwrap();
                for _ in 0..per_table {
                    seen.insert(store.generate_key());
                    total += 1;
                }
            }
        }
        prop_assert_eq!(seen.len(), total);
        prop_assert_eq!(registry.kind_count(), kinds);
    }

    /// Positional input fills a prefix of the columns and leaves the rest
    /// blank; longer input is rejected without touching the table.
    #[test]
    fn positional_fill_shape(width in 1usize..8, supplied in 0usize..12) {
        let columns: Vec<String> = (0..width).map(|i| format!("c{i}")).collect();
        let mut table = RowStore::new(columns.clone(), Some("shape")).unwrap();
        let values: Vec<Value> = (0..supplied).map(|i| Value::from(i as i64)).collect();

        let result = table.new_row(RowData::positional(values), Some(RowKey::from("k")));
        if supplied > width {
            prop_assert!(result.is_err());
            prop_assert_eq!(table.row_count(), 0);
        } else {
            prop_assert!(result.is_ok());
            let row = table.row("k").unwrap();
            for (i, name) in columns.iter().enumerate() {
                let expected = if i < supplied { Value::from(i as i64) } else { Value::empty() };
                prop_assert_eq!(row.get(name), Some(&expected));
            }
        }
    }

    /// top(n) and bottom(n) return min(n, len) rows in table order.
    #[test]
    fn pagination_windows(len in 0usize..30, n in 0usize..40) {
        let mut table = RowStore::new(["i"], Some("pages")).unwrap();
        for i in 0..len {
            table.new_row(RowData::positional([i as i64]), Some(RowKey::from(format!("r{i}")))).unwrap();
        }
        let take = n.min(len);
        let top: Vec<RowKey> = table.top(n).keys();
        let bottom: Vec<RowKey> = table.bottom(n).keys();
        let all = table.keys();

        prop_assert_eq!(&top[..], &all[..take]);
        prop_assert_eq!(&bottom[..], &all[len - take..]);
    }
}
