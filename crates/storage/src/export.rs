//! Structural table export.
//!
//! `TableExport` is a borrowed, scope-free view of a whole table with three
//! parts in fixed order: `metadata`, `columns` and `data`. With the `json`
//! feature it serializes to
//! `{"metadata":{"name":..},"columns":[..],"data":{"<key>":{"<column>":..}}}`,
//! rows in insertion order and columns in schema order.

use crate::keyspace::RowKey;
use rowtable_core::Row;

/// Table metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Metadata<'a> {
    /// Table name.
    pub name: &'a str,
}

/// A plain view of a table: metadata, columns and every row.
#[derive(Clone, Debug)]
pub struct TableExport<'a> {
    pub metadata: Metadata<'a>,
    pub columns: &'a [String],
    pub data: Vec<(&'a RowKey, &'a Row)>,
}

#[cfg(feature = "json")]
mod json {
    use super::TableExport;
    use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

    struct Data<'a, 'b>(&'b TableExport<'a>);

    impl Serialize for Data<'_, '_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.data.len()))?;
            for (key, row) in &self.0.data {
                map.serialize_entry(key, row)?;
            }
            map.end()
        }
    }

    impl Serialize for TableExport<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("TableExport", 3)?;
            state.serialize_field("metadata", &self.metadata)?;
            state.serialize_field("columns", self.columns)?;
            state.serialize_field("data", &Data(self))?;
            state.end()
        }
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use crate::{RowData, RowKey, RowStore};
    use rowtable_core::Value;

    #[test]
    fn test_table_serializes_to_json() {
        let mut table = RowStore::new(["id", "name", "email"], Some("AwesomeTable")).unwrap();
        table
            .new_row(
                RowData::positional([
                    Value::from(23423),
                    Value::from("Jim Jones"),
                    Value::from("j.jones@email.com"),
                ]),
                Some(RowKey::from("SomeKey")),
            )
            .unwrap();

        assert_eq!(
            table.to_json().unwrap(),
            concat!(
                r#"{"metadata":{"name":"AwesomeTable"},"#,
                r#""columns":["id","name","email"],"#,
                r#""data":{"SomeKey":{"id":23423,"name":"Jim Jones","email":"j.jones@email.com"}}}"#
            )
        );
    }

    #[test]
    fn test_data_keeps_insertion_order() {
        let mut table = RowStore::new(["n"], Some("ordered")).unwrap();
        for k in ["zeta", "alpha", "mid"] {
            table
                .new_row(RowData::positional([k]), Some(RowKey::from(k)))
                .unwrap();
        }
        let json = table.to_json().unwrap();
        let zeta = json.find("\"zeta\":").unwrap();
        let alpha = json.find("\"alpha\":").unwrap();
        let mid = json.find("\"mid\":").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_empty_table_export() {
        let table = RowStore::new(["id"], Some("empty")).unwrap();
        assert_eq!(
            table.to_json().unwrap(),
            r#"{"metadata":{"name":"empty"},"columns":["id"],"data":{}}"#
        );
        assert!(table.to_json_pretty().unwrap().contains("\n  \"columns\""));
    }
}
