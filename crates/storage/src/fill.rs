//! Row filling.
//!
//! `RowFiller` reconciles caller input with the column schema. Input is
//! either keyed by column name or a positional list of values. Keyed input
//! whose keys are not all columns is reinterpreted as positional values in
//! the order they were supplied.

use rowtable_core::schema::Columns;
use rowtable_core::{Error, Result, Row, Value};

/// Caller-supplied row content.
#[derive(Clone, Debug, PartialEq)]
pub enum RowData {
    /// Values keyed by column name. A subset of the columns is fine.
    Keyed(Vec<(String, Value)>),
    /// Values assigned to the columns in declaration order.
    Positional(Vec<Value>),
}

impl RowData {
    /// Builds keyed row data.
    pub fn keyed<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        RowData::Keyed(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds positional row data.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        RowData::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Row data that leaves a new row blank.
    pub fn empty() -> Self {
        RowData::Positional(Vec::new())
    }

    /// Returns the number of supplied values.
    pub fn len(&self) -> usize {
        match self {
            RowData::Keyed(fields) => fields.len(),
            RowData::Positional(values) => values.len(),
        }
    }

    /// Returns true if nothing was supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts a JSON object (keyed, in document order) or array
    /// (positional) into row data.
    /// Any other JSON value is not row shaped and yields None.
    #[cfg(feature = "json")]
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        fn cell(json: &serde_json::Value) -> Value {
            Value::from_json(json).unwrap_or_else(|| Value::String(json.to_string()))
        }

        match json {
            serde_json::Value::Object(map) => Some(RowData::Keyed(
                map.iter().map(|(k, v)| (k.clone(), cell(v))).collect(),
            )),
            serde_json::Value::Array(items) => {
                Some(RowData::Positional(items.iter().map(cell).collect()))
            }
            _ => None,
        }
    }
}

impl Default for RowData {
    fn default() -> Self {
        RowData::empty()
    }
}

impl From<Vec<Value>> for RowData {
    fn from(values: Vec<Value>) -> Self {
        RowData::Positional(values)
    }
}

impl From<Vec<(String, Value)>> for RowData {
    fn from(fields: Vec<(String, Value)>) -> Self {
        RowData::Keyed(fields)
    }
}

/// Fills rows from `RowData` against a column schema.
#[derive(Clone, Copy, Debug)]
pub struct RowFiller<'a> {
    columns: &'a Columns,
}

impl<'a> RowFiller<'a> {
    /// Creates a filler for the given schema.
    pub fn new(columns: &'a Columns) -> Self {
        Self { columns }
    }

    /// Checks that `data` fits the schema without touching any row.
    pub fn check(&self, data: &RowData) -> Result<()> {
        if data.len() > self.columns.len() {
            return Err(Error::row_shape(data.len(), self.columns.len()));
        }
        Ok(())
    }

    /// Applies `data` to `row`.
    ///
    /// Fails with a row shape error, leaving `row` untouched, when more
    /// values are supplied than columns are declared.
    pub fn fill(&self, row: &mut Row, data: &RowData) -> Result<()> {
        self.check(data)?;

        match data {
            RowData::Keyed(fields)
                if self.columns.has_column_keys(fields.iter().map(|(k, _)| k)) =>
            {
                row.merge(fields.iter().map(|(k, v)| (k.as_str(), v)));
            }
            RowData::Keyed(fields) => {
                self.fill_positional(row, fields.iter().map(|(_, v)| v));
            }
            RowData::Positional(values) => {
                self.fill_positional(row, values.iter());
            }
        }
        Ok(())
    }

    fn fill_positional<'v, I>(&self, row: &mut Row, values: I)
    where
        I: Iterator<Item = &'v Value>,
    {
        for (i, value) in values.enumerate() {
            row.set_at(i, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn columns() -> Arc<Columns> {
        Arc::new(Columns::new(["id", "name", "email"]).unwrap())
    }

    fn filled(data: RowData) -> Result<Row> {
        let columns = columns();
        let mut row = Row::blank(Arc::clone(&columns));
        RowFiller::new(&columns).fill(&mut row, &data)?;
        Ok(row)
    }

    #[test]
    fn test_empty_input_keeps_blank_row() {
        let row = filled(RowData::empty()).unwrap();
        assert!(row.values().iter().all(Value::is_empty_sentinel));
    }

    #[test]
    fn test_keyed_partial_fill() {
        let row = filled(RowData::keyed([("name", "example")])).unwrap();
        assert_eq!(row.get("id"), Some(&Value::empty()));
        assert_eq!(row.get("name"), Some(&Value::from("example")));
        assert_eq!(row.get("email"), Some(&Value::empty()));
    }

    #[test]
    fn test_keyed_unordered_fill() {
        let row = filled(RowData::keyed([
            ("name", Value::from("example")),
            ("id", Value::from(23423)),
        ]))
        .unwrap();
        assert_eq!(row.to_pairs(), vec![
            ("id".to_string(), Value::from(23423)),
            ("name".to_string(), Value::from("example")),
            ("email".to_string(), Value::empty()),
        ]);
    }

    #[test]
    fn test_positional_fill() {
        let row = filled(RowData::positional([Value::from(23423), Value::from("example")])).unwrap();
        assert_eq!(row.get("id"), Some(&Value::from(23423)));
        assert_eq!(row.get("name"), Some(&Value::from("example")));
        assert_eq!(row.get("email"), Some(&Value::empty()));
    }

    #[test]
    fn test_unknown_keys_fall_back_to_positional() {
        let row = filled(RowData::keyed([("name", "a"), ("nickname", "b")])).unwrap();
        assert_eq!(row.get("id"), Some(&Value::from("a")));
        assert_eq!(row.get("name"), Some(&Value::from("b")));
        assert_eq!(row.get("email"), Some(&Value::empty()));
    }

    #[test]
    fn test_too_many_values() {
        let columns = columns();
        let mut row = Row::blank(Arc::clone(&columns));
        let data = RowData::positional([1, 2, 3, 4, 5]);
        let err = RowFiller::new(&columns).fill(&mut row, &data).unwrap_err();
        assert!(matches!(err, Error::RowShape { supplied: 5, declared: 3 }));
        assert!(row.values().iter().all(Value::is_empty_sentinel));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json() {
        let keyed = RowData::from_json(&serde_json::json!({"id": 1, "name": "x"})).unwrap();
        assert_eq!(keyed.len(), 2);
        assert!(matches!(keyed, RowData::Keyed(_)));

        let positional = RowData::from_json(&serde_json::json!([1, "x", {"a": 1}])).unwrap();
        assert_eq!(
            positional,
            RowData::Positional(vec![
                Value::from(1),
                Value::from("x"),
                Value::from(r#"{"a":1}"#),
            ])
        );

        assert_eq!(RowData::from_json(&serde_json::json!("scalar")), None);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_object_with_unknown_keys_keeps_supplied_order() {
        let data =
            RowData::from_json(&serde_json::json!({"zname": "first", "aother": "second"})).unwrap();
        let row = filled(data).unwrap();
        assert_eq!(row.get("id"), Some(&Value::from("first")));
        assert_eq!(row.get("name"), Some(&Value::from("second")));
        assert_eq!(row.get("email"), Some(&Value::empty()));
    }
}
