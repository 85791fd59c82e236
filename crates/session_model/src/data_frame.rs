//
// data_frame.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::matrix_data::check_names;
use crate::primitive_value::PrimitiveValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub value: PrimitiveValue,
}

impl Column {
    pub fn new(name: impl Into<String>, value: PrimitiveValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The columns of a data frame. Every column holds exactly `row_count`
/// values.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireDataFrameData")]
pub struct DataFrameData {
    columns: Vec<Column>,
    row_count: usize,
    row_names: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDataFrameData {
    columns: Vec<Column>,
    row_count: usize,
    row_names: Option<Vec<String>>,
}

impl DataFrameData {
    pub fn new(
        columns: Vec<Column>,
        row_count: usize,
        row_names: Option<Vec<String>>,
    ) -> crate::Result<Self> {
        if let Some(column) = columns.iter().find(|column| column.value.len() != row_count) {
            return Err(Error::InvalidValue(format!(
                "Column `{}` has {} values, expected {row_count}",
                column.name,
                column.value.len()
            )));
        }
        check_names("row", &row_names, row_count)?;

        Ok(Self {
            columns,
            row_count,
            row_names,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_names(&self) -> Option<&[String]> {
        self.row_names.as_deref()
    }
}

impl TryFrom<WireDataFrameData> for DataFrameData {
    type Error = Error;

    fn try_from(data: WireDataFrameData) -> Result<Self, Self::Error> {
        Self::new(data.columns, data.row_count, data.row_names)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("x", PrimitiveValue::Integer(vec![1, 2])),
            Column::new("y", PrimitiveValue::String(vec![Some("a".into()), None])),
        ]
    }

    #[test]
    fn test_columns_must_have_row_count_values() {
        let frame = DataFrameData::new(columns(), 2, None).unwrap();
        assert_eq!(frame.col_count(), 2);
        assert_eq!(frame.column("y").unwrap().value.len(), 2);
        assert!(frame.column("z").is_none());

        assert_matches!(DataFrameData::new(columns(), 3, None), Err(Error::InvalidValue(_)));
    }

    #[test]
    fn test_row_names_must_match() {
        let names = Some(vec![String::from("r1")]);
        assert_matches!(DataFrameData::new(columns(), 2, names), Err(Error::InvalidValue(_)));
    }

    #[test]
    fn test_wire_shape() {
        let frame = DataFrameData::new(
            columns(),
            2,
            Some(vec![String::from("r1"), String::from("r2")]),
        )
        .unwrap();
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            json,
            json!({
                "columns": [
                    {"name": "x", "value": {"integer": [1, 2]}},
                    {"name": "y", "value": {"string": ["a", null]}},
                ],
                "rowCount": 2,
                "rowNames": ["r1", "r2"],
            })
        );
        assert_eq!(serde_json::from_value::<DataFrameData>(json).unwrap(), frame);
    }

    #[test]
    fn test_short_column_is_rejected_on_decode() {
        let json = json!({
            "columns": [{"name": "x", "value": {"integer": [1]}}],
            "rowCount": 2,
        });
        assert!(serde_json::from_value::<DataFrameData>(json).is_err());
    }
}
