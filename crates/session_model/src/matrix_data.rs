//
// matrix_data.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::primitive_value::PrimitiveValue;

/// The contents of an R matrix, flattened in column-major order.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireMatrixData")]
pub struct MatrixData {
    value: PrimitiveValue,
    row_count: usize,
    col_count: usize,
    col_names: Option<Vec<String>>,
    row_names: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMatrixData {
    value: PrimitiveValue,
    row_count: usize,
    col_count: usize,
    col_names: Option<Vec<String>>,
    row_names: Option<Vec<String>>,
}

impl MatrixData {
    pub fn new(value: PrimitiveValue, row_count: usize, col_count: usize) -> crate::Result<Self> {
        Self::with_names(value, row_count, col_count, None, None)
    }

    pub fn with_names(
        value: PrimitiveValue,
        row_count: usize,
        col_count: usize,
        row_names: Option<Vec<String>>,
        col_names: Option<Vec<String>>,
    ) -> crate::Result<Self> {
        let cells = row_count.checked_mul(col_count);
        if cells != Some(value.len()) {
            return Err(Error::InvalidValue(format!(
                "A {row_count}x{col_count} matrix can't hold {} values",
                value.len()
            )));
        }
        check_names("row", &row_names, row_count)?;
        check_names("column", &col_names, col_count)?;

        Ok(Self {
            value,
            row_count,
            col_count,
            col_names,
            row_names,
        })
    }

    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn row_names(&self) -> Option<&[String]> {
        self.row_names.as_deref()
    }

    pub fn col_names(&self) -> Option<&[String]> {
        self.col_names.as_deref()
    }
}

pub(crate) fn check_names(
    what: &str,
    names: &Option<Vec<String>>,
    expected: usize,
) -> crate::Result<()> {
    match names {
        Some(names) if names.len() != expected => Err(Error::InvalidValue(format!(
            "Expected {expected} {what} names, got {}",
            names.len()
        ))),
        _ => Ok(()),
    }
}

impl TryFrom<WireMatrixData> for MatrixData {
    type Error = Error;

    fn try_from(data: WireMatrixData) -> Result<Self, Self::Error> {
        Self::with_names(
            data.value,
            data.row_count,
            data.col_count,
            data.row_names,
            data.col_names,
        )
    }
}
