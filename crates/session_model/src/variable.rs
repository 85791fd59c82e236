//
// variable.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::data_frame::DataFrameData;
use crate::error::Error;
use crate::matrix_data::MatrixData;
use crate::primitive_value::PrimitiveValue;
use crate::variable_type::decode_variable_type;
use crate::variable_type::VariableType;

/// Class reported when the inspecting side doesn't know it.
pub const UNKNOWN_CLASS: &str = "<unknown>";

/// A named value inspected in a compute environment.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct Variable {
    name: String,
    length: i64,
    #[serde(rename = "type")]
    value_type: VariableType,
    #[serde(rename = "classNameR")]
    class_name: String,
    #[serde(rename = "summary")]
    provided_summary: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, length: i64, value_type: VariableType) -> Self {
        Self {
            name: name.into(),
            length,
            value_type,
            class_name: String::from(UNKNOWN_CLASS),
            provided_summary: None,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// An empty summary counts as no summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.provided_summary = (!summary.is_empty()).then_some(summary);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element count of the R value, which may exceed what was transferred.
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn value_type(&self) -> &VariableType {
        &self.value_type
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Primitives describe their own elements. Anything else uses the summary
    /// given at construction, falling back to `class[length]`.
    pub fn summary(&self) -> String {
        match &self.value_type {
            VariableType::Primitive(value) => value.describe(),
            _ => match &self.provided_summary {
                Some(summary) => summary.clone(),
                None => self.to_string(),
            },
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.value_type, VariableType::Primitive(_))
    }

    pub fn is_factor(&self) -> bool {
        matches!(self.value_type, VariableType::Factor { .. })
    }

    pub fn is_date(&self) -> bool {
        matches!(self.value_type, VariableType::Date(_))
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self.value_type, VariableType::DateTime(_))
    }

    pub fn primitive_value(&self) -> Option<&PrimitiveValue> {
        match &self.value_type {
            VariableType::Primitive(value) => Some(value),
            _ => None,
        }
    }

    pub fn date_value(&self) -> Option<DateTime<Utc>> {
        match &self.value_type {
            VariableType::Date(date) | VariableType::DateTime(date) => Some(*date),
            _ => None,
        }
    }

    pub fn matrix_data(&self) -> Option<&MatrixData> {
        match &self.value_type {
            VariableType::Matrix(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_frame_data(&self) -> Option<&DataFrameData> {
        match &self.value_type {
            VariableType::DataFrame(data) => Some(data),
            _ => None,
        }
    }

    /// Source text, for functions.
    pub fn function_body(&self) -> Option<&str> {
        match &self.value_type {
            VariableType::Function(body) => Some(body),
            _ => None,
        }
    }

    /// Level names, for factors that carry them.
    pub fn levels(&self) -> Option<&[String]> {
        match &self.value_type {
            VariableType::Factor { level_names, .. } => level_names.as_deref(),
            _ => None,
        }
    }

    pub fn compare_by_name(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.class_name, self.length)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name &&
            self.length == other.length &&
            self.value_type == other.value_type &&
            self.class_name == other.class_name &&
            self.summary() == other.summary()
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_variable(&value, 0).map_err(Error::into_serde)
    }
}

/// Decodes a variable whose type sits `depth` levels below the outermost
/// `VariableType` of the document.
pub(crate) fn decode_variable(value: &Value, depth: usize) -> crate::Result<Variable> {
    let Some(map) = value.as_object() else {
        return Err(Error::decoding("Variable", "expected an object"));
    };

    let Some(value_type) = map.get("type") else {
        return Err(Error::decoding("Variable", "missing field `type`"));
    };

    let class_name: Option<String> = optional_field(map, "classNameR")?;
    let summary: Option<String> = optional_field(map, "summary")?;

    Ok(Variable {
        name: field(map, "name")?,
        length: field(map, "length")?,
        value_type: decode_variable_type(value_type, depth)?,
        class_name: class_name.unwrap_or_else(|| String::from(UNKNOWN_CLASS)),
        provided_summary: summary.filter(|summary| !summary.is_empty()),
    })
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> crate::Result<T> {
    let Some(value) = map.get(key) else {
        return Err(Error::decoding("Variable", format!("missing field `{key}`")));
    };
    T::deserialize(value).map_err(|err| Error::decoding("Variable", format!("field `{key}`: {err}")))
}

fn optional_field<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &str,
) -> crate::Result<Option<T>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => field(map, key).map(Some),
    }
}
