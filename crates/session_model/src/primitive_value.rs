//
// primitive_value.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::fmt;

use itertools::Itertools;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::error::Error;
use crate::wire::float::WireDouble;
use crate::wire::keyed::decode_keyed;
use crate::wire::keyed::encode_keyed;
use crate::wire::keyed::flag;
use crate::wire::keyed::probe;
use crate::wire::keyed::Probe;
use crate::wire::NA_TOKEN;

/// The contents of an atomic R vector.
///
/// Character and complex vectors can hold `NA` elements, which are kept as
/// `None` in place. Complex numbers travel in their formatted form.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    Boolean(Vec<bool>),
    Integer(Vec<i32>),
    Double(Vec<f64>),
    String(Vec<Option<String>>),
    Complex(Vec<Option<String>>),
    Raw,
    Null,
}

const PROBE_ORDER: &[(&str, Probe<PrimitiveValue>)] = &[
    ("boolean", |v| probe(v).map(PrimitiveValue::Boolean)),
    ("integer", |v| probe(v).map(PrimitiveValue::Integer)),
    ("double", |v| {
        probe::<Vec<WireDouble>>(v)
            .map(|values| PrimitiveValue::Double(values.into_iter().map(|x| x.0).collect()))
    }),
    ("string", |v| probe(v).map(PrimitiveValue::String)),
    ("complex", |v| probe(v).map(PrimitiveValue::Complex)),
    ("raw", |v| flag(v, PrimitiveValue::Raw)),
    ("null", |v| flag(v, PrimitiveValue::Null)),
];

impl PrimitiveValue {
    /// Number of elements, `NA`s included. `raw` and `null` have none.
    pub fn len(&self) -> usize {
        match self {
            PrimitiveValue::Boolean(values) => values.len(),
            PrimitiveValue::Integer(values) => values.len(),
            PrimitiveValue::Double(values) => values.len(),
            PrimitiveValue::String(values) | PrimitiveValue::Complex(values) => values.len(),
            PrimitiveValue::Raw | PrimitiveValue::Null => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bracketed, comma separated rendering of the elements, e.g.
    /// `[a, <NA>, b]`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

fn bracketed<I>(mut items: I) -> String
where
    I: Iterator,
    I::Item: fmt::Display,
{
    format!("[{}]", items.join(", "))
}

fn format_double(value: f64) -> String {
    match WireDouble(value).token() {
        Some(token) => token.to_string(),
        None => value.to_string(),
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PrimitiveValue::Boolean(values) => bracketed(values.iter()),
            PrimitiveValue::Integer(values) => bracketed(values.iter()),
            PrimitiveValue::Double(values) => bracketed(values.iter().map(|x| format_double(*x))),
            PrimitiveValue::String(values) | PrimitiveValue::Complex(values) => {
                bracketed(values.iter().map(|x| x.as_deref().unwrap_or(NA_TOKEN)))
            },
            PrimitiveValue::Raw => String::from("RAW"),
            PrimitiveValue::Null => String::from("NULL"),
        };
        f.write_str(&text)
    }
}

impl Serialize for PrimitiveValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrimitiveValue::Boolean(values) => encode_keyed(serializer, "boolean", values),
            PrimitiveValue::Integer(values) => encode_keyed(serializer, "integer", values),
            PrimitiveValue::Double(values) => {
                let values: Vec<WireDouble> = values.iter().map(|x| WireDouble(*x)).collect();
                encode_keyed(serializer, "double", &values)
            },
            PrimitiveValue::String(values) => encode_keyed(serializer, "string", values),
            PrimitiveValue::Complex(values) => encode_keyed(serializer, "complex", values),
            PrimitiveValue::Raw => encode_keyed(serializer, "raw", &true),
            PrimitiveValue::Null => encode_keyed(serializer, "null", &true),
        }
    }
}

impl<'de> Deserialize<'de> for PrimitiveValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_keyed("PrimitiveValue", &value, PROBE_ORDER).map_err(Error::into_serde)
    }
}
