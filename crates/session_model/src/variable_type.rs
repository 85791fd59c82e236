//
// variable_type.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::data_frame::DataFrameData;
use crate::error::Error;
use crate::matrix_data::MatrixData;
use crate::pairlist::RPair;
use crate::pairlist::RPairList;
use crate::primitive_value::PrimitiveValue;
use crate::variable::decode_variable;
use crate::variable::Variable;
use crate::wire::timestamp;
use crate::wire::MAX_DECODE_DEPTH;

const TYPE_NAME: &str = "VariableType";
const DISCRIMINATOR: &str = "rawType";

/// The shape of an inspected R value.
///
/// Encoded with an explicit discriminator:
/// `{"rawType": "list", "list": [...]}`. Unit variants carry only `rawType`.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableType {
    Unknown,
    Primitive(PrimitiveValue),
    Date(DateTime<Utc>),
    DateTime(DateTime<Utc>),
    /// Named elements without a meaningful order
    Generic(BTreeMap<String, Variable>),
    Matrix(MatrixData),
    /// Dimensions are carried by the enclosing variable
    Array,
    List(Vec<Variable>),
    /// `values` are 1-based indices into `level_names`
    Factor {
        values: Vec<i32>,
        level_names: Option<Vec<String>>,
    },
    DataFrame(DataFrameData),
    Environment,
    /// Source text of the function
    Function(String),
    S4Object,
    Symbol(String),
    Pairlist(RPairList),
}

/// Possible values of the `rawType` discriminator
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
pub enum RawType {
    #[strum(to_string = "unknown")]
    Unknown,

    #[strum(to_string = "primitive")]
    Primitive,

    #[strum(to_string = "date")]
    Date,

    #[strum(to_string = "dateTime")]
    DateTime,

    #[strum(to_string = "generic")]
    Generic,

    #[strum(to_string = "matrix")]
    Matrix,

    #[strum(to_string = "array")]
    Array,

    #[strum(to_string = "list")]
    List,

    #[strum(to_string = "factor")]
    Factor,

    #[strum(to_string = "dataFrame")]
    DataFrame,

    #[strum(to_string = "environment")]
    Environment,

    #[strum(to_string = "function")]
    Function,

    #[strum(to_string = "s4Object")]
    S4Object,

    #[strum(to_string = "symbol")]
    Symbol,

    #[strum(to_string = "pairlist")]
    Pairlist,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FactorPayload<'a> {
    values: &'a [i32],
    level_names: Option<&'a Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFactor {
    values: Vec<i32>,
    level_names: Option<Vec<String>>,
}

impl VariableType {
    pub fn raw_type(&self) -> RawType {
        match self {
            VariableType::Unknown => RawType::Unknown,
            VariableType::Primitive(_) => RawType::Primitive,
            VariableType::Date(_) => RawType::Date,
            VariableType::DateTime(_) => RawType::DateTime,
            VariableType::Generic(_) => RawType::Generic,
            VariableType::Matrix(_) => RawType::Matrix,
            VariableType::Array => RawType::Array,
            VariableType::List(_) => RawType::List,
            VariableType::Factor { .. } => RawType::Factor,
            VariableType::DataFrame(_) => RawType::DataFrame,
            VariableType::Environment => RawType::Environment,
            VariableType::Function(_) => RawType::Function,
            VariableType::S4Object => RawType::S4Object,
            VariableType::Symbol(_) => RawType::Symbol,
            VariableType::Pairlist(_) => RawType::Pairlist,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            VariableType::Array |
                VariableType::DataFrame(_) |
                VariableType::Matrix(_) |
                VariableType::List(_) |
                VariableType::Environment |
                VariableType::Pairlist(_)
        )
    }

    /// Checks the invariants that the type itself doesn't enforce, here and
    /// in nested variables. Currently that's factor codes: with level names
    /// present, every code must lie in `1..=level_names.len()`.
    pub fn validate(&self) -> crate::Result<()> {
        match self {
            VariableType::Factor {
                values,
                level_names: Some(level_names),
            } => {
                let levels = level_names.len() as i64;
                match values.iter().find(|code| !(1..=levels).contains(&(**code as i64))) {
                    Some(code) => Err(Error::InvalidValue(format!(
                        "Factor code {code} is outside of 1..={levels}"
                    ))),
                    None => Ok(()),
                }
            },
            VariableType::List(variables) => variables
                .iter()
                .try_for_each(|variable| variable.value_type().validate()),
            VariableType::Generic(variables) => variables
                .values()
                .try_for_each(|variable| variable.value_type().validate()),
            VariableType::Pairlist(pairs) => pairs
                .iter()
                .try_for_each(|pair| pair.value.value_type().validate()),
            _ => Ok(()),
        }
    }
}

impl Serialize for VariableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let key: &'static str = self.raw_type().into();

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(DISCRIMINATOR, key)?;

        match self {
            VariableType::Unknown |
            VariableType::Array |
            VariableType::Environment |
            VariableType::S4Object => {},
            VariableType::Primitive(value) => map.serialize_entry(key, value)?,
            VariableType::Date(date) | VariableType::DateTime(date) => {
                map.serialize_entry(key, &timestamp::to_seconds(date))?
            },
            VariableType::Generic(variables) => map.serialize_entry(key, variables)?,
            VariableType::Matrix(data) => map.serialize_entry(key, data)?,
            VariableType::List(variables) => map.serialize_entry(key, variables)?,
            VariableType::Factor {
                values,
                level_names,
            } => {
                let payload = FactorPayload {
                    values,
                    level_names: level_names.as_ref(),
                };
                map.serialize_entry(key, &payload)?
            },
            VariableType::DataFrame(data) => map.serialize_entry(key, data)?,
            VariableType::Function(body) => map.serialize_entry(key, body)?,
            VariableType::Symbol(name) => map.serialize_entry(key, name)?,
            VariableType::Pairlist(pairs) => map.serialize_entry(key, pairs)?,
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for VariableType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_variable_type(&value, 0).map_err(Error::into_serde)
    }
}

/// Decodes a type nested `depth` levels deep, failing once the nesting
/// exceeds `MAX_DECODE_DEPTH`.
pub(crate) fn decode_variable_type(value: &Value, depth: usize) -> crate::Result<VariableType> {
    if depth > MAX_DECODE_DEPTH {
        return Err(Error::decoding(
            TYPE_NAME,
            format!("values nested deeper than {MAX_DECODE_DEPTH} levels"),
        ));
    }

    let Some(map) = value.as_object() else {
        return Err(Error::decoding(TYPE_NAME, "expected an object"));
    };

    let Some(raw_type) = map.get(DISCRIMINATOR).and_then(Value::as_str) else {
        return Err(Error::decoding(
            TYPE_NAME,
            format!("missing `{DISCRIMINATOR}` discriminator"),
        ));
    };

    let Ok(raw_type) = RawType::from_str(raw_type) else {
        return Err(Error::decoding(
            TYPE_NAME,
            format!("unknown {DISCRIMINATOR} `{raw_type}`"),
        ));
    };

    let key: &'static str = raw_type.into();
    let payload = || {
        map.get(key)
            .ok_or_else(|| Error::decoding(TYPE_NAME, format!("missing `{key}` payload")))
    };

    let value_type = match raw_type {
        RawType::Unknown => VariableType::Unknown,
        RawType::Primitive => VariableType::Primitive(payload_as(payload()?)?),
        RawType::Date => VariableType::Date(decode_timestamp(payload()?)?),
        RawType::DateTime => VariableType::DateTime(decode_timestamp(payload()?)?),
        RawType::Generic => {
            let Some(entries) = payload()?.as_object() else {
                return Err(Error::decoding(TYPE_NAME, "`generic` payload must be an object"));
            };
            let variables = entries
                .iter()
                .map(|(name, variable)| Ok((name.clone(), decode_variable(variable, depth + 1)?)))
                .collect::<crate::Result<BTreeMap<_, _>>>()?;
            VariableType::Generic(variables)
        },
        RawType::Matrix => VariableType::Matrix(payload_as(payload()?)?),
        RawType::Array => VariableType::Array,
        RawType::List => {
            let Some(elements) = payload()?.as_array() else {
                return Err(Error::decoding(TYPE_NAME, "`list` payload must be an array"));
            };
            let variables = elements
                .iter()
                .map(|variable| decode_variable(variable, depth + 1))
                .collect::<crate::Result<Vec<_>>>()?;
            VariableType::List(variables)
        },
        RawType::Factor => {
            let factor: WireFactor = payload_as(payload()?)?;
            VariableType::Factor {
                values: factor.values,
                level_names: factor.level_names,
            }
        },
        RawType::DataFrame => VariableType::DataFrame(payload_as(payload()?)?),
        RawType::Environment => VariableType::Environment,
        RawType::Function => VariableType::Function(payload_as(payload()?)?),
        RawType::S4Object => VariableType::S4Object,
        RawType::Symbol => VariableType::Symbol(payload_as(payload()?)?),
        RawType::Pairlist => VariableType::Pairlist(decode_pairlist(payload()?, depth + 1)?),
    };

    Ok(value_type)
}

/// Decodes the pairs of a pairlist whose values sit `depth` levels deep.
pub(crate) fn decode_pairlist(value: &Value, depth: usize) -> crate::Result<RPairList> {
    let Some(elements) = value.as_array() else {
        return Err(Error::decoding("RPairList", "expected an array of pairs"));
    };

    elements
        .iter()
        .map(|element| {
            let Some(key) = element.get("key").and_then(Value::as_str) else {
                return Err(Error::decoding("RPairList", "pair without a string `key`"));
            };
            let Some(value) = element.get("value") else {
                return Err(Error::decoding("RPairList", format!("pair `{key}` has no value")));
            };
            Ok(RPair::new(key, decode_variable(value, depth)?))
        })
        .collect()
}

fn payload_as<T: DeserializeOwned>(payload: &Value) -> crate::Result<T> {
    T::deserialize(payload).map_err(|err| Error::decoding(TYPE_NAME, err))
}

fn decode_timestamp(payload: &Value) -> crate::Result<DateTime<Utc>> {
    payload
        .as_f64()
        .and_then(timestamp::from_seconds)
        .ok_or_else(|| Error::decoding(TYPE_NAME, format!("invalid timestamp {payload}")))
}
