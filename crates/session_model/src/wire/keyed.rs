//
// keyed.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

//! Unions encoded by key presence.
//!
//! A value is written as a one-entry object whose key names the variant. On
//! the way back in, the keys are probed in the order given by the union's
//! probe table and the first payload that decodes as the variant's payload
//! wins. A document carrying several known keys is therefore resolved by
//! probe order, not by document order.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::error::Error;

/// Attempts to read one variant out of the payload stored under its key.
/// A mismatch carries the reason, reported if no later variant matches.
pub(crate) type Probe<T> = fn(&Value) -> Result<T, String>;

/// Decodes a payload as the variant's payload type.
pub(crate) fn probe<T: DeserializeOwned>(payload: &Value) -> Result<T, String> {
    T::deserialize(payload).map_err(|err| err.to_string())
}

/// Unit variants are written as `true`. Any boolean is accepted.
pub(crate) fn flag<T>(payload: &Value, variant: T) -> Result<T, String> {
    if payload.is_boolean() {
        Ok(variant)
    } else {
        Err(format!("expected a boolean, found `{payload}`"))
    }
}

pub(crate) fn decode_keyed<T>(
    type_name: &str,
    value: &Value,
    order: &[(&str, Probe<T>)],
) -> crate::Result<T> {
    let Some(map) = value.as_object() else {
        return Err(Error::decoding(type_name, "expected an object"));
    };

    let mut last_failure: Option<(&str, String)> = None;
    for (key, probe) in order {
        let Some(payload) = map.get(*key) else {
            continue;
        };
        match probe(payload) {
            Ok(value) => return Ok(value),
            Err(reason) => {
                log::trace!("`{type_name}` payload under `{key}` doesn't match: {reason}");
                last_failure = Some((*key, reason));
            },
        }
    }

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    let message = match last_failure {
        Some((key, reason)) => {
            format!("no known variant among keys {keys:?} (`{key}`: {reason})")
        },
        None => format!("no known variant among keys {keys:?}"),
    };
    Err(Error::decoding(type_name, message))
}

pub(crate) fn encode_keyed<S, P>(serializer: S, key: &str, payload: &P) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    P: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, payload)?;
    map.end()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Count(i32),
        Label(String),
        Empty,
    }

    const ORDER: &[(&str, Probe<Shape>)] = &[
        ("count", |v| probe(v).map(Shape::Count)),
        ("label", |v| probe(v).map(Shape::Label)),
        ("empty", |v| flag(v, Shape::Empty)),
    ];

    #[test]
    fn test_first_matching_key_in_probe_order_wins() {
        let value = json!({"empty": true, "label": "x", "count": 3});
        assert_eq!(decode_keyed("Shape", &value, ORDER).unwrap(), Shape::Count(3));
    }

    #[test]
    fn test_mismatched_payload_falls_through() {
        let value = json!({"count": "three", "empty": false});
        assert_eq!(decode_keyed("Shape", &value, ORDER).unwrap(), Shape::Empty);
    }

    #[test]
    fn test_no_match_is_decoding_error() {
        let value = json!({"other": 1});
        assert_matches!(decode_keyed("Shape", &value, ORDER), Err(Error::Decoding(_)));

        let value = json!([1, 2]);
        assert_matches!(decode_keyed("Shape", &value, ORDER), Err(Error::Decoding(_)));
    }

    #[test]
    fn test_no_match_reports_last_failure() {
        let value = json!({"count": "three", "empty": 0});
        let error = decode_keyed("Shape", &value, ORDER).unwrap_err();
        assert_matches!(error, Error::Decoding(message) => {
            assert!(message.contains("`empty`: expected a boolean"), "{message}");
            assert!(!message.contains("`count`"), "{message}");
        });

        let value = json!({"count": "three"});
        let error = decode_keyed("Shape", &value, ORDER).unwrap_err();
        assert_matches!(error, Error::Decoding(message) => {
            assert!(message.contains("`count`: invalid type"), "{message}");
        });

        // Nothing was tried, nothing to report
        let value = json!({"other": 1});
        let error = decode_keyed("Shape", &value, ORDER).unwrap_err();
        assert_matches!(error, Error::Decoding(message) => {
            assert!(!message.contains("(`"), "{message}");
        });
    }
}
