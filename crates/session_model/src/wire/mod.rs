//
// mod.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

//! Encoding and decoding of session documents.
//!
//! Every message crossing the persistent channel or a REST body is a single
//! JSON document. Unions are written in one of two ways:
//!
//! - By key presence: `{"<variant>": payload}`. Decoding probes the known
//!   keys in a fixed order and keeps the first payload that decodes, see
//!   [`keyed`].
//! - By explicit discriminator: `{"rawType": "<variant>", "<variant>": payload}`.
//!   Used by [`crate::variable_type::VariableType`] and unambiguous.

pub mod bytes;
pub mod float;
pub mod keyed;
pub mod line_range;
pub mod timestamp;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Deepest nesting of `VariableType` values accepted by the decoder. A list
/// containing a list counts as two levels.
pub const MAX_DECODE_DEPTH: usize = 32;

/// Rendering of a missing element in a primitive vector.
pub const NA_TOKEN: &str = "<NA>";

/// Implemented by the types that travel as a whole document, i.e. one
/// message on the session channel or one REST body.
pub trait WireFormat: Serialize + DeserializeOwned {
    fn to_wire(&self) -> crate::Result<String> {
        encode(self)
    }

    fn from_wire(document: &str) -> crate::Result<Self> {
        decode(document)
    }
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> crate::Result<String> {
    serde_json::to_string(value).map_err(|err| Error::Encoding(err.to_string()))
}

pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> crate::Result<Value> {
    serde_json::to_value(value).map_err(|err| Error::Encoding(err.to_string()))
}

pub fn decode<T: DeserializeOwned>(document: &str) -> crate::Result<T> {
    serde_json::from_str(document).map_err(|err| Error::Decoding(err.to_string()))
}

pub fn decode_slice<T: DeserializeOwned>(document: &[u8]) -> crate::Result<T> {
    serde_json::from_slice(document).map_err(|err| Error::Decoding(err.to_string()))
}

pub fn decode_value<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    serde_json::from_value(value).map_err(|err| Error::Decoding(err.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_decode_reports_malformed_documents() {
        let result: crate::Result<Vec<i32>> = decode("[1, 2");
        assert_matches!(result, Err(Error::Decoding(_)));

        let result: crate::Result<Vec<i32>> = decode_slice(b"{}");
        assert_matches!(result, Err(Error::Decoding(_)));
    }

    #[test]
    fn test_encode_value() {
        let value = encode_value(&vec![1, 2]).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
        assert_eq!(decode_value::<Vec<i32>>(value).unwrap(), vec![1, 2]);
    }
}
