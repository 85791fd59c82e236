//
// bytes.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

//! Binary content (saved file contents, plot images) written as padded
//! standard base64 text.

use base64::engine::general_purpose;
use base64::Engine;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serializer;

pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let text = String::deserialize(deserializer)?;
    general_purpose::STANDARD
        .decode(text.as_bytes())
        .map_err(|err| de::Error::custom(format!("Invalid base64 content: {err}")))
}
