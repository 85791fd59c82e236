//
// session_image.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::wire::WireFormat;

/// A plot produced while executing code. Images produced by the same
/// command share a batch.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionImage {
    pub id: i32,
    pub session_id: i32,
    pub batch_id: i32,
    pub name: String,
    pub title: Option<String>,
    #[serde(with = "crate::wire::timestamp")]
    pub date_created: DateTime<Utc>,
    /// PNG bytes
    #[serde(with = "crate::wire::bytes")]
    pub image_data: Vec<u8>,
}

impl WireFormat for SessionImage {}
