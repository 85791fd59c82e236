//
// file.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::file_type::FileType;
use crate::wire::WireFormat;

/// A file stored in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: i32,
    pub wspace_id: i32,
    pub name: String,
    /// Bumped by the server on every change to the file
    pub version: i32,
    #[serde(with = "crate::wire::timestamp")]
    pub date_created: DateTime<Utc>,
    #[serde(with = "crate::wire::timestamp")]
    pub last_modified: DateTime<Utc>,
    pub file_size: i64,
}

impl File {
    /// The type of the file, looked up by extension.
    pub fn file_type(&self) -> Option<&'static FileType> {
        FileType::for_file_name(&self.name)
    }

    pub fn extension(&self) -> Option<&str> {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

impl WireFormat for File {}
