//
// project.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use serde::Deserialize;
use serde::Serialize;

use crate::wire::WireFormat;

/// A named collection of workspaces owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub version: i32,
    pub user_id: i32,
    pub name: String,
}

impl WireFormat for Project {}
