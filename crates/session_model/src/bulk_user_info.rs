//
// bulk_user_info.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::file::File;
use crate::project::Project;
use crate::user::User;
use crate::wire::WireFormat;
use crate::workspace::Workspace;

/// Everything a client needs after login: the user with their projects,
/// workspaces keyed by project id and files keyed by workspace id.
///
/// Integer map keys travel as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUserInfo {
    pub user: User,
    pub projects: Vec<Project>,
    pub workspaces: BTreeMap<i32, Vec<Workspace>>,
    pub files: BTreeMap<i32, Vec<File>>,
}

impl BulkUserInfo {
    pub fn workspaces_for(&self, project_id: i32) -> &[Workspace] {
        self.workspaces
            .get(&project_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn files_for(&self, wspace_id: i32) -> &[File] {
        self.files
            .get(&wspace_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn file(&self, file_id: i32) -> Option<&File> {
        self.files
            .values()
            .flatten()
            .find(|file| file.id == file_id)
    }
}

impl WireFormat for BulkUserInfo {}

/// Returned when a workspace is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceResult {
    pub wspace_id: i32,
    pub bulk_info: BulkUserInfo,
}

impl WireFormat for CreateWorkspaceResult {}
