//
// session_response.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::bulk_user_info::BulkUserInfo;
use crate::error::Error;
use crate::file::File;
use crate::file_operation::FileOperation;
use crate::session_error::SessionError;
use crate::session_image::SessionImage;
use crate::variable::Variable;
use crate::wire::keyed::decode_keyed;
use crate::wire::keyed::encode_keyed;
use crate::wire::keyed::flag;
use crate::wire::keyed::probe;
use crate::wire::keyed::Probe;
use crate::wire::WireFormat;

/// An event sent by a session to its clients, either answering a command or
/// reporting a change made by someone else.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionResponse {
    ComputeStatus(ComputeStatus),
    /// First message on a new connection
    Connected(ConnectedData),
    /// The session is going away, no more messages follow
    Closed,
    EchoExecute(ExecuteEchoData),
    EchoExecuteFile(ExecuteFileEchoData),
    Error(ErrorData),
    ExecComplete(ExecCompleteData),
    FileChanged(FileChangedData),
    FileOperation(FileOperationData),
    Help(HelpData),
    Info(InfoData),
    Results(ResultsData),
    Save(SaveData),
    ShowOutput(ShowOutputData),
    VariableValue(VariableValueData),
    Variables(ListVariablesData),
    EnvironmentCreated(EnvironmentCreatedData),
    PreviewInitialized(PreviewInitializedData),
    PreviewUpdated(PreviewUpdatedData),
}

impl SessionResponse {
    /// The transaction of the command this answers. Notifications that
    /// weren't triggered by a command have none.
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            SessionResponse::ComputeStatus(_) |
            SessionResponse::Connected(_) |
            SessionResponse::Closed |
            SessionResponse::FileChanged(_) => None,
            SessionResponse::EchoExecute(data) => Some(data.transaction_id.as_str()),
            SessionResponse::EchoExecuteFile(data) => Some(data.transaction_id.as_str()),
            SessionResponse::Error(data) => data.transaction_id.as_deref(),
            SessionResponse::ExecComplete(data) => Some(data.transaction_id.as_str()),
            SessionResponse::FileOperation(data) => Some(data.transaction_id.as_str()),
            SessionResponse::Help(data) => Some(data.transaction_id.as_str()),
            SessionResponse::Info(data) => Some(data.transaction_id.as_str()),
            SessionResponse::Results(data) => Some(data.transaction_id.as_str()),
            SessionResponse::Save(data) => Some(data.transaction_id.as_str()),
            SessionResponse::ShowOutput(data) => Some(data.transaction_id.as_str()),
            SessionResponse::VariableValue(data) => data.transaction_id.as_deref(),
            SessionResponse::Variables(data) => data.transaction_id.as_deref(),
            SessionResponse::EnvironmentCreated(data) => Some(data.transaction_id.as_str()),
            SessionResponse::PreviewInitialized(data) => Some(data.transaction_id.as_str()),
            SessionResponse::PreviewUpdated(data) => data.transaction_id.as_deref(),
        }
    }
}

const PROBE_ORDER: &[(&str, Probe<SessionResponse>)] = &[
    ("computeStatus", |v| probe(v).map(SessionResponse::ComputeStatus)),
    ("connected", |v| probe(v).map(SessionResponse::Connected)),
    ("closed", |v| flag(v, SessionResponse::Closed)),
    ("echoExecute", |v| probe(v).map(SessionResponse::EchoExecute)),
    ("echoExecuteFile", |v| probe(v).map(SessionResponse::EchoExecuteFile)),
    ("error", |v| probe(v).map(SessionResponse::Error)),
    ("execComplete", |v| probe(v).map(SessionResponse::ExecComplete)),
    ("fileChanged", |v| probe(v).map(SessionResponse::FileChanged)),
    ("fileOperation", |v| probe(v).map(SessionResponse::FileOperation)),
    ("help", |v| probe(v).map(SessionResponse::Help)),
    ("info", |v| probe(v).map(SessionResponse::Info)),
    ("results", |v| probe(v).map(SessionResponse::Results)),
    ("save", |v| probe(v).map(SessionResponse::Save)),
    ("showOutput", |v| probe(v).map(SessionResponse::ShowOutput)),
    ("variableValue", |v| probe(v).map(SessionResponse::VariableValue)),
    ("variables", |v| probe(v).map(SessionResponse::Variables)),
    ("environmentCreated", |v| probe(v).map(SessionResponse::EnvironmentCreated)),
    ("previewInitialized", |v| probe(v).map(SessionResponse::PreviewInitialized)),
    ("previewUpdated", |v| probe(v).map(SessionResponse::PreviewUpdated)),
];

impl Serialize for SessionResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SessionResponse::ComputeStatus(status) => {
                encode_keyed(serializer, "computeStatus", status)
            },
            SessionResponse::Connected(data) => encode_keyed(serializer, "connected", data),
            SessionResponse::Closed => encode_keyed(serializer, "closed", &true),
            SessionResponse::EchoExecute(data) => encode_keyed(serializer, "echoExecute", data),
            SessionResponse::EchoExecuteFile(data) => {
                encode_keyed(serializer, "echoExecuteFile", data)
            },
            SessionResponse::Error(data) => encode_keyed(serializer, "error", data),
            SessionResponse::ExecComplete(data) => encode_keyed(serializer, "execComplete", data),
            SessionResponse::FileChanged(data) => encode_keyed(serializer, "fileChanged", data),
            SessionResponse::FileOperation(data) => {
                encode_keyed(serializer, "fileOperation", data)
            },
            SessionResponse::Help(data) => encode_keyed(serializer, "help", data),
            SessionResponse::Info(data) => encode_keyed(serializer, "info", data),
            SessionResponse::Results(data) => encode_keyed(serializer, "results", data),
            SessionResponse::Save(data) => encode_keyed(serializer, "save", data),
            SessionResponse::ShowOutput(data) => encode_keyed(serializer, "showOutput", data),
            SessionResponse::VariableValue(data) => {
                encode_keyed(serializer, "variableValue", data)
            },
            SessionResponse::Variables(data) => encode_keyed(serializer, "variables", data),
            SessionResponse::EnvironmentCreated(data) => {
                encode_keyed(serializer, "environmentCreated", data)
            },
            SessionResponse::PreviewInitialized(data) => {
                encode_keyed(serializer, "previewInitialized", data)
            },
            SessionResponse::PreviewUpdated(data) => {
                encode_keyed(serializer, "previewUpdated", data)
            },
        }
    }
}

impl<'de> Deserialize<'de> for SessionResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_keyed("SessionResponse", &value, PROBE_ORDER).map_err(Error::into_serde)
    }
}

impl WireFormat for SessionResponse {}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComputeStatus {
    Initializing,
    Loading,
    Idle,
    Running,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileChangeType {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedData {
    pub connection_id: String,
    pub bulk_info: BulkUserInfo,
}

/// Code another client sent for execution.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteEchoData {
    pub transaction_id: String,
    pub source: String,
    pub environment_id: Option<i32>,
}

/// A file another client sent for execution.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteFileEchoData {
    pub transaction_id: String,
    pub file_id: i32,
    pub file_version: i32,
    #[serde(
        default,
        with = "crate::wire::line_range",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_range: Option<RangeInclusive<i32>>,
    pub environment_id: Option<i32>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub transaction_id: Option<String>,
    pub error: SessionError,
}

/// Execution finished. Plots produced along the way come in one batch.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCompleteData {
    pub transaction_id: String,
    pub batch_id: i32,
    /// A `showOutput` for this transaction is on its way
    pub expect_show_output: bool,
    #[serde(default)]
    pub images: Vec<SessionImage>,
    pub environment_id: Option<i32>,
}

/// A file was added, changed or removed by any client. Deletions carry no
/// file.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChangedData {
    pub change_type: FileChangeType,
    pub file_id: i32,
    pub file: Option<File>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOperationData {
    pub transaction_id: String,
    pub operation: FileOperation,
    pub success: bool,
    /// The renamed or duplicated file
    pub file: Option<File>,
    pub error: Option<SessionError>,
}

/// Help pages matching a topic, keyed by title. Values are page paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpData {
    pub transaction_id: String,
    pub topic: String,
    pub items: BTreeMap<String, String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoData {
    pub transaction_id: String,
    pub topic: String,
    /// `None` when nothing is known about the topic
    pub usage: Option<String>,
}

/// Console output produced while executing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsData {
    pub transaction_id: String,
    pub output: String,
    pub is_std_err: bool,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub transaction_id: String,
    pub success: bool,
    /// The file at its new version
    pub file: Option<File>,
    pub error: Option<SessionError>,
}

/// A file written by executed code that should be shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowOutputData {
    pub transaction_id: String,
    pub file: File,
    #[serde(with = "crate::wire::bytes")]
    pub file_data: Vec<u8>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableValueData {
    pub transaction_id: Option<String>,
    pub value: Variable,
    pub environment_id: Option<i32>,
}

/// Variables of an environment. A delta lists only what changed since the
/// last report, along with the names that no longer exist.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVariablesData {
    pub transaction_id: Option<String>,
    pub variables: BTreeMap<String, Variable>,
    #[serde(default)]
    pub removed: Vec<String>,
    pub environment_id: Option<i32>,
    pub delta: bool,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCreatedData {
    pub transaction_id: String,
    pub environment_id: i32,
    pub variable_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewInitializedData {
    pub transaction_id: String,
    pub preview_id: i32,
    pub update_identifier: String,
}

/// Rendered output of one chunk. `update_complete` is set on the last
/// chunk of an update.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewUpdatedData {
    pub transaction_id: Option<String>,
    pub preview_id: i32,
    pub chunk_id: i32,
    pub update_identifier: String,
    /// HTML
    pub content: String,
    pub update_complete: bool,
}
