//
// session_command.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::ops::RangeInclusive;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;
use crate::file::File;
use crate::file_operation::FileOperation;
use crate::wire::keyed::decode_keyed;
use crate::wire::keyed::probe;
use crate::wire::keyed::Probe;
use crate::wire::WireFormat;

/// A request sent by a client to its session.
///
/// Every command carries a transaction id that the session echoes back in
/// the responses it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionCommand {
    ExecuteFile(ExecuteFileParams),
    Execute(ExecuteParams),
    FileOperation(FileOperationParams),
    GetVariable(VariableParams),
    Help(HelpParams),
    Info(InfoParams),
    Save(SaveParams),
    ClearEnvironment(ClearEnvironmentParams),
    WatchVariables(WatchVariablesParams),
    CreateEnvironment(CreateEnvironmentParams),
    InitPreview(InitPreviewParams),
    UpdatePreview(UpdatePreviewParams),
    RemovePreview(RemovePreviewParams),
}

pub fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

impl SessionCommand {
    /// User initiated execution of `source` in the global environment.
    pub fn execute(source: impl Into<String>) -> Self {
        SessionCommand::Execute(ExecuteParams::new(source))
    }

    /// Execution of `source` under a caller supplied transaction. A fresh id
    /// is generated when `transaction_id` is `None`.
    pub fn execute_with(
        source: impl Into<String>,
        transaction_id: Option<String>,
        user_initiated: bool,
    ) -> Self {
        let mut params = ExecuteParams::new(source).with_user_initiated(user_initiated);
        if let Some(transaction_id) = transaction_id {
            params = params.with_transaction_id(transaction_id);
        }
        SessionCommand::Execute(params)
    }

    pub fn transaction_id(&self) -> &str {
        match self {
            SessionCommand::ExecuteFile(params) => &params.transaction_id,
            SessionCommand::Execute(params) => &params.transaction_id,
            SessionCommand::FileOperation(params) => &params.transaction_id,
            SessionCommand::GetVariable(params) => &params.transaction_id,
            SessionCommand::Help(params) => &params.transaction_id,
            SessionCommand::Info(params) => &params.transaction_id,
            SessionCommand::Save(params) => &params.transaction_id,
            SessionCommand::ClearEnvironment(params) => &params.transaction_id,
            SessionCommand::WatchVariables(params) => &params.transaction_id,
            SessionCommand::CreateEnvironment(params) => &params.transaction_id,
            SessionCommand::InitPreview(params) => &params.transaction_id,
            SessionCommand::UpdatePreview(params) => &params.transaction_id,
            SessionCommand::RemovePreview(params) => &params.transaction_id,
        }
    }
}

const PROBE_ORDER: &[(&str, Probe<SessionCommand>)] = &[
    ("executeFile", |v| probe(v).map(SessionCommand::ExecuteFile)),
    ("execute", |v| probe(v).map(SessionCommand::Execute)),
    ("getVariable", |v| probe(v).map(SessionCommand::GetVariable)),
    ("fileOperation", |v| probe(v).map(SessionCommand::FileOperation)),
    ("help", |v| probe(v).map(SessionCommand::Help)),
    ("info", |v| probe(v).map(SessionCommand::Info)),
    ("save", |v| probe(v).map(SessionCommand::Save)),
    ("clearEnvironment", |v| probe(v).map(SessionCommand::ClearEnvironment)),
    ("watchVariables", |v| probe(v).map(SessionCommand::WatchVariables)),
    ("createEnvironment", |v| probe(v).map(SessionCommand::CreateEnvironment)),
    ("initPreview", |v| probe(v).map(SessionCommand::InitPreview)),
    ("updatePreview", |v| probe(v).map(SessionCommand::UpdatePreview)),
    ("removePreview", |v| probe(v).map(SessionCommand::RemovePreview)),
];

impl<'de> Deserialize<'de> for SessionCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_keyed("SessionCommand", &value, PROBE_ORDER).map_err(Error::into_serde)
    }
}

impl WireFormat for SessionCommand {}

/// Runs a source file. Without a line range the whole file is run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteFileParams {
    pub file_id: i32,
    pub file_version: i32,
    #[serde(
        default,
        with = "crate::wire::line_range",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_range: Option<RangeInclusive<i32>>,
    pub transaction_id: String,
    /// Whether the session should echo the file's source back
    pub echo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<i32>,
}

impl ExecuteFileParams {
    pub fn new(file: &File, echo: bool) -> Self {
        Self {
            file_id: file.id,
            file_version: file.version,
            line_range: None,
            transaction_id: new_transaction_id(),
            echo,
            environment_id: None,
        }
    }

    pub fn with_line_range(mut self, line_range: RangeInclusive<i32>) -> Self {
        self.line_range = Some(line_range);
        self
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteParams {
    pub source: String,
    pub transaction_id: String,
    /// `false` for code run on the user's behalf, e.g. by a tool
    pub user_initiated: bool,
    /// The global environment when absent
    pub environment_id: Option<i32>,
    /// Whether variable changes should be reported once execution ends
    #[serde(default)]
    pub watch_variables: bool,
}

impl ExecuteParams {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            transaction_id: new_transaction_id(),
            user_initiated: true,
            environment_id: None,
            watch_variables: false,
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = transaction_id.into();
        self
    }

    pub fn with_user_initiated(mut self, user_initiated: bool) -> Self {
        self.user_initiated = user_initiated;
        self
    }

    pub fn with_environment_id(mut self, environment_id: i32) -> Self {
        self.environment_id = Some(environment_id);
        self
    }
}

/// A file operation. A rename always carries the new name: the infallible
/// constructors can't build one without it and `try_new()` rejects it, as
/// does decoding.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireFileOperationParams")]
pub struct FileOperationParams {
    file_id: i32,
    file_version: i32,
    operation: FileOperation,
    new_name: Option<String>,
    transaction_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFileOperationParams {
    file_id: i32,
    file_version: i32,
    operation: FileOperation,
    new_name: Option<String>,
    transaction_id: String,
}

impl FileOperationParams {
    pub fn try_new(
        file_id: i32,
        file_version: i32,
        operation: FileOperation,
        new_name: Option<String>,
        transaction_id: String,
    ) -> crate::Result<Self> {
        if operation == FileOperation::Rename && new_name.is_none() {
            return Err(Error::InvalidCommand(String::from(
                "Rename of a file requires a new name",
            )));
        }

        Ok(Self {
            file_id,
            file_version,
            operation,
            new_name,
            transaction_id,
        })
    }

    pub fn remove(file: &File) -> Self {
        Self::without_name(file, FileOperation::Remove)
    }

    /// `new_name` is the name of the copy. Without one the session picks it.
    pub fn duplicate(file: &File, new_name: Option<String>) -> Self {
        Self {
            new_name,
            ..Self::without_name(file, FileOperation::Duplicate)
        }
    }

    pub fn rename(file: &File, new_name: impl Into<String>) -> Self {
        Self {
            new_name: Some(new_name.into()),
            ..Self::without_name(file, FileOperation::Rename)
        }
    }

    fn without_name(file: &File, operation: FileOperation) -> Self {
        Self {
            file_id: file.id,
            file_version: file.version,
            operation,
            new_name: None,
            transaction_id: new_transaction_id(),
        }
    }

    pub fn file_id(&self) -> i32 {
        self.file_id
    }

    pub fn file_version(&self) -> i32 {
        self.file_version
    }

    pub fn operation(&self) -> FileOperation {
        self.operation
    }

    pub fn new_name(&self) -> Option<&str> {
        self.new_name.as_deref()
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

impl TryFrom<WireFileOperationParams> for FileOperationParams {
    type Error = Error;

    fn try_from(params: WireFileOperationParams) -> Result<Self, Self::Error> {
        Self::try_new(
            params.file_id,
            params.file_version,
            params.operation,
            params.new_name,
            params.transaction_id,
        )
    }
}

/// Requests the full value of one variable.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableParams {
    pub name: String,
    pub environment_id: Option<i32>,
    pub transaction_id: String,
}

/// Looks up the help pages matching a topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpParams {
    pub topic: String,
    pub transaction_id: String,
}

/// Asks for a one-line usage summary of a topic, e.g. for a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoParams {
    pub topic: String,
    pub transaction_id: String,
}

/// Stores new contents for a file. `file_version` is the version the
/// contents were based on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveParams {
    pub transaction_id: String,
    pub file_id: i32,
    pub file_version: i32,
    #[serde(with = "crate::wire::bytes")]
    pub content: Vec<u8>,
}

impl SaveParams {
    pub fn new(file: &File, content: impl Into<Vec<u8>>) -> Self {
        Self {
            transaction_id: new_transaction_id(),
            file_id: file.id,
            file_version: file.version,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearEnvironmentParams {
    pub environment_id: i32,
    pub transaction_id: String,
}

/// Turns variable change reporting on or off for an environment.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchVariablesParams {
    pub watch: bool,
    pub environment_id: Option<i32>,
    pub transaction_id: String,
}

/// Creates a child of `parent_id`, optionally bound to a variable in the
/// parent.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentParams {
    pub parent_id: i32,
    pub variable_name: Option<String>,
    pub transaction_id: String,
}

/// Starts a live preview of a document. `update_identifier` is echoed
/// back in every update for this preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPreviewParams {
    pub file_id: i32,
    pub update_identifier: String,
    pub transaction_id: String,
}

/// Re-renders a preview. Without a chunk every chunk is updated.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreviewParams {
    pub preview_id: i32,
    pub chunk_id: Option<i32>,
    /// Whether chunks before `chunk_id` should be rerun too
    pub include_previous: bool,
    pub update_identifier: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePreviewParams {
    pub preview_id: i32,
    pub transaction_id: String,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::wire::decode;

    fn file() -> File {
        let created = Utc.timestamp_millis_opt(1_600_000_000_000).unwrap();
        File {
            id: 21,
            wspace_id: 1,
            name: String::from("script.R"),
            version: 4,
            date_created: created,
            last_modified: created,
            file_size: 100,
        }
    }

    fn round_trip(command: &SessionCommand) -> SessionCommand {
        SessionCommand::from_wire(&command.to_wire().unwrap()).unwrap()
    }

    #[test]
    fn test_execute_wire_shape() {
        let command = SessionCommand::Execute(ExecuteParams {
            source: String::from("x <- 1"),
            transaction_id: String::from("t1"),
            user_initiated: true,
            environment_id: None,
            watch_variables: false,
        });
        insta::assert_snapshot!(
            command.to_wire().unwrap(),
            @r#"{"execute":{"source":"x <- 1","transactionId":"t1","userInitiated":true,"watchVariables":false}}"#
        );
        assert_eq!(round_trip(&command), command);
    }

    #[test]
    fn test_execute_generates_transaction_ids() {
        let first = SessionCommand::execute("1 + 1");
        let second = SessionCommand::execute("1 + 1");
        assert_ne!(first.transaction_id(), second.transaction_id());
        assert!(Uuid::parse_str(first.transaction_id()).is_ok());
        assert_matches!(first, SessionCommand::Execute(params) => {
            assert!(params.user_initiated);
            assert_eq!(params.environment_id, None);
        });
    }

    #[test]
    fn test_execute_with_caller_transaction() {
        let command = SessionCommand::execute_with("plot(x)", Some(String::from("t42")), false);
        assert_eq!(command.transaction_id(), "t42");
        assert_matches!(&command, SessionCommand::Execute(params) => {
            assert_eq!(params.source, "plot(x)");
            assert!(!params.user_initiated);
        });
        assert_eq!(SessionCommand::from_wire(&command.to_wire().unwrap()).unwrap(), command);

        let command = SessionCommand::execute_with("plot(x)", None, true);
        assert!(Uuid::parse_str(command.transaction_id()).is_ok());

        let params = ExecuteParams::new("ls()")
            .with_transaction_id("t7")
            .with_user_initiated(false)
            .with_environment_id(3);
        assert_eq!(params.transaction_id, "t7");
        assert!(!params.user_initiated);
        assert_eq!(params.environment_id, Some(3));
    }

    #[test]
    fn test_execute_file_line_range() {
        let params = ExecuteFileParams::new(&file(), true).with_line_range(3..=9);
        let command = SessionCommand::ExecuteFile(params);

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["executeFile"]["lineRange"], json!({"lowerBound": 3, "upperBound": 9}));
        assert_eq!(json["executeFile"]["fileVersion"], json!(4));
        assert_eq!(round_trip(&command), command);

        let command = SessionCommand::ExecuteFile(ExecuteFileParams::new(&file(), false));
        let json = serde_json::to_value(&command).unwrap();
        assert!(json["executeFile"].get("lineRange").is_none());
        assert_eq!(round_trip(&command), command);
    }

    #[test]
    fn test_descending_line_range_is_rejected() {
        let document = r#"{"executeFile": {"fileId": 1, "fileVersion": 1, "transactionId": "t",
            "echo": false, "lineRange": {"lowerBound": 9, "upperBound": 3}}}"#;
        assert_matches!(decode::<SessionCommand>(document), Err(Error::Decoding(_)));
    }

    #[test]
    fn test_rename_requires_new_name() {
        let result = FileOperationParams::try_new(1, 1, FileOperation::Rename, None, String::from("t"));
        assert_matches!(result, Err(Error::InvalidCommand(_)));

        let params = FileOperationParams::rename(&file(), "other.R");
        assert_eq!(params.new_name(), Some("other.R"));
        assert_eq!(params.operation(), FileOperation::Rename);
        assert_eq!(params.file_version(), 4);

        let document = r#"{"fileOperation": {"fileId": 1, "fileVersion": 1,
            "operation": "rename", "transactionId": "t"}}"#;
        assert_matches!(decode::<SessionCommand>(document), Err(Error::Decoding(_)));
    }

    #[test]
    fn test_file_operations_round_trip() {
        let remove = FileOperationParams::remove(&file());
        assert_eq!(remove.new_name(), None);
        assert_eq!(remove.file_id(), 21);

        let duplicate = FileOperationParams::duplicate(&file(), Some(String::from("copy.R")));
        assert_eq!(duplicate.operation(), FileOperation::Duplicate);

        for params in [remove, duplicate] {
            let command = SessionCommand::FileOperation(params);
            assert_eq!(round_trip(&command), command);
        }

        let command = SessionCommand::FileOperation(FileOperationParams::remove(&file()));
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["fileOperation"]["operation"], json!("remove"));
        assert!(json["fileOperation"].get("newName").is_none());
    }

    #[test]
    fn test_save_content_is_base64() {
        let params = SaveParams::new(&file(), "x <- 1\n");
        let command = SessionCommand::Save(params);
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["save"]["content"], json!("eCA8LSAxCg=="));
        assert_eq!(round_trip(&command), command);
    }

    #[test]
    fn test_every_command_round_trips() {
        let commands = vec![
            SessionCommand::GetVariable(VariableParams {
                name: String::from("df"),
                environment_id: Some(2),
                transaction_id: String::from("t"),
            }),
            SessionCommand::Help(HelpParams {
                topic: String::from("lm"),
                transaction_id: String::from("t"),
            }),
            SessionCommand::Info(InfoParams {
                topic: String::from("print"),
                transaction_id: String::from("t"),
            }),
            SessionCommand::ClearEnvironment(ClearEnvironmentParams {
                environment_id: 0,
                transaction_id: String::from("t"),
            }),
            SessionCommand::WatchVariables(WatchVariablesParams {
                watch: true,
                environment_id: None,
                transaction_id: String::from("t"),
            }),
            SessionCommand::CreateEnvironment(CreateEnvironmentParams {
                parent_id: 0,
                variable_name: Some(String::from("scratch")),
                transaction_id: String::from("t"),
            }),
            SessionCommand::InitPreview(InitPreviewParams {
                file_id: 5,
                update_identifier: String::from("u1"),
                transaction_id: String::from("t"),
            }),
            SessionCommand::UpdatePreview(UpdatePreviewParams {
                preview_id: 8,
                chunk_id: None,
                include_previous: true,
                update_identifier: String::from("u2"),
                transaction_id: String::from("t"),
            }),
            SessionCommand::RemovePreview(RemovePreviewParams {
                preview_id: 8,
                transaction_id: String::from("t"),
            }),
        ];

        for command in commands {
            assert_eq!(command.transaction_id(), "t");
            assert_eq!(round_trip(&command), command);
        }
    }

    #[test]
    fn test_ambiguous_document_follows_probe_order() {
        // `help` and `info` payloads are interchangeable, `help` is probed first
        let document = r#"{"info": {"topic": "lm", "transactionId": "a"},
            "help": {"topic": "glm", "transactionId": "b"}}"#;
        let command: SessionCommand = decode(document).unwrap();
        assert_matches!(command, SessionCommand::Help(params) => {
            assert_eq!(params.topic, "glm");
        });

        // A malformed `execute` payload falls through to the next key
        let document = r#"{"execute": {"source": 1},
            "removePreview": {"previewId": 2, "transactionId": "c"}}"#;
        let command: SessionCommand = decode(document).unwrap();
        assert_eq!(command.transaction_id(), "c");
    }

    #[test]
    fn test_unknown_command_fails() {
        let result = decode::<SessionCommand>(r#"{"shutdown": {"transactionId": "t"}}"#);
        assert_matches!(result, Err(Error::Decoding(message)) => {
            assert!(message.contains("shutdown"));
        });
    }
}
