//
// session_error.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::error::Error;
use crate::wire::keyed::decode_keyed;
use crate::wire::keyed::encode_keyed;
use crate::wire::keyed::flag;
use crate::wire::keyed::probe;
use crate::wire::keyed::Probe;
use crate::wire::WireFormat;

/// An error reported to a client, over REST or the session channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionError {
    Unknown,
    FileNotFound,
    /// The file or workspace changed since the client last saw it
    FileVersionMismatch,
    DatabaseUpdateFailed,
    FailedToConnectToCompute,
    ComputeConnectionClosed,
    InvalidRequest,
    InvalidLogin,
    PermissionDenied,
    Encoding(String),
    Decoding(String),
    /// More than one object matched
    Duplicate,
    /// The compute engine reported an error
    Compute(ComputeError),
}

/// Details of an error raised by the compute engine.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeError {
    pub code: SessionErrorCode,
    pub details: Option<String>,
    /// The command that caused the error, when known
    pub transaction_id: Option<String>,
}

impl ComputeError {
    pub fn new(code: SessionErrorCode) -> Self {
        Self {
            code,
            details: None,
            transaction_id: None,
        }
    }
}

/// Error codes reported by the compute engine.
///
/// The engine may know more codes than this client. Those decode to
/// `Unknown`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(from = "i32", into = "i32")]
#[strum(serialize_all = "camelCase")]
pub enum SessionErrorCode {
    Unknown,
    InvalidRequest,
    UnknownCommand,
    InvalidArguments,
    FileNotFound,
    PermissionDenied,
    ParseError,
    EvaluationError,
    EnvironmentNotFound,
    VariableNotFound,
    PreviewNotFound,
    ChunkNotFound,
    ComputeBusy,
}

impl SessionErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            SessionErrorCode::Unknown => 0,
            SessionErrorCode::InvalidRequest => 100,
            SessionErrorCode::UnknownCommand => 101,
            SessionErrorCode::InvalidArguments => 102,
            SessionErrorCode::FileNotFound => 103,
            SessionErrorCode::PermissionDenied => 104,
            SessionErrorCode::ParseError => 105,
            SessionErrorCode::EvaluationError => 106,
            SessionErrorCode::EnvironmentNotFound => 107,
            SessionErrorCode::VariableNotFound => 108,
            SessionErrorCode::PreviewNotFound => 109,
            SessionErrorCode::ChunkNotFound => 110,
            SessionErrorCode::ComputeBusy => 111,
        }
    }
}

impl From<i32> for SessionErrorCode {
    fn from(code: i32) -> Self {
        match code {
            0 => SessionErrorCode::Unknown,
            100 => SessionErrorCode::InvalidRequest,
            101 => SessionErrorCode::UnknownCommand,
            102 => SessionErrorCode::InvalidArguments,
            103 => SessionErrorCode::FileNotFound,
            104 => SessionErrorCode::PermissionDenied,
            105 => SessionErrorCode::ParseError,
            106 => SessionErrorCode::EvaluationError,
            107 => SessionErrorCode::EnvironmentNotFound,
            108 => SessionErrorCode::VariableNotFound,
            109 => SessionErrorCode::PreviewNotFound,
            110 => SessionErrorCode::ChunkNotFound,
            111 => SessionErrorCode::ComputeBusy,
            other => {
                log::warn!("Unrecognized compute error code {other}, treating as unknown");
                SessionErrorCode::Unknown
            },
        }
    }
}

impl From<SessionErrorCode> for i32 {
    fn from(code: SessionErrorCode) -> Self {
        code.code()
    }
}

const PROBE_ORDER: &[(&str, Probe<SessionError>)] = &[
    ("unknown", |v| flag(v, SessionError::Unknown)),
    ("fileNotFound", |v| flag(v, SessionError::FileNotFound)),
    ("fileVersionMismatch", |v| flag(v, SessionError::FileVersionMismatch)),
    ("databaseUpdateFailed", |v| flag(v, SessionError::DatabaseUpdateFailed)),
    ("failedToConnectToCompute", |v| flag(v, SessionError::FailedToConnectToCompute)),
    ("computeConnectionClosed", |v| flag(v, SessionError::ComputeConnectionClosed)),
    ("invalidRequest", |v| flag(v, SessionError::InvalidRequest)),
    ("invalidLogin", |v| flag(v, SessionError::InvalidLogin)),
    ("permissionDenied", |v| flag(v, SessionError::PermissionDenied)),
    ("duplicate", |v| flag(v, SessionError::Duplicate)),
    ("compute", |v| probe(v).map(SessionError::Compute)),
    ("encoding", |v| probe(v).map(SessionError::Encoding)),
    ("decoding", |v| probe(v).map(SessionError::Decoding)),
];

impl Serialize for SessionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SessionError::Unknown => encode_keyed(serializer, "unknown", &true),
            SessionError::FileNotFound => encode_keyed(serializer, "fileNotFound", &true),
            SessionError::FileVersionMismatch => {
                encode_keyed(serializer, "fileVersionMismatch", &true)
            },
            SessionError::DatabaseUpdateFailed => {
                encode_keyed(serializer, "databaseUpdateFailed", &true)
            },
            SessionError::FailedToConnectToCompute => {
                encode_keyed(serializer, "failedToConnectToCompute", &true)
            },
            SessionError::ComputeConnectionClosed => {
                encode_keyed(serializer, "computeConnectionClosed", &true)
            },
            SessionError::InvalidRequest => encode_keyed(serializer, "invalidRequest", &true),
            SessionError::InvalidLogin => encode_keyed(serializer, "invalidLogin", &true),
            SessionError::PermissionDenied => encode_keyed(serializer, "permissionDenied", &true),
            SessionError::Encoding(message) => encode_keyed(serializer, "encoding", message),
            SessionError::Decoding(message) => encode_keyed(serializer, "decoding", message),
            SessionError::Duplicate => encode_keyed(serializer, "duplicate", &true),
            SessionError::Compute(error) => encode_keyed(serializer, "compute", error),
        }
    }
}

impl<'de> Deserialize<'de> for SessionError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_keyed("SessionError", &value, PROBE_ORDER).map_err(Error::into_serde)
    }
}

impl WireFormat for SessionError {}

impl std::error::Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Unknown => write!(f, "unknown error"),
            SessionError::FileNotFound => write!(f, "file not found"),
            SessionError::FileVersionMismatch => {
                write!(f, "file has been changed by another session")
            },
            SessionError::DatabaseUpdateFailed => write!(f, "failed to update database"),
            SessionError::FailedToConnectToCompute => {
                write!(f, "failed to open connection to compute engine")
            },
            SessionError::ComputeConnectionClosed => {
                write!(f, "connection to compute engine unexpectedly closed")
            },
            SessionError::InvalidRequest => write!(f, "invalid request"),
            SessionError::InvalidLogin => write!(f, "invalid login or password"),
            SessionError::PermissionDenied => write!(f, "permission denied"),
            SessionError::Encoding(message) => write!(f, "error encoding object: {message}"),
            SessionError::Decoding(message) => write!(f, "error decoding object: {message}"),
            SessionError::Duplicate => write!(f, "that object already exists"),
            SessionError::Compute(error) => match &error.details {
                Some(details) => write!(f, "compute error ({}): {details}", error.code),
                None => write!(f, "compute error ({})", error.code),
            },
        }
    }
}

impl From<Error> for SessionError {
    fn from(err: Error) -> Self {
        match err {
            Error::Decoding(message) => SessionError::Decoding(message),
            Error::Encoding(message) => SessionError::Encoding(message),
            Error::InvalidValue(_) | Error::InvalidCommand(_) => SessionError::InvalidRequest,
        }
    }
}

/// An error along with a description of what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedError {
    pub error: SessionError,
    pub details: String,
}

impl DetailedError {
    pub fn new(error: SessionError, details: impl Into<String>) -> Self {
        Self {
            error,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::wire::decode;

    fn round_trip(error: &SessionError) -> SessionError {
        SessionError::from_wire(&error.to_wire().unwrap()).unwrap()
    }

    #[test]
    fn test_unit_variants() {
        assert_eq!(
            SessionError::FileNotFound.to_wire().unwrap(),
            r#"{"fileNotFound":true}"#
        );

        for error in [
            SessionError::Unknown,
            SessionError::FileNotFound,
            SessionError::FileVersionMismatch,
            SessionError::DatabaseUpdateFailed,
            SessionError::FailedToConnectToCompute,
            SessionError::ComputeConnectionClosed,
            SessionError::InvalidRequest,
            SessionError::InvalidLogin,
            SessionError::PermissionDenied,
            SessionError::Duplicate,
        ] {
            assert_eq!(round_trip(&error), error);
        }
    }

    #[test]
    fn test_compute_error() {
        let error = SessionError::Compute(ComputeError {
            code: SessionErrorCode::ParseError,
            details: Some(String::from("unexpected symbol")),
            transaction_id: Some(String::from("t1")),
        });
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            json!({"compute": {"code": 105, "details": "unexpected symbol", "transactionId": "t1"}})
        );
        assert_eq!(round_trip(&error), error);

        let error = SessionError::Compute(ComputeError::new(SessionErrorCode::ComputeBusy));
        assert_eq!(error.to_wire().unwrap(), r#"{"compute":{"code":111}}"#);
        assert_eq!(round_trip(&error), error);
    }

    #[test]
    fn test_unknown_code_decodes_to_sentinel() {
        let error: SessionError = decode(r#"{"compute": {"code": 4242}}"#).unwrap();
        assert_eq!(
            error,
            SessionError::Compute(ComputeError::new(SessionErrorCode::Unknown))
        );
        assert_eq!(SessionErrorCode::from(-1), SessionErrorCode::Unknown);
    }

    #[test]
    fn test_codes_are_stable() {
        for code in 100..=111 {
            assert_eq!(SessionErrorCode::from(code).code(), code);
        }
        assert_eq!(SessionErrorCode::EvaluationError.to_string(), "evaluationError");
    }

    #[test]
    fn test_messages_round_trip() {
        let error = SessionError::Decoding(String::from("bad json"));
        assert_eq!(round_trip(&error), error);
        let error = SessionError::Encoding(String::new());
        assert_eq!(round_trip(&error), error);
    }

    #[test]
    fn test_ambiguous_document_follows_probe_order() {
        // Both are structurally valid, `duplicate` is probed before `compute`
        let error: SessionError = decode(r#"{"compute": {"code": 105}, "duplicate": true}"#).unwrap();
        assert_eq!(error, SessionError::Duplicate);

        let error: SessionError = decode(r#"{"permissionDenied": true, "fileNotFound": true}"#).unwrap();
        assert_eq!(error, SessionError::FileNotFound);

        // `compute` needs an object, so the next valid key is used
        let error: SessionError = decode(r#"{"compute": true, "decoding": "oops"}"#).unwrap();
        assert_eq!(error, SessionError::Decoding(String::from("oops")));

        // Unit variants accept any boolean
        let error: SessionError = decode(r#"{"invalidLogin": false}"#).unwrap();
        assert_eq!(error, SessionError::InvalidLogin);
    }

    #[test]
    fn test_unknown_key_fails() {
        assert!(matches!(
            decode::<SessionError>(r#"{"timeout": true}"#),
            Err(Error::Decoding(_))
        ));
        assert!(matches!(
            decode::<SessionError>(r#"{"fileNotFound": "yes"}"#),
            Err(Error::Decoding(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionError::InvalidLogin.to_string(), "invalid login or password");
        let error = SessionError::Compute(ComputeError {
            code: SessionErrorCode::VariableNotFound,
            details: Some(String::from("object 'x' not found")),
            transaction_id: None,
        });
        insta::assert_snapshot!(error.to_string(), @"compute error (variableNotFound): object 'x' not found");
    }

    #[test]
    fn test_hashing() {
        let mut errors = HashSet::new();
        errors.insert(SessionError::FileNotFound);
        errors.insert(SessionError::FileNotFound);
        errors.insert(SessionError::Compute(ComputeError::new(SessionErrorCode::ParseError)));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_from_codec_error() {
        let error = SessionError::from(Error::Decoding(String::from("truncated")));
        assert_eq!(error, SessionError::Decoding(String::from("truncated")));

        let error = SessionError::from(Error::InvalidCommand(String::from("rename")));
        assert_eq!(error, SessionError::InvalidRequest);
    }

    #[test]
    fn test_detailed_error() {
        let error = DetailedError::new(SessionError::PermissionDenied, "workspace is read-only");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            json!({"error": {"permissionDenied": true}, "details": "workspace is read-only"})
        );
        assert_eq!(serde_json::from_value::<DetailedError>(json).unwrap(), error);
    }
}
