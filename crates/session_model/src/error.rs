//
// error.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A wire document could not be turned back into a value
    Decoding(String),
    /// A value could not be written as a wire document
    Encoding(String),
    /// A payload violates a shape invariant (e.g. matrix dimensions)
    InvalidValue(String),
    /// A command was constructed with missing mandatory parameters
    InvalidCommand(String),
}

impl Error {
    pub(crate) fn decoding(type_name: &str, message: impl fmt::Display) -> Self {
        Error::Decoding(format!("Can't decode `{type_name}`: {message}"))
    }

    /// Hands the error to serde. Decoding messages are passed through bare
    /// since `wire::decode()` wraps them in `Error::Decoding` again.
    pub(crate) fn into_serde<E: serde::de::Error>(self) -> E {
        match self {
            Error::Decoding(message) => E::custom(message),
            err => E::custom(err),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decoding(message) => {
                write!(f, "Decoding error: {message}")
            },
            Error::Encoding(message) => {
                write!(f, "Encoding error: {message}")
            },
            Error::InvalidValue(message) => {
                write!(f, "Invalid value: {message}")
            },
            Error::InvalidCommand(message) => {
                write!(f, "Invalid command: {message}")
            },
        }
    }
}
