//
// user.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::wire::WireFormat;

/// An account on the server.
///
/// The password hash only lives server side. It is never written to the
/// wire and is absent from anything decoded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub version: i32,
    pub login: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "enabled_by_default")]
    pub is_enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl User {
    pub fn new(id: i32, login: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            version: 1,
            login: login.into(),
            password_hash: None,
            first_name: None,
            last_name: None,
            email: email.into(),
            is_admin: false,
            is_enabled: true,
        }
    }

    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.clone()),
            (None, None) => None,
        }
    }
}

// Keeps the password hash out of logs
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("login", &self.login)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .field("is_enabled", &self.is_enabled)
            .finish_non_exhaustive()
    }
}

impl WireFormat for User {}
