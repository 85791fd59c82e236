//
// file_operation.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use serde::Deserialize;
use serde::Serialize;

/// Operations a client can request on a workspace file
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
pub enum FileOperation {
    Remove,
    Rename,
    Duplicate,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&FileOperation::Rename).unwrap(), "\"rename\"");
        assert_eq!(
            serde_json::from_str::<FileOperation>("\"duplicate\"").unwrap(),
            FileOperation::Duplicate
        );
        assert_eq!(FileOperation::Remove.to_string(), "remove");
        assert_eq!(FileOperation::from_str("rename").unwrap(), FileOperation::Rename);
        assert!(serde_json::from_str::<FileOperation>("\"move\"").is_err());
    }
}
