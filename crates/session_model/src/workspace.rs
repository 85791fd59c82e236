//
// workspace.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::wire::WireFormat;

/// A set of files sharing one compute session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: i32,
    pub version: i32,
    pub name: String,
    pub user_id: i32,
    pub project_id: i32,
    /// Stable identifier used by the compute engine
    pub unique_id: String,
    #[serde(with = "crate::wire::timestamp")]
    pub last_access: DateTime<Utc>,
    #[serde(with = "crate::wire::timestamp")]
    pub date_created: DateTime<Utc>,
}

impl WireFormat for Workspace {}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_shape() {
        let workspace = Workspace {
            id: 3,
            version: 5,
            name: String::from("default"),
            user_id: 9,
            project_id: 4,
            unique_id: String::from("3e9a6f0c"),
            last_access: Utc.timestamp_millis_opt(1_650_000_000_750).unwrap(),
            date_created: Utc.timestamp_millis_opt(1_600_000_000_000).unwrap(),
        };
        let json = serde_json::to_value(&workspace).unwrap();
        assert_eq!(json["uniqueId"], json!("3e9a6f0c"));
        assert_eq!(json["projectId"], json!(4));
        assert_eq!(json["lastAccess"], json!(1_650_000_000.75));
        assert_eq!(serde_json::from_value::<Workspace>(json).unwrap(), workspace);
    }
}
