//
// line_range.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

//! Optional inclusive line ranges, written as
//! `{"lowerBound": 1, "upperBound": 10}`.

use std::ops::RangeInclusive;

use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRange {
    lower_bound: i32,
    upper_bound: i32,
}

pub fn serialize<S: Serializer>(
    range: &Option<RangeInclusive<i32>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    range
        .as_ref()
        .map(|range| WireRange {
            lower_bound: *range.start(),
            upper_bound: *range.end(),
        })
        .serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RangeInclusive<i32>>, D::Error> {
    let Some(range) = Option::<WireRange>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if range.lower_bound > range.upper_bound {
        return Err(de::Error::custom(format!(
            "Line range {}..={} is descending",
            range.lower_bound, range.upper_bound
        )));
    }

    Ok(Some(range.lower_bound..=range.upper_bound))
}
