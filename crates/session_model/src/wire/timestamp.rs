//
// timestamp.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

//! Timestamps travel as fractional seconds since the Unix epoch. Resolution
//! is one microsecond; anything finer is dropped on encode.

use chrono::DateTime;
use chrono::Utc;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serializer;

pub fn to_seconds(time: &DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}

pub fn from_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round();
    DateTime::from_timestamp_micros(micros as i64)
}

pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(to_seconds(time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let seconds = f64::deserialize(deserializer)?;
    from_seconds(seconds)
        .ok_or_else(|| de::Error::custom(format!("{seconds} is not a representable timestamp")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_milliseconds_survive() {
        let time = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let seconds = to_seconds(&time);
        assert_eq!(seconds, 1_700_000_000.123);
        assert_eq!(from_seconds(seconds), Some(time));
    }

    #[test]
    fn test_before_epoch() {
        let time = Utc.timestamp_millis_opt(-86_400_250).unwrap();
        assert_eq!(from_seconds(to_seconds(&time)), Some(time));
    }

    #[test]
    fn test_non_finite_seconds_are_rejected() {
        assert_eq!(from_seconds(f64::NAN), None);
        assert_eq!(from_seconds(f64::INFINITY), None);
    }
}
