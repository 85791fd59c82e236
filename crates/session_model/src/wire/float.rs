//
// float.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

//! Doubles that may be non-finite.
//!
//! JSON numbers can't represent infinities or NaN, so those are written as
//! the string tokens R prints for them. Use with `#[serde(with = "...")]` on
//! a `Vec<f64>`.

use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

pub const POSITIVE_INFINITY: &str = "Inf";
pub const NEGATIVE_INFINITY: &str = "-Inf";
pub const NOT_A_NUMBER: &str = "NaN";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireDouble(pub f64);

impl WireDouble {
    pub fn token(&self) -> Option<&'static str> {
        if self.0.is_nan() {
            Some(NOT_A_NUMBER)
        } else if self.0 == f64::INFINITY {
            Some(POSITIVE_INFINITY)
        } else if self.0 == f64::NEG_INFINITY {
            Some(NEGATIVE_INFINITY)
        } else {
            None
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            POSITIVE_INFINITY => Some(Self(f64::INFINITY)),
            NEGATIVE_INFINITY => Some(Self(f64::NEG_INFINITY)),
            NOT_A_NUMBER => Some(Self(f64::NAN)),
            _ => None,
        }
    }
}

impl Serialize for WireDouble {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.token() {
            Some(token) => serializer.serialize_str(token),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for WireDouble {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Token(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Self(value)),
            Raw::Token(token) => Self::from_token(&token).ok_or_else(|| {
                de::Error::custom(format!("`{token}` is neither a number nor a non-finite token"))
            }),
        }
    }
}

pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|value| WireDouble(*value)))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let values = Vec::<WireDouble>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|value| value.0).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_non_finite_tokens() {
        let values = vec![WireDouble(f64::INFINITY), WireDouble(1.5), WireDouble(f64::NEG_INFINITY)];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json, json!(["Inf", 1.5, "-Inf"]));

        let back: Vec<WireDouble> = serde_json::from_value(json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_nan_token() {
        let json = serde_json::to_string(&WireDouble(f64::NAN)).unwrap();
        assert_eq!(json, "\"NaN\"");

        let back: WireDouble = serde_json::from_str(&json).unwrap();
        assert!(back.0.is_nan());
    }

    #[test]
    fn test_integers_are_doubles() {
        let back: WireDouble = serde_json::from_str("3").unwrap();
        assert_eq!(back, WireDouble(3.0));
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!(serde_json::from_str::<WireDouble>("\"Infinity\"").is_err());
        assert!(serde_json::from_str::<WireDouble>("null").is_err());
    }
}
