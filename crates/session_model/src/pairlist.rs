//
// pairlist.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::ops::Index;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::variable::Variable;
use crate::variable_type::decode_pairlist;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RPair {
    pub key: String,
    pub value: Variable,
}

impl RPair {
    pub fn new(key: impl Into<String>, value: Variable) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// An R pairlist: an association list where names may repeat.
///
/// Insertion order is kept and name lookups return the first match, so a
/// later pair with a duplicated name is only reachable by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RPairList {
    pairs: Vec<RPair>,
}

impl RPairList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: RPair) {
        self.pairs.push(pair);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Value of the first pair named `key`.
    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| &pair.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RPair> {
        self.pairs.iter()
    }
}

impl From<Vec<RPair>> for RPairList {
    fn from(pairs: Vec<RPair>) -> Self {
        Self { pairs }
    }
}

impl FromIterator<RPair> for RPairList {
    fn from_iter<I: IntoIterator<Item = RPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Panics when `index >= len()`. Check the length first.
impl Index<usize> for RPairList {
    type Output = RPair;

    fn index(&self, index: usize) -> &Self::Output {
        let len = self.pairs.len();
        match self.pairs.get(index) {
            Some(pair) => pair,
            None => panic!("Pairlist index {index} out of bounds (length {len})"),
        }
    }
}

impl<'a> IntoIterator for &'a RPairList {
    type Item = &'a RPair;
    type IntoIter = std::slice::Iter<'a, RPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl<'de> Deserialize<'de> for RPairList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_pairlist(&value, 0).map_err(Error::into_serde)
    }
}
