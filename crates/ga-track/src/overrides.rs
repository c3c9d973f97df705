//! Per-binding field overrides
//!
//! Values supplied at bind time win over element attributes. Keys are
//! matched case-insensitively against field names.

use crate::{TrackError, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct Overrides {
    values: BTreeMap<String, Value>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object such as `{"category": "Nav", "value": 3}`
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(field.to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(&field.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for Overrides {
    fn from(map: BTreeMap<String, Value>) -> Self {
        let values = map
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self { values }
    }
}

impl From<Overrides> for BTreeMap<String, Value> {
    fn from(overrides: Overrides) -> Self {
        overrides.values
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (k, v) in iter {
            overrides.insert(k.as_ref(), v);
        }
        overrides
    }
}
