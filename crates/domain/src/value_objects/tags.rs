//! Tag assignments - the slot values a child picked (or that were pulled from free text).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from slot identifier to the chosen value.
///
/// Ordered so that iteration (and therefore logging and prompt building) is
/// deterministic. Empty values are stored but read back as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagAssignment(BTreeMap<String, String>);

impl TagAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(slot, value);
        self
    }

    pub fn insert(&mut self, slot: impl Into<String>, value: impl Into<String>) {
        self.0.insert(slot.into(), value.into());
    }

    /// The chosen value for `slot`, or `None` when the slot is missing or blank.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0
            .get(slot)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_filled(&self, slot: &str) -> bool {
        self.get(slot).is_some()
    }

    /// Number of slots carrying a non-blank value.
    pub fn filled_count(&self) -> usize {
        self.0.values().filter(|v| !v.trim().is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
    }

    /// Copy with the values of two slots exchanged (missing values move too).
    pub fn swapped(&self, a: &str, b: &str) -> Self {
        let mut map = self.0.clone();
        let va = map.remove(a);
        let vb = map.remove(b);
        if let Some(v) = vb {
            map.insert(a.to_string(), v);
        }
        if let Some(v) = va {
            map.insert(b.to_string(), v);
        }
        Self(map)
    }

    /// `slot=value` pairs joined for log lines and prompts.
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<K, V> FromIterator<(K, V)> for TagAssignment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
