//! Vignette triggers - the slot pattern a vignette answers to.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::tags::TagAssignment;

/// Authored wildcard marker.
pub const WILDCARD: &str = "*";

/// One slot of a trigger: a literal value or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriggerValue {
    Any,
    Literal(String),
}

impl TriggerValue {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// True only for a literal equal to `value`; wildcards never count here.
    pub fn is_literal(&self, value: &str) -> bool {
        matches!(self, Self::Literal(v) if v == value)
    }

    /// Does this slot accept the chosen tag?
    pub fn accepts(&self, tag: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Literal(v) => tag == Some(v.as_str()),
        }
    }
}

impl From<&str> for TriggerValue {
    fn from(value: &str) -> Self {
        if value == WILDCARD {
            Self::Any
        } else {
            Self::Literal(value.to_string())
        }
    }
}

impl fmt::Display for TriggerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(WILDCARD),
            Self::Literal(v) => f.write_str(v),
        }
    }
}

impl Serialize for TriggerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TriggerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Slot pattern attached to a vignette.
///
/// A slot that is absent from the map is "don't care": it matches like a
/// wildcard but scores nothing in [`crate::scene::rank_vignettes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trigger(BTreeMap<String, TriggerValue>);

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder accepting `"*"` for a wildcard.
    pub fn with(mut self, slot: impl Into<String>, value: &str) -> Self {
        self.0.insert(slot.into(), TriggerValue::from(value));
        self
    }

    pub fn get(&self, slot: &str) -> Option<&TriggerValue> {
        self.0.get(slot)
    }

    /// Empty, or every authored slot is `*`. Reserved for default vignettes.
    pub fn is_all_wildcard(&self) -> bool {
        self.0.values().all(TriggerValue::is_wildcard)
    }

    /// Every slot in `slots` is absent, wildcard, or equal to the tag.
    pub fn accepts(&self, tags: &TagAssignment, slots: &[String]) -> bool {
        slots.iter().all(|slot| match self.0.get(slot) {
            None => true,
            Some(value) => value.accepts(tags.get(slot)),
        })
    }

    /// Number of slots whose literal value equals the chosen tag.
    pub fn literal_matches(&self, tags: &TagAssignment, slots: &[String]) -> usize {
        slots
            .iter()
            .filter(|slot| match (self.0.get(slot.as_str()), tags.get(slot)) {
                (Some(value), Some(tag)) => value.is_literal(tag),
                _ => false,
            })
            .count()
    }

    /// Number of explicit wildcards sitting on filled slots.
    pub fn wildcard_matches(&self, tags: &TagAssignment, slots: &[String]) -> usize {
        slots
            .iter()
            .filter(|slot| {
                tags.is_filled(slot) && self.0.get(slot.as_str()).is_some_and(|v| v.is_wildcard())
            })
            .count()
    }

    /// Copy with the patterns of two slots exchanged.
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

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
