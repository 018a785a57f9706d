//! Stage entity - the local vignette library for one task.
//!
//! A stage names its tag slots (in template order), optionally pairs two of them as
//! an order-independent combo, and holds every vignette plus the catch-all default.
//!
//! # Invariants (checked by [`Stage::validate`] at load time)
//!
//! - The default vignette's trigger is empty or all `*`, and it has at least one step
//! - Slot ids are unique and non-empty
//! - Vignette ids are unique across the stage, default included
//! - Combo and mood slots refer to template slots

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::vignette::Vignette;
use crate::error::DomainError;
use crate::scene::SlotTemplate;
use crate::value_objects::PromptElement;

/// One selectable value of a slot, with the words that pick it out of free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOption {
    pub value: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub id: String,
    pub element: PromptElement,
    #[serde(default)]
    pub options: Vec<SlotOption>,
}

impl SlotSpec {
    pub fn new(id: impl Into<String>, element: PromptElement) -> Self {
        Self {
            id: id.into(),
            element,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, value: impl Into<String>, keywords: &[&str]) -> Self {
        self.options.push(SlotOption {
            value: value.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(alias = "taskId")]
    pub task_id: String,
    #[serde(default)]
    pub title: String,
    pub slots: Vec<SlotSpec>,
    /// Two slots whose values are interchangeable for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo: Option<(String, String)>,
    /// Slot used for "just the vibe" matches; defaults to the last template slot.
    #[serde(default, alias = "moodSlot", skip_serializing_if = "Option::is_none")]
    pub mood_slot: Option<String>,
    #[serde(default)]
    pub vignettes: Vec<Vignette>,
    #[serde(alias = "defaultVignette")]
    pub default_vignette: Vignette,
}

impl Stage {
    pub fn template(&self) -> SlotTemplate {
        let mut template = SlotTemplate::new(self.slots.iter().map(|s| s.id.clone()).collect());
        if let Some((a, b)) = &self.combo {
            template = template.with_combo(a.clone(), b.clone());
        }
        if let Some(mood) = &self.mood_slot {
            template = template.with_mood_slot(mood.clone());
        }
        template
    }

    pub fn slot(&self, id: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn vignette(&self, id: &str) -> Option<&Vignette> {
        if self.default_vignette.id == id {
            return Some(&self.default_vignette);
        }
        self.vignettes.iter().find(|v| v.id == id)
    }

    /// Check the authoring contract. A failure here is a content defect.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.task_id.trim().is_empty() {
            return Err(DomainError::validation("stage task_id cannot be empty"));
        }
        if self.slots.is_empty() {
            return Err(DomainError::validation(format!(
                "stage '{}' declares no slots",
                self.task_id
            )));
        }

        let mut slot_ids = HashSet::new();
        for slot in &self.slots {
            if slot.id.trim().is_empty() || !slot_ids.insert(slot.id.as_str()) {
                return Err(DomainError::validation(format!(
                    "stage '{}' has an empty or duplicate slot id '{}'",
                    self.task_id, slot.id
                )));
            }
        }

        if !self.default_vignette.trigger.is_all_wildcard() {
            return Err(DomainError::validation(format!(
                "default vignette '{}' of stage '{}' must have an all-wildcard trigger",
                self.default_vignette.id, self.task_id
            )));
        }
        if self.default_vignette.steps.is_empty() {
            return Err(DomainError::validation(format!(
                "default vignette '{}' of stage '{}' has no steps",
                self.default_vignette.id, self.task_id
            )));
        }

        let mut vignette_ids = HashSet::new();
        for vignette in self.vignettes.iter().chain(std::iter::once(&self.default_vignette)) {
            if !vignette_ids.insert(vignette.id.as_str()) {
                return Err(DomainError::validation(format!(
                    "stage '{}' has duplicate vignette id '{}'",
                    self.task_id, vignette.id
                )));
            }
            if let Some(unknown) = vignette.trigger.slots().find(|slot| !slot_ids.contains(slot)) {
                return Err(DomainError::validation(format!(
                    "vignette '{}' of stage '{}' triggers on unknown slot '{unknown}'",
                    vignette.id, self.task_id
                )));
            }
        }

        if let Some((a, b)) = &self.combo {
            if a == b || !slot_ids.contains(a.as_str()) || !slot_ids.contains(b.as_str()) {
                return Err(DomainError::validation(format!(
                    "stage '{}' combo ({a}, {b}) must name two distinct template slots",
                    self.task_id
                )));
            }
        }
        if let Some(mood) = &self.mood_slot {
            if !slot_ids.contains(mood.as_str()) {
                return Err(DomainError::validation(format!(
                    "stage '{}' mood slot '{mood}' is not a template slot",
                    self.task_id
                )));
            }
        }

        Ok(())
    }
}
