//! Vignette entity - a short authored scene with a trigger, steps and feedback.

use serde::{Deserialize, Serialize};

use super::step::Step;
use crate::value_objects::{QualityGrade, Trigger};

/// Teaching feedback shown after the scene plays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    /// Prompt-writing skill this vignette exercises (e.g. "specificity").
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub tip: String,
    /// "Your vague answer gave X; a specific one would give Y."
    #[serde(
        default,
        alias = "vagueComparison",
        skip_serializing_if = "Option::is_none"
    )]
    pub vague_comparison: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vignette {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Spoken line for the scene; falls back to `description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(alias = "promptScore")]
    pub grade: QualityGrade,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub feedback: Feedback,
}

impl Vignette {
    pub fn new(id: impl Into<String>, grade: QualityGrade) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            narration: None,
            trigger: Trigger::new(),
            grade,
            steps: Vec::new(),
            feedback: Feedback::default(),
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn narration(&self) -> &str {
        self.narration.as_deref().unwrap_or(&self.description)
    }
}
