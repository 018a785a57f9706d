//! Prompt-writing elements the game teaches, and the analysis flags sent to the UI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The part of a good prompt a slot stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptElement {
    Character,
    Action,
    Sequence,
    Detail,
    Environment,
}

impl PromptElement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Action => "action",
            Self::Sequence => "sequence",
            Self::Detail => "detail",
            Self::Environment => "environment",
        }
    }
}

impl fmt::Display for PromptElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which prompt elements the child supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptAnalysis {
    #[serde(default)]
    pub has_character: bool,
    #[serde(default)]
    pub has_action: bool,
    #[serde(default)]
    pub has_sequence: bool,
    #[serde(default)]
    pub has_detail: bool,
    #[serde(default)]
    pub has_multi_char: bool,
    #[serde(default)]
    pub has_environment: bool,
}

impl PromptAnalysis {
    pub fn mark(&mut self, element: PromptElement) {
        match element {
            PromptElement::Character => self.has_character = true,
            PromptElement::Action => self.has_action = true,
            PromptElement::Sequence => self.has_sequence = true,
            PromptElement::Detail => self.has_detail = true,
            PromptElement::Environment => self.has_environment = true,
        }
    }

    pub fn has(&self, element: PromptElement) -> bool {
        match element {
            PromptElement::Character => self.has_character,
            PromptElement::Action => self.has_action,
            PromptElement::Sequence => self.has_sequence,
            PromptElement::Detail => self.has_detail,
            PromptElement::Environment => self.has_environment,
        }
    }
}
