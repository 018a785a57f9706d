//! Requests sent by the game UI.

use promptplay_domain::TagAssignment;
use serde::{Deserialize, Serialize};

/// Ask the engine to turn the child's picks into a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Opaque per-tab session key. A newer request on the same session supersedes
    /// any older one still in flight.
    pub session_id: String,
    pub task_id: String,
    #[serde(default)]
    pub tags: TagAssignment,
    /// What the child typed, when the task takes free text instead of tiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
}

impl ResolveRequest {
    pub fn new(session_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            task_id: task_id.into(),
            tags: TagAssignment::new(),
            free_text: None,
        }
    }

    pub fn with_tags(mut self, tags: TagAssignment) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    /// Free text with surrounding whitespace removed; blank counts as absent.
    pub fn free_text(&self) -> Option<&str> {
        self.free_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

fn default_variation_count() -> usize {
    3
}

/// Ask for fresh wordings of tile options or a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationRequest {
    pub task_id: String,
    /// Slot whose options are being reworded, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    /// Current wordings. Returned unchanged (reshuffled) when generation loses the race.
    pub base: Vec<String>,
    #[serde(default = "default_variation_count")]
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_request_defaults_missing_fields() {
        let request: ResolveRequest =
            serde_json::from_str(r#"{"session_id":"tab-1","task_id":"birthday_party"}"#).unwrap();
        assert!(request.tags.is_empty());
        assert_eq!(request.free_text(), None);
    }

    #[test]
    fn blank_free_text_reads_as_absent() {
        let request = ResolveRequest::new("tab-1", "birthday_party").with_free_text("   ");
        assert_eq!(request.free_text(), None);
    }

    #[test]
    fn variation_count_defaults_to_three() {
        let request: VariationRequest =
            serde_json::from_str(r#"{"task_id":"birthday_party","base":["cake"]}"#).unwrap();
        assert_eq!(request.count, 3);
        assert!(request.slot_id.is_none());
    }
}
