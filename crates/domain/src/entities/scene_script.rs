//! Scene scripts - the playback contract handed to the renderer.
//!
//! Every [`CompiledAction`] is self-describing: a primitive kind, its resolved
//! fields, and an absolute `delay_ms` from scene start. The renderer needs no other
//! context to play it.

use serde::{Deserialize, Serialize};

use crate::value_objects::{PromptAnalysis, SuccessLevel};

/// Whether a spawn brings on a character or a prop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    #[default]
    Character,
    Prop,
}

/// Renderer primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompiledKind {
    Spawn {
        target: String,
        position: String,
        #[serde(default)]
        asset_kind: SpawnKind,
    },
    Move {
        target: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    Animate {
        target: String,
        clip: String,
    },
    Effect {
        effect: String,
        position: String,
    },
    Emote {
        target: String,
        emoji: String,
    },
    Sound {
        sound: String,
    },
    CameraShake {
        intensity: f32,
        duration_ms: u64,
    },
    CameraZoom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        zoom: f32,
        duration_ms: u64,
    },
    Text {
        text: String,
        position: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    Flash {
        color: String,
        duration_ms: u64,
    },
    Crowd {
        reaction: String,
    },
    Particles {
        particle: String,
        duration_ms: u64,
    },
    Wait {
        duration_ms: u64,
    },
    Remove {
        target: String,
    },
}

/// A primitive with its absolute start offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledAction {
    #[serde(flatten)]
    pub kind: CompiledKind,
    #[serde(default)]
    pub delay_ms: u64,
}

impl CompiledAction {
    pub fn new(kind: CompiledKind, delay_ms: u64) -> Self {
        Self { kind, delay_ms }
    }
}

/// Resolver output: what to play, what to say, and how to coach the child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneScript {
    pub success_level: SuccessLevel,
    #[serde(default)]
    pub narration: String,
    pub actions: Vec<CompiledAction>,
    #[serde(default)]
    pub prompt_feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_analysis: Option<PromptAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_elements: Option<Vec<String>>,
}

impl SceneScript {
    pub fn new(success_level: SuccessLevel, actions: Vec<CompiledAction>) -> Self {
        Self {
            success_level,
            narration: String::new(),
            actions,
            prompt_feedback: String::new(),
            guide_hint: None,
            prompt_analysis: None,
            missing_elements: None,
        }
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = narration.into();
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.prompt_feedback = feedback.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.guide_hint = Some(hint.into());
        self
    }

    /// Offset of the last action, i.e. when the final beat starts.
    pub fn last_cue_ms(&self) -> u64 {
        self.actions.iter().map(|a| a.delay_ms).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_action_is_flat_on_the_wire() {
        let action = CompiledAction::new(
            CompiledKind::Spawn {
                target: "wizard".into(),
                position: "left".into(),
                asset_kind: SpawnKind::Character,
            },
            1500,
        );
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "spawn");
        assert_eq!(value["target"], "wizard");
        assert_eq!(value["delay_ms"], 1500);
    }

    #[test]
    fn script_parses_generated_shape() {
        let script: SceneScript = serde_json::from_str(
            r#"{
                "success_level": "PARTIAL_SUCCESS",
                "narration": "The cat juggles cake.",
                "actions": [
                    {"type": "spawn", "target": "cat", "position": "center", "delay_ms": 0},
                    {"type": "sound", "sound": "pop", "delay_ms": 500}
                ],
                "prompt_feedback": "Nice!",
                "missing_elements": ["environment"]
            }"#,
        )
        .unwrap();
        assert_eq!(script.success_level, SuccessLevel::PartialSuccess);
        assert_eq!(script.actions.len(), 2);
        assert_eq!(script.last_cue_ms(), 500);
        assert!(script.guide_hint.is_none());
    }
}
