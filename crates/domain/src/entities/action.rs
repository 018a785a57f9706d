//! Authoring-time actions.
//!
//! Vignette authors describe each step as a handful of flat instructions. The
//! `type` tag selects the variant; any tag this build does not know deserializes
//! to [`Action::Unknown`] so newer content never breaks older engines.

use serde::{Deserialize, Serialize};

pub const DEFAULT_POSITION: &str = "center";

fn default_position() -> String {
    DEFAULT_POSITION.to_string()
}

fn default_flash_color() -> String {
    "white".to_string()
}

fn default_shake_intensity() -> f32 {
    0.5
}

fn default_effect_duration() -> f32 {
    0.5
}

/// One visual or audio instruction at authoring granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Bring a character on stage.
    #[serde(alias = "spawn")]
    SpawnCharacter {
        #[serde(alias = "target")]
        character: String,
        #[serde(default = "default_position")]
        position: String,
    },
    /// Bring a prop on stage.
    SpawnProp {
        #[serde(alias = "asset")]
        prop: String,
        #[serde(default = "default_position")]
        position: String,
    },
    Move {
        #[serde(alias = "target")]
        character: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    /// Play an animation verb (resolved to a clip at compile time).
    Animate {
        #[serde(alias = "target")]
        character: String,
        #[serde(alias = "animation")]
        anim: String,
    },
    /// Visual effect at a position.
    React {
        effect: String,
        #[serde(default = "default_position")]
        position: String,
    },
    Emote {
        #[serde(alias = "target")]
        character: String,
        emoji: String,
    },
    Sfx {
        sound: String,
    },
    CameraShake {
        #[serde(default = "default_shake_intensity")]
        intensity: f32,
        #[serde(default = "default_effect_duration")]
        duration: f32,
    },
    CameraZoom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        zoom: f32,
        #[serde(default = "default_effect_duration")]
        duration: f32,
    },
    TextPopup {
        text: String,
        #[serde(default = "default_position")]
        position: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    ScreenFlash {
        #[serde(default = "default_flash_color")]
        color: String,
        #[serde(default = "default_effect_duration")]
        duration: f32,
    },
    CrowdReact {
        reaction: String,
    },
    ParticleRain {
        particle: String,
        #[serde(default = "default_effect_duration")]
        duration: f32,
    },
    Delay {
        seconds: f32,
    },
    Remove {
        target: String,
    },
    /// Forward-compatibility fallback for newer action kinds.
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn spawn_character(character: impl Into<String>, position: impl Into<String>) -> Self {
        Self::SpawnCharacter {
            character: character.into(),
            position: position.into(),
        }
    }

    pub fn spawn_prop(prop: impl Into<String>, position: impl Into<String>) -> Self {
        Self::SpawnProp {
            prop: prop.into(),
            position: position.into(),
        }
    }

    pub fn move_to(character: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Move {
            character: character.into(),
            to: to.into(),
            style: None,
        }
    }

    pub fn animate(character: impl Into<String>, anim: impl Into<String>) -> Self {
        Self::Animate {
            character: character.into(),
            anim: anim.into(),
        }
    }

    pub fn react(effect: impl Into<String>, position: impl Into<String>) -> Self {
        Self::React {
            effect: effect.into(),
            position: position.into(),
        }
    }

    pub fn emote(character: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self::Emote {
            character: character.into(),
            emoji: emoji.into(),
        }
    }

    pub fn sfx(sound: impl Into<String>) -> Self {
        Self::Sfx {
            sound: sound.into(),
        }
    }

    pub fn text_popup(text: impl Into<String>, position: impl Into<String>) -> Self {
        Self::TextPopup {
            text: text.into(),
            position: position.into(),
            style: None,
        }
    }

    pub fn crowd(reaction: impl Into<String>) -> Self {
        Self::CrowdReact {
            reaction: reaction.into(),
        }
    }

    pub fn camera_shake(intensity: f32, duration: f32) -> Self {
        Self::CameraShake {
            intensity,
            duration,
        }
    }

    /// The `type` tag this action was authored with.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::SpawnCharacter { .. } => "spawn_character",
            Self::SpawnProp { .. } => "spawn_prop",
            Self::Move { .. } => "move",
            Self::Animate { .. } => "animate",
            Self::React { .. } => "react",
            Self::Emote { .. } => "emote",
            Self::Sfx { .. } => "sfx",
            Self::CameraShake { .. } => "camera_shake",
            Self::CameraZoom { .. } => "camera_zoom",
            Self::TextPopup { .. } => "text_popup",
            Self::ScreenFlash { .. } => "screen_flash",
            Self::CrowdReact { .. } => "crowd_react",
            Self::ParticleRain { .. } => "particle_rain",
            Self::Delay { .. } => "delay",
            Self::Remove { .. } => "remove",
            Self::Unknown => "unknown",
        }
    }

    /// Name of the character this action spawns, if it is a character spawn.
    pub fn spawned_character(&self) -> Option<&str> {
        match self {
            Self::SpawnCharacter { character, .. } => Some(character),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_spawn_reads_as_character_spawn() {
        let action: Action =
            serde_json::from_str(r#"{"type":"spawn","target":"wizard","position":"left"}"#)
                .unwrap();
        assert_eq!(action, Action::spawn_character("wizard", "left"));
    }

    #[test]
    fn missing_position_defaults_to_center() {
        let action: Action =
            serde_json::from_str(r#"{"type":"react","effect":"sparkle"}"#).unwrap();
        assert_eq!(action, Action::react("sparkle", "center"));
    }

    #[test]
    fn unknown_kind_deserializes_to_unknown() {
        let action: Action =
            serde_json::from_str(r#"{"type":"hologram","target":"robot"}"#).unwrap();
        assert_eq!(action, Action::Unknown);
        assert_eq!(action.kind_name(), "unknown");
    }
}
