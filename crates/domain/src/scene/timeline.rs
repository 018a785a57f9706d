//! Timeline compilation - nested steps to a flat list with absolute delays.

use std::collections::HashMap;

use crate::entities::{secs_to_ms, Action, CompiledAction, CompiledKind, SpawnKind, Step};

/// Maps authored animation verbs to renderer clip names.
///
/// Lookup is case-insensitive; unknown verbs pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationTable {
    clips: HashMap<String, String>,
}

impl AnimationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verb table shipped with the built-in character rigs.
    pub fn standard() -> Self {
        Self::new()
            .with("cheer", "celebrate")
            .with("celebrate", "celebrate")
            .with("dance", "dance_loop")
            .with("wave", "wave_hand")
            .with("jump", "jump")
            .with("sad", "cry")
            .with("cry", "cry")
            .with("confused", "head_scratch")
            .with("laugh", "laugh")
            .with("spin", "spin")
            .with("fall", "fall_over")
    }

    pub fn with(mut self, verb: impl Into<String>, clip: impl Into<String>) -> Self {
        self.clips
            .insert(verb.into().to_lowercase(), clip.into());
        self
    }

    pub fn resolve(&self, verb: &str) -> String {
        self.clips
            .get(&verb.to_lowercase())
            .cloned()
            .unwrap_or_else(|| verb.to_string())
    }
}

/// Flattens steps into renderer actions against an animation table.
#[derive(Debug, Clone)]
pub struct TimelineCompiler {
    animations: AnimationTable,
}

impl Default for TimelineCompiler {
    fn default() -> Self {
        Self::new(AnimationTable::standard())
    }
}

impl TimelineCompiler {
    pub fn new(animations: AnimationTable) -> Self {
        Self { animations }
    }

    /// Every action in a step shares the step's start offset; the offset then
    /// advances by the step's hold. Unknown actions are dropped.
    pub fn compile(&self, steps: &[Step]) -> Vec<CompiledAction> {
        let mut out = Vec::new();
        let mut cursor_ms: u64 = 0;
        for step in steps {
            out.extend(
                step.actions
                    .iter()
                    .filter_map(|a| self.compile_action(a))
                    .map(|kind| CompiledAction::new(kind, cursor_ms)),
            );
            cursor_ms = cursor_ms.saturating_add(step.hold_ms());
        }
        out
    }

    fn compile_action(&self, action: &Action) -> Option<CompiledKind> {
        let kind = match action {
            Action::SpawnCharacter {
                character,
                position,
            } => CompiledKind::Spawn {
                target: character.clone(),
                position: position.clone(),
                asset_kind: SpawnKind::Character,
            },
            Action::SpawnProp { prop, position } => CompiledKind::Spawn {
                target: prop.clone(),
                position: position.clone(),
                asset_kind: SpawnKind::Prop,
            },
            Action::Move {
                character,
                to,
                style,
            } => CompiledKind::Move {
                target: character.clone(),
                to: to.clone(),
                style: style.clone(),
            },
            Action::Animate { character, anim } => CompiledKind::Animate {
                target: character.clone(),
                clip: self.animations.resolve(anim),
            },
            Action::React { effect, position } => CompiledKind::Effect {
                effect: effect.clone(),
                position: position.clone(),
            },
            Action::Emote { character, emoji } => CompiledKind::Emote {
                target: character.clone(),
                emoji: emoji.clone(),
            },
            Action::Sfx { sound } => CompiledKind::Sound {
                sound: sound.clone(),
            },
            Action::CameraShake {
                intensity,
                duration,
            } => CompiledKind::CameraShake {
                intensity: *intensity,
                duration_ms: secs_to_ms(*duration),
            },
            Action::CameraZoom {
                target,
                zoom,
                duration,
            } => CompiledKind::CameraZoom {
                target: target.clone(),
                zoom: *zoom,
                duration_ms: secs_to_ms(*duration),
            },
            Action::TextPopup {
                text,
                position,
                style,
            } => CompiledKind::Text {
                text: text.clone(),
                position: position.clone(),
                style: style.clone(),
            },
            Action::ScreenFlash { color, duration } => CompiledKind::Flash {
                color: color.clone(),
                duration_ms: secs_to_ms(*duration),
            },
            Action::CrowdReact { reaction } => CompiledKind::Crowd {
                reaction: reaction.clone(),
            },
            Action::ParticleRain { particle, duration } => CompiledKind::Particles {
                particle: particle.clone(),
                duration_ms: secs_to_ms(*duration),
            },
            Action::Delay { seconds } => CompiledKind::Wait {
                duration_ms: secs_to_ms(*seconds),
            },
            Action::Remove { target } => CompiledKind::Remove {
                target: target.clone(),
            },
            Action::Unknown => return None,
        };
        Some(kind)
    }
}

/// Compile with the standard animation table.
pub fn compile_steps(steps: &[Step]) -> Vec<CompiledAction> {
    TimelineCompiler::default().compile(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_accumulate_per_step() {
        let steps = vec![
            Step::new(vec![Action::sfx("a"), Action::sfx("b")]).hold(1.0),
            Step::new(vec![Action::sfx("c")]),
            Step::new(vec![Action::sfx("d")]).hold(0.25),
            Step::new(vec![Action::sfx("e")]),
        ];
        let delays: Vec<u64> = compile_steps(&steps).iter().map(|a| a.delay_ms).collect();
        assert_eq!(delays, vec![0, 0, 1000, 1500, 1750]);
    }

    #[test]
    fn negative_hold_clamps_to_zero() {
        let steps = vec![
            Step::new(vec![Action::sfx("a")]).hold(-2.0),
            Step::new(vec![Action::sfx("b")]),
        ];
        let delays: Vec<u64> = compile_steps(&steps).iter().map(|a| a.delay_ms).collect();
        assert_eq!(delays, vec![0, 0]);
    }

    #[test]
    fn huge_holds_saturate_instead_of_overflowing() {
        let steps = vec![
            Step::new(vec![Action::sfx("a")]).hold(f32::MAX),
            Step::new(vec![Action::sfx("b")]).hold(f32::MAX),
            Step::new(vec![Action::sfx("c")]),
        ];
        let delays: Vec<u64> = compile_steps(&steps).iter().map(|a| a.delay_ms).collect();
        assert_eq!(delays, vec![0, u64::MAX, u64::MAX]);
    }

    #[test]
    fn unknown_actions_are_dropped() {
        let steps = vec![
            Step::new(vec![Action::Unknown, Action::sfx("pop")]),
            Step::new(vec![Action::Unknown]),
            Step::new(vec![Action::sfx("bang")]),
        ];
        let compiled = compile_steps(&steps);
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled[1].delay_ms, 1000);
    }

    #[test]
    fn empty_steps_compile_to_nothing() {
        assert!(compile_steps(&[]).is_empty());
        assert!(compile_steps(&[Step::default()]).is_empty());
    }

    #[test]
    fn animation_verbs_resolve_through_table() {
        let compiled = compile_steps(&[Step::new(vec![
            Action::animate("cat", "Dance"),
            Action::animate("cat", "backflip"),
        ])]);
        let clips: Vec<&str> = compiled
            .iter()
            .filter_map(|a| match &a.kind {
                CompiledKind::Animate { clip, .. } => Some(clip.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(clips, vec!["dance_loop", "backflip"]);
    }

    #[test]
    fn custom_table_overrides_standard() {
        let compiler = TimelineCompiler::new(AnimationTable::new().with("dance", "robot"));
        let compiled = compiler.compile(&[Step::new(vec![Action::animate("cat", "dance")])]);
        assert!(matches!(
            &compiled[0].kind,
            CompiledKind::Animate { clip, .. } if clip == "robot"
        ));
    }

    #[test]
    fn prop_spawns_are_tagged_as_props() {
        let compiled = compile_steps(&[Step::new(vec![Action::spawn_prop("cake", "left")])]);
        assert_eq!(
            compiled[0].kind,
            CompiledKind::Spawn {
                target: "cake".into(),
                position: "left".into(),
                asset_kind: SpawnKind::Prop,
            }
        );
    }
}
