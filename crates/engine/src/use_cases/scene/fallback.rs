//! Fallback tier - canned scripts that always play.
//!
//! Used when the live tier is off or failed and the library has nothing for the
//! request. Unknown task ids get the default task's script.

use std::collections::HashMap;

use promptplay_domain::{compile_steps, Action, SceneScript, Step, SuccessLevel};

pub const DEFAULT_FALLBACK_TASK: &str = "birthday_party";

pub struct FallbackCatalogue {
    scripts: HashMap<&'static str, SceneScript>,
}

impl Default for FallbackCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCatalogue {
    pub fn new() -> Self {
        let scripts = HashMap::from([
            (DEFAULT_FALLBACK_TASK, birthday_party()),
            ("space_adventure", space_adventure()),
            ("underwater_show", underwater_show()),
        ]);
        Self { scripts }
    }

    pub fn has_task(&self, task_id: &str) -> bool {
        self.scripts.contains_key(task_id)
    }

    /// Script for `task_id`, or the default task's script.
    pub fn script_for(&self, task_id: &str) -> SceneScript {
        self.scripts
            .get(task_id)
            .or_else(|| self.scripts.get(DEFAULT_FALLBACK_TASK))
            .cloned()
            .unwrap_or_else(birthday_party)
    }
}

fn script(narration: &str, feedback: &str, hint: &str, steps: Vec<Step>) -> SceneScript {
    SceneScript::new(SuccessLevel::PartialSuccess, compile_steps(&steps))
        .with_narration(narration)
        .with_feedback(feedback)
        .with_hint(hint)
}

fn birthday_party() -> SceneScript {
    script(
        "The party guests arrive, but nobody is sure what happens next.",
        "The party started! Tell it more about the food and the fun.",
        "Try picking a food, a show and a vibe.",
        vec![
            Step::new(vec![
                Action::spawn_character("kid", "left"),
                Action::spawn_character("friend", "right"),
            ])
            .hold(0.8),
            Step::new(vec![Action::spawn_prop("balloons", "center"), Action::sfx("pop")]),
            Step::new(vec![
                Action::emote("kid", "🤔"),
                Action::emote("friend", "🤷"),
            ])
            .hold(0.8),
            Step::new(vec![Action::animate("kid", "wave"), Action::crowd("murmur")]),
            Step::new(vec![
                Action::react("confetti", "center"),
                Action::text_popup("Party time?", "top"),
            ])
            .hold(1.0),
        ],
    )
}

fn space_adventure() -> SceneScript {
    script(
        "A rocket wobbles on the launch pad, waiting for a mission.",
        "Blast off! Say where the rocket should go and who is flying it.",
        "Try naming a crew member and a planet.",
        vec![
            Step::new(vec![Action::spawn_prop("rocket", "center"), Action::sfx("rumble")]).hold(0.8),
            Step::new(vec![Action::camera_shake(0.3, 0.5)]),
            Step::new(vec![
                Action::spawn_character("astronaut", "left"),
                Action::emote("astronaut", "👀"),
            ]),
            Step::new(vec![
                Action::react("stars", "top"),
                Action::text_popup("Where to?", "top"),
            ])
            .hold(1.0),
        ],
    )
}

fn underwater_show() -> SceneScript {
    script(
        "Bubbles drift across an empty stage under the sea.",
        "The curtain is up! Tell it which sea creatures perform and what they do.",
        "Try choosing a performer and an act.",
        vec![
            Step::new(vec![Action::react("bubbles", "center"), Action::sfx("bubble")]).hold(0.8),
            Step::new(vec![Action::spawn_character("fish", "left")]),
            Step::new(vec![
                Action::move_to("fish", "center"),
                Action::emote("fish", "😮"),
            ]),
            Step::new(vec![Action::crowd("gasp"), Action::react("sparkle", "center")]).hold(1.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_gets_default_script() {
        let catalogue = FallbackCatalogue::new();
        assert!(!catalogue.has_task("dragon_race"));
        assert_eq!(
            catalogue.script_for("dragon_race"),
            catalogue.script_for(DEFAULT_FALLBACK_TASK)
        );
    }

    #[test]
    fn every_script_is_playable() {
        let catalogue = FallbackCatalogue::new();
        for task in [DEFAULT_FALLBACK_TASK, "space_adventure", "underwater_show"] {
            let script = catalogue.script_for(task);
            assert!(!script.actions.is_empty(), "{task} has no actions");
            assert!(!script.narration.is_empty());
            let delays: Vec<u64> = script.actions.iter().map(|a| a.delay_ms).collect();
            assert!(delays.windows(2).all(|w| w[0] <= w[1]), "{task} goes backwards");
        }
    }

    #[test]
    fn scripts_differ_per_task() {
        let catalogue = FallbackCatalogue::new();
        assert_ne!(
            catalogue.script_for("space_adventure").narration,
            catalogue.script_for("underwater_show").narration
        );
    }
}
