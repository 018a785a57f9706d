//! Steps - bundles of simultaneous actions followed by a hold.

use serde::{Deserialize, Serialize};

use super::action::Action;

/// Hold applied when a step does not author one.
pub const DEFAULT_HOLD_SECS: f32 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Actions fired together at the step's start time.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Seconds to wait before the next step begins.
    #[serde(
        default,
        alias = "holdAfter",
        skip_serializing_if = "Option::is_none"
    )]
    pub hold_after: Option<f32>,
}

impl Step {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            hold_after: None,
        }
    }

    pub fn hold(mut self, secs: f32) -> Self {
        self.hold_after = Some(secs);
        self
    }

    /// Authored hold, or [`DEFAULT_HOLD_SECS`].
    pub fn hold_secs(&self) -> f32 {
        self.hold_after.unwrap_or(DEFAULT_HOLD_SECS)
    }

    /// Hold in whole milliseconds. Negative or non-finite holds count as zero.
    pub fn hold_ms(&self) -> u64 {
        secs_to_ms(self.hold_secs())
    }

    /// Same step with the default hold written out explicitly.
    pub fn with_default_hold(mut self) -> Self {
        self.hold_after.get_or_insert(DEFAULT_HOLD_SECS);
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, predicate: impl Fn(&Action) -> bool) -> bool {
        self.actions.iter().any(predicate)
    }
}

/// Total actions across all steps.
pub fn count_actions(steps: &[Step]) -> usize {
    steps.iter().map(Step::len).sum()
}

/// Character names spawned anywhere in `steps`, first-seen order, deduplicated.
pub fn spawned_characters(steps: &[Step]) -> Vec<String> {
    let mut cast: Vec<String> = Vec::new();
    for name in steps
        .iter()
        .flat_map(|s| s.actions.iter())
        .filter_map(Action::spawned_character)
    {
        if !cast.iter().any(|c| c == name) {
            cast.push(name.to_string());
        }
    }
    cast
}

pub(crate) fn secs_to_ms(secs: f32) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_defaults_to_half_a_second() {
        let step = Step::new(vec![Action::sfx("pop")]);
        assert_eq!(step.hold_ms(), 500);
        assert_eq!(step.hold(1.25).hold_ms(), 1250);
    }

    #[test]
    fn negative_hold_clamps_to_zero() {
        assert_eq!(Step::default().hold(-2.0).hold_ms(), 0);
        assert_eq!(Step::default().hold(f32::NAN).hold_ms(), 0);
    }

    #[test]
    fn accepts_camel_case_hold() {
        let step: Step =
            serde_json::from_str(r#"{"actions":[{"type":"sfx","sound":"pop"}],"holdAfter":2}"#)
                .unwrap();
        assert_eq!(step.hold_after, Some(2.0));
    }

    #[test]
    fn spawned_characters_are_deduplicated_in_order() {
        let steps = vec![
            Step::new(vec![
                Action::spawn_character("cat", "left"),
                Action::spawn_prop("cake", "center"),
            ]),
            Step::new(vec![
                Action::spawn_character("dog", "right"),
                Action::spawn_character("cat", "center"),
            ]),
        ];
        assert_eq!(spawned_characters(&steps), vec!["cat", "dog"]);
        assert_eq!(count_actions(&steps), 4);
    }
}
