//! Step amplification - a contextual follow-up after each meaningful step.
//!
//! Every original step is kept and followed by at most one reaction step chosen
//! from what the original step did. A fixed celebration outro closes the scene.

use crate::entities::{Action, Step, DEFAULT_HOLD_SECS, DEFAULT_POSITION};

const AMPLIFY_HOLD_SECS: f32 = 0.4;

/// Effects cycled by step index for reaction bursts.
const BURST_PALETTE: [&str; 3] = ["stars", "hearts", "sparkle"];

/// What kind of follow-up a step earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amplification {
    Entrance,
    Reveal,
    MovementTrail,
    ReactionBurst,
    Emphasis,
    Echo,
    None,
}

/// Classify by the first matching action kind, in priority order.
pub fn classify_step(step: &Step) -> Amplification {
    let is_crowd = step.contains(|a| matches!(a, Action::CrowdReact { .. }));

    if step.contains(|a| matches!(a, Action::SpawnCharacter { .. })) {
        Amplification::Entrance
    } else if step.contains(|a| matches!(a, Action::SpawnProp { .. })) {
        Amplification::Reveal
    } else if step.contains(|a| matches!(a, Action::Move { .. })) {
        Amplification::MovementTrail
    } else if !is_crowd && step.contains(|a| matches!(a, Action::Animate { .. })) {
        Amplification::ReactionBurst
    } else if step.contains(|a| matches!(a, Action::Emote { .. } | Action::TextPopup { .. })) {
        Amplification::Emphasis
    } else if !is_crowd && step.contains(|a| matches!(a, Action::React { .. })) {
        Amplification::Echo
    } else {
        Amplification::None
    }
}

/// A neighbouring stage position, so follow-ups do not sit on top of the original.
fn offset(position: &str) -> &'static str {
    match position {
        "left" => "center",
        "center" => "right",
        _ => "center",
    }
}

fn follow_up(step: &Step, index: usize) -> Option<Step> {
    let actions = match classify_step(step) {
        Amplification::Entrance => step
            .actions
            .iter()
            .filter_map(|a| match a {
                Action::SpawnCharacter {
                    character,
                    position,
                } => Some([
                    Action::emote(character, "✨"),
                    Action::react("sparkle", position),
                    Action::sfx("pop"),
                ]),
                _ => None,
            })
            .flatten()
            .collect(),
        Amplification::Reveal => {
            let position = step
                .actions
                .iter()
                .find_map(|a| match a {
                    Action::SpawnProp { position, .. } => Some(position.as_str()),
                    _ => None,
                })
                .unwrap_or(DEFAULT_POSITION);
            vec![Action::react("sparkle", position), Action::sfx("reveal")]
        }
        Amplification::MovementTrail => {
            let to = step
                .actions
                .iter()
                .find_map(|a| match a {
                    Action::Move { to, .. } => Some(to.as_str()),
                    _ => None,
                })
                .unwrap_or(DEFAULT_POSITION);
            vec![Action::sfx("whoosh"), Action::react("trail", offset(to))]
        }
        Amplification::ReactionBurst => vec![
            Action::react(BURST_PALETTE[index % BURST_PALETTE.len()], DEFAULT_POSITION),
            Action::sfx("boing"),
        ],
        Amplification::Emphasis => vec![Action::react("glow", DEFAULT_POSITION)],
        Amplification::Echo => step
            .actions
            .iter()
            .find_map(|a| match a {
                Action::React { effect, position } => {
                    Some(vec![Action::react(effect, offset(position))])
                }
                _ => None,
            })
            .unwrap_or_default(),
        Amplification::None => Vec::new(),
    };

    (!actions.is_empty()).then(|| Step::new(actions).hold(AMPLIFY_HOLD_SECS))
}

/// The closing celebration appended to every amplified scene.
pub fn outro_steps() -> Vec<Step> {
    vec![
        Step::new(vec![Action::crowd("cheer"), Action::sfx("crowd_cheer")]).hold(0.8),
        Step::new(vec![
            Action::react("confetti", "center"),
            Action::react("sparkle", "left"),
            Action::react("sparkle", "right"),
        ])
        .hold(0.8),
        Step::new(vec![
            Action::react("celebration", "center"),
            Action::crowd("wave"),
            Action::sfx("fanfare"),
        ])
        .hold(1.0),
    ]
}

/// Interleave a follow-up after each meaningful step and append the outro.
pub fn amplify_steps(steps: &[Step]) -> Vec<Step> {
    let mut out = Vec::with_capacity(steps.len() * 2 + 3);
    for (index, step) in steps.iter().enumerate() {
        out.push(step.clone().with_default_hold());
        if let Some(extra) = follow_up(step, index) {
            out.push(extra);
        }
    }
    out.extend(outro_steps());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::count_actions;

    #[test]
    fn classification_follows_priority() {
        let spawn_and_move = Step::new(vec![
            Action::move_to("cat", "left"),
            Action::spawn_character("wizard", "right"),
        ]);
        assert_eq!(classify_step(&spawn_and_move), Amplification::Entrance);

        let prop = Step::new(vec![Action::spawn_prop("cake", "center")]);
        assert_eq!(classify_step(&prop), Amplification::Reveal);

        let crowd_dance = Step::new(vec![
            Action::animate("wizard", "dance"),
            Action::crowd("cheer"),
        ]);
        assert_eq!(classify_step(&crowd_dance), Amplification::None);

        let crowd_sparkle = Step::new(vec![
            Action::react("sparkle", "center"),
            Action::crowd("cheer"),
        ]);
        assert_eq!(classify_step(&crowd_sparkle), Amplification::None);

        let sfx_only = Step::new(vec![Action::sfx("pop")]);
        assert_eq!(classify_step(&sfx_only), Amplification::None);

        let popup = Step::new(vec![Action::text_popup("Wow", "top")]);
        assert_eq!(classify_step(&popup), Amplification::Emphasis);
    }

    #[test]
    fn entrance_sparkles_every_spawned_character() {
        let step = Step::new(vec![
            Action::spawn_character("wizard", "left"),
            Action::spawn_character("cat", "right"),
        ]);
        let out = amplify_steps(&[step]);
        assert_eq!(out[1].len(), 6);
        assert!(out[1].actions.contains(&Action::react("sparkle", "left")));
        assert!(out[1].actions.contains(&Action::emote("cat", "✨")));
    }

    #[test]
    fn original_steps_get_default_hold() {
        let out = amplify_steps(&[Step::new(vec![Action::sfx("pop")])]);
        assert_eq!(out[0].hold_after, Some(DEFAULT_HOLD_SECS));
        assert_eq!(out.len(), 1 + 3);
    }

    #[test]
    fn movement_trail_lands_next_to_destination() {
        let out = amplify_steps(&[Step::new(vec![Action::move_to("cat", "left")])]);
        assert_eq!(
            out[1].actions,
            vec![Action::sfx("whoosh"), Action::react("trail", "center")]
        );
    }

    #[test]
    fn burst_palette_cycles_by_step_index() {
        let steps = vec![
            Step::new(vec![Action::animate("cat", "jump")]),
            Step::new(vec![Action::animate("cat", "jump")]),
        ];
        let out = amplify_steps(&steps);
        assert_eq!(out[1].actions[0], Action::react("stars", "center"));
        assert_eq!(out[3].actions[0], Action::react("hearts", "center"));
    }

    #[test]
    fn spawns_strictly_increase_density_and_outro_is_last() {
        let steps = vec![
            Step::new(vec![Action::spawn_prop("cake", "center")]),
            Step::new(vec![Action::sfx("pop")]),
        ];
        let out = amplify_steps(&steps);
        assert!(count_actions(&out) > count_actions(&steps));
        assert_eq!(&out[out.len() - 3..], &outro_steps()[..]);
    }

    #[test]
    fn empty_input_yields_only_outro() {
        assert_eq!(amplify_steps(&[]), outro_steps());
    }
}
