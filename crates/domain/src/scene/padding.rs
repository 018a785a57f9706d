//! Step padding - stretch short vignettes up to a minimum action count.
//!
//! Blocks are appended in a fixed order and each one is only added while the running
//! total is still below the minimum, so the result overshoots by less than one block.

use crate::entities::{count_actions, spawned_characters, Action, Step, DEFAULT_POSITION};
use crate::value_objects::QualityGrade;

/// Target action count for a padded vignette.
pub const DEFAULT_MIN_ACTIONS: usize = 30;

/// Upper bound on single-emote fillers before falling back to sparkles.
const MAX_EMOTE_FILLERS: usize = 6;

const BLOCK_HOLD_SECS: f32 = 0.6;
const FILLER_HOLD_SECS: f32 = 0.3;

/// Effects, sounds and emoji used by filler blocks.
struct Vocabulary {
    reaction_anim: &'static str,
    secondary_anim: &'static str,
    reaction_emoji: &'static str,
    sparkle_effect: &'static str,
    sparkle_sound: &'static str,
    crowd: &'static str,
    crowd_sound: &'static str,
    speech: &'static str,
    burst_emoji: &'static str,
    finale_effect: &'static str,
    finale_sound: &'static str,
    filler_effect: &'static str,
}

const SUCCESS: Vocabulary = Vocabulary {
    reaction_anim: "cheer",
    secondary_anim: "jump",
    reaction_emoji: "🎉",
    sparkle_effect: "sparkle",
    sparkle_sound: "sparkle",
    crowd: "cheer",
    crowd_sound: "crowd_cheer",
    speech: "Ta-da!",
    burst_emoji: "😄",
    finale_effect: "confetti",
    finale_sound: "fanfare",
    filler_effect: "sparkle",
};

const FAIL: Vocabulary = Vocabulary {
    reaction_anim: "confused",
    secondary_anim: "sad",
    reaction_emoji: "❓",
    sparkle_effect: "hit",
    sparkle_sound: "bonk",
    crowd: "gasp",
    crowd_sound: "gasp",
    speech: "Oops!",
    burst_emoji: "😵",
    finale_effect: "sad",
    finale_sound: "sad_trombone",
    filler_effect: "confused",
};

fn push(out: &mut Vec<Step>, total: &mut usize, step: Step) {
    *total += step.len();
    out.push(step);
}

fn vocabulary(grade: QualityGrade) -> &'static Vocabulary {
    if grade.is_fail() {
        &FAIL
    } else {
        &SUCCESS
    }
}

/// Append filler steps until `steps` hold at least `min_actions` actions.
///
/// Input already at or above the minimum is returned unchanged. Character
/// blocks need two distinct spawned characters and are skipped otherwise.
pub fn pad_steps(steps: &[Step], grade: QualityGrade, min_actions: usize) -> Vec<Step> {
    let mut out = steps.to_vec();
    let mut total = count_actions(steps);
    if total >= min_actions {
        return out;
    }

    let vocab = vocabulary(grade);
    let cast = spawned_characters(steps);
    let has_cast = cast.len() >= 2;

    let mut blocks: Vec<Step> = Vec::new();
    if has_cast {
        blocks.push(Step::new(vec![
            Action::animate(&cast[0], vocab.reaction_anim),
            Action::emote(&cast[0], vocab.reaction_emoji),
        ]));
    }
    blocks.push(Step::new(vec![
        Action::react(vocab.sparkle_effect, DEFAULT_POSITION),
        Action::sfx(vocab.sparkle_sound),
    ]));
    if has_cast {
        blocks.push(Step::new(vec![
            Action::animate(&cast[1], vocab.secondary_anim),
            Action::emote(&cast[1], vocab.reaction_emoji),
        ]));
    }
    blocks.push(Step::new(vec![
        Action::crowd(vocab.crowd),
        Action::sfx(vocab.crowd_sound),
    ]));
    if has_cast {
        blocks.push(Step::new(vec![
            Action::text_popup(vocab.speech, "top"),
            Action::emote(&cast[0], "💬"),
        ]));
    }
    blocks.push(Step::new(vec![Action::camera_shake(0.3, 0.4)]));
    if has_cast {
        blocks.push(Step::new(
            cast.iter()
                .map(|name| Action::emote(name, vocab.burst_emoji))
                .collect(),
        ));
    }
    blocks.push(Step::new(vec![
        Action::react(vocab.finale_effect, DEFAULT_POSITION),
        Action::sfx(vocab.finale_sound),
        Action::crowd(vocab.crowd),
    ]));

    for block in blocks {
        if total >= min_actions {
            return out;
        }
        push(&mut out, &mut total, block.hold(BLOCK_HOLD_SECS));
    }

    if has_cast {
        for i in 0..MAX_EMOTE_FILLERS {
            if total >= min_actions {
                return out;
            }
            let name = &cast[i % cast.len()];
            let step = Step::new(vec![Action::emote(name, vocab.reaction_emoji)])
                .hold(FILLER_HOLD_SECS);
            push(&mut out, &mut total, step);
        }
    }

    const SPARKLE_POSITIONS: [&str; 3] = ["left", "center", "right"];
    let mut i = 0;
    while total < min_actions {
        let step = Step::new(vec![Action::react(
            vocab.filler_effect,
            SPARKLE_POSITIONS[i % SPARKLE_POSITIONS.len()],
        )])
        .hold(FILLER_HOLD_SECS);
        push(&mut out, &mut total, step);
        i += 1;
    }

    out
}
