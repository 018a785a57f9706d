//! Scene resolution - the pure pipeline from tags to a playable script.
//!
//! Match → pad → amplify → compile. Nothing here does I/O or fails; the engine
//! crate wraps it with the live and fallback tiers.

mod amplify;
mod analysis;
mod matching;
mod padding;
mod timeline;

pub use amplify::{amplify_steps, classify_step, outro_steps, Amplification};
pub use analysis::{analyze_prompt, PromptReport};
pub use matching::{
    close_contenders, match_vignette, match_with_tier, rank_vignettes, tier_of_choice,
    MatchOutcome, MatchTier, RankedVignette, SlotTemplate, DEFAULT_JUDGE_MARGIN,
    DEFAULT_VIGNETTE_PENALTY, LITERAL_MATCH_POINTS, PERFECT_GRADE_BONUS, WILDCARD_MATCH_POINTS,
};
pub use padding::{pad_steps, DEFAULT_MIN_ACTIONS};
pub use timeline::{compile_steps, AnimationTable, TimelineCompiler};

use crate::entities::{SceneScript, Stage, Vignette};
use crate::value_objects::TagAssignment;

/// Tunables for turning a vignette into a script.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub min_actions: usize,
    pub compiler: TimelineCompiler,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            min_actions: DEFAULT_MIN_ACTIONS,
            compiler: TimelineCompiler::default(),
        }
    }
}

/// Expand a chosen vignette into the playback script.
///
/// `tier` decides the coaching hint: below an exact match the vignette's
/// vague-input comparison is shown instead of its tip.
pub fn build_scene_script(
    stage: &Stage,
    vignette: &Vignette,
    tier: MatchTier,
    tags: &TagAssignment,
    options: &ScriptOptions,
) -> SceneScript {
    let padded = pad_steps(&vignette.steps, vignette.grade, options.min_actions);
    let amplified = amplify_steps(&padded);
    let actions = options.compiler.compile(&amplified);

    let feedback = &vignette.feedback;
    let message = if feedback.message.is_empty() {
        &feedback.title
    } else {
        &feedback.message
    };
    let hint = match &feedback.vague_comparison {
        Some(comparison) if tier.is_degraded() && !comparison.is_empty() => Some(comparison),
        _ => Some(&feedback.tip).filter(|tip| !tip.is_empty()),
    };

    let report = analyze_prompt(stage, tags);
    let mut script = SceneScript::new(vignette.grade.success_level(), actions)
        .with_narration(vignette.narration())
        .with_feedback(message.as_str());
    script.guide_hint = hint.cloned();
    script.prompt_analysis = Some(report.analysis);
    script.missing_elements = Some(report.missing_names());
    script
}
