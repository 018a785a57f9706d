//! PromptPlay domain: the vignette model and the pure scene pipeline.
//!
//! Everything in this crate is synchronous and deterministic. Stage content is
//! described by [`entities`], compared through [`value_objects`], and turned into
//! playable [`SceneScript`]s by [`scene`].

pub mod entities;
pub mod error;
pub mod ids;
pub mod scene;
pub mod value_objects;

pub use entities::{
    count_actions, spawned_characters, Action, CompiledAction, CompiledKind, Feedback,
    SceneScript, SlotOption, SlotSpec, SpawnKind, Stage, Step, Vignette, DEFAULT_HOLD_SECS,
    DEFAULT_POSITION,
};
pub use error::DomainError;
pub use ids::RequestId;
pub use scene::{
    amplify_steps, analyze_prompt, build_scene_script, close_contenders, compile_steps,
    match_vignette, match_with_tier, pad_steps, rank_vignettes, tier_of_choice, AnimationTable,
    MatchOutcome, MatchTier, PromptReport, RankedVignette, ScriptOptions, SlotTemplate,
    TimelineCompiler, DEFAULT_JUDGE_MARGIN, DEFAULT_MIN_ACTIONS,
};
pub use value_objects::{
    PromptAnalysis, PromptElement, QualityGrade, SuccessLevel, TagAssignment, Trigger,
    TriggerValue, WILDCARD,
};
