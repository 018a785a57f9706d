//! Entities - authored content (vignettes, stages) and the compiled scene contract.

mod action;
mod scene_script;
mod stage;
mod step;
mod vignette;

pub use action::{Action, DEFAULT_POSITION};
pub use scene_script::{CompiledAction, CompiledKind, SceneScript, SpawnKind};
pub use stage::{SlotOption, SlotSpec, Stage};
pub use step::{count_actions, spawned_characters, Step, DEFAULT_HOLD_SECS};
pub(crate) use step::secs_to_ms;
pub use vignette::{Feedback, Vignette};
