//! Value objects - small immutable types compared by value.

mod grade;
mod prompt;
mod tags;
mod trigger;

pub use grade::{QualityGrade, SuccessLevel};
pub use prompt::{PromptAnalysis, PromptElement};
pub use tags::TagAssignment;
pub use trigger::{Trigger, TriggerValue, WILDCARD};
