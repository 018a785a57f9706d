//! Prompt analysis - which prompt elements the child's picks covered.

use crate::entities::Stage;
use crate::value_objects::{PromptAnalysis, PromptElement, TagAssignment};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptReport {
    pub analysis: PromptAnalysis,
    /// Elements of unfilled slots, template order, without repeats.
    pub missing: Vec<PromptElement>,
}

impl PromptReport {
    pub fn missing_names(&self) -> Vec<String> {
        self.missing.iter().map(|e| e.as_str().to_string()).collect()
    }
}

pub fn analyze_prompt(stage: &Stage, tags: &TagAssignment) -> PromptReport {
    let mut report = PromptReport::default();
    let mut characters = 0;

    for slot in &stage.slots {
        if tags.is_filled(&slot.id) {
            report.analysis.mark(slot.element);
            if slot.element == PromptElement::Character {
                characters += 1;
            }
        } else if !report.missing.contains(&slot.element) {
            report.missing.push(slot.element);
        }
    }

    // A filled slot elsewhere covers the same element.
    let analysis = report.analysis;
    report.missing.retain(|e| !analysis.has(*e));
    report.analysis.has_multi_char = characters >= 2;
    report
}
