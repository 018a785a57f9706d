//! Free-text tag extraction.
//!
//! Maps what the child typed onto the stage's slot vocabulary: for each slot the
//! first option whose value or keyword appears as whole words wins. Nothing smarter.

use promptplay_domain::{SlotOption, Stage, TagAssignment};
use regex_lite::Regex;

/// Extract slot values from `text` using the stage's option keywords.
pub fn extract_tags(stage: &Stage, text: &str) -> TagAssignment {
    let text = text.to_lowercase();
    let mut tags = TagAssignment::new();

    for slot in &stage.slots {
        let hit = slot.options.iter().find(|option| match option_pattern(option) {
            Some(pattern) => pattern.is_match(&text),
            None => false,
        });
        if let Some(option) = hit {
            tags.insert(slot.id.clone(), option.value.clone());
        }
    }

    if !tags.is_empty() {
        tracing::debug!(task_id = %stage.task_id, tags = %tags.describe(), "Extracted tags from text");
    }
    tags
}

/// Whole-word alternation over the option value and its keywords.
///
/// `ice_cream` also matches "ice cream"; internal whitespace in phrases matches any run
/// of whitespace.
fn option_pattern(option: &SlotOption) -> Option<Regex> {
    let mut phrases: Vec<String> = option
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    phrases.push(option.value.to_lowercase().replace('_', " "));
    // Longest first so "birthday cake" is preferred over "cake" in the alternation.
    phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
    phrases.dedup();

    let alternatives: Vec<String> = phrases
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(regex_lite::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|p| !p.is_empty())
        .collect();
    if alternatives.is_empty() {
        return None;
    }

    let source = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    match Regex::new(&source) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(option = %option.value, error = %e, "Skipping option with unusable keywords");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptplay_domain::{Action, PromptElement, QualityGrade, SlotSpec, Step, Vignette};

    fn stage() -> Stage {
        Stage {
            task_id: "birthday_party".into(),
            title: String::new(),
            slots: vec![
                SlotSpec::new("food", PromptElement::Detail)
                    .with_option("cake", &["cupcake", "birthday cake"])
                    .with_option("ice_cream", &["sundae"]),
                SlotSpec::new("entertainment", PromptElement::Action)
                    .with_option("magic_show", &["magician", "magic show", "wizard"])
                    .with_option("dance_party", &["disco", "dance party"]),
                SlotSpec::new("vibe", PromptElement::Environment)
                    .with_option("spooky", &["scary", "haunted"]),
            ],
            combo: None,
            mood_slot: None,
            vignettes: Vec::new(),
            default_vignette: Vignette::new("empty", QualityGrade::FunnyFail)
                .with_steps(vec![Step::new(vec![Action::sfx("cricket")])]),
        }
    }

    #[test]
    fn finds_keywords_across_slots() {
        let tags = extract_tags(&stage(), "A HAUNTED party with a wizard and cupcakes? No, one cupcake.");
        assert_eq!(tags.get("vibe"), Some("spooky"));
        assert_eq!(tags.get("entertainment"), Some("magic_show"));
        assert_eq!(tags.get("food"), Some("cake"));
    }

    #[test]
    fn multi_word_keywords_and_underscored_values_match() {
        let tags = extract_tags(&stage(), "we want a dance   party and ice cream");
        assert_eq!(tags.get("entertainment"), Some("dance_party"));
        assert_eq!(tags.get("food"), Some("ice_cream"));
        assert!(!tags.is_filled("vibe"));
    }

    #[test]
    fn partial_words_do_not_match() {
        let tags = extract_tags(&stage(), "scaryish magicians everywhere");
        assert!(tags.is_empty());
    }

    #[test]
    fn first_option_wins_within_a_slot() {
        let tags = extract_tags(&stage(), "a sundae and a cake");
        assert_eq!(tags.get("food"), Some("cake"));
    }
}
