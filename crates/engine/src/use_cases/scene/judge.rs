//! Tie-break judge for free-text selection.
//!
//! When ranking leaves several vignettes within the margin of the top score, a
//! short low-temperature call picks the one that best fits what the child wrote.
//! The judge only ever swaps the matcher's pick for another close contender;
//! every failure keeps the matcher's pick.

use std::sync::Arc;
use std::time::Duration;

use promptplay_domain::{close_contenders, RankedVignette, Vignette};
use serde::Deserialize;

use crate::infrastructure::ports::{ChatMessage, LlmPort, LlmRequest};
use crate::use_cases::llm_json::extract_json;

const SYSTEM_PROMPT: &str = "You pick the scene that best matches a child's description. \
Respond with ONLY a JSON object: {\"choice\": \"<scene id>\"}. \
The id must be one of the listed ids.";

#[derive(Debug, Deserialize)]
struct JudgeReply {
    choice: String,
}

pub struct SelectionJudge {
    llm: Arc<dyn LlmPort>,
    timeout: Duration,
    margin: i32,
    model: Option<String>,
}

impl SelectionJudge {
    pub fn new(llm: Arc<dyn LlmPort>, timeout: Duration, margin: i32) -> Self {
        Self {
            llm,
            timeout,
            margin,
            model: None,
        }
    }

    /// Use a separate (usually smaller) model for judging.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Second opinion on the matcher's `preferred` vignette.
    ///
    /// The LLM is only asked when `preferred` sits among two or more close
    /// contenders in `ranked` (sorted best first). Any failure keeps `preferred`.
    pub async fn choose<'a>(
        &self,
        ranked: &[RankedVignette<'a>],
        preferred: &'a Vignette,
        user_text: &str,
    ) -> &'a Vignette {
        let contenders = close_contenders(ranked, self.margin);
        if contenders.len() < 2 || !contenders.iter().any(|c| c.vignette.id == preferred.id) {
            return preferred;
        }

        let request = LlmRequest::new(vec![ChatMessage::user(build_user_message(
            contenders, user_text,
        ))])
        .with_system_prompt(SYSTEM_PROMPT)
        .with_temperature(0.1)
        .with_max_tokens(Some(60))
        .with_model(self.model.clone());

        let content = match tokio::time::timeout(self.timeout, self.llm.generate(request)).await {
            Ok(Ok(response)) => response.content,
            Ok(Err(e)) => {
                tracing::warn!(reason = "backend", error = %e, "Judge failed, keeping matched vignette");
                return preferred;
            }
            Err(_) => {
                tracing::warn!(
                    reason = "timeout",
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Judge timed out, keeping matched vignette"
                );
                return preferred;
            }
        };

        let picked = serde_json::from_str::<JudgeReply>(extract_json(&content))
            .ok()
            .and_then(|reply| {
                contenders
                    .iter()
                    .find(|c| c.vignette.id == reply.choice.trim())
                    .map(|c| c.vignette)
            });

        match picked {
            Some(choice) => {
                tracing::debug!(
                    choice = %choice.id,
                    matched = %preferred.id,
                    contenders = contenders.len(),
                    "Judge picked vignette"
                );
                choice
            }
            None => {
                tracing::warn!(reason = "invalid_output", "Judge reply unusable, keeping matched vignette");
                preferred
            }
        }
    }
}

fn build_user_message(contenders: &[RankedVignette<'_>], user_text: &str) -> String {
    let scenes = contenders
        .iter()
        .map(|c| {
            let description = if c.vignette.description.is_empty() {
                c.vignette.narration()
            } else {
                c.vignette.description.as_str()
            };
            format!("- {}: {}", c.vignette.id, description)
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("The child wrote: \"{user_text}\"\n\nScenes:\n{scenes}")
}
