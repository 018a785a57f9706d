//! Option and sentence variation.
//!
//! The generative call races a fixed timer; when the timer wins, or the reply is
//! unusable, the caller's static wordings come back reshuffled. This never fails.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use promptplay_shared::{VariationRequest, VariationResponse, VariationSource};
use serde_json::Value;
use tokio::time::Instant;

use crate::infrastructure::ports::{ChatMessage, LlmPort, LlmRequest, RandomPort};
use crate::use_cases::llm_json::extract_json;

const SYSTEM_PROMPT: &str = "You reword choices for a children's game. Keep each option \
short, concrete and kind. Respond with ONLY a JSON array of strings.";

pub struct VariationService {
    /// `None` in offline mode: every request gets the reshuffled fallback.
    llm: Option<Arc<dyn LlmPort>>,
    random: Arc<dyn RandomPort>,
    timeout: Duration,
}

impl VariationService {
    pub fn new(
        llm: Option<Arc<dyn LlmPort>>,
        random: Arc<dyn RandomPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            llm,
            random,
            timeout,
        }
    }

    /// Fresh wordings for `request.base`, or `fallback` reshuffled.
    pub async fn vary(&self, request: &VariationRequest, fallback: Vec<String>) -> VariationResponse {
        let started = Instant::now();
        let count = request.count.max(1);

        let generated = match &self.llm {
            Some(llm) => self.generate(llm.as_ref(), request, count).await,
            None => Vec::new(),
        };

        let (variations, source) = if generated.is_empty() {
            (
                shuffled_fallback(fallback, count, self.random.as_ref()),
                VariationSource::Fallback,
            )
        } else {
            (generated, VariationSource::Generated)
        };

        VariationResponse {
            variations,
            source,
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Race the backend against the timer. Empty when the timer wins or the reply is unusable.
    async fn generate(&self, llm: &dyn LlmPort, request: &VariationRequest, count: usize) -> Vec<String> {
        let llm_request = LlmRequest::new(vec![ChatMessage::user(build_user_message(request, count))])
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(0.9)
            .with_max_tokens(Some(200));

        tokio::select! {
            result = llm.generate(llm_request) => match result {
                Ok(response) => parse_variations(&response.content, count),
                Err(e) => {
                    tracing::warn!(task_id = %request.task_id, reason = "backend", error = %e, "Variation call failed");
                    Vec::new()
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                tracing::debug!(task_id = %request.task_id, reason = "timeout", "Variation timer won");
                Vec::new()
            }
        }
    }
}

fn build_user_message(request: &VariationRequest, count: usize) -> String {
    let subject = request
        .slot_id
        .as_deref()
        .map_or_else(|| "sentence".to_string(), |slot| format!("'{slot}' options"));
    format!(
        "Task: {}\nGive {count} new wordings for these {subject}: {}",
        request.task_id,
        request.base.join(" | ")
    )
}

/// Accept a JSON array of strings, or an object with a `variations` array.
fn parse_variations(raw: &str, count: usize) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<Value>(extract_json(raw)) else {
        return Vec::new();
    };
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("variations") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .take(count)
        .map(str::to_string)
        .collect()
}

/// Rotate the static wordings by a random offset and take `count`.
fn shuffled_fallback(mut base: Vec<String>, count: usize, random: &dyn RandomPort) -> Vec<String> {
    let len = base.len();
    if len > 1 {
        let last = i32::try_from(len - 1).unwrap_or(i32::MAX);
        let offset = usize::try_from(random.gen_range(0, last)).unwrap_or(0);
        base.rotate_left(offset % len);
    }
    base.truncate(count);
    base
}
