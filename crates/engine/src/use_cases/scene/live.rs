//! Live tier - ask the generative backend for a whole scene script.
//!
//! The call runs under a hard deadline and the request's cancellation token.
//! Whatever comes back is validated before it is trusted; any failure falls through
//! to the vignette tier.

use std::sync::Arc;
use std::time::Duration;

use promptplay_domain::{CompiledAction, PromptAnalysis, SceneScript, SuccessLevel};
use promptplay_shared::ResolveRequest;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::{ChatMessage, LlmError, LlmPort, LlmRequest};
use crate::use_cases::llm_json::extract_json;

#[derive(Debug, Error)]
pub enum LiveError {
    #[error("Live call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Live call cancelled")]
    Cancelled,
    #[error("Backend error: {0}")]
    Backend(#[from] LlmError),
    #[error("Invalid script: {0}")]
    Invalid(String),
}

impl LiveError {
    /// Short label for structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Cancelled => "cancelled",
            Self::Backend(_) => "backend",
            Self::Invalid(_) => "invalid_output",
        }
    }
}

pub struct LiveTier {
    llm: Arc<dyn LlmPort>,
    timeout: Duration,
    max_tokens: u32,
}

impl LiveTier {
    pub fn new(llm: Arc<dyn LlmPort>, timeout: Duration, max_tokens: u32) -> Self {
        Self {
            llm,
            timeout,
            max_tokens,
        }
    }

    pub async fn generate(
        &self,
        request: &ResolveRequest,
        cancel: &CancellationToken,
    ) -> Result<SceneScript, LiveError> {
        let llm_request = LlmRequest::new(vec![ChatMessage::user(build_user_message(request))])
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(0.8)
            .with_max_tokens(Some(self.max_tokens));

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(LiveError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.llm.generate(llm_request)) => {
                result.map_err(|_| LiveError::Timeout(self.timeout))??
            }
        };

        validate_live_script(&response.content)
    }
}

const SYSTEM_PROMPT: &str = r#"You direct short animated scenes for a children's prompt-writing game.

Turn the child's choices into ONE scene. Judge how well the choices fit together:
FULL_SUCCESS when they are specific and coherent, PARTIAL_SUCCESS when something is
missing, FUNNY_FAIL when they clash in a funny way.

Respond with ONLY this JSON object:
{
  "success_level": "FULL_SUCCESS" | "PARTIAL_SUCCESS" | "FUNNY_FAIL",
  "narration": "one or two short sentences",
  "actions": [
    {"type": "spawn", "target": "wizard", "position": "left", "delay_ms": 0},
    {"type": "animate", "target": "wizard", "clip": "wave_hand", "delay_ms": 500},
    {"type": "effect", "effect": "sparkle", "position": "center", "delay_ms": 800},
    {"type": "sound", "sound": "pop", "delay_ms": 800}
  ],
  "prompt_feedback": "kind feedback about the child's prompt",
  "guide_hint": "one tip for next time"
}

Action types: spawn, move, animate, effect, emote, sound, camera_shake, camera_zoom,
text, flash, crowd, particles, wait, remove. Positions: left, center, right, top.
Use between 15 and 40 actions with non-decreasing delay_ms."#;

fn build_user_message(request: &ResolveRequest) -> String {
    let mut parts = vec![format!("Task: {}", request.task_id)];
    if !request.tags.is_empty() {
        parts.push(format!("Choices: {}", request.tags.describe()));
    }
    if let Some(text) = request.free_text() {
        parts.push(format!("The child wrote: \"{text}\""));
    }
    parts.join("\n")
}

/// Accept a generated script only when its shape is usable.
///
/// Requires a recognised `success_level` and a non-empty `actions` array with at
/// least one action this engine can play. Unrecognised action entries are dropped.
pub fn validate_live_script(raw: &str) -> Result<SceneScript, LiveError> {
    let value: Value = serde_json::from_str(extract_json(raw))
        .map_err(|e| LiveError::Invalid(format!("not JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| LiveError::Invalid("top level is not an object".to_string()))?;

    let success_level: SuccessLevel = object
        .get("success_level")
        .and_then(Value::as_str)
        .ok_or_else(|| LiveError::Invalid("missing success_level".to_string()))?
        .parse()
        .map_err(|e| LiveError::Invalid(format!("{e}")))?;

    let entries = object
        .get("actions")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| LiveError::Invalid("missing or empty actions".to_string()))?;

    let actions: Vec<CompiledAction> = entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect();
    if actions.is_empty() {
        return Err(LiveError::Invalid(format!(
            "none of {} actions are recognised",
            entries.len()
        )));
    }
    if actions.len() < entries.len() {
        tracing::debug!(
            dropped = entries.len() - actions.len(),
            kept = actions.len(),
            "Dropped unrecognised live actions"
        );
    }

    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let mut script = SceneScript::new(success_level, actions)
        .with_narration(text("narration").unwrap_or_default())
        .with_feedback(text("prompt_feedback").unwrap_or_default());
    script.guide_hint = text("guide_hint").filter(|h| !h.is_empty());
    script.prompt_analysis = object
        .get("prompt_analysis")
        .and_then(|v| serde_json::from_value::<PromptAnalysis>(v.clone()).ok());
    script.missing_elements = object
        .get("missing_elements")
        .and_then(|v| serde_json::from_value::<Vec<String>>(v.clone()).ok());
    Ok(script)
}
