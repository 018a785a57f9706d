//! Responses returned to the game UI.

use chrono::{DateTime, Utc};
use promptplay_domain::SceneScript;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Scene Resolution
// =============================================================================

/// Which tier produced the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Live,
    Vignette,
    Fallback,
    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ResponseSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Vignette => "vignette",
            Self::Fallback => "fallback",
            Self::Unknown => "unknown",
        }
    }

    /// Anything other than a live script was produced without the generative backend.
    pub fn is_offline(self) -> bool {
        !matches!(self, Self::Live)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub request_id: Uuid,
    pub script: SceneScript,
    pub source: ResponseSource,
    /// Time spent in the tier that produced the script. Informational only.
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vignette_id: Option<String>,
    /// Lets the UI show a quiet "offline mode" badge.
    pub offline: bool,
    pub resolved_at: DateTime<Utc>,
}

// =============================================================================
// Variations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationSource {
    Generated,
    Fallback,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationResponse {
    pub variations: Vec<String>,
    pub source: VariationSource,
    pub latency_ms: u64,
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub live_enabled: bool,
    /// Task ids with a loaded vignette library.
    pub stages: Vec<String>,
}

// =============================================================================
// Errors
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request was malformed or invalid
    BadRequest,
    /// Requested resource not found
    NotFound,
    /// A newer request for the same session replaced this one
    Superseded,
    /// Internal server error
    InternalError,
    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
