//! Engine settings read from the environment.
//!
//! Every knob has a default so a bare `promptplay-engine` starts in offline mode
//! with the built-in stage. Malformed values are logged and replaced by the default.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use promptplay_domain::{DEFAULT_JUDGE_MARGIN, DEFAULT_MIN_ACTIONS};

use super::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};

pub const DEFAULT_LIVE_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_JUDGE_TIMEOUT_MS: u64 = 1_500;
pub const DEFAULT_VARIATION_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_LIVE_MAX_TOKENS: u32 = 1_500;
pub const DEFAULT_SERVER_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub llm_base_url: String,
    pub llm_model: String,
    /// Model used by the tie-break judge; the main model when unset.
    pub judge_model: Option<String>,
    pub live_enabled: bool,
    pub live_timeout: Duration,
    pub live_max_tokens: u32,
    pub judge_margin: i32,
    pub judge_timeout: Duration,
    pub variation_timeout: Duration,
    pub min_actions: usize,
    /// Directory of `*.json` stage files; the built-in stage when unset.
    pub vignette_dir: Option<PathBuf>,
    pub server_host: String,
    pub server_port: u16,
    /// Raw `CORS_ALLOWED_ORIGINS` value (`*` or a comma list).
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            llm_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            llm_model: DEFAULT_OLLAMA_MODEL.to_string(),
            judge_model: None,
            live_enabled: false,
            live_timeout: Duration::from_millis(DEFAULT_LIVE_TIMEOUT_MS),
            live_max_tokens: DEFAULT_LIVE_MAX_TOKENS,
            judge_margin: DEFAULT_JUDGE_MARGIN,
            judge_timeout: Duration::from_millis(DEFAULT_JUDGE_TIMEOUT_MS),
            variation_timeout: Duration::from_millis(DEFAULT_VARIATION_TIMEOUT_MS),
            min_actions: DEFAULT_MIN_ACTIONS,
            vignette_dir: None,
            server_host: "0.0.0.0".to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_allowed_origins: None,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            llm_base_url: get("LLM_BASE_URL")
                .or_else(|| get("OLLAMA_BASE_URL"))
                .unwrap_or(defaults.llm_base_url),
            llm_model: get("LLM_MODEL")
                .or_else(|| get("OLLAMA_MODEL"))
                .unwrap_or(defaults.llm_model),
            judge_model: get("JUDGE_MODEL"),
            live_enabled: get("LIVE_ENABLED")
                .map(|v| parse_flag("LIVE_ENABLED", &v, defaults.live_enabled))
                .unwrap_or(defaults.live_enabled),
            live_timeout: millis(&get, "LIVE_TIMEOUT_MS", defaults.live_timeout),
            live_max_tokens: parsed(&get, "LIVE_MAX_TOKENS", defaults.live_max_tokens),
            judge_margin: parsed(&get, "JUDGE_MARGIN", defaults.judge_margin),
            judge_timeout: millis(&get, "JUDGE_TIMEOUT_MS", defaults.judge_timeout),
            variation_timeout: millis(&get, "VARIATION_TIMEOUT_MS", defaults.variation_timeout),
            min_actions: parsed(&get, "MIN_ACTIONS", defaults.min_actions),
            vignette_dir: get("VIGNETTE_DIR").map(PathBuf::from),
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: get("SERVER_PORT")
                .or_else(|| get("PORT"))
                .map(|v| parse_or("SERVER_PORT", &v, defaults.server_port))
                .unwrap_or(defaults.server_port),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Debug>(key: &str, raw: &str, default: T) -> T {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, ?default, "Invalid setting, using default");
        default
    })
}

fn parsed<T: FromStr + Copy + std::fmt::Debug>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    get(key).map_or(default, |raw| parse_or(key, &raw, default))
}

fn millis(get: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(parsed(get, key, default_ms))
}

fn parse_flag(key: &str, raw: &str, default: bool) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(key, value = raw, default, "Invalid flag, using default");
            default
        }
    }
}
