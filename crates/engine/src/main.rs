//! PromptPlay Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promptplay_engine::infrastructure::{
    library::{load_library, VignetteLibrary},
    ollama::OllamaClient,
    ports::{LlmPort, VignetteLibraryPort},
    settings::EngineSettings,
};
use promptplay_engine::{api, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine is often run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptplay_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PromptPlay Engine");

    let settings = EngineSettings::from_env();

    // A broken library is a content defect: refuse to start rather than play odd scenes.
    let library: Arc<dyn VignetteLibraryPort> = match &settings.vignette_dir {
        Some(dir) => Arc::new(load_library(dir)?),
        None => {
            tracing::info!("VIGNETTE_DIR not set, using the built-in stage");
            Arc::new(VignetteLibrary::builtin()?)
        }
    };

    let llm: Arc<dyn LlmPort> = Arc::new(OllamaClient::new(
        &settings.llm_base_url,
        &settings.llm_model,
    ));
    if settings.live_enabled {
        tracing::info!(
            base_url = %settings.llm_base_url,
            model = %settings.llm_model,
            timeout_ms = settings.live_timeout.as_millis() as u64,
            "Live tier enabled"
        );
    } else {
        tracing::info!("Live tier disabled, serving vignettes and fallbacks only");
    }

    let cors = build_cors_layer(settings.cors_allowed_origins.as_deref());
    let addr: SocketAddr = format!("{}:{}", settings.server_host, settings.server_port).parse()?;

    let app = Arc::new(App::new(settings, llm, library));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

/// `*` allows any origin; otherwise a comma-separated list of origins.
fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins.map(str::trim).filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // The game UI posts JSON, which triggers CORS preflights.
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
