//! Scene use cases.
//!
//! Turn a resolve request into a playable script through the live, vignette and
//! fallback tiers.

use std::sync::Arc;

mod fallback;
mod judge;
mod live;
mod resolver;
mod text_tags;
mod vignette;

pub use fallback::{FallbackCatalogue, DEFAULT_FALLBACK_TASK};
pub use judge::SelectionJudge;
pub use live::{validate_live_script, LiveError, LiveTier};
pub use resolver::{ResolveError, ResolveScene, ResolvedScene};
pub use text_tags::extract_tags;
pub use vignette::{VignetteResolution, VignetteTier};

/// Container for scene use cases.
pub struct SceneUseCases {
    pub resolve: Arc<ResolveScene>,
}

impl SceneUseCases {
    pub fn new(resolve: Arc<ResolveScene>) -> Self {
        Self { resolve }
    }
}
