//! Application state and composition.

use std::sync::Arc;

use promptplay_domain::{AnimationTable, ScriptOptions, TimelineCompiler};

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    ports::{ClockPort, LlmPort, RandomPort, VignetteLibraryPort},
    settings::EngineSettings,
};
use crate::use_cases;
use crate::use_cases::scene::{
    FallbackCatalogue, LiveTier, ResolveScene, SelectionJudge, VignetteTier,
};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub settings: EngineSettings,
    pub library: Arc<dyn VignetteLibraryPort>,
    pub clock: Arc<dyn ClockPort>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub scene: use_cases::SceneUseCases,
    pub variation: Arc<use_cases::VariationService>,
}

impl App {
    pub fn new(
        settings: EngineSettings,
        llm: Arc<dyn LlmPort>,
        library: Arc<dyn VignetteLibraryPort>,
    ) -> Self {
        Self::with_ports(
            settings,
            llm,
            library,
            Arc::new(SystemClock),
            Arc::new(SystemRandom),
        )
    }

    pub fn with_ports(
        settings: EngineSettings,
        llm: Arc<dyn LlmPort>,
        library: Arc<dyn VignetteLibraryPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let live = settings
            .live_enabled
            .then(|| LiveTier::new(llm.clone(), settings.live_timeout, settings.live_max_tokens));

        let options = ScriptOptions {
            min_actions: settings.min_actions,
            compiler: TimelineCompiler::new(AnimationTable::standard()),
        };
        let mut vignette = VignetteTier::new(library.clone(), options);
        // The judge is a generative call too; offline mode skips it.
        if settings.live_enabled {
            vignette = vignette.with_judge(
                SelectionJudge::new(llm.clone(), settings.judge_timeout, settings.judge_margin)
                    .with_model(settings.judge_model.clone()),
            );
        }

        let sequencer = Arc::new(use_cases::RequestSequencer::new(random.clone()));
        let resolve = Arc::new(ResolveScene::new(
            live,
            vignette,
            FallbackCatalogue::new(),
            sequencer,
        ));

        let variation = Arc::new(use_cases::VariationService::new(
            settings.live_enabled.then_some(llm),
            random,
            settings.variation_timeout,
        ));

        tracing::info!(
            live_enabled = settings.live_enabled,
            model = %settings.llm_model,
            stages = library.task_ids().len(),
            "Application composed"
        );

        Self {
            settings,
            library,
            clock,
            use_cases: UseCases {
                scene: use_cases::SceneUseCases::new(resolve),
                variation,
            },
        }
    }
}
