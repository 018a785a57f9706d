//! Tiered scene resolution: live → vignette → fallback.
//!
//! Each tier is tried in order and the first that produces a script wins. Only a
//! superseded request fails; every other problem degrades to the next tier.

use std::sync::Arc;

use promptplay_domain::{RequestId, SceneScript};
use promptplay_shared::{ResolveRequest, ResponseSource};
use thiserror::Error;
use tokio::time::Instant;

use super::fallback::FallbackCatalogue;
use super::live::{LiveError, LiveTier};
use super::vignette::VignetteTier;
use crate::use_cases::session::{RequestSequencer, RequestTicket};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Request {0} was superseded by a newer request")]
    Superseded(RequestId),
}

#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub request_id: RequestId,
    pub script: SceneScript,
    pub source: ResponseSource,
    /// Time spent in the tier that produced the script.
    pub latency_ms: u64,
    pub vignette_id: Option<String>,
}

pub struct ResolveScene {
    live: Option<LiveTier>,
    vignette: VignetteTier,
    fallback: FallbackCatalogue,
    sequencer: Arc<RequestSequencer>,
}

impl ResolveScene {
    pub fn new(
        live: Option<LiveTier>,
        vignette: VignetteTier,
        fallback: FallbackCatalogue,
        sequencer: Arc<RequestSequencer>,
    ) -> Self {
        Self {
            live,
            vignette,
            fallback,
            sequencer,
        }
    }

    pub fn live_enabled(&self) -> bool {
        self.live.is_some()
    }

    pub async fn execute(&self, request: &ResolveRequest) -> Result<ResolvedScene, ResolveError> {
        let ticket = self.sequencer.begin(&request.session_id);
        let result = self.run_tiers(request, &ticket).await;
        self.sequencer.finish(&ticket);
        result
    }

    async fn run_tiers(
        &self,
        request: &ResolveRequest,
        ticket: &RequestTicket,
    ) -> Result<ResolvedScene, ResolveError> {
        let task_id = request.task_id.as_str();

        if let Some(live) = &self.live {
            let started = Instant::now();
            match live.generate(request, &ticket.token).await {
                Ok(script) => {
                    let resolved = scene_result(ticket, script, ResponseSource::Live, started, None);
                    return self.publish(ticket, task_id, resolved);
                }
                Err(LiveError::Cancelled) => return Err(ResolveError::Superseded(ticket.id)),
                Err(e) => {
                    tracing::warn!(
                        task_id,
                        request_id = %ticket.id,
                        reason = e.reason(),
                        error = %e,
                        latency_ms = elapsed_ms(started),
                        "Live tier failed, falling back to vignettes"
                    );
                }
            }
        }

        let started = Instant::now();
        let resolved = match self.vignette.resolve(request).await {
            Some(resolution) => scene_result(
                ticket,
                resolution.script,
                ResponseSource::Vignette,
                started,
                Some(resolution.vignette_id),
            ),
            None => {
                tracing::info!(task_id, "No stage for task, using fallback script");
                let started = Instant::now();
                let script = self.fallback.script_for(task_id);
                scene_result(ticket, script, ResponseSource::Fallback, started, None)
            }
        };
        self.publish(ticket, task_id, resolved)
    }

    /// Drop the result when a newer request on the same session has started.
    fn publish(
        &self,
        ticket: &RequestTicket,
        task_id: &str,
        resolved: ResolvedScene,
    ) -> Result<ResolvedScene, ResolveError> {
        if ticket.is_cancelled() || !self.sequencer.is_current(ticket) {
            tracing::debug!(task_id, request_id = %ticket.id, "Discarding superseded result");
            return Err(ResolveError::Superseded(ticket.id));
        }
        tracing::info!(
            task_id,
            request_id = %ticket.id,
            tier = resolved.source.as_str(),
            latency_ms = resolved.latency_ms,
            actions = resolved.script.actions.len(),
            "Scene resolved"
        );
        Ok(resolved)
    }
}

fn scene_result(
    ticket: &RequestTicket,
    script: SceneScript,
    source: ResponseSource,
    started: Instant,
    vignette_id: Option<String>,
) -> ResolvedScene {
    ResolvedScene {
        request_id: ticket.id,
        script,
        source,
        latency_ms: elapsed_ms(started),
        vignette_id,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
