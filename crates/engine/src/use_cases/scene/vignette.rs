//! Vignette tier - match the request against the stage library and compile.

use std::sync::Arc;

use promptplay_domain::{
    build_scene_script, match_with_tier, rank_vignettes, tier_of_choice, MatchTier, SceneScript,
    ScriptOptions, Stage, TagAssignment, Vignette,
};
use promptplay_shared::ResolveRequest;

use super::judge::SelectionJudge;
use super::text_tags::extract_tags;
use crate::infrastructure::ports::VignetteLibraryPort;

#[derive(Debug, Clone)]
pub struct VignetteResolution {
    pub script: SceneScript,
    pub vignette_id: String,
    pub tier: MatchTier,
}

pub struct VignetteTier {
    library: Arc<dyn VignetteLibraryPort>,
    judge: Option<SelectionJudge>,
    options: ScriptOptions,
}

impl VignetteTier {
    pub fn new(library: Arc<dyn VignetteLibraryPort>, options: ScriptOptions) -> Self {
        Self {
            library,
            judge: None,
            options,
        }
    }

    /// Consult a judge when free-text ranking leaves the match too close to call.
    pub fn with_judge(mut self, judge: SelectionJudge) -> Self {
        self.judge = Some(judge);
        self
    }

    /// `None` only when the task has no stage in the library.
    pub async fn resolve(&self, request: &ResolveRequest) -> Option<VignetteResolution> {
        let stage = self.library.stage(&request.task_id)?;
        let resolution = match request.free_text() {
            Some(text) => self.resolve_text(&stage, &request.tags, text).await,
            None => self.resolve_tags(&stage, &request.tags),
        };

        tracing::debug!(
            task_id = %stage.task_id,
            vignette_id = %resolution.vignette_id,
            match_tier = resolution.tier.as_str(),
            "Vignette selected"
        );
        Some(resolution)
    }

    fn resolve_tags(&self, stage: &Stage, tags: &TagAssignment) -> VignetteResolution {
        let outcome = match_with_tier(
            tags,
            &stage.vignettes,
            &stage.default_vignette,
            &stage.template(),
        );
        self.compile(stage, outcome.vignette, outcome.tier, tags)
    }

    /// Free-text mode: extracted tags (explicit tags win) go through the same
    /// priority matcher, and the judge may swap its pick for a close contender.
    async fn resolve_text(
        &self,
        stage: &Stage,
        explicit: &TagAssignment,
        text: &str,
    ) -> VignetteResolution {
        let mut tags = extract_tags(stage, text);
        for (slot, value) in explicit.iter() {
            tags.insert(slot, value);
        }

        let template = stage.template();
        let outcome = match_with_tier(&tags, &stage.vignettes, &stage.default_vignette, &template);
        let judge = match &self.judge {
            Some(judge) if outcome.tier != MatchTier::Default => judge,
            _ => return self.compile(stage, outcome.vignette, outcome.tier, &tags),
        };

        let ranked = rank_vignettes(&tags, &stage.vignettes, &stage.default_vignette, &template);
        let vignette = judge.choose(&ranked, outcome.vignette, text).await;
        let tier = if vignette.id == outcome.vignette.id {
            outcome.tier
        } else {
            let is_default = std::ptr::eq(vignette, &stage.default_vignette);
            tier_of_choice(&tags, vignette, is_default, &template)
        };
        self.compile(stage, vignette, tier, &tags)
    }

    fn compile(
        &self,
        stage: &Stage,
        vignette: &Vignette,
        tier: MatchTier,
        tags: &TagAssignment,
    ) -> VignetteResolution {
        VignetteResolution {
            script: build_scene_script(stage, vignette, tier, tags, &self.options),
            vignette_id: vignette.id.clone(),
            tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::library::VignetteLibrary;
    use crate::infrastructure::ports::{LlmResponse, MockLlmPort};
    use promptplay_domain::SuccessLevel;
    use std::time::Duration;

    fn tier() -> VignetteTier {
        let library = VignetteLibrary::builtin().unwrap();
        VignetteTier::new(Arc::new(library), ScriptOptions::default())
    }

    fn party() -> ResolveRequest {
        ResolveRequest::new("tab-1", "birthday_party")
    }

    #[tokio::test]
    async fn unknown_task_has_no_resolution() {
        let request = ResolveRequest::new("tab-1", "moon_base");
        assert!(tier().resolve(&request).await.is_none());
    }

    #[tokio::test]
    async fn exact_tags_pick_the_authored_vignette() {
        let tags = TagAssignment::new()
            .with("food", "cake")
            .with("entertainment", "magic_show")
            .with("vibe", "spooky");
        let resolution = tier().resolve(&party().with_tags(tags)).await.unwrap();

        assert_eq!(resolution.vignette_id, "cake_magic_show");
        assert_eq!(resolution.tier, MatchTier::Exact);
        assert_eq!(resolution.script.success_level, SuccessLevel::FullSuccess);
    }

    #[tokio::test]
    async fn empty_request_plays_the_default() {
        let resolution = tier().resolve(&party()).await.unwrap();
        assert_eq!(resolution.vignette_id, "empty_party");
        assert_eq!(resolution.tier, MatchTier::Default);
        assert!(!resolution.script.actions.is_empty());
    }

    #[tokio::test]
    async fn free_text_is_mapped_onto_slots() {
        let request = party().with_free_text("A silly pizza party with a juggling clown");
        let resolution = tier().resolve(&request).await.unwrap();
        assert_eq!(resolution.vignette_id, "pizza_clown_silly");
        assert_eq!(resolution.tier, MatchTier::Exact);
    }

    #[tokio::test]
    async fn explicit_tags_override_free_text() {
        let request = party()
            .with_tags(TagAssignment::new().with("food", "pizza"))
            .with_free_text("a silly cake clown");
        let resolution = tier().resolve(&request).await.unwrap();
        assert_eq!(resolution.vignette_id, "pizza_clown_silly");
    }

    #[tokio::test]
    async fn unrecognised_free_text_plays_the_default() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().times(0);
        let judge = SelectionJudge::new(Arc::new(llm), Duration::from_secs(1), 5);

        let request = party().with_free_text("make something cool");
        let resolution = tier().with_judge(judge).resolve(&request).await.unwrap();
        assert_eq!(resolution.vignette_id, "empty_party");
        assert_eq!(resolution.tier, MatchTier::Default);
    }

    #[tokio::test]
    async fn free_text_and_tags_agree_on_a_single_word() {
        let from_text = tier()
            .resolve(&party().with_free_text("spooky"))
            .await
            .unwrap();
        let from_tags = tier()
            .resolve(&party().with_tags(TagAssignment::new().with("vibe", "spooky")))
            .await
            .unwrap();

        assert_eq!(from_text.vignette_id, "spooky_party");
        assert_eq!(from_text.vignette_id, from_tags.vignette_id);
        assert_eq!(from_text.tier, from_tags.tier);
    }

    #[tokio::test]
    async fn judge_can_swap_for_a_close_contender() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Ok(LlmResponse::text(r#"{"choice":"fancy_cake"}"#)));
        let judge = SelectionJudge::new(Arc::new(llm), Duration::from_secs(1), 5);
        let tier = tier().with_judge(judge);

        // cake + spooky matches spooky_party exactly, but cake_magic_show and
        // fancy_cake rank within the margin.
        let resolution = tier
            .resolve(&party().with_free_text("a spooky cake"))
            .await
            .unwrap();
        assert_eq!(resolution.vignette_id, "fancy_cake");
        assert_eq!(resolution.tier, MatchTier::Single);
    }

    #[tokio::test]
    async fn judge_failure_keeps_the_matched_vignette() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Ok(LlmResponse::text("no idea")));
        let judge = SelectionJudge::new(Arc::new(llm), Duration::from_secs(1), 5);

        let resolution = tier()
            .with_judge(judge)
            .resolve(&party().with_free_text("a spooky cake"))
            .await
            .unwrap();
        assert_eq!(resolution.vignette_id, "spooky_party");
        assert_eq!(resolution.tier, MatchTier::Exact);
        assert_eq!(
            resolution.script.guide_hint.as_deref(),
            Some("Add a food and a show so the spooky party has something to do.")
        );
    }
}
