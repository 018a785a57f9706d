//! Trigger matching - pick one vignette for a tag assignment.
//!
//! Priority order, first satisfied wins:
//!
//! 1. **Exact** - every template slot absent, `*`, or equal; all-wildcard triggers skipped
//! 2. **Partial** - most literal matches (at least 2, fewer than all), grade breaks ties
//! 3. **Mood** - literal match on the mood slot
//! 4. **Single** - any one literal match
//! 5. **Default** - the stage's catch-all
//!
//! Combo slots are tried in both orders at every tier where counting applies.

use crate::entities::Vignette;
use crate::value_objects::{QualityGrade, TagAssignment};

/// Slot layout the matcher evaluates against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTemplate {
    slots: Vec<String>,
    combo: Option<(String, String)>,
    mood_slot: Option<String>,
}

impl SlotTemplate {
    pub fn new(slots: Vec<String>) -> Self {
        Self {
            slots,
            combo: None,
            mood_slot: None,
        }
    }

    /// Template whose slots are whatever the tags carry (no stage available).
    pub fn from_tags(tags: &TagAssignment) -> Self {
        Self::new(tags.iter().map(|(slot, _)| slot.to_string()).collect())
    }

    pub fn with_combo(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.combo = Some((a.into(), b.into()));
        self
    }

    pub fn with_mood_slot(mut self, slot: impl Into<String>) -> Self {
        self.mood_slot = Some(slot.into());
        self
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn combo(&self) -> Option<(&str, &str)> {
        self.combo.as_ref().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Explicit mood slot, else the last template slot.
    pub fn mood_slot(&self) -> Option<&str> {
        self.mood_slot
            .as_deref()
            .or_else(|| self.slots.last().map(String::as_str))
    }

    /// The tags with the combo values exchanged, when the template has a combo.
    fn combo_swapped(&self, tags: &TagAssignment) -> Option<TagAssignment> {
        self.combo().map(|(a, b)| tags.swapped(a, b))
    }
}

/// Which priority tier selected the vignette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    Exact,
    Partial,
    Mood,
    Single,
    Default,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Partial => "partial",
            Self::Mood => "mood",
            Self::Single => "single",
            Self::Default => "default",
        }
    }

    /// Anything short of an exact hit means the input was vaguer than the vignette.
    pub fn is_degraded(self) -> bool {
        !matches!(self, Self::Exact)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome<'a> {
    pub vignette: &'a Vignette,
    pub tier: MatchTier,
}

/// Pick the best vignette. Never fails: falls through to `default`.
pub fn match_vignette<'a>(
    tags: &TagAssignment,
    candidates: &'a [Vignette],
    default: &'a Vignette,
    template: &SlotTemplate,
) -> &'a Vignette {
    match_with_tier(tags, candidates, default, template).vignette
}

/// [`match_vignette`], also reporting the tier that fired.
pub fn match_with_tier<'a>(
    tags: &TagAssignment,
    candidates: &'a [Vignette],
    default: &'a Vignette,
    template: &SlotTemplate,
) -> MatchOutcome<'a> {
    let slots = template.slots();
    let swapped = template.combo_swapped(tags);

    let outcome = |vignette, tier| MatchOutcome { vignette, tier };

    // 1. Exact
    if let Some(found) = candidates.iter().find(|c| {
        !c.trigger.is_all_wildcard()
            && (c.trigger.accepts(tags, slots)
                || swapped.as_ref().is_some_and(|s| c.trigger.accepts(s, slots)))
    }) {
        return outcome(found, MatchTier::Exact);
    }

    // 2. Partial
    let literal_count = |c: &Vignette| {
        let direct = c.trigger.literal_matches(tags, slots);
        swapped
            .as_ref()
            .map_or(direct, |s| direct.max(c.trigger.literal_matches(s, slots)))
    };
    let mut best: Option<(&Vignette, usize)> = None;
    for candidate in candidates {
        let count = literal_count(candidate);
        if count < 2 || count >= slots.len() {
            continue;
        }
        let better = match best {
            None => true,
            Some((current, current_count)) => {
                count > current_count
                    || (count == current_count
                        && candidate.grade.rank() > current.grade.rank())
            }
        };
        if better {
            best = Some((candidate, count));
        }
    }
    if let Some((found, _)) = best {
        return outcome(found, MatchTier::Partial);
    }

    // 3. Mood
    if let Some(mood) = template.mood_slot() {
        if let Some(value) = tags.get(mood) {
            if let Some(found) = candidates
                .iter()
                .find(|c| c.trigger.get(mood).is_some_and(|t| t.is_literal(value)))
            {
                return outcome(found, MatchTier::Mood);
            }
        }
    }

    // 4. Any single literal
    if let Some(found) = candidates.iter().find(|c| literal_count(*c) > 0) {
        return outcome(found, MatchTier::Single);
    }

    // 5. Default
    outcome(default, MatchTier::Default)
}

/// Tier equivalent of a vignette picked by ranking rather than by the priority walk.
///
/// A pick that shares no literal with the tags counts as [`MatchTier::Default`].
pub fn tier_of_choice(
    tags: &TagAssignment,
    vignette: &Vignette,
    is_default: bool,
    template: &SlotTemplate,
) -> MatchTier {
    if is_default {
        return MatchTier::Default;
    }
    let slots = template.slots();
    let swapped = template.combo_swapped(tags);
    let variants: Vec<&TagAssignment> = std::iter::once(tags).chain(swapped.as_ref()).collect();

    if !vignette.trigger.is_all_wildcard()
        && variants.iter().any(|t| vignette.trigger.accepts(t, slots))
    {
        return MatchTier::Exact;
    }
    let count = variants
        .iter()
        .map(|t| vignette.trigger.literal_matches(t, slots))
        .max()
        .unwrap_or(0);
    if count >= 2 {
        return MatchTier::Partial;
    }
    if count == 0 {
        return MatchTier::Default;
    }
    let mood_hit = template.mood_slot().is_some_and(|mood| {
        tags.get(mood)
            .is_some_and(|value| vignette.trigger.get(mood).is_some_and(|t| t.is_literal(value)))
    });
    if mood_hit {
        MatchTier::Mood
    } else {
        MatchTier::Single
    }
}

// =============================================================================
// Ranking
// =============================================================================

pub const LITERAL_MATCH_POINTS: i32 = 3;
pub const WILDCARD_MATCH_POINTS: i32 = 1;
pub const PERFECT_GRADE_BONUS: i32 = 2;
pub const DEFAULT_VIGNETTE_PENALTY: i32 = -5;

/// Default gap between the top two scores below which a judge is consulted.
pub const DEFAULT_JUDGE_MARGIN: i32 = 5;

#[derive(Debug, Clone, Copy)]
pub struct RankedVignette<'a> {
    pub vignette: &'a Vignette,
    pub score: i32,
    pub is_default: bool,
}

/// Score every vignette (default included) and sort descending.
///
/// +3 per literal match, +1 per explicit wildcard on a filled slot, +2 for a
/// `perfect` grade, -5 for the default. Equal scores keep library order.
pub fn rank_vignettes<'a>(
    tags: &TagAssignment,
    candidates: &'a [Vignette],
    default: &'a Vignette,
    template: &SlotTemplate,
) -> Vec<RankedVignette<'a>> {
    let slots = template.slots();
    let swapped = template.combo_swapped(tags);

    let score_for = |tags: &TagAssignment, vignette: &Vignette| {
        vignette.trigger.literal_matches(tags, slots) as i32 * LITERAL_MATCH_POINTS
            + vignette.trigger.wildcard_matches(tags, slots) as i32 * WILDCARD_MATCH_POINTS
    };

    let mut ranked: Vec<RankedVignette<'a>> = candidates
        .iter()
        .map(|v| (v, false))
        .chain(std::iter::once((default, true)))
        .map(|(vignette, is_default)| {
            let direct = score_for(tags, vignette);
            let mut score = swapped
                .as_ref()
                .map_or(direct, |s| direct.max(score_for(s, vignette)));
            if vignette.grade == QualityGrade::Perfect {
                score += PERFECT_GRADE_BONUS;
            }
            if is_default {
                score += DEFAULT_VIGNETTE_PENALTY;
            }
            RankedVignette {
                vignette,
                score,
                is_default,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Leading entries within `margin` of the top score.
///
/// A single entry means the winner is clear and no judge is needed.
pub fn close_contenders<'r, 'a>(
    ranked: &'r [RankedVignette<'a>],
    margin: i32,
) -> &'r [RankedVignette<'a>] {
    let Some(top) = ranked.first() else {
        return ranked;
    };
    let len = ranked
        .iter()
        .take_while(|r| top.score - r.score < margin)
        .count();
    &ranked[..len.max(1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Trigger;

    fn party_template() -> SlotTemplate {
        SlotTemplate::new(vec![
            "food".into(),
            "entertainment".into(),
            "vibe".into(),
        ])
    }

    fn default_vignette() -> Vignette {
        Vignette::new("default", QualityGrade::FunnyFail)
            .with_trigger(Trigger::new().with("food", "*").with("vibe", "*"))
    }

    fn vignette(id: &str, grade: QualityGrade, pairs: &[(&str, &str)]) -> Vignette {
        let trigger = pairs
            .iter()
            .fold(Trigger::new(), |t, (slot, value)| t.with(*slot, value));
        Vignette::new(id, grade).with_trigger(trigger)
    }

    fn spooky_magic_cake() -> TagAssignment {
        TagAssignment::new()
            .with("food", "cake")
            .with("entertainment", "magic_show")
            .with("vibe", "spooky")
    }

    #[test]
    fn exact_match_beats_mood_only_match() {
        let candidates = vec![
            vignette(
                "spooky_pizza",
                QualityGrade::Chaotic,
                &[("food", "pizza"), ("vibe", "spooky")],
            ),
            vignette(
                "cake_magic",
                QualityGrade::Perfect,
                &[("food", "cake"), ("entertainment", "magic_show"), ("vibe", "*")],
            ),
        ];
        let default = default_vignette();
        let outcome = match_with_tier(&spooky_magic_cake(), &candidates, &default, &party_template());
        assert_eq!(outcome.vignette.id, "cake_magic");
        assert_eq!(outcome.tier, MatchTier::Exact);
    }

    #[test]
    fn all_wildcard_candidate_is_skipped_for_exact() {
        let candidates = vec![
            vignette("catch_all", QualityGrade::Perfect, &[("food", "*")]),
            vignette("cake", QualityGrade::Partial, &[("food", "cake")]),
        ];
        let default = default_vignette();
        let chosen = match_vignette(&spooky_magic_cake(), &candidates, &default, &party_template());
        assert_eq!(chosen.id, "cake");
    }

    #[test]
    fn partial_prefers_more_matches_then_better_grade() {
        let tags = spooky_magic_cake();
        let candidates = vec![
            vignette(
                "two_chaotic",
                QualityGrade::Chaotic,
                &[("food", "cake"), ("entertainment", "magic_show"), ("vibe", "silly")],
            ),
            vignette(
                "two_partial",
                QualityGrade::Partial,
                &[("food", "cake"), ("vibe", "spooky"), ("entertainment", "clown")],
            ),
            vignette(
                "one_perfect",
                QualityGrade::Perfect,
                &[("food", "cake"), ("entertainment", "clown"), ("vibe", "silly")],
            ),
        ];
        let default = default_vignette();
        let outcome = match_with_tier(&tags, &candidates, &default, &party_template());
        assert_eq!(outcome.tier, MatchTier::Partial);
        assert_eq!(outcome.vignette.id, "two_partial");
    }

    #[test]
    fn mood_slot_match_when_nothing_overlaps_more() {
        let tags = spooky_magic_cake();
        let candidates = vec![
            vignette("pizza", QualityGrade::Perfect, &[("food", "pizza"), ("entertainment", "magic_show")]),
            vignette("spooky", QualityGrade::Chaotic, &[("food", "pizza"), ("vibe", "spooky")]),
        ];
        let default = default_vignette();
        let outcome = match_with_tier(&tags, &candidates, &default, &party_template());
        assert_eq!(outcome.tier, MatchTier::Mood);
        assert_eq!(outcome.vignette.id, "spooky");
    }

    #[test]
    fn single_literal_match_is_fourth_priority() {
        let tags = spooky_magic_cake();
        let candidates = vec![vignette(
            "magic",
            QualityGrade::Partial,
            &[("entertainment", "magic_show"), ("food", "pizza")],
        )];
        let default = default_vignette();
        let outcome = match_with_tier(&tags, &candidates, &default, &party_template());
        assert_eq!(outcome.tier, MatchTier::Single);
        assert_eq!(outcome.vignette.id, "magic");
    }

    #[test]
    fn empty_tags_resolve_to_default() {
        let candidates = vec![vignette("cake", QualityGrade::Perfect, &[("food", "cake")])];
        let default = default_vignette();
        let outcome = match_with_tier(
            &TagAssignment::new(),
            &candidates,
            &default,
            &party_template(),
        );
        assert_eq!(outcome.tier, MatchTier::Default);
        assert_eq!(outcome.vignette.id, "default");
    }

    #[test]
    fn empty_candidate_list_resolves_to_default() {
        let default = default_vignette();
        let chosen = match_vignette(&spooky_magic_cake(), &[], &default, &party_template());
        assert_eq!(chosen.id, "default");
    }

    #[test]
    fn combo_order_does_not_matter() {
        let template = SlotTemplate::new(vec!["first".into(), "second".into(), "mood".into()])
            .with_combo("first", "second");
        let candidates = vec![vignette(
            "dog_cat",
            QualityGrade::Perfect,
            &[("first", "dog"), ("second", "cat")],
        )];
        let default = default_vignette();

        let forward = TagAssignment::new()
            .with("first", "dog")
            .with("second", "cat")
            .with("mood", "happy");
        let backward = forward.swapped("first", "second");

        assert_eq!(
            match_vignette(&forward, &candidates, &default, &template).id,
            "dog_cat"
        );
        assert_eq!(
            match_vignette(&backward, &candidates, &default, &template).id,
            "dog_cat"
        );

        let swapped_candidates: Vec<Vignette> = candidates
            .iter()
            .map(|v| {
                let trigger = v.trigger.swapped("first", "second");
                v.clone().with_trigger(trigger)
            })
            .collect();
        assert_eq!(
            match_vignette(&backward, &swapped_candidates, &default, &template).id,
            "dog_cat"
        );
    }

    #[test]
    fn combo_swap_counts_for_partial() {
        let template = SlotTemplate::new(vec!["first".into(), "second".into(), "mood".into()])
            .with_combo("first", "second");
        let candidates = vec![vignette(
            "dog_cat_sad",
            QualityGrade::Partial,
            &[("first", "dog"), ("second", "cat"), ("mood", "sad")],
        )];
        let tags = TagAssignment::new()
            .with("first", "cat")
            .with("second", "dog")
            .with("mood", "happy");
        let default = default_vignette();
        let outcome = match_with_tier(&tags, &candidates, &default, &template);
        assert_eq!(outcome.tier, MatchTier::Partial);
    }

    #[test]
    fn ranked_choice_maps_back_to_a_tier() {
        let tags = spooky_magic_cake();
        let template = party_template();
        let exact = vignette(
            "cake_magic",
            QualityGrade::Perfect,
            &[("food", "cake"), ("entertainment", "magic_show")],
        );
        let mood = vignette("spooky", QualityGrade::Chaotic, &[("vibe", "spooky"), ("food", "pizza")]);
        let default = default_vignette();

        assert_eq!(tier_of_choice(&tags, &exact, false, &template), MatchTier::Exact);
        assert_eq!(tier_of_choice(&tags, &mood, false, &template), MatchTier::Mood);
        assert_eq!(tier_of_choice(&tags, &default, true, &template), MatchTier::Default);

        let unrelated = vignette("pizza", QualityGrade::Perfect, &[("food", "pizza")]);
        assert_eq!(
            tier_of_choice(&tags, &unrelated, false, &template),
            MatchTier::Default
        );
        assert_eq!(
            tier_of_choice(&TagAssignment::new(), &exact, false, &template),
            MatchTier::Default
        );
    }

    #[test]
    fn ranking_scores_literals_wildcards_grade_and_default() {
        let tags = spooky_magic_cake();
        let candidates = vec![
            vignette(
                "cake_magic",
                QualityGrade::Perfect,
                &[("food", "cake"), ("entertainment", "magic_show"), ("vibe", "*")],
            ),
            vignette("spooky", QualityGrade::Partial, &[("vibe", "spooky")]),
        ];
        let default = default_vignette();
        let ranked = rank_vignettes(&tags, &candidates, &default, &party_template());

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].vignette.id, "cake_magic");
        assert_eq!(ranked[0].score, 3 + 3 + 1 + 2);
        assert_eq!(ranked[1].vignette.id, "spooky");
        assert_eq!(ranked[1].score, 3);
        assert!(ranked[2].is_default);
        assert_eq!(ranked[2].score, 1 + 1 - 5);
    }

    #[test]
    fn close_contenders_respects_margin() {
        let tags = spooky_magic_cake();
        let candidates = vec![
            vignette("cake", QualityGrade::Partial, &[("food", "cake")]),
            vignette("magic", QualityGrade::Partial, &[("entertainment", "magic_show")]),
            vignette("spooky", QualityGrade::Partial, &[("vibe", "spooky"), ("food", "cake")]),
        ];
        let default = default_vignette();
        let ranked = rank_vignettes(&tags, &candidates, &default, &party_template());

        // spooky: 6, cake: 3, magic: 3, default: -3
        assert_eq!(close_contenders(&ranked, DEFAULT_JUDGE_MARGIN).len(), 3);
        assert_eq!(close_contenders(&ranked, 2).len(), 1);
        assert_eq!(close_contenders(&[], 5).len(), 0);
    }
}
