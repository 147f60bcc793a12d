//! Topic scoring: blends token-level semantic similarity with keyword
//! relevance, then layers entity, intent, context and preference bonuses on
//! top. The combined score is a ranking value, not a probability; only the
//! relevance sub-score is clamped to [0, 1].

use serde::Deserialize;

use crate::context::ConversationContext;
use crate::entities::EntityBag;
use crate::intent::Intent;
use crate::kb::{KnowledgeBase, KnowledgeEntry};
use crate::text::{self, NormalizeOptions, Token};

/// Calibration constants for the scorer. All values are data so deployments
/// can retune without rebuilding; defaults are the shipped calibration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    pub semantic_weight: f32,
    pub relevance_weight: f32,
    pub keyword_weight: f32,
    pub fuzzy_weight: f32,
    pub topic_weight: f32,
    pub exact_weight: f32,
    pub fuzzy_tolerance: f32,
    pub yarn_type_bonus: f32,
    pub certification_bonus: f32,
    pub color_bonus: f32,
    pub context_bonus: f32,
    pub preference_bonus: f32,
    /// Score gap above which the match is considered well separated.
    pub separation_gap: f32,
    /// Acceptance threshold when the top match is well separated.
    pub threshold_separated: f32,
    /// Acceptance threshold when several topics score close together.
    pub threshold_crowded: f32,
    /// Scores above this but below the acceptance threshold ask for
    /// clarification instead of falling back.
    pub clarify_floor: f32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        ScoreParams {
            semantic_weight: 0.3,
            relevance_weight: 0.35,
            keyword_weight: 0.25,
            fuzzy_weight: 0.15,
            topic_weight: 0.2,
            exact_weight: 0.1,
            fuzzy_tolerance: 0.25,
            yarn_type_bonus: 0.25,
            certification_bonus: 0.2,
            color_bonus: 0.15,
            context_bonus: 0.05,
            preference_bonus: 0.1,
            separation_gap: 0.15,
            threshold_separated: 0.18,
            threshold_crowded: 0.25,
            clarify_floor: 0.10,
        }
    }
}

/// One scored topic. `score` is the combined ranking value; the two
/// sub-scores are kept for logging and tests.
#[derive(Debug, Clone)]
pub struct TopicScore {
    pub topic: &'static str,
    pub score: f32,
    pub semantic: f32,
    pub relevance: f32,
}

/// Keyword relevance of a query against one entry, in [0, 1].
///
/// Four signals: stemmed keyword hits weighted by query position (earlier
/// words count more, floor 0.5), exact unstemmed keyword hits, fuzzy hits
/// for typo tolerance, and synonym-expanded overlap with the entry corpus.
pub fn relevance_score(corrected_query: &str, entry: &KnowledgeEntry, params: &ScoreParams) -> f32 {
    let query_tokens = text::normalize(
        corrected_query,
        NormalizeOptions { expand_synonyms: true, ..NormalizeOptions::default() },
    );
    if query_tokens.is_empty() {
        return 0.0;
    }
    let keyword_tokens: Vec<Token> = entry
        .keywords
        .iter()
        .flat_map(|kw| text::normalize(kw, NormalizeOptions::default()))
        .collect();

    let mut keyword_score = 0.0;
    let mut exact_bonus = 0.0;
    for (index, token) in query_tokens.iter().enumerate() {
        let position_weight = (1.0 - index as f32 * 0.05).max(0.5);
        if keyword_tokens.contains(token) {
            keyword_score += 0.15 * position_weight;
        }
        for kw in entry.keywords {
            if kw.eq_ignore_ascii_case(token) {
                exact_bonus += 0.2;
            }
        }
    }

    let mut fuzzy_score = 0.0;
    for query_token in &query_tokens {
        for keyword_token in &keyword_tokens {
            if text::fuzzy_match(query_token, keyword_token, params.fuzzy_tolerance) {
                fuzzy_score += 0.1;
            }
        }
    }

    let mut topic_score = 0.0;
    for token in text::expand_with_synonyms(&query_tokens) {
        if entry
            .tokens
            .iter()
            .any(|t| *t == token || text::fuzzy_match(t, &token, params.fuzzy_tolerance))
        {
            topic_score += 0.1;
        }
    }

    let combined = keyword_score * params.keyword_weight
        + fuzzy_score * params.fuzzy_weight
        + topic_score * params.topic_weight
        + exact_bonus * params.exact_weight;
    combined.clamp(0.0, 1.0)
}

fn entity_bonus(entry: &KnowledgeEntry, entities: &EntityBag, params: &ScoreParams) -> f32 {
    let mut bonus = 0.0;
    if entities
        .yarn_types
        .iter()
        .any(|yt| entry.keywords.iter().any(|kw| kw.contains(yt.as_str())))
    {
        bonus += params.yarn_type_bonus;
    }
    if entities
        .certifications
        .iter()
        .any(|cert| entry.keywords.iter().any(|kw| kw.contains(cert.as_str())))
    {
        bonus += params.certification_bonus;
    }
    if !entities.colors.is_empty() && entry.topic == "colors" {
        bonus += params.color_bonus;
    }
    bonus
}

/// Per-intent topic affinities. These pairings are calibration data like the
/// weights, but they change with the KB topic set, so they live here.
fn intent_bonus(intent: Intent, topic: &str) -> f32 {
    match intent {
        Intent::Purchase if topic.contains("order") || topic.contains("price") => 0.2,
        Intent::Information if topic.contains("company") => 0.15,
        Intent::Specification if topic.contains("specification") || topic.contains("quality") => {
            0.25
        }
        Intent::Comparison if topic.contains("yarn") => 0.15,
        Intent::Shipping if topic.contains("shipping") => 0.25,
        Intent::Sustainability if topic.contains("sustainability") || topic.contains("eco") => 0.25,
        Intent::Samples if topic.contains("sample") => 0.25,
        Intent::Contact if topic.contains("contact") => 0.25,
        Intent::Cancellation if topic.contains("cancel") || topic.contains("return") => 0.25,
        _ => 0.0,
    }
}

fn preference_bonus(
    entry: &KnowledgeEntry,
    context: &ConversationContext,
    params: &ScoreParams,
) -> f32 {
    let prefs = &context.preferences;
    let mut bonus = 0.0;
    if prefs.sustainability_focused
        && (entry.topic.contains("sustainability")
            || entry.topic.contains("recycled")
            || entry.topic.contains("organic"))
    {
        bonus += params.preference_bonus;
    }
    if let Some(yarn_type) = &prefs.preferred_yarn_type {
        if entry.keywords.iter().any(|kw| kw.contains(yarn_type.as_str())) {
            bonus += params.preference_bonus;
        }
    }
    bonus
}

/// Scores every KB entry against the corrected query and returns them
/// ranked best first. The sort is stable, so KB order breaks exact ties.
pub fn score_topics(
    corrected_query: &str,
    kb: &'static KnowledgeBase,
    entities: &EntityBag,
    intent: Intent,
    context: &ConversationContext,
    params: &ScoreParams,
) -> Vec<TopicScore> {
    let query_tokens = text::normalize(corrected_query, NormalizeOptions::default());

    let mut scores: Vec<TopicScore> = kb
        .entries()
        .iter()
        .map(|entry| {
            let semantic = text::semantic_similarity(&query_tokens, &entry.tokens);
            let relevance = relevance_score(corrected_query, entry, params);
            let context_bonus = if context.last_topic.as_deref() == Some(entry.topic) {
                params.context_bonus
            } else {
                0.0
            };
            let score = semantic * params.semantic_weight
                + relevance * params.relevance_weight
                + entity_bonus(entry, entities, params)
                + intent_bonus(intent, entry.topic)
                + context_bonus
                + preference_bonus(entry, context, params);
            TopicScore { topic: entry.topic, score, semantic, relevance }
        })
        .collect();

    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

/// How confident the engine should act on the ranked scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Answer with the top topic.
    High,
    /// Ask a clarifying question mentioning the top candidates.
    Medium,
    /// Fall back.
    Low,
}

/// The acceptance threshold tightens when several topics score close
/// together and relaxes when the winner is well separated.
pub fn adaptive_threshold(scores: &[TopicScore], params: &ScoreParams) -> f32 {
    let top = scores.first().map(|s| s.score).unwrap_or(0.0);
    let second = scores.get(1).map(|s| s.score).unwrap_or(0.0);
    if top - second > params.separation_gap {
        params.threshold_separated
    } else {
        params.threshold_crowded
    }
}

pub fn band(scores: &[TopicScore], params: &ScoreParams) -> Band {
    let top = scores.first().map(|s| s.score).unwrap_or(0.0);
    let threshold = adaptive_threshold(scores, params);
    if top > threshold {
        Band::High
    } else if top > params.clarify_floor {
        Band::Medium
    } else {
        Band::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent;
    use crate::kb::KnowledgeBase;

    fn score_for(query: &str) -> Vec<TopicScore> {
        let params = ScoreParams::default();
        let detected = intent::detect(query);
        score_topics(
            &text::correct_spelling(query),
            KnowledgeBase::standard(),
            &crate::entities::extract(query),
            detected.name,
            &ConversationContext::new(),
            &params,
        )
    }

    #[test]
    fn product_questions_rank_product_topics_first() {
        let scores = score_for("yarn catalog and available varieties in stock");
        assert_eq!(scores[0].topic, "product");
    }

    #[test]
    fn shipping_question_beats_the_rest() {
        let scores = score_for("how long does delivery take to reach me");
        assert_eq!(scores[0].topic, "shipping");
        assert_eq!(band(&scores, &ScoreParams::default()), Band::High);
    }

    #[test]
    fn misspelled_cancellation_still_ranks_cancellation() {
        let corrected = text::correct_spelling("cancle my oredr");
        let detected = intent::detect("cancle my oredr");
        let scores = score_topics(
            &corrected,
            KnowledgeBase::standard(),
            &crate::entities::extract("cancle my oredr"),
            detected.name,
            &ConversationContext::new(),
            &ScoreParams::default(),
        );
        assert!(scores[0].topic.contains("cancel") || scores[0].topic.contains("return"));
        assert_eq!(band(&scores, &ScoreParams::default()), Band::High);
    }

    #[test]
    fn relevance_stays_within_unit_interval() {
        let params = ScoreParams::default();
        let kb = KnowledgeBase::standard();
        for query in [
            "yarn yarn yarn yarn yarn cotton cotton price price order buy purchase",
            "completely unrelated quantum astrophysics lecture",
            "",
        ] {
            for entry in kb.entries() {
                let r = relevance_score(query, entry, &params);
                assert!((0.0..=1.0).contains(&r), "relevance {r} for {query:?}");
            }
        }
    }

    #[test]
    fn adding_matching_keywords_never_lowers_relevance() {
        let params = ScoreParams::default();
        let kb = KnowledgeBase::standard();
        let entry = kb.get("price").unwrap();
        let narrow = relevance_score("price", entry, &params);
        let wider = relevance_score("price cost discount", entry, &params);
        assert!(wider >= narrow);
    }

    #[test]
    fn last_topic_continuity_nudges_the_score() {
        let params = ScoreParams::default();
        let kb = KnowledgeBase::standard();
        let mut ctx = ConversationContext::new();
        ctx.last_topic = Some("samples".to_string());
        let query = "can I try a small quantity first";
        let neutral = score_topics(
            query,
            kb,
            &EntityBag::default(),
            Intent::General,
            &ConversationContext::new(),
            &params,
        );
        let boosted =
            score_topics(query, kb, &EntityBag::default(), Intent::General, &ctx, &params);
        let find = |scores: &[TopicScore]| {
            scores.iter().find(|s| s.topic == "samples").map(|s| s.score).unwrap()
        };
        let diff = find(&boosted) - find(&neutral);
        assert!((diff - params.context_bonus).abs() < 1e-6);
    }

    #[test]
    fn gap_controls_the_threshold() {
        let params = ScoreParams::default();
        let separated = vec![
            TopicScore { topic: "a", score: 0.5, semantic: 0.0, relevance: 0.0 },
            TopicScore { topic: "b", score: 0.2, semantic: 0.0, relevance: 0.0 },
        ];
        assert_eq!(adaptive_threshold(&separated, &params), params.threshold_separated);
        let crowded = vec![
            TopicScore { topic: "a", score: 0.24, semantic: 0.0, relevance: 0.0 },
            TopicScore { topic: "b", score: 0.2, semantic: 0.0, relevance: 0.0 },
        ];
        assert_eq!(adaptive_threshold(&crowded, &params), params.threshold_crowded);
        assert_eq!(band(&crowded, &params), Band::Medium);
    }

    #[test]
    fn empty_scores_fall_to_the_low_band() {
        assert_eq!(band(&[], &ScoreParams::default()), Band::Low);
    }
}
