//! Intent classification over a declarative rule table.
//!
//! Each rule pairs regex patterns with a base priority and a keyword list;
//! a single generic scorer evaluates the whole table, so adding an intent
//! means adding a table row, not a branch.

use crate::text::correct_spelling;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversational purpose of an utterance. Closed set; `General` is the
/// catch-all when nothing scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Information,
    Purchase,
    Complaint,
    Gratitude,
    Cancellation,
    Confirmation,
    Negation,
    Comparison,
    Specification,
    Shipping,
    Sustainability,
    Samples,
    Contact,
    General,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::Information => "information",
            Intent::Purchase => "purchase",
            Intent::Complaint => "complaint",
            Intent::Gratitude => "gratitude",
            Intent::Cancellation => "cancellation",
            Intent::Confirmation => "confirmation",
            Intent::Negation => "negation",
            Intent::Comparison => "comparison",
            Intent::Specification => "specification",
            Intent::Shipping => "shipping",
            Intent::Sustainability => "sustainability",
            Intent::Samples => "samples",
            Intent::Contact => "contact",
            Intent::General => "general",
        };
        write!(f, "{label}")
    }
}

/// Classification result: best intent, runner-up, and a confidence
/// normalized to [0, 1].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IntentResult {
    pub name: Intent,
    pub confidence: f32,
    pub secondary: Option<Intent>,
}

impl IntentResult {
    pub fn general() -> Self {
        Self { name: Intent::General, confidence: 0.0, secondary: None }
    }
}

struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
    priority: f32,
    keywords: &'static [&'static str],
}

fn rule(intent: Intent, priority: f32, patterns: &[&str], keywords: &'static [&'static str]) -> IntentRule {
    IntentRule {
        intent,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(p).expect("static intent pattern"))
            .collect(),
        priority,
        keywords,
    }
}

/// Declaration order is the tie-break order: earlier rules win equal scores.
static INTENT_RULES: Lazy<Vec<IntentRule>> = Lazy::new(|| {
    vec![
        rule(
            Intent::Greeting,
            10.0,
            &[
                r"(?i)^(hi|hello|hey|greetings|good morning|good afternoon|good evening|howdy|sup|hiya|yo)\b",
                r"(?i)^(what'?s up|how are you|how'?s it going)",
            ],
            &["hello", "hi", "hey", "morning", "afternoon", "evening"],
        ),
        rule(
            Intent::Farewell,
            10.0,
            &[
                r"(?i)^(bye|goodbye|see you|farewell|have a good day|talk to you later|catch you later|take care)\b",
                r"(?i)\b(gotta go|got to go|leaving now|signing off)\b",
            ],
            &["bye", "goodbye", "farewell", "later"],
        ),
        rule(
            Intent::Information,
            8.0,
            &[
                r"(?i)^(what|how|which|where|when|why|who|can you tell)\b",
                r"(?i)tell me (about|more)|can you explain|i need to know|i want to know|i'?m looking for|looking for",
                r"(?i)about your company|about ksp|company details|company information",
                r"(?i)do you (have|offer|provide|sell|make|manufacture)",
                r"(?i)\b(learn|know|understand|find out|discover)\b.*\b(about|more)\b",
            ],
            &["what", "how", "tell", "explain", "about", "info", "information", "details"],
        ),
        // Declared before purchase: "cancel my order" scores both rules
        // equally and the more specific one must win the tie.
        rule(
            Intent::Cancellation,
            9.0,
            &[
                r"(?i)\b(cancel|cancellation|refund|return|stop order)\b",
                r"(?i)(don'?t|do not) want|changed my mind|no longer (need|want)",
                r"(?i)\b(exchange|send back|give back|money back)\b",
                r"(?i)want (my money back|to cancel|to return)",
            ],
            &["cancel", "refund", "return", "exchange", "money back"],
        ),
        rule(
            Intent::Purchase,
            9.0,
            &[
                r"(?i)\b(buy|purchase|order|ordering|checkout|cart|payment|pay for|shop)\b",
                r"(?i)\b(price|pricing|cost|costs|how much|rate|rates|quote|quotation|estimate)\b",
                r"(?i)i want to (buy|purchase|order|get|place)",
                r"(?i)place an order|make an order|submit order",
                r"(?i)\b(moq|minimum order|bulk order|wholesale)\b",
                r"(?i)add to cart|proceed to checkout",
            ],
            &["buy", "purchase", "order", "price", "cost", "quote", "payment", "checkout", "moq"],
        ),
        rule(
            Intent::Complaint,
            9.0,
            &[
                r"(?i)\b(complaint|complain|issue|problem|trouble|difficulty|concern)\b",
                r"(?i)not (happy|satisfied|working|good|pleased)|dissatisfied|disappointed",
                r"(?i)\b(poor|bad|terrible|awful|horrible|worst|unacceptable)\b",
                r"(?i)\b(damaged|defective|broken|wrong|incorrect|missing|late|delayed)\b",
                r"(?i)\b(frustrated|annoyed|upset|angry)\b",
                r"(?i)what went wrong|something'?s wrong|doesn'?t work",
            ],
            &["problem", "issue", "complaint", "damaged", "wrong", "bad", "frustrated"],
        ),
        rule(
            Intent::Gratitude,
            10.0,
            &[
                r"(?i)\b(thanks|thank you|thx|ty|appreciate|grateful|helpful)\b",
                r"(?i)\b(great help|very helpful|much appreciated|cheers)\b",
            ],
            &["thanks", "thank", "appreciate", "grateful", "helpful"],
        ),
        rule(
            Intent::Confirmation,
            7.0,
            &[
                r"(?i)^(confirm|verify|check|validate|yes|yep|yeah|sure|right|correct|ok|okay|affirmative|absolutely)\b",
                r"(?i)^(that'?s right|exactly|precisely|indeed)\b",
                r"(?i)sounds good|works for me|go ahead",
            ],
            &["yes", "confirm", "correct", "right", "okay", "sure"],
        ),
        rule(
            Intent::Negation,
            7.0,
            &[
                r"(?i)^(no|nope|nah|not really|don'?t think so|negative|never)\b",
                r"(?i)^(that'?s wrong|incorrect|not what i meant)\b",
                r"(?i)not interested|don'?t need",
            ],
            &["no", "nope", "not", "never", "wrong"],
        ),
        rule(
            Intent::Comparison,
            8.0,
            &[
                r"(?i)\b(difference|compare|comparison|versus|vs|better|best|prefer)\b",
                r"(?i)which (one|is|are) (better|best|recommended|preferred)",
                r"(?i)\b(pros and cons|advantages|disadvantages)\b",
                r"(?i)should i (choose|pick|select|go with)",
                r"(?i)what('?s| is) the difference|how does .* compare",
            ],
            &["difference", "compare", "better", "best", "versus", "prefer"],
        ),
        rule(
            Intent::Specification,
            8.0,
            &[
                r"(?i)\b(specification|specs|details|technical|parameters|properties|features)\b",
                r"(?i)\b(count|counts|thickness|strength|quality|grade|gsm|denier)\b",
                r"(?i)\b(ne \d+|yarn count|thread count)\b",
                r"(?i)what are the specs|technical details",
            ],
            &["specification", "specs", "technical", "count", "quality", "grade", "strength"],
        ),
        rule(
            Intent::Shipping,
            9.0,
            &[
                r"(?i)\b(ship|shipping|delivery|deliver|dispatch|courier|track|tracking)\b",
                r"(?i)\b(when will|how long|estimated|eta|arrival)\b",
                r"(?i)where is my (order|package|shipment)",
                r"(?i)shipping (cost|rate|time|method)",
            ],
            &["shipping", "delivery", "track", "dispatch", "courier", "arrival"],
        ),
        rule(
            Intent::Sustainability,
            8.0,
            &[
                r"(?i)\b(sustainable|sustainability|eco|eco-friendly|green|environment|organic)\b",
                r"(?i)\b(recycled|recyclable|carbon|footprint|ethical)\b",
                r"(?i)\b(gots|grs|oeko-tex|certified organic)\b",
            ],
            &["sustainable", "eco", "organic", "recycled", "green", "environment", "gots", "grs"],
        ),
        rule(
            Intent::Samples,
            8.0,
            &[
                r"(?i)\b(sample|swatch|trial|test|demo|specimen)\b",
                r"(?i)can i (see|get|try|have) (a |some )?(sample|swatch)",
                r"(?i)before (ordering|buying|purchasing)",
            ],
            &["sample", "swatch", "trial", "test", "demo"],
        ),
        rule(
            Intent::Contact,
            8.0,
            &[
                r"(?i)\b(contact|reach|call|email|phone|speak|talk)\b",
                r"(?i)how (can|do) i (contact|reach|call|email)",
                r"(?i)\b(customer service|support|helpline|representative)\b",
                r"(?i)want to (speak|talk) (to|with)",
            ],
            &["contact", "call", "email", "phone", "support", "reach"],
        ),
    ]
});

/// Score normalization ceiling: priority 10 + keyword cap 2 + multi-match 1,
/// rounded down so strong matches saturate at confidence 1.
const SCORE_CEILING: f32 = 12.0;

/// Detects the primary (and secondary) intent of the text. Never fails:
/// blank or unmatched input classifies as `General` with zero confidence.
pub fn detect(text: &str) -> IntentResult {
    if text.trim().is_empty() {
        return IntentResult::general();
    }
    let lower = correct_spelling(text);

    let mut scored: Vec<(Intent, f32)> = Vec::new();
    for rule in INTENT_RULES.iter() {
        let pattern_matches = rule.patterns.iter().filter(|p| p.is_match(&lower)).count();
        let pattern_score = if pattern_matches > 0 { rule.priority } else { 0.0 };
        let keyword_matches = rule.keywords.iter().filter(|k| lower.contains(*k)).count();

        let keyword_bonus = (keyword_matches as f32 * 0.5).min(2.0);
        let multi_match_bonus = if pattern_matches > 1 { 1.0 } else { 0.0 };
        let final_score = pattern_score + keyword_bonus + multi_match_bonus;

        if final_score > 0.0 {
            scored.push((rule.intent, final_score));
        }
    }

    // Stable sort keeps table order on ties.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    match scored.first() {
        None => IntentResult::general(),
        Some(&(name, score)) => IntentResult {
            name,
            confidence: (score / SCORE_CEILING).min(1.0),
            secondary: scored.get(1).map(|&(intent, _)| intent),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hi_is_a_confident_greeting() {
        let result = detect("hi");
        assert_eq!(result.name, Intent::Greeting);
        assert!(result.confidence > 0.6);
    }

    #[test]
    fn empty_input_is_general_with_zero_confidence() {
        let result = detect("");
        assert_eq!(result.name, Intent::General);
        assert_eq!(result.confidence, 0.0);
        assert!(result.secondary.is_none());
    }

    #[test]
    fn gibberish_is_general() {
        let result = detect("zzz qqq xxyzzy");
        assert_eq!(result.name, Intent::General);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn misspelled_cancellation_still_classifies() {
        let result = detect("cancle my oredr");
        assert_eq!(result.name, Intent::Cancellation);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn comparison_queries_are_detected() {
        // Spelled-out and contracted forms must both outrank the generic
        // what-question information intent.
        let result = detect("what is the difference between cotton and polyester");
        assert_eq!(result.name, Intent::Comparison);
        let result = detect("what's the difference between ring spun and open end");
        assert_eq!(result.name, Intent::Comparison);
    }

    #[test]
    fn secondary_intent_is_reported() {
        // "how much does shipping cost" hits both purchase and shipping
        let result = detect("how much does shipping cost?");
        assert!(result.secondary.is_some());
    }

    #[test]
    fn confidence_is_always_in_unit_interval() {
        for text in [
            "",
            "hi",
            "buy buy order price cost quote payment checkout moq purchase",
            "???!!!",
            "what is the price and how do i order and can you ship it",
        ] {
            let c = detect(text).confidence;
            assert!((0.0..=1.0).contains(&c), "confidence {c} out of range for {text:?}");
        }
    }
}
