//! Response composition: enriches a matched reply with sentiment, entity
//! and personalization touches, and produces the clarification and fallback
//! replies used when no topic clears the threshold.
//!
//! All randomness flows through [`RandomSource`] so tests can pin the
//! probabilistic decorations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::ConversationContext;
use crate::entities::EntityBag;
use crate::intent::Intent;
use crate::kb::KnowledgeBase;
use crate::score::TopicScore;
use crate::text::{self, QuestionType, Sentiment, SentimentLabel};

/// Source of the composer's probabilistic choices.
pub trait RandomSource: Send {
    /// Uniform index in `0..len`. `len` is never 0.
    fn index(&mut self, len: usize) -> usize;
    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

/// Default source backed by the thread RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        rand::thread_rng().gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Deterministic source for tests.
#[derive(Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

const EMPATHY_PHRASES: &[&str] = &[
    "I understand your concern. ",
    "I'm sorry to hear that. ",
    "I appreciate you bringing this to our attention. ",
];

pub fn empathy_prefix(rng: &mut dyn RandomSource) -> &'static str {
    EMPATHY_PHRASES[rng.index(EMPATHY_PHRASES.len())]
}

pub const COMPLAINT_SUPPORT: &str = "Could you please tell me more about the issue? You can \
     also contact our support team at kspyarnskarur@gmail.com or +91 9994955782 for \
     immediate assistance.";

pub const COMPLAINT_SUGGESTIONS: &[&str] = &[
    "I need to speak with customer service",
    "How do I request a refund?",
    "What's your return policy?",
];

static YARN_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(our yarns|our products|yarns|products)\b").unwrap());
static MODAL_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(can|could|do|does|is|are|will|would)\b.*\?").unwrap());
static IMPLIES_YES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(offer|provide|have|available|yes|certainly|absolutely)\b").unwrap());

/// Follow-up nudges appended after answers on these topics.
const TOPIC_FOLLOW_UPS: &[(&str, &str)] = &[
    ("product", " Would you like to know about pricing or samples?"),
    ("price", " Would you like information about bulk discounts or placing an order?"),
    ("shipping", " Would you like to track an existing order?"),
    ("quality", " Would you like to see our certifications or request samples?"),
    ("sustainability", " Would you like to know about our recycled yarn options?"),
];

/// Enriches a high-confidence reply. The decoration order is fixed:
/// sentiment prefixes first, then entity elaborations, then the
/// probabilistic personalization touches, and the yes/no opener last.
pub fn compose_high(
    query: &str,
    base: String,
    sentiment: Sentiment,
    entities: &EntityBag,
    context: &ConversationContext,
    rng: &mut dyn RandomSource,
) -> String {
    let mut response = base;

    if sentiment.label == SentimentLabel::Negative {
        response = format!("{}{response}", empathy_prefix(rng));
    }
    if sentiment.is_urgent {
        response = format!("I understand this is urgent. {response}");
    }

    if let Some(first) = entities.yarn_types.first() {
        if !response.to_lowercase().contains(first.as_str()) {
            let mention = entities.yarn_types.join(" and ");
            response = YARN_MENTION
                .replace(&response, format!("our {mention} ${{1}}"))
                .into_owned();
        }
    }

    if !entities.counts.is_empty() {
        let counts = entities.counts.join(", ");
        if !response.contains(&counts) {
            response.push_str(&format!(
                " We offer these in various counts including {counts}."
            ));
        }
    }

    if !entities.colors.is_empty() && !response.to_lowercase().contains("color") {
        let colors = entities.colors.join(", ");
        response.push_str(&format!(" We offer various color options including {colors}."));
    }

    if !entities.certifications.is_empty() {
        let certs = entities.certifications.join(", ").to_uppercase();
        if !response.to_lowercase().contains(&certs.to_lowercase()) {
            response.push_str(&format!(" Our products carry {certs} certifications."));
        }
    }

    if let Some(name) = &context.user_name {
        if rng.chance(0.4) {
            if let Some(pos) = response.find(". ") {
                response.replace_range(pos..pos + 2, &format!(", {name}. "));
            }
        }
    }

    if context.message_count > 10 && rng.chance(0.2) {
        response = format!("Great to continue our conversation! {response}");
    }

    if !response.ends_with('?') && context.message_count > 2 {
        if let Some(last_topic) = &context.last_topic {
            if let Some((_, nudge)) =
                TOPIC_FOLLOW_UPS.iter().find(|(topic, _)| topic == last_topic)
            {
                if rng.chance(0.3) {
                    response.push_str(nudge);
                }
            }
        }
    }

    if text::question_type(query) == QuestionType::YesNo
        && !response.starts_with("Yes")
        && !response.starts_with("No")
        && MODAL_QUESTION.is_match(query)
        && IMPLIES_YES.is_match(&response)
    {
        response = format!("Yes! {response}");
    }

    response
}

/// Clarification for medium-confidence matches. Asks about the candidate
/// topics if there are several, otherwise probes for the missing detail.
pub fn clarifying_question(candidates: &[TopicScore], entities: &EntityBag) -> Option<String> {
    if candidates.len() > 1 {
        let names: Vec<String> = candidates
            .iter()
            .take(3)
            .map(|c| c.topic.replace('_', " "))
            .collect();
        return Some(format!(
            "I found information about {}. Which one interests you most?",
            names.join(", ")
        ));
    }
    if entities.yarn_types.is_empty() {
        return Some(
            "What type of yarn are you interested in? We offer cotton, polyester, blended, \
             and specialty yarns."
                .to_string(),
        );
    }
    if !entities.products.is_empty() && entities.counts.is_empty() {
        return Some("What yarn count (Ne) are you looking for?".to_string());
    }
    None
}

/// Clarification of last resort: name the likely topic and its opening
/// sentence, then ask for specifics.
pub fn clarify_with_hint(topic: &str, kb: &'static KnowledgeBase) -> String {
    let readable = topic.replace('_', " ");
    let hint = kb
        .get(topic)
        .and_then(|e| match &e.template {
            crate::kb::ResponseTemplate::Static(s) => s.split('.').next(),
            crate::kb::ResponseTemplate::Dynamic(_) => None,
        })
        .map(|s| format!("{s}. "))
        .unwrap_or_default();
    format!(
        "I think you're asking about {readable}. {hint}Could you please provide more \
         details like yarn type, count, or quantity so I can give you a more precise answer?"
    )
}

static NEW_VISITOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)first time",
        r"(?i)new here",
        r"(?i)never (been|visited|ordered) before",
        r"(?i)new customer",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static visitor pattern"))
    .collect()
});

pub fn is_new_visitor_greeting(text: &str) -> bool {
    NEW_VISITOR_PATTERNS.iter().any(|re| re.is_match(text))
}

pub const NEW_VISITOR_REPLY: &str = "Welcome to KSP Yarns! We're a leading manufacturer of \
     high-quality yarns with a focus on sustainability. How can I help you today?";

/// Suggested questions offered with a fallback reply, keyed by the
/// detected intent.
pub fn fallback_suggestions(intent: Intent) -> Vec<String> {
    let suggestions: &[&str] = match intent {
        Intent::Purchase => &[
            "How do I place an order?",
            "What are your prices?",
            "What's your minimum order quantity?",
        ],
        Intent::Information => &[
            "Tell me about your company",
            "What products do you offer?",
            "What certifications do you have?",
        ],
        Intent::Specification => &[
            "What yarn counts do you offer?",
            "Can you provide technical data sheets?",
            "Do you have GOTS or GRS certified yarns?",
        ],
        Intent::Shipping => &[
            "What are your shipping options?",
            "How long does delivery take?",
            "Do you ship internationally?",
        ],
        Intent::Sustainability => &[
            "Tell me about your recycled yarns",
            "What sustainability certifications do you have?",
            "Do you offer organic cotton yarns?",
        ],
        _ => &[
            "What products do you offer?",
            "How do I place an order?",
            "Tell me about your sustainability practices",
        ],
    };
    suggestions.iter().map(|s| s.to_string()).collect()
}

/// Fallback ladder: entity-aware ask, then a last-topic nudge, then the
/// generic capability menu.
pub fn fallback_reply(
    entities: &EntityBag,
    context: &ConversationContext,
    kb: &'static KnowledgeBase,
) -> String {
    if !entities.yarn_types.is_empty() || !entities.counts.is_empty() {
        let yarns = if entities.yarn_types.is_empty() {
            "specific".to_string()
        } else {
            entities.yarn_types.join(", ")
        };
        let counts = if entities.counts.is_empty() {
            String::new()
        } else {
            format!(" (counts: {})", entities.counts.join(", "))
        };
        return format!(
            "I see you're interested in {yarns} yarns{counts}. To give you the best \
             information, please let me know:\n\
             - Required yarn count (Ne)\n\
             - Quantity needed\n\
             - Delivery destination\n\
             - Any specific certifications (GOTS, GRS, etc.)\n\n\
             I can then provide detailed pricing and availability."
        );
    }

    if let Some(last_topic) = &context.last_topic {
        let has_follow_up = kb.get(last_topic).map_or(false, |e| !e.follow_ups.is_empty());
        if has_follow_up {
            return format!(
                "I'm not quite sure what you're asking. Were you still interested in {}? \
                 Or try asking about:\n\
                 - Our yarn products and specifications\n\
                 - Pricing and bulk orders\n\
                 - Shipping and delivery\n\
                 - Quality certifications",
                last_topic.replace('_', " ")
            );
        }
    }

    "I'd be happy to help! Could you please specify what you're looking for? I can assist \
     with:\n\n\
     - Yarn products (cotton, polyester, blends)\n\
     - Pricing and ordering\n\
     - Shipping information\n\
     - Quality certifications\n\
     - Sustainability practices\n\n\
     Just let me know your requirements!"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::analyze_sentiment;

    /// Never takes a probabilistic branch.
    struct NeverRandom;
    impl RandomSource for NeverRandom {
        fn index(&mut self, _len: usize) -> usize {
            0
        }
        fn chance(&mut self, _p: f64) -> bool {
            false
        }
    }

    /// Always takes a probabilistic branch.
    struct AlwaysRandom;
    impl RandomSource for AlwaysRandom {
        fn index(&mut self, _len: usize) -> usize {
            0
        }
        fn chance(&mut self, _p: f64) -> bool {
            true
        }
    }

    fn compose(query: &str, base: &str, entities: &EntityBag, ctx: &ConversationContext) -> String {
        compose_high(
            query,
            base.to_string(),
            analyze_sentiment(query),
            entities,
            ctx,
            &mut NeverRandom,
        )
    }

    #[test]
    fn negative_sentiment_gets_an_empathy_prefix() {
        let out = compose(
            "the yarn quality was terrible",
            "We offer a 30-day return policy.",
            &EntityBag::default(),
            &ConversationContext::new(),
        );
        assert!(EMPATHY_PHRASES.iter().any(|p| out.starts_with(p)), "{out}");
    }

    #[test]
    fn urgency_acknowledged_before_everything_else() {
        let out = compose(
            "urgent, my order is damaged",
            "We offer a 30-day return policy.",
            &EntityBag::default(),
            &ConversationContext::new(),
        );
        assert!(out.starts_with("I understand this is urgent. "), "{out}");
    }

    #[test]
    fn detected_yarn_types_are_woven_into_the_reply() {
        let entities = crate::entities::extract("do you sell cotton yarn");
        let out = compose(
            "do you sell cotton yarn",
            "We manufacture yarns in Karur.",
            &entities,
            &ConversationContext::new(),
        );
        assert!(out.contains("our cotton yarns"), "{out}");
    }

    #[test]
    fn counts_and_certifications_are_appended() {
        let entities = crate::entities::extract("Ne 40 GOTS certified please");
        let out = compose(
            "Ne 40 GOTS certified please",
            "We offer a comprehensive range.",
            &entities,
            &ConversationContext::new(),
        );
        assert!(out.contains("ne 40"), "{out}");
        assert!(out.contains("GOTS"), "{out}");
    }

    #[test]
    fn yes_no_questions_open_with_yes_when_the_reply_implies_it() {
        let out = compose(
            "do you offer bulk discounts?",
            "We offer competitive rates for bulk orders.",
            &EntityBag::default(),
            &ConversationContext::new(),
        );
        assert!(out.starts_with("Yes! "), "{out}");
    }

    #[test]
    fn name_drop_only_fires_on_the_random_branch() {
        let mut ctx = ConversationContext::new();
        ctx.user_name = Some("Priya".into());
        let base = "We offer samples. They ship fast.";
        let without = compose("samples?", base, &EntityBag::default(), &ctx);
        assert!(!without.contains("Priya"));
        let with = compose_high(
            "samples?",
            base.to_string(),
            Sentiment::default(),
            &EntityBag::default(),
            &ctx,
            &mut AlwaysRandom,
        );
        assert!(with.contains(", Priya. "), "{with}");
    }

    #[test]
    fn clarifying_question_prefers_topic_disambiguation() {
        let candidates = vec![
            TopicScore { topic: "cotton_yarns", score: 0.2, semantic: 0.0, relevance: 0.0 },
            TopicScore { topic: "price", score: 0.18, semantic: 0.0, relevance: 0.0 },
        ];
        let q = clarifying_question(&candidates, &EntityBag::default()).unwrap();
        assert!(q.contains("cotton yarns"));
        assert!(q.contains("price"));
    }

    #[test]
    fn clarifying_question_probes_for_yarn_type() {
        let candidates = vec![TopicScore {
            topic: "product",
            score: 0.2,
            semantic: 0.0,
            relevance: 0.0,
        }];
        let q = clarifying_question(&candidates, &EntityBag::default()).unwrap();
        assert!(q.contains("What type of yarn"));
    }

    #[test]
    fn fallback_ladder_prefers_entity_details() {
        let entities = crate::entities::extract("cotton ne 30");
        let ctx = ConversationContext::new();
        let out = fallback_reply(&entities, &ctx, KnowledgeBase::standard());
        assert!(out.contains("cotton"), "{out}");

        let mut with_topic = ConversationContext::new();
        with_topic.last_topic = Some("price".into());
        let out = fallback_reply(&EntityBag::default(), &with_topic, KnowledgeBase::standard());
        assert!(out.contains("still interested in price"), "{out}");

        let out = fallback_reply(
            &EntityBag::default(),
            &ConversationContext::new(),
            KnowledgeBase::standard(),
        );
        assert!(out.contains("I'd be happy to help"), "{out}");
    }

    #[test]
    fn new_visitor_phrases_are_detected() {
        assert!(is_new_visitor_greeting("this is my first time here"));
        assert!(is_new_visitor_greeting("I'm a new customer"));
        assert!(!is_new_visitor_greeting("what yarns do you sell"));
    }
}
