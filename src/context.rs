//! Conversation state carried across turns: recent topics, message count,
//! extracted user name and preferences. The context is the only value in
//! this crate with a lifecycle longer than one call; updates are pure and
//! return a new snapshot for the caller to persist.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const RECENT_TOPICS_CAP: usize = 5;
const HISTORY_CAP: usize = 10;

/// Broad end-use classes inferred from the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Usage {
    Apparel,
    HomeTextile,
    Industrial,
}

/// Inferred user traits. Merged across turns, never implicitly cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub sustainability_focused: bool,
    pub preferred_yarn_type: Option<String>,
    pub usage: Option<Usage>,
    pub price_conscious: bool,
    pub quality_focused: bool,
}

impl Preferences {
    /// Overlays `newer` on top of `self`; set fields win, absent fields keep
    /// the existing value.
    pub fn merged(&self, newer: &Preferences) -> Preferences {
        Preferences {
            sustainability_focused: self.sustainability_focused || newer.sustainability_focused,
            preferred_yarn_type: newer
                .preferred_yarn_type
                .clone()
                .or_else(|| self.preferred_yarn_type.clone()),
            usage: newer.usage.or(self.usage),
            price_conscious: self.price_conscious || newer.price_conscious,
            quality_focused: self.quality_focused || newer.quality_focused,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Preferences::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub topic: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-session conversation state. Owned by exactly one session; callers
/// serialize access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationContext {
    pub last_topic: Option<String>,
    /// Most recent first, deduplicated, at most 5 entries.
    pub recent_topics: Vec<String>,
    pub message_count: u32,
    pub user_name: Option<String>,
    pub preferences: Preferences,
    /// At most the last 10 topic/timestamp pairs.
    pub conversation_history: Vec<HistoryEntry>,
    pub last_interaction: Option<DateTime<Utc>>,
}

/// Per-turn facts the engine learned, folded into the context.
#[derive(Debug, Clone, Default)]
pub struct TurnInfo {
    pub topic: String,
    pub user_name: Option<String>,
    pub preferences: Option<Preferences>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next context snapshot after a turn. Pure: `self` is not
    /// modified, so callers can diff or discard.
    pub fn updated(&self, turn: &TurnInfo) -> ConversationContext {
        let now = Utc::now();

        let mut recent = Vec::with_capacity(RECENT_TOPICS_CAP);
        recent.push(turn.topic.clone());
        for topic in &self.recent_topics {
            if !recent.contains(topic) && recent.len() < RECENT_TOPICS_CAP {
                recent.push(topic.clone());
            }
        }

        let mut history = self.conversation_history.clone();
        history.push(HistoryEntry { topic: turn.topic.clone(), timestamp: now });
        if history.len() > HISTORY_CAP {
            history.drain(..history.len() - HISTORY_CAP);
        }

        ConversationContext {
            last_topic: Some(turn.topic.clone()),
            recent_topics: recent,
            message_count: self.message_count + 1,
            user_name: turn.user_name.clone().or_else(|| self.user_name.clone()),
            preferences: match &turn.preferences {
                Some(p) => self.preferences.merged(p),
                None => self.preferences.clone(),
            },
            conversation_history: history,
            last_interaction: Some(now),
        }
    }
}

static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)my name is (\w+)",
        r"(?i)i am (\w+)",
        r"(?i)i'm (\w+)",
        r"(?i)call me (\w+)",
        r"(?i)^(\w+) here\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static name pattern"))
    .collect()
});

/// Pulls a self-introduced name out of the raw message, title-cased.
/// First matching pattern wins.
pub fn extract_user_name(text: &str) -> Option<String> {
    for pattern in NAME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let raw = caps.get(1)?.as_str();
            let mut chars = raw.chars();
            let first = chars.next()?;
            return Some(format!(
                "{}{}",
                first.to_uppercase(),
                chars.as_str().to_lowercase()
            ));
        }
    }
    None
}

const PREFERRED_YARN_TYPES: &[&str] = &["cotton", "polyester", "blend", "organic", "recycled"];

static APPAREL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(apparel|clothing|garment|fashion)\b").unwrap());
static HOME_TEXTILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(home textile|furnishing|upholstery)\b").unwrap());
static INDUSTRIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(industrial|technical)\b").unwrap());
static SUSTAINABILITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(eco|sustainable|organic|recycled|green)\b").unwrap());
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(cheap|affordable|budget|economical)\b").unwrap());
static QUALITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(premium|quality|best|high-end)\b").unwrap());

/// Infers preference deltas from one message. The last mentioned yarn type
/// wins within a message, matching re-introduction semantics.
pub fn extract_preferences(text: &str) -> Preferences {
    let lower = text.to_lowercase();
    let mut prefs = Preferences::default();

    for yarn_type in PREFERRED_YARN_TYPES {
        if lower.contains(yarn_type) {
            prefs.preferred_yarn_type = Some(yarn_type.to_string());
        }
    }

    if APPAREL_RE.is_match(&lower) {
        prefs.usage = Some(Usage::Apparel);
    } else if HOME_TEXTILE_RE.is_match(&lower) {
        prefs.usage = Some(Usage::HomeTextile);
    } else if INDUSTRIAL_RE.is_match(&lower) {
        prefs.usage = Some(Usage::Industrial);
    }

    if SUSTAINABILITY_RE.is_match(&lower) {
        prefs.sustainability_focused = true;
    }
    if PRICE_RE.is_match(&lower) {
        prefs.price_conscious = true;
    } else if QUALITY_RE.is_match(&lower) {
        prefs.quality_focused = true;
    }

    prefs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(topic: &str) -> TurnInfo {
        TurnInfo { topic: topic.to_string(), ..TurnInfo::default() }
    }

    #[test]
    fn recent_topics_stay_bounded_and_deduplicated() {
        let mut ctx = ConversationContext::new();
        for topic in ["product", "price", "shipping", "price", "quality", "samples", "colors"] {
            ctx = ctx.updated(&turn(topic));
        }
        assert!(ctx.recent_topics.len() <= 5);
        assert_eq!(ctx.recent_topics[0], "colors");
        let mut sorted = ctx.recent_topics.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ctx.recent_topics.len());
    }

    #[test]
    fn history_keeps_the_last_ten() {
        let mut ctx = ConversationContext::new();
        for i in 0..25 {
            ctx = ctx.updated(&turn(&format!("topic{i}")));
        }
        assert_eq!(ctx.conversation_history.len(), 10);
        assert_eq!(ctx.conversation_history.last().unwrap().topic, "topic24");
        assert_eq!(ctx.message_count, 25);
    }

    #[test]
    fn price_after_products_orders_recent_topics() {
        let ctx = ConversationContext::new();
        let ctx = ctx.updated(&turn("product"));
        let ctx = ctx.updated(&turn("price"));
        assert_eq!(ctx.recent_topics[0], "price");
        assert_eq!(ctx.recent_topics[1], "product");
        assert_eq!(ctx.last_topic.as_deref(), Some("price"));
    }

    #[test]
    fn user_name_survives_turns_without_reintroduction() {
        let ctx = ConversationContext::new();
        let ctx = ctx.updated(&TurnInfo {
            topic: "greeting".into(),
            user_name: Some("Priya".into()),
            preferences: None,
        });
        let ctx = ctx.updated(&turn("price"));
        assert_eq!(ctx.user_name.as_deref(), Some("Priya"));

        // a genuine re-introduction wins
        let ctx = ctx.updated(&TurnInfo {
            topic: "greeting".into(),
            user_name: Some("Anand".into()),
            preferences: None,
        });
        assert_eq!(ctx.user_name.as_deref(), Some("Anand"));
    }

    #[test]
    fn preferences_accumulate_and_never_clear() {
        let ctx = ConversationContext::new();
        let ctx = ctx.updated(&TurnInfo {
            topic: "sustainability".into(),
            user_name: None,
            preferences: Some(extract_preferences("looking for organic eco yarns")),
        });
        assert!(ctx.preferences.sustainability_focused);
        let ctx = ctx.updated(&TurnInfo {
            topic: "price".into(),
            user_name: None,
            preferences: Some(extract_preferences("something affordable")),
        });
        assert!(ctx.preferences.sustainability_focused);
        assert!(ctx.preferences.price_conscious);
    }

    #[test]
    fn name_extraction_patterns() {
        assert_eq!(extract_user_name("my name is priya").as_deref(), Some("Priya"));
        assert_eq!(extract_user_name("I'm Anand, from Karur").as_deref(), Some("Anand"));
        assert_eq!(extract_user_name("call me ravi").as_deref(), Some("Ravi"));
        assert_eq!(extract_user_name("what yarns do you sell"), None);
    }

    #[test]
    fn usage_and_focus_preferences() {
        let p = extract_preferences("I need premium cotton for garment manufacturing");
        assert_eq!(p.preferred_yarn_type.as_deref(), Some("cotton"));
        assert_eq!(p.usage, Some(Usage::Apparel));
        assert!(p.quality_focused);
    }

    #[test]
    fn context_round_trips_through_json() {
        let ctx = ConversationContext::new().updated(&turn("product"));
        let json = serde_json::to_string(&ctx).unwrap();
        let back: ConversationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back.last_topic.as_deref(), Some("product"));
        assert_eq!(back.message_count, 1);
    }
}
