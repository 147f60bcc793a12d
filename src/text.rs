//! Lexical normalization: spelling correction, tokenization, stopword
//! removal, rule-based stemming and synonym expansion, plus the small
//! string utilities (Levenshtein, sentiment, question type) the scorer and
//! composer build on.
//!
//! Everything here is a pure function of its input and the static tables.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A normalized word unit: lowercased, stemmed, stopword-filtered.
pub type Token = String;

/// A large, but not exhaustive, list of common English stop words.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being",
    "in", "on", "at", "to", "for", "with", "by", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "from", "up", "down", "of",
    "off", "over", "under", "again", "further", "then", "once", "here", "there", "when",
    "where", "why", "how", "all", "any", "both", "each", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "can", "will", "just", "should", "now", "i", "me", "my", "myself", "we", "our", "ours",
    "ourselves", "you", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "these",
    "those", "do", "does", "did", "doing", "have", "has", "had", "having", "would", "could",
    "ought", "i'm", "you're", "he's", "she's", "it's", "we're", "they're", "i've", "you've",
    "we've", "they've", "i'd", "you'd", "he'd", "she'd", "we'd", "they'd", "i'll", "you'll",
    "he'll", "she'll", "we'll", "they'll", "isn't", "aren't", "wasn't", "weren't", "hasn't",
    "haven't", "hadn't", "doesn't", "don't", "didn't", "won't", "wouldn't", "shan't",
    "shouldn't", "can't", "cannot", "couldn't", "mustn't", "let's", "that's", "who's",
    "what's", "here's", "there's", "when's", "where's", "why's", "how's",
];

/// Curated synonym table. Both directions trigger expansion: a token equal
/// to a key pulls in the values, a token equal to a value pulls in the key.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("buy", &["purchase", "order", "get", "acquire", "procure", "shop"]),
    ("price", &["cost", "rate", "pricing", "fee", "charge", "quote", "value"]),
    ("cheap", &["affordable", "budget", "economical", "inexpensive", "low-cost"]),
    ("expensive", &["costly", "premium", "high-end", "pricey"]),
    ("good", &["quality", "excellent", "great", "superior", "fine", "best"]),
    ("bad", &["poor", "inferior", "defective", "faulty", "substandard"]),
    ("fast", &["quick", "rapid", "speedy", "express", "urgent", "swift"]),
    ("slow", &["delayed", "late", "prolonged"]),
    ("help", &["assist", "support", "aid", "guide", "service"]),
    ("contact", &["reach", "call", "email", "message", "connect", "speak"]),
    ("ship", &["deliver", "send", "dispatch", "transport", "courier"]),
    ("return", &["refund", "exchange", "replace", "give back", "send back"]),
    ("cancel", &["stop", "abort", "terminate", "end", "revoke"]),
    ("yarn", &["thread", "fiber", "fibre", "string", "textile"]),
    ("cotton", &["natural fiber", "plant fiber"]),
    ("polyester", &["synthetic", "poly", "pet fiber"]),
    ("blend", &["mix", "combination", "composite", "hybrid"]),
    ("eco", &["sustainable", "green", "environmental", "eco-friendly", "organic"]),
    ("recycle", &["recycled", "reuse", "repurpose", "upcycle"]),
    ("thick", &["coarse", "heavy", "bulky", "dense"]),
    ("thin", &["fine", "light", "delicate", "lightweight"]),
    ("strong", &["durable", "sturdy", "tough", "resilient", "robust"]),
    ("soft", &["smooth", "gentle", "tender", "comfortable"]),
    ("color", &["colour", "shade", "dye", "hue", "tint", "tone"]),
    ("info", &["information", "details", "data", "specs", "specifications"]),
    ("company", &["business", "firm", "organization", "enterprise", "manufacturer"]),
    ("work", &["operate", "function", "run", "perform"]),
    ("make", &["produce", "manufacture", "create", "fabricate"]),
    ("use", &["utilize", "apply", "employ", "purpose", "application"]),
    ("sample", &["swatch", "test", "trial", "demo", "specimen"]),
    ("quantity", &["amount", "volume", "number", "bulk", "lot"]),
    ("discount", &["offer", "deal", "sale", "reduction", "savings", "promotion"]),
];

/// Common spelling mistakes and their corrections. Applied as whole-word,
/// case-insensitive substitutions before tokenization.
const SPELLING_CORRECTIONS: &[(&str, &str)] = &[
    ("cancle", "cancel"), ("cancell", "cancel"), ("canel", "cancel"), ("cncel", "cancel"),
    ("cacnel", "cancel"), ("cancellation", "cancel"),
    ("oredr", "order"), ("ordr", "order"), ("oder", "order"), ("ordder", "order"),
    ("oerder", "order"),
    ("refnd", "refund"), ("refudn", "refund"), ("rfund", "refund"), ("refaund", "refund"),
    ("retrun", "return"), ("retrn", "return"), ("reutrn", "return"), ("retunr", "return"),
    ("shiping", "shipping"), ("shippping", "shipping"), ("shpping", "shipping"),
    ("delivry", "delivery"), ("deliverry", "delivery"), ("delvery", "delivery"),
    ("pric", "price"), ("prise", "price"), ("pirce", "price"),
    ("prodict", "product"), ("prodct", "product"), ("proudct", "product"),
    ("cottan", "cotton"), ("coton", "cotton"), ("cottton", "cotton"),
    ("poylester", "polyester"), ("polyster", "polyester"), ("polester", "polyester"),
    ("qualty", "quality"), ("qulity", "quality"), ("qualiy", "quality"),
    ("certifcate", "certificate"), ("certifiate", "certificate"), ("certificat", "certificate"),
    ("sustainble", "sustainable"), ("sustainabel", "sustainable"),
    ("sustainibility", "sustainability"),
    ("recyceld", "recycled"), ("recyclled", "recycled"), ("recyled", "recycled"),
    ("orgainc", "organic"), ("orgnaic", "organic"), ("orgnic", "organic"),
    ("yran", "yarn"), ("yarrn", "yarn"), ("yern", "yarn"),
    ("conatct", "contact"), ("contct", "contact"), ("conact", "contact"),
    ("adress", "address"), ("addres", "address"), ("addrss", "address"),
    ("pament", "payment"), ("paymnt", "payment"), ("payemnt", "payment"),
    ("accont", "account"), ("acount", "account"), ("acconut", "account"),
    ("specifcation", "specification"), ("specfication", "specification"),
    ("manufacturr", "manufacturer"), ("manifacturer", "manufacturer"),
    ("thnks", "thanks"), ("thanx", "thanks"), ("thx", "thanks"),
    ("plz", "please"), ("pls", "please"), ("pleas", "please"),
    ("msg", "message"), ("messge", "message"),
    ("qty", "quantity"), ("quantiy", "quantity"), ("quantitiy", "quantity"),
    ("wht", "what"), ("whats", "what is"), ("whts", "what is"),
    ("hw", "how"), ("hwo", "how"),
    ("ur", "your"), ("u", "you"), ("r", "are"),
    ("bcoz", "because"), ("coz", "because"), ("bcz", "because"),
    ("abt", "about"), ("bt", "but"),
    ("n", "and"), ("nd", "and"),
];

static SPELLING_REGEX: Lazy<(Regex, HashMap<&'static str, &'static str>)> = Lazy::new(|| {
    let map: HashMap<_, _> = SPELLING_CORRECTIONS.iter().copied().collect();
    let alternation = SPELLING_CORRECTIONS
        .iter()
        .map(|(wrong, _)| regex::escape(wrong))
        .collect::<Vec<_>>()
        .join("|");
    let re = Regex::new(&format!(r"\b({alternation})\b")).expect("static spelling pattern");
    (re, map)
});

/// Irregular inflections the suffix rules would mangle, mostly domain terms.
static IRREGULAR_STEMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("bought", "buy"), ("purchasing", "purchase"),
        ("shipping", "ship"), ("shipped", "ship"), ("ships", "ship"),
        ("ordering", "order"), ("ordered", "order"), ("orders", "order"),
        ("cancelled", "cancel"), ("cancelling", "cancel"), ("cancels", "cancel"),
        ("returned", "return"), ("returning", "return"), ("returns", "return"),
        ("refunded", "refund"), ("refunding", "refund"), ("refunds", "refund"),
        ("manufactured", "manufacture"), ("manufacturing", "manufacture"),
        ("certified", "certify"), ("certifying", "certify"), ("certifies", "certify"),
        ("produced", "produce"), ("producing", "produce"), ("produces", "produce"),
        ("delivered", "deliver"), ("delivering", "deliver"), ("delivers", "deliver"),
        ("contacted", "contact"), ("contacting", "contact"), ("contacts", "contact"),
        ("running", "run"), ("ran", "run"),
        ("better", "good"), ("best", "good"),
        ("worse", "bad"), ("worst", "bad"),
        ("companies", "company"), ("factories", "factory"),
        ("yarns", "yarn"), ("threads", "thread"), ("fibers", "fiber"), ("fibres", "fiber"),
        ("qualities", "quality"), ("quantities", "quantity"),
    ]
    .into_iter()
    .collect()
});

/// Options for [`normalize`].
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub expand_synonyms: bool,
    pub correct_spelling: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { expand_synonyms: false, correct_spelling: true }
    }
}

/// Rewrites known misspellings and lowercases the text.
pub fn correct_spelling(text: &str) -> String {
    let lower = text.to_lowercase();
    let (re, map) = &*SPELLING_REGEX;
    re.replace_all(&lower, |caps: &regex::Captures<'_>| {
        map.get(&caps[1]).copied().unwrap_or("").to_string()
    })
    .into_owned()
}

/// Suffix-stripping stemmer with an irregular-word table. Word order of the
/// rules matters; each rule guards against short words and double letters
/// where the plain strip would over-cut.
pub fn stem(word: &str) -> Token {
    if word.len() < 3 {
        return word.to_string();
    }
    if let Some(root) = IRREGULAR_STEMS.get(word) {
        return (*root).to_string();
    }

    let n = word.len();
    let strip = |k: usize| word[..n - k].to_string();

    if word.ends_with("ation") && n > 6 {
        strip(5)
    } else if word.ends_with("ment") && n > 6 {
        strip(4)
    } else if word.ends_with("ness") && n > 5 {
        strip(4)
    } else if (word.ends_with("able") || word.ends_with("ible")) && n > 4 {
        strip(4)
    } else if word.ends_with("ity") && n > 5 {
        strip(3)
    } else if word.ends_with("ive") && n > 5 {
        strip(3)
    } else if word.ends_with("ful") && n > 5 {
        strip(3)
    } else if word.ends_with("less") && n > 6 {
        strip(4)
    } else if word.ends_with("ing") && n > 4 {
        collapse_double(&word[..n - 3])
    } else if word.ends_with("ly") && n > 4 {
        strip(2)
    } else if word.ends_with("ies") && n > 4 {
        format!("{}y", &word[..n - 3])
    } else if word.ends_with("es") && n > 4 {
        if ["ches", "shes", "sses", "xes", "zes"].iter().any(|s| word.ends_with(s)) {
            strip(2)
        } else {
            strip(1)
        }
    } else if word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
        && n > 3
    {
        strip(1)
    } else if word.ends_with("ed") && n > 4 {
        if word.ends_with("ied") {
            format!("{}y", &word[..n - 3])
        } else {
            collapse_double(&word[..n - 2])
        }
    } else if word.ends_with("er") && n > 4 {
        strip(2)
    } else if word.ends_with("est") && n > 5 {
        strip(3)
    } else {
        word.to_string()
    }
}

fn collapse_double(base: &str) -> String {
    let b = base.as_bytes();
    if b.len() > 1 && b[b.len() - 1] == b[b.len() - 2] {
        base[..base.len() - 1].to_string()
    } else {
        base.to_string()
    }
}

/// Expands tokens with synonym-table entries in both directions,
/// deduplicating while preserving first-seen order.
pub fn expand_with_synonyms(tokens: &[Token]) -> Vec<Token> {
    let mut expanded: Vec<Token> = tokens.to_vec();
    for token in tokens {
        for (key, values) in SYNONYMS {
            if token == key {
                expanded.extend(values.iter().map(|v| v.to_string()));
            } else if values.contains(&token.as_str()) && !expanded.iter().any(|t| t == key) {
                expanded.push(key.to_string());
            }
        }
    }
    let mut seen = HashSet::new();
    expanded.retain(|t| seen.insert(t.clone()));
    expanded
}

/// Tokenizes text into normalized tokens. Empty or whitespace-only input
/// yields an empty list, never an error.
pub fn normalize(text: &str, opts: NormalizeOptions) -> Vec<Token> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let processed = if opts.correct_spelling {
        correct_spelling(text)
    } else {
        text.to_lowercase()
    };

    // Strip special characters; hyphens split compound words.
    let clean: String = processed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<Token> = clean
        .split_whitespace()
        .filter(|t| t.len() > 1)
        .filter(|t| !STOP_WORDS.contains(t))
        .map(stem)
        .collect();

    if opts.expand_synonyms {
        tokens = expand_with_synonyms(&tokens);
    }
    tokens
}

/// Minimum number of single-character edits between two strings.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Typo-tolerant word match: equality, containment, or edit-distance
/// similarity of at least `1 - tolerance`.
pub fn fuzzy_match(word_a: &str, word_b: &str, tolerance: f32) -> bool {
    if word_a.is_empty() || word_b.is_empty() {
        return false;
    }
    let a = word_a.to_lowercase();
    let b = word_b.to_lowercase();
    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }
    let distance = levenshtein(&a, &b);
    let max_len = a.chars().count().max(b.chars().count());
    let similarity = 1.0 - (distance as f32 / max_len as f32);
    similarity >= 1.0 - tolerance
}

const POSITIVE_WORDS: &[&str] = &[
    "great", "good", "excellent", "amazing", "wonderful", "fantastic", "perfect", "love",
    "happy", "pleased", "satisfied", "thanks", "thank", "appreciate", "helpful", "awesome",
    "best", "nice", "brilliant", "superb",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "awful", "horrible", "worst", "hate", "angry", "disappointed",
    "frustrated", "annoyed", "upset", "unhappy", "dissatisfied", "problem", "issue", "wrong",
    "broken", "defective", "complaint", "fail",
];

const URGENT_WORDS: &[&str] = &[
    "urgent", "immediately", "asap", "emergency", "critical", "now", "quickly", "fast",
    "hurry", "rush", "priority", "important",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy)]
pub struct Sentiment {
    pub score: i32,
    pub label: SentimentLabel,
    pub is_urgent: bool,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self { score: 0, label: SentimentLabel::Neutral, is_urgent: false }
    }
}

/// Counts occurrences of fixed positive/negative/urgency indicator words.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    if text.is_empty() {
        return Sentiment::default();
    }
    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as i32;
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as i32;
    let is_urgent = URGENT_WORDS.iter().any(|w| lower.contains(w));

    let score = positive - negative;
    let label = match score.cmp(&0) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    };
    Sentiment { score, label, is_urgent }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    What,
    How,
    Why,
    When,
    Where,
    Who,
    Which,
    YesNo,
    GeneralQuestion,
    Statement,
}

static YES_NO_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(can|could|would|will|do|does|is|are|have|has)\b").unwrap());

/// Classifies the surface question form, used for response formatting.
pub fn question_type(text: &str) -> QuestionType {
    let lower = text.to_lowercase();
    let starts = |prefixes: &[&str]| {
        prefixes.iter().any(|p| {
            lower.starts_with(p)
                && lower[p.len()..].chars().next().map_or(true, |c| !c.is_ascii_alphanumeric())
        })
    };

    if starts(&["what's", "whats", "what"]) {
        QuestionType::What
    } else if starts(&["how's", "hows", "how"]) {
        QuestionType::How
    } else if starts(&["why"]) {
        QuestionType::Why
    } else if starts(&["when's", "when"]) {
        QuestionType::When
    } else if starts(&["where's", "where"]) {
        QuestionType::Where
    } else if starts(&["who's", "who"]) {
        QuestionType::Who
    } else if starts(&["which"]) {
        QuestionType::Which
    } else if YES_NO_OPENER.is_match(&lower) {
        QuestionType::YesNo
    } else if text.trim().ends_with('?') {
        QuestionType::GeneralQuestion
    } else {
        QuestionType::Statement
    }
}

/// Term-frequency cosine similarity between two token lists. Raw TF, no
/// IDF; zero-token documents score 0 rather than dividing by zero.
pub fn cosine_tf(doc_a: &[Token], doc_b: &[Token]) -> f32 {
    if doc_a.is_empty() || doc_b.is_empty() {
        return 0.0;
    }

    fn tf(doc: &[Token]) -> HashMap<&str, f32> {
        let mut counts: HashMap<&str, f32> = HashMap::new();
        for t in doc {
            *counts.entry(t.as_str()).or_insert(0.0) += 1.0;
        }
        let len = doc.len() as f32;
        counts.values_mut().for_each(|v| *v /= len);
        counts
    }

    let tf_a = tf(doc_a);
    let tf_b = tf(doc_b);

    let dot: f32 = tf_a
        .iter()
        .filter_map(|(term, va)| tf_b.get(term).map(|vb| va * vb))
        .sum();
    let mag_a = tf_a.values().map(|v| v * v).sum::<f32>().sqrt();
    let mag_b = tf_b.values().map(|v| v * v).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

/// Jaccard set overlap between two token lists.
pub fn jaccard(doc_a: &[Token], doc_b: &[Token]) -> f32 {
    let set_a: HashSet<&str> = doc_a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = doc_b.iter().map(String::as_str).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        set_a.intersection(&set_b).count() as f32 / union as f32
    }
}

/// Blended semantic similarity over already-normalized tokens: cosine
/// carries most of the weight, Jaccard rewards raw overlap.
pub fn semantic_similarity(tokens_a: &[Token], tokens_b: &[Token]) -> f32 {
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    cosine_tf(tokens_a, tokens_b) * 0.7 + jaccard(tokens_a, tokens_b) * 0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(normalize("", NormalizeOptions::default()).is_empty());
        assert!(normalize("   \t\n", NormalizeOptions::default()).is_empty());
    }

    #[test]
    fn stopwords_and_short_tokens_are_dropped() {
        let tokens = normalize("what is the price of a yarn", NormalizeOptions::default());
        assert_eq!(tokens, vec!["price", "yarn"]);
    }

    #[test]
    fn spelling_correction_rewrites_whole_words() {
        assert_eq!(correct_spelling("cancle my oredr"), "cancel my order");
        // "scancle" is not a whole-word match
        assert_eq!(correct_spelling("scancle"), "scancle");
    }

    #[test]
    fn stemmer_handles_suffix_rules() {
        assert_eq!(stem("shipment"), "ship");
        assert_eq!(stem("softness"), "soft");
        assert_eq!(stem("sustainable"), "sustain");
        assert_eq!(stem("helpful"), "help");
        assert_eq!(stem("running"), "run"); // irregular
        assert_eq!(stem("spinning"), "spin"); // double-letter guard
        assert_eq!(stem("tried"), "try");
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("yarns"), "yarn");
    }

    #[test]
    fn stemming_is_idempotent_on_covered_suffixes() {
        for word in ["shipment", "softness", "quickly", "boxes", "colors", "delayed"] {
            let once = stem(word);
            assert_eq!(stem(&once), once, "stem({word}) not idempotent");
        }
    }

    #[test]
    fn synonym_expansion_is_bidirectional() {
        let expanded = expand_with_synonyms(&["buy".to_string()]);
        assert!(expanded.contains(&"purchase".to_string()));
        let reverse = expand_with_synonyms(&["purchase".to_string()]);
        assert!(reverse.contains(&"buy".to_string()));
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("yarn", "yarn"), 0);
    }

    #[test]
    fn fuzzy_match_tolerates_single_typos() {
        assert!(fuzzy_match("cotton", "cottin", 0.25));
        assert!(!fuzzy_match("cotton", "polyester", 0.25));
    }

    #[test]
    fn sentiment_counts_indicator_words() {
        let s = analyze_sentiment("this is terrible, my order is broken and wrong");
        assert_eq!(s.label, SentimentLabel::Negative);
        assert!(!s.is_urgent);

        let s = analyze_sentiment("great quality, thanks! but i need it urgent");
        assert_eq!(s.label, SentimentLabel::Positive);
        assert!(s.is_urgent);
    }

    #[test]
    fn question_types() {
        assert_eq!(question_type("what yarns do you sell?"), QuestionType::What);
        assert_eq!(question_type("do you ship to europe?"), QuestionType::YesNo);
        assert_eq!(question_type("nice weather today"), QuestionType::Statement);
    }

    #[test]
    fn cosine_is_zero_for_empty_docs() {
        assert_eq!(cosine_tf(&[], &["yarn".to_string()]), 0.0);
    }

    #[test]
    fn identical_docs_have_full_similarity() {
        let doc = vec!["cotton".to_string(), "yarn".to_string()];
        assert!((cosine_tf(&doc, &doc) - 1.0).abs() < 1e-6);
        assert!((jaccard(&doc, &doc) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn partially_overlapping_docs_score_strictly_between_bounds() {
        let a = vec!["cotton".to_string(), "yarn".to_string()];
        let b = vec!["yarn".to_string(), "price".to_string()];
        let c = cosine_tf(&a, &b);
        assert!(c > 0.0 && c < 1.0, "cosine {c}");
        let s = semantic_similarity(&a, &b);
        assert!(s > 0.0 && s < 1.0, "semantic {s}");
    }
}
