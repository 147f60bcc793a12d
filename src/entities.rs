//! Domain entity extraction over the lowercased raw text.
//!
//! Surface forms matter here ("Ne 40", "GOTS"), so extraction runs before
//! stemming. One pattern list per category; matches keep insertion order
//! and duplicates are tolerated by all callers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Entities recognized in a single input text. Created fresh per query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityBag {
    pub products: Vec<String>,
    pub yarn_types: Vec<String>,
    pub counts: Vec<String>,
    pub numbers: Vec<String>,
    pub dates: Vec<String>,
    pub locations: Vec<String>,
    pub colors: Vec<String>,
    pub certifications: Vec<String>,
}

impl EntityBag {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
            && self.yarn_types.is_empty()
            && self.counts.is_empty()
            && self.numbers.is_empty()
            && self.dates.is_empty()
            && self.locations.is_empty()
            && self.colors.is_empty()
            && self.certifications.is_empty()
    }
}

/// Yarn counts: "Ne 40", "count 30", "ne 20 to 40", "Ne 20-40".
static COUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(ne|count)\s*\d+\s*((to|-)\s*\d+)?\b").unwrap());

/// Bare numbers with an optional measurement unit.
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(\.\d+)?\s*(kg|g|tons?|mm|cm|m|inch(es)?|yards|counts?)?\b").unwrap()
});

/// Numeric and written dates ("12/05/2024", "3rd march 2024").
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(\d{1,2}[-/]\d{1,2}[-/]\d{2,4}|\d{1,2}(st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*(\s+\d{2,4})?)\b",
    )
    .unwrap()
});

const YARN_TYPES: &[&str] = &[
    "cotton", "polyester", "blended", "blend", "recycled", "organic", "vortex", "ring spun",
    "ring-spun", "open end", "open-end", "oe yarn", "combed cotton", "carded cotton",
    "melange", "slub", "fancy yarn", "core-spun", "textured", "virgin polyester",
    "poly-cotton", "cotton-viscose", "viscose",
];

const PRODUCTS: &[&str] = &["yarn", "yarns", "thread", "fiber", "fibre", "textile"];

const LOCATIONS: &[&str] = &["india", "karur", "tamil nadu", "sukkaliyur", "gandhi nagar"];

const COLORS: &[&str] = &[
    "white", "black", "red", "blue", "green", "yellow", "pink", "grey", "gray", "brown",
    "orange", "purple", "maroon", "navy", "lavender", "rose",
];

const CERTIFICATIONS: &[&str] = &["gots", "grs", "oeko-tex", "iso 9001", "iso 14001", "iso"];

fn contained(text: &str, table: &[&str]) -> Vec<String> {
    table
        .iter()
        .filter(|needle| text.contains(*needle))
        .map(|s| s.to_string())
        .collect()
}

/// Extracts all recognized entities from the text. Deterministic and pure;
/// empty input yields an empty bag.
pub fn extract(text: &str) -> EntityBag {
    if text.trim().is_empty() {
        return EntityBag::default();
    }
    let lower = text.to_lowercase();

    EntityBag {
        counts: COUNT_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str().trim().to_string())
            .collect(),
        numbers: NUMBER_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str().trim().to_string())
            .collect(),
        dates: DATE_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect(),
        yarn_types: contained(&lower, YARN_TYPES),
        products: contained(&lower, PRODUCTS),
        locations: contained(&lower, LOCATIONS),
        colors: contained(&lower, COLORS),
        certifications: contained(&lower, CERTIFICATIONS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_full_round_trip_example() {
        let bag = extract("Ne 40 cotton yarn in blue, GOTS certified");
        assert!(bag.yarn_types.contains(&"cotton".to_string()));
        assert!(bag.counts.iter().any(|c| c.starts_with("ne 40")));
        assert!(bag.colors.contains(&"blue".to_string()));
        assert!(bag.certifications.contains(&"gots".to_string()));
    }

    #[test]
    fn count_ranges_are_captured_whole() {
        let bag = extract("do you have ne 20 to 40 in stock");
        assert!(bag.counts.iter().any(|c| c.contains("20") && c.contains("40")));
    }

    #[test]
    fn numbers_keep_their_units() {
        let bag = extract("I need 500 kg by next week");
        assert!(bag.numbers.iter().any(|n| n.contains("kg")));
    }

    #[test]
    fn dates_in_both_forms() {
        let bag = extract("deliver by 12/05/2024 or 3rd march");
        assert_eq!(bag.dates.len(), 2);
    }

    #[test]
    fn empty_text_gives_empty_bag() {
        assert!(extract("").is_empty());
        assert!(extract("   ").is_empty());
    }

    #[test]
    fn duplicates_are_tolerated() {
        let bag = extract("ne 40 or maybe ne 40");
        assert_eq!(bag.counts.len(), 2);

        // "iso 9001" also satisfies the bare "iso" entry
        let bag = extract("are you iso 9001 certified");
        assert!(bag.certifications.len() >= 2);
    }
}
