//! Entity extraction.
//!
//! Derives lightweight semantic metadata from raw chat text: keywords matched
//! against static vocabularies, a rule-classified intent, and mentioned
//! catalog model names. Pure functions over static data; extraction never
//! fails, absence of matches yields empty sets and the general intent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::memory_entry::Intent;

/// Brand and series tokens recognized as keywords
const BRAND_TERMS: &[&str] = &[
    "bmw", "3 series", "5 series", "x5", "x3", "m3", "m5", "z4", "7 series",
];

/// Generic topic terms recognized as keywords
const TOPIC_TERMS: &[&str] = &[
    "car",
    "vehicle",
    "engine",
    "horsepower",
    "transmission",
    "fuel",
    "price",
    "compare",
    "specs",
];

/// Known catalog model names, matched as whole vocabulary tokens
const MODEL_NAMES: &[&str] = &[
    "3 series", "5 series", "x5", "x3", "x1", "x7", "m3", "m5", "z4", "i3", "i8", "7 series",
];

/// Comparison signal words, highest intent priority
pub(crate) const COMPARISON_WORDS: &[&str] = &["compare", "vs", "versus", "difference"];
const PRICING_WORDS: &[&str] = &["price", "cost", "expensive", "cheap"];
const SPECIFICATION_WORDS: &[&str] = &["specs", "specification", "engine", "horsepower"];
const RECOMMENDATION_WORDS: &[&str] = &["recommend", "suggest", "best", "should"];

/// Model years recognized as keywords (2000-2030)
static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(20[0-2][0-9]|2030)\b").expect("year pattern is valid"));

/// Metadata extracted from one piece of text
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Matched vocabulary keywords and year tokens, duplicates collapsed
    pub keywords: Vec<String>,

    /// Classified intent
    pub intent: Intent,

    /// Mentioned model names, in vocabulary order
    pub entities: Vec<String>,
}

/// Entity extractor over the static vocabularies
#[derive(Debug, Clone, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract keywords, intent and mentioned models in one pass
    pub fn extract(&self, text: &str) -> Extraction {
        Extraction {
            keywords: self.keywords(text),
            intent: self.classify_intent(text),
            entities: self.extract_models(text),
        }
    }

    /// Keyword extraction: vocabulary matches plus model-year tokens
    pub fn keywords(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let mut keywords: Vec<String> = Vec::new();

        for term in BRAND_TERMS.iter().chain(TOPIC_TERMS.iter()) {
            if text.contains(term) {
                keywords.push((*term).to_string());
            }
        }

        for matched in YEAR_PATTERN.find_iter(&text) {
            let year = matched.as_str().to_string();
            if !keywords.contains(&year) {
                keywords.push(year);
            }
        }

        keywords
    }

    /// Intent classification: ordered rule list, first match wins
    pub fn classify_intent(&self, text: &str) -> Intent {
        let text = text.to_lowercase();

        if COMPARISON_WORDS.iter().any(|w| text.contains(w)) {
            Intent::Comparison
        } else if PRICING_WORDS.iter().any(|w| text.contains(w)) {
            Intent::Pricing
        } else if SPECIFICATION_WORDS.iter().any(|w| text.contains(w)) {
            Intent::Specifications
        } else if RECOMMENDATION_WORDS.iter().any(|w| text.contains(w)) {
            Intent::Recommendation
        } else {
            Intent::General
        }
    }

    /// Mentioned model names, returned in vocabulary order.
    ///
    /// The vocabulary holds full tokens only, so overlapping substrings
    /// ("3 series" vs "series") cannot collide. No fuzzy matching.
    pub fn extract_models(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        MODEL_NAMES
            .iter()
            .filter(|model| text.contains(*model))
            .map(|model| (*model).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_keywords_match_vocabularies() {
        let extractor = EntityExtractor::new();
        let keywords = extractor.keywords("How much horsepower does the BMW X5 have?");
        assert!(keywords.contains(&"bmw".to_string()));
        assert!(keywords.contains(&"x5".to_string()));
        assert!(keywords.contains(&"horsepower".to_string()));
    }

    #[rstest]
    #[case("the 2000 model", "2000")]
    #[case("a 2015 3 series", "2015")]
    #[case("is the 2030 one out yet", "2030")]
    fn test_years_in_range_become_keywords(#[case] text: &str, #[case] year: &str) {
        let extractor = EntityExtractor::new();
        assert!(extractor.keywords(text).contains(&year.to_string()));
    }

    #[rstest]
    #[case("my 1999 car")]
    #[case("in the year 2031")]
    #[case("part number 320150 here")]
    fn test_years_out_of_range_are_ignored(#[case] text: &str) {
        let extractor = EntityExtractor::new();
        let keywords = extractor.keywords(text);
        assert!(!keywords.iter().any(|k| k.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_duplicate_years_collapse() {
        let extractor = EntityExtractor::new();
        let keywords = extractor.keywords("2020 or 2020?");
        assert_eq!(keywords.iter().filter(|k| *k == "2020").count(), 1);
    }

    #[rstest]
    #[case("compare the x5 and x3", Intent::Comparison)]
    #[case("x5 vs x3", Intent::Comparison)]
    #[case("what's the difference in price", Intent::Comparison)]
    #[case("how expensive is the m3", Intent::Pricing)]
    #[case("what engine does it have", Intent::Specifications)]
    #[case("which one should I buy", Intent::Recommendation)]
    #[case("hello there", Intent::General)]
    #[case("", Intent::General)]
    fn test_intent_classification(#[case] text: &str, #[case] expected: Intent) {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.classify_intent(text), expected);
    }

    #[test]
    fn test_comparison_beats_other_signals() {
        // "price", "engine" and "best" all appear, comparison still wins
        let extractor = EntityExtractor::new();
        let intent =
            extractor.classify_intent("compare the price and engine, which is best");
        assert_eq!(intent, Intent::Comparison);
    }

    #[test]
    fn test_extract_models_in_vocabulary_order() {
        let extractor = EntityExtractor::new();
        let models = extractor.extract_models("Is the X3 better than the X5?");
        assert_eq!(models, vec!["x5".to_string(), "x3".to_string()]);
    }

    #[test]
    fn test_extract_models_empty_for_plain_text() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract_models("I like driving fast").is_empty());
    }

    #[test]
    fn test_extract_combines_all_dimensions() {
        let extractor = EntityExtractor::new();
        let extraction = extractor.extract("Compare the 2022 X5 and X3 prices");
        assert_eq!(extraction.intent, Intent::Comparison);
        assert!(extraction.keywords.contains(&"2022".to_string()));
        assert_eq!(extraction.entities, vec!["x5".to_string(), "x3".to_string()]);
    }
}
