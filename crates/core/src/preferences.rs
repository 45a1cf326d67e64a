//! Preference extraction from free-text travel requests.
//!
//! Every rule category is an ordered table: keyword tables for the set-valued
//! fields and first-match-wins pattern cascades for budget, party size and
//! trip length. Output order always follows table order, never input order.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A closed set of canonical labels, each matched by a list of keyword variants.
pub trait KeywordCategory: Copy + Sized + 'static {
    /// Canonical categories paired with their keyword variants, in output order.
    const TABLE: &'static [(Self, &'static [&'static str])];

    fn as_str(&self) -> &'static str;

    fn keywords(&self) -> &'static [&'static str];

    /// Returns every category with at least one keyword contained in `normalized`.
    fn match_all(normalized: &str) -> Vec<Self> {
        Self::TABLE
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|keyword| normalized.contains(keyword)))
            .map(|(category, _)| *category)
            .collect()
    }
}

macro_rules! keyword_category {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $label:literal: [$($keyword:literal),+ $(,)?]),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl KeywordCategory for $name {
            const TABLE: &'static [(Self, &'static [&'static str])] =
                &[$((Self::$variant, &[$($keyword),+])),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            fn keywords(&self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($keyword),+],)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_category! {
    /// Cruise operators recognised by name or common abbreviation.
    CruiseLine {
        RoyalCaribbean => "royal caribbean": ["royal caribbean", "rcl", "royal"],
        Carnival => "carnival": ["carnival", "ccl"],
        Norwegian => "norwegian": ["norwegian", "ncl", "norwegian cruise line"],
        Princess => "princess": ["princess", "princess cruises"],
        Celebrity => "celebrity": ["celebrity", "celebrity cruises"],
        HollandAmerica => "holland america": ["holland america", "hal"],
        Disney => "disney": ["disney", "disney cruise line", "dcl"],
        Cunard => "cunard": ["cunard", "cunard line"],
        Virgin => "virgin": ["virgin", "virgin voyages"],
    }
}

keyword_category! {
    /// Stateroom categories.
    CabinType {
        Interior => "interior": ["interior", "inside", "inside cabin"],
        Oceanview => "oceanview": ["oceanview", "ocean view", "outside", "outside cabin"],
        Balcony => "balcony": ["balcony", "verandah", "veranda"],
        Suite => "suite": ["suite", "penthouse", "villa"],
        Family => "family": ["family", "family cabin", "family stateroom"],
    }
}

keyword_category! {
    /// Onboard and shore activity interests.
    Activity {
        Dining => "dining": ["dining", "food", "restaurant", "cuisine", "chef", "culinary"],
        Entertainment => "entertainment": [
            "entertainment", "shows", "music", "comedy", "theater", "nightlife",
        ],
        Wellness => "wellness": [
            "spa", "wellness", "fitness", "gym", "yoga", "massage", "relaxation",
        ],
        Adventure => "adventure": [
            "adventure", "excursions", "shores", "exploration", "hiking", "diving",
        ],
        Family => "family": [
            "family", "kids", "children", "family-friendly", "activities for kids",
        ],
        Romance => "romance": ["romance", "honeymoon", "anniversary", "couples", "romantic"],
        Gambling => "gambling": ["casino", "gambling", "poker", "blackjack", "slots"],
        Shopping => "shopping": ["shopping", "boutiques", "stores", "retail"],
    }
}

keyword_category! {
    /// Sailing regions.
    Destination {
        Caribbean => "caribbean": [
            "caribbean", "bahamas", "jamaica", "cozumel", "st. thomas", "st. maarten",
        ],
        Mediterranean => "mediterranean": [
            "mediterranean", "europe", "italy", "greece", "spain", "france",
        ],
        Alaska => "alaska": ["alaska", "alaskan", "glacier", "juneau", "skagway"],
        NorthernEurope => "northern europe": [
            "northern europe", "scandinavia", "norway", "iceland", "baltic",
        ],
        Asia => "asia": ["asia", "japan", "china", "singapore", "thailand", "vietnam"],
        Australia => "australia": ["australia", "new zealand", "south pacific", "tahiti"],
        Transatlantic => "transatlantic": [
            "transatlantic", "trans-atlantic", "atlantic crossing",
        ],
        PanamaCanal => "panama canal": ["panama canal", "panama", "canal"],
    }
}

keyword_category! {
    /// Accessibility, dietary and other passenger needs.
    SpecialRequirement {
        Accessibility => "accessibility": ["wheelchair", "accessible", "disability", "mobility"],
        Dietary => "dietary": [
            "vegetarian", "vegan", "gluten-free", "kosher", "halal", "allergies",
        ],
        Pets => "pets": ["pet", "dog", "cat", "animal"],
        Smoking => "smoking": ["smoking", "non-smoking", "cigar"],
        AgeRestrictions => "age_restrictions": [
            "adults only", "21+", "18+", "senior", "senior citizen",
        ],
    }
}

/// A budget constraint. Exactly one bound is ever present.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetRange {
    Min(f64),
    Max(f64),
    Target(f64),
}

impl BudgetRange {
    pub fn amount(&self) -> f64 {
        match self {
            Self::Min(amount) | Self::Max(amount) | Self::Target(amount) => *amount,
        }
    }

    /// Picks the bound from qualifier words anywhere in the input.
    fn classify(normalized: &str, amount: f64) -> Self {
        if normalized.contains("under") || normalized.contains("less than") {
            Self::Max(amount)
        } else if normalized.contains("over") || normalized.contains("more than") {
            Self::Min(amount)
        } else {
            Self::Target(amount)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub cruise_lines: Vec<CruiseLine>,
    pub cabin_types: Vec<CabinType>,
    pub budget_range: Option<BudgetRange>,
    pub activities: Vec<Activity>,
    pub destinations: Vec<Destination>,
    pub special_requirements: Vec<SpecialRequirement>,
    pub party_size: Option<u32>,
    pub duration_preference: Option<String>,
}

impl PreferenceRecord {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub const BUDGET_PATTERNS: &[&str] = &[
    r"\$([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)\s*(?:per person|pp|per person)",
    r"budget.*?\$([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)",
    r"around\s*\$([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)",
    r"under\s*\$([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)",
    r"less than\s*\$([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)",
    r"more than\s*\$([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)",
    r"over\s*\$([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)",
];

pub const PARTY_SIZE_PATTERNS: &[&str] = &[
    r"([0-9]+)\s*(?:people|guests|adults|passengers)",
    r"party of\s*([0-9]+)",
    r"([0-9]+)\s*(?:couple|couples)",
    r"([0-9]+)\s*(?:family|families)",
];

pub const DURATION_PATTERNS: &[&str] =
    &[r"([0-9]+)\s*(?:day|days)", r"([0-9]+)\s*(?:week|weeks)", r"([0-9]+)\s*(?:night|nights)"];

#[derive(Clone, Debug, Default)]
pub struct PreferenceExtractor;

impl PreferenceExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> PreferenceRecord {
        let normalized = normalize_text(text);

        PreferenceRecord {
            cruise_lines: CruiseLine::match_all(&normalized),
            cabin_types: CabinType::match_all(&normalized),
            budget_range: extract_budget(&normalized),
            activities: Activity::match_all(&normalized),
            destinations: Destination::match_all(&normalized),
            special_requirements: SpecialRequirement::match_all(&normalized),
            party_size: extract_party_size(&normalized),
            duration_preference: extract_duration(&normalized),
        }
    }
}

pub(crate) fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Compiles a static pattern table. The tables are covered by tests, so a
/// pattern that fails to compile shows up as a missing rule there.
fn compile_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|pattern| Regex::new(pattern).ok()).collect()
}

/// Runs a cascade: the first pattern whose capture parses wins.
fn first_capture<T>(
    patterns: &[Regex],
    text: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    patterns.iter().find_map(|pattern| {
        let captures = pattern.captures(text)?;
        parse(captures.get(1)?.as_str())
    })
}

fn budget_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile_patterns(BUDGET_PATTERNS))
}

fn party_size_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile_patterns(PARTY_SIZE_PATTERNS))
}

fn duration_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile_patterns(DURATION_PATTERNS))
}

fn extract_budget(normalized: &str) -> Option<BudgetRange> {
    let amount = first_capture(budget_patterns(), normalized, parse_amount)?;
    Some(BudgetRange::classify(normalized, amount))
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok().filter(|amount| amount.is_finite())
}

fn extract_party_size(normalized: &str) -> Option<u32> {
    first_capture(party_size_patterns(), normalized, |raw| raw.parse::<u32>().ok())
}

// The unit comes from the whole input, not the matched span, so
// "a 2 day trip next week" reports "2 weeks".
fn extract_duration(normalized: &str) -> Option<String> {
    let count = first_capture(duration_patterns(), normalized, |raw| raw.parse::<u32>().ok())?;
    let unit = if normalized.contains("week") {
        "weeks"
    } else if normalized.contains("night") {
        "nights"
    } else {
        "days"
    };
    Some(format!("{count} {unit}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        compile_patterns, Activity, BudgetRange, CabinType, CruiseLine, Destination,
        KeywordCategory, PreferenceExtractor, PreferenceRecord, SpecialRequirement,
        BUDGET_PATTERNS, DURATION_PATTERNS, PARTY_SIZE_PATTERNS,
    };

    #[test]
    fn all_pattern_tables_compile() {
        assert_eq!(compile_patterns(BUDGET_PATTERNS).len(), BUDGET_PATTERNS.len());
        assert_eq!(compile_patterns(PARTY_SIZE_PATTERNS).len(), PARTY_SIZE_PATTERNS.len());
        assert_eq!(compile_patterns(DURATION_PATTERNS).len(), DURATION_PATTERNS.len());
    }

    #[test]
    fn extracts_balcony_request_with_budget_party_and_nights() {
        let record = PreferenceExtractor::new()
            .extract("I want a balcony cabin under $1500 for 4 people, 7 nights");

        assert_eq!(record.cabin_types, vec![CabinType::Balcony]);
        assert_eq!(record.budget_range, Some(BudgetRange::Max(1500.0)));
        assert_eq!(record.party_size, Some(4));
        assert_eq!(record.duration_preference.as_deref(), Some("7 nights"));
        assert!(record.cruise_lines.is_empty());
        assert!(record.activities.is_empty());
        assert!(record.destinations.is_empty());
        assert!(record.special_requirements.is_empty());
    }

    #[test]
    fn unrecognised_or_empty_input_yields_empty_record() {
        let extractor = PreferenceExtractor::new();
        for text in ["", "   ", "hello there", "what can you do?"] {
            let record = extractor.extract(text);
            assert!(record.is_empty(), "expected empty record for {text:?}");
        }
    }

    #[test]
    fn budget_qualifier_words_pick_the_bound() {
        let extractor = PreferenceExtractor::new();
        assert_eq!(extractor.extract("over $900").budget_range, Some(BudgetRange::Min(900.0)));
        assert_eq!(
            extractor.extract("around $900").budget_range,
            Some(BudgetRange::Target(900.0))
        );
        assert_eq!(extractor.extract("under $900").budget_range, Some(BudgetRange::Max(900.0)));
        assert_eq!(
            extractor.extract("less than $900").budget_range,
            Some(BudgetRange::Max(900.0))
        );
        assert_eq!(
            extractor.extract("more than $900").budget_range,
            Some(BudgetRange::Min(900.0))
        );
    }

    #[test]
    fn budget_strips_thousands_separators_and_keeps_cents() {
        let extractor = PreferenceExtractor::new();
        assert_eq!(
            extractor.extract("our budget is $12,500.50 total").budget_range,
            Some(BudgetRange::Target(12_500.5))
        );
        assert_eq!(
            extractor.extract("$2,000 per person").budget_range,
            Some(BudgetRange::Target(2_000.0))
        );
    }

    #[test]
    fn first_budget_pattern_wins() {
        let record = PreferenceExtractor::new().extract("around $800 but under $1,200");
        assert_eq!(record.budget_range, Some(BudgetRange::Max(800.0)));
    }

    #[test]
    fn budget_without_dollar_sign_is_ignored() {
        let record = PreferenceExtractor::new().extract("under 1500 please");
        assert_eq!(record.budget_range, None);
    }

    #[test]
    fn party_size_patterns_cascade_in_order() {
        let extractor = PreferenceExtractor::new();
        assert_eq!(extractor.extract("6 guests").party_size, Some(6));
        assert_eq!(extractor.extract("a party of 5").party_size, Some(5));
        assert_eq!(extractor.extract("2 couples travelling").party_size, Some(2));
        assert_eq!(extractor.extract("3 families").party_size, Some(3));
        assert_eq!(extractor.extract("party of 8 with 3 adults").party_size, Some(3));
    }

    #[test]
    fn oversized_party_number_is_not_a_match() {
        let record = PreferenceExtractor::new().extract("99999999999 people");
        assert_eq!(record.party_size, None);
    }

    #[test]
    fn non_finite_budget_amount_is_not_a_match() {
        let extractor = PreferenceExtractor::new();
        let record = extractor.extract(&format!("under ${}", "9".repeat(400)));
        assert_eq!(record.budget_range, None);

        let record = extractor.extract(&format!("around ${} or under $2,000", "9".repeat(400)));
        assert_eq!(record.budget_range, Some(BudgetRange::Max(2_000.0)));

        let value = serde_json::to_value(&record).expect("record serializes");
        let decoded: PreferenceRecord = serde_json::from_value(value).expect("record decodes");
        assert_eq!(decoded, record);
    }

    #[test]
    fn duration_unit_follows_whole_input_substrings() {
        let extractor = PreferenceExtractor::new();
        assert_eq!(extractor.extract("10 days").duration_preference.as_deref(), Some("10 days"));
        assert_eq!(extractor.extract("2 weeks").duration_preference.as_deref(), Some("2 weeks"));
        assert_eq!(
            extractor.extract("a 2 day trip next week").duration_preference.as_deref(),
            Some("2 weeks")
        );
        assert_eq!(
            extractor.extract("5 days and 4 nights").duration_preference.as_deref(),
            Some("5 nights")
        );
    }

    #[test]
    fn sets_follow_table_order_not_input_order() {
        let record = PreferenceExtractor::new()
            .extract("Thinking Disney or Carnival, maybe Royal Caribbean, spa and casino nights");

        assert_eq!(
            record.cruise_lines,
            vec![CruiseLine::RoyalCaribbean, CruiseLine::Carnival, CruiseLine::Disney]
        );
        assert_eq!(record.activities, vec![Activity::Wellness, Activity::Gambling]);
    }

    #[test]
    fn category_appears_once_even_when_several_keywords_match() {
        let record =
            PreferenceExtractor::new().extract("Alaska! Glacier views, Juneau and Skagway stops");
        assert_eq!(record.destinations, vec![Destination::Alaska]);
    }

    #[test]
    fn matching_is_case_insensitive_substring_containment() {
        let record = PreferenceExtractor::new()
            .extract("  WHEELCHAIR access, VEGAN meals, and a Panama Canal crossing  ");
        assert_eq!(
            record.special_requirements,
            vec![SpecialRequirement::Accessibility, SpecialRequirement::Dietary]
        );
        assert_eq!(record.destinations, vec![Destination::PanamaCanal]);
    }

    #[test]
    fn family_keyword_hits_cabin_and_activity_tables() {
        let record = PreferenceExtractor::new().extract("a family trip");
        assert_eq!(record.cabin_types, vec![CabinType::Family]);
        assert_eq!(record.activities, vec![Activity::Family]);
    }

    #[test]
    fn each_table_variant_matches_its_own_keywords() {
        fn check<C: KeywordCategory + PartialEq + std::fmt::Debug>() {
            for (category, keywords) in C::TABLE {
                assert_eq!(category.keywords(), *keywords);
                for keyword in *keywords {
                    assert!(
                        C::match_all(keyword).contains(category),
                        "{keyword:?} should match {}",
                        category.as_str()
                    );
                }
            }
        }

        check::<CruiseLine>();
        check::<CabinType>();
        check::<Activity>();
        check::<Destination>();
        check::<SpecialRequirement>();
    }

    #[test]
    fn record_serializes_to_tool_contract() {
        let record = PreferenceExtractor::new()
            .extract("Honeymoon suite on Celebrity to the Mediterranean over $3,000, 2 adults");
        let value = serde_json::to_value(&record).expect("record serializes");

        assert_eq!(
            value,
            json!({
                "cruise_lines": ["celebrity"],
                "cabin_types": ["suite"],
                "budget_range": {"min": 3000.0},
                "activities": ["romance"],
                "destinations": ["mediterranean"],
                "special_requirements": [],
                "party_size": 2,
                "duration_preference": null
            })
        );

        let decoded: PreferenceRecord = serde_json::from_value(value).expect("record decodes");
        assert_eq!(decoded, record);
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = PreferenceExtractor::new();
        let text = "Norwegian interior cabin, 3 couples, budget $4,000, 14 nights to Asia";
        let first = serde_json::to_string(&extractor.extract(text)).expect("serializes");
        let second = serde_json::to_string(&extractor.extract(text)).expect("serializes");
        assert_eq!(first, second);
    }
}
