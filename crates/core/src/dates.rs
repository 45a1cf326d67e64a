//! Resolution of vague temporal expressions into concrete date ranges.
//!
//! Rules run as a cascade (season phrases, relative offsets, named months,
//! fallback) and the first rule that fires decides the whole result.

use std::sync::OnceLock;

use chrono::{Datelike, Days, Local, Month, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::preferences::normalize_text;

pub const SEASON_CONFIDENCE: f64 = 0.9;
pub const RELATIVE_CONFIDENCE: f64 = 0.8;
pub const NAMED_MONTH_CONFIDENCE: f64 = 0.7;
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

pub const FALLBACK_NOTE: &str = "Could not parse specific date, using approximate range";

/// Days added to the reference date for the fallback range.
const FALLBACK_WINDOW_DAYS: u64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Winter,
    Spring,
    Fall,
}

impl Season {
    /// Trigger phrases in evaluation order.
    pub const PHRASES: &'static [(Season, &'static [&'static str])] = &[
        (Season::Summer, &["next summer"]),
        (Season::Winter, &["next winter"]),
        (Season::Spring, &["next spring"]),
        (Season::Fall, &["next fall", "next autumn"]),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summer => "summer",
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Fall => "fall",
        }
    }

    pub fn start_month(&self) -> u32 {
        match self {
            Self::Summer => 6,
            Self::Winter => 12,
            Self::Spring => 3,
            Self::Fall => 9,
        }
    }

    pub fn end_month(&self) -> u32 {
        match self {
            Self::Summer => 8,
            Self::Winter => 2,
            Self::Spring => 5,
            Self::Fall => 11,
        }
    }

    /// Inclusive bounds of the next occurrence of this season after `reference`.
    ///
    /// A reference month at or past the start month rolls to next year. Winter
    /// ends in February of the following year.
    pub fn next_window(&self, reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let mut year = reference.year();
        if reference.month() >= self.start_month() {
            year += 1;
        }

        let start = NaiveDate::from_ymd_opt(year, self.start_month(), 1)?;
        let end_year = if self.end_month() < self.start_month() { year + 1 } else { year };
        let end = last_day_of_month(end_year, self.end_month())?;
        Some((start, end))
    }
}

/// Which rule produced a [`DateRange`]. Serialized inline as a single field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Season(Season),
    MonthsAhead(u32),
    WeeksAhead(u32),
    Month(#[serde(with = "month_name")] Month),
    Note(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub provenance: Provenance,
    pub confidence: f64,
}

impl DateRange {
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Note(_))
    }

    pub fn meets(&self, min_confidence: f64) -> bool {
        self.confidence >= min_confidence
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OffsetUnit {
    Months,
    Weeks,
}

impl OffsetUnit {
    // Months are approximated as 30 days.
    fn days_per_unit(self) -> u64 {
        match self {
            Self::Months => 30,
            Self::Weeks => 7,
        }
    }

    fn window_days(self) -> u64 {
        match self {
            Self::Months => 30,
            Self::Weeks => 7,
        }
    }

    fn provenance(self, count: u32) -> Provenance {
        match self {
            Self::Months => Provenance::MonthsAhead(count),
            Self::Weeks => Provenance::WeeksAhead(count),
        }
    }
}

const OFFSET_RULES: &[(OffsetUnit, &str)] =
    &[(OffsetUnit::Months, r"in ([0-9]+) months?"), (OffsetUnit::Weeks, r"in ([0-9]+) weeks?")];

const MONTH_NAMES: &[(&str, Month)] = &[
    ("january", Month::January),
    ("february", Month::February),
    ("march", Month::March),
    ("april", Month::April),
    ("may", Month::May),
    ("june", Month::June),
    ("july", Month::July),
    ("august", Month::August),
    ("september", Month::September),
    ("october", Month::October),
    ("november", Month::November),
    ("december", Month::December),
];

#[derive(Clone, Debug, Default)]
pub struct DateResolver;

impl DateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolves against `reference_date`, or today's local date when absent.
    pub fn resolve(&self, expression: &str, reference_date: Option<NaiveDate>) -> DateRange {
        let reference = reference_date.unwrap_or_else(|| Local::now().date_naive());
        self.resolve_at(expression, reference)
    }

    pub fn resolve_at(&self, expression: &str, reference: NaiveDate) -> DateRange {
        let normalized = normalize_text(expression);

        resolve_season(&normalized, reference)
            .or_else(|| resolve_offset(&normalized, reference))
            .or_else(|| resolve_named_month(&normalized, reference))
            .unwrap_or_else(|| fallback(reference))
    }
}

fn resolve_season(normalized: &str, reference: NaiveDate) -> Option<DateRange> {
    let season = Season::PHRASES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| normalized.contains(phrase)))
        .map(|(season, _)| *season)?;
    let (start_date, end_date) = season.next_window(reference)?;

    Some(DateRange {
        start_date,
        end_date,
        provenance: Provenance::Season(season),
        confidence: SEASON_CONFIDENCE,
    })
}

fn offset_patterns() -> &'static [(OffsetUnit, Regex)] {
    static PATTERNS: OnceLock<Vec<(OffsetUnit, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        OFFSET_RULES
            .iter()
            .filter_map(|(unit, pattern)| Regex::new(pattern).ok().map(|regex| (*unit, regex)))
            .collect()
    })
}

fn resolve_offset(normalized: &str, reference: NaiveDate) -> Option<DateRange> {
    offset_patterns().iter().find_map(|(unit, pattern)| {
        let captures = pattern.captures(normalized)?;
        let count = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let offset_days = u64::from(count).checked_mul(unit.days_per_unit())?;
        let start_date = reference.checked_add_days(Days::new(offset_days))?;
        let end_date = start_date.checked_add_days(Days::new(unit.window_days()))?;

        Some(DateRange {
            start_date,
            end_date,
            provenance: unit.provenance(count),
            confidence: RELATIVE_CONFIDENCE,
        })
    })
}

fn resolve_named_month(normalized: &str, reference: NaiveDate) -> Option<DateRange> {
    let (_, month) = MONTH_NAMES.iter().find(|(name, _)| normalized.contains(name))?;
    let month_number = month.number_from_month();

    // Only a strictly earlier month rolls over; the current month stays this year.
    let year =
        if reference.month() > month_number { reference.year() + 1 } else { reference.year() };
    let start_date = NaiveDate::from_ymd_opt(year, month_number, 1)?;
    let end_date = last_day_of_month(year, month_number)?;

    Some(DateRange {
        start_date,
        end_date,
        provenance: Provenance::Month(*month),
        confidence: NAMED_MONTH_CONFIDENCE,
    })
}

fn fallback(reference: NaiveDate) -> DateRange {
    let end_date =
        reference.checked_add_days(Days::new(FALLBACK_WINDOW_DAYS)).unwrap_or(NaiveDate::MAX);

    DateRange {
        start_date: reference,
        end_date,
        provenance: Provenance::Note(FALLBACK_NOTE.to_string()),
        confidence: FALLBACK_CONFIDENCE,
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

pub fn month_label(month: Month) -> &'static str {
    MONTH_NAMES
        .iter()
        .find(|(_, candidate)| *candidate == month)
        .map(|(name, _)| *name)
        .unwrap_or("unknown")
}

mod month_name {
    use chrono::Month;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(month: &Month, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(super::month_label(*month))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Month, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Month>()
            .map_err(|_| serde::de::Error::custom(format!("unknown month name `{raw}`")))
    }
}
