//! Free-text query interpretation.
//!
//! Turns a shopper question such as `"headphone bagus under 2 juta"` into the
//! category and price ceiling the search engine filters on. Interpretation is
//! table driven and never fails: unrecognized text yields no filters.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ordered `(trigger, category)` pairs; earlier rows win.
pub const CATEGORY_TRIGGERS: &[(&str, &str)] = &[
    ("laptop", "laptop"),
    ("notebook", "laptop"),
    ("komputer", "laptop"),
    ("smartphone", "smartphone"),
    ("hp", "smartphone"),
    ("handphone", "smartphone"),
    ("headphone", "headphone"),
    ("earphone", "headphone"),
    ("tablet", "tablet"),
    ("kamera", "kamera"),
    ("speaker", "audio"),
    ("audio", "audio"),
    ("drone", "drone"),
    ("jam", "jam"),
    ("smartwatch", "jam"),
    ("tv", "tv"),
];

/// Words that imply a price ceiling without a numeral.
pub const BUDGET_KEYWORDS: &[(&str, u64)] = &[
    ("murah", 5_000_000),
    ("budget", 5_000_000),
    ("hemat", 3_000_000),
    ("terjangkau", 4_000_000),
    ("ekonomis", 2_000_000),
];

/// Words that turn a query into a request for top-rated products.
pub const BEST_TRIGGERS: &[&str] = &["terbaik", "best", "rekomendasi", "bagus"];

/// Numeral-plus-unit patterns. Each pattern exposes the number as `amount`.
/// A number touching a thousands separator is never matched.
pub const PRICE_UNITS: &[PriceUnit] = &[
    PriceUnit {
        pattern: r"(?:^|[^\d.,])(?P<amount>\d+(?:[.,]\d+)?)\s*(?:juta|jt)\b",
        multiplier: 1_000_000.0,
    },
    PriceUnit {
        pattern: r"(?:^|[^\d.,])(?P<amount>\d+(?:[.,]\d+)?)\s*ribu\b",
        multiplier: 1_000.0,
    },
    PriceUnit {
        pattern: r"(?:^|[^\d.,])(?P<amount>\d+(?:[.,]\d+)?)\s*m\b",
        multiplier: 1_000_000.0,
    },
    PriceUnit {
        pattern: r"(?:^|[^\d.,])(?P<amount>\d+(?:[.,]\d+)?)\s*k\b",
        multiplier: 1_000.0,
    },
];

/// Literal rupiah: `rp` followed by bare digits. Only consulted when no unit
/// pattern matches. `separator` captures a trailing `.000` style group.
pub const RUPIAH_PREFIX: PriceUnit =
    PriceUnit { pattern: r"\brp\s*(?P<amount>\d+)(?P<separator>[.,]\d)?", multiplier: 1.0 };

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceUnit {
    pub pattern: &'static str,
    pub multiplier: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub category: Option<String>,
    pub max_price: Option<u64>,
    pub best: bool,
}

impl QueryIntent {
    pub fn has_filters(&self) -> bool {
        self.category.is_some() || self.max_price.is_some()
    }
}

pub fn interpret(text: &str) -> QueryIntent {
    QueryIntent {
        category: extract_category(text),
        max_price: extract_max_price(text),
        best: has_best_intent(text),
    }
}

/// Normalized category for the first trigger found, or `None` when no trigger
/// matches or triggers for two different categories appear.
pub fn extract_category(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    let mut found: Option<&str> = None;

    for (trigger, category) in CATEGORY_TRIGGERS {
        if !lowered.contains(trigger) {
            continue;
        }
        match found {
            None => found = Some(*category),
            Some(existing) if existing == *category => {}
            Some(_) => return None,
        }
    }

    found.map(str::to_owned)
}

pub fn extract_max_price(text: &str) -> Option<u64> {
    let lowered = text.to_lowercase();

    numeric_price(&lowered).or_else(|| budget_keyword_price(&lowered))
}

pub fn has_best_intent(text: &str) -> bool {
    let lowered = text.to_lowercase();
    BEST_TRIGGERS.iter().any(|trigger| lowered.contains(trigger))
}

fn numeric_price(lowered: &str) -> Option<u64> {
    let (units, rupiah) = compiled_price_patterns()?;

    // Earliest match in the text wins; table order breaks ties.
    let unit_match = units
        .iter()
        .filter_map(|(regex, multiplier)| {
            let captures = regex.captures(lowered)?;
            let amount = captures.name("amount")?;
            Some((amount.start(), amount.as_str(), *multiplier))
        })
        .min_by_key(|(start, _, _)| *start);

    if let Some((_, amount, multiplier)) = unit_match {
        return scale(amount, multiplier);
    }

    let captures = rupiah.captures(lowered)?;
    if captures.name("separator").is_some() {
        return None;
    }
    scale(captures.name("amount")?.as_str(), RUPIAH_PREFIX.multiplier)
}

fn budget_keyword_price(lowered: &str) -> Option<u64> {
    BUDGET_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, ceiling)| *ceiling)
}

fn scale(amount: &str, multiplier: f64) -> Option<u64> {
    let value = amount.replace(',', ".").parse::<f64>().ok()? * multiplier;
    (value.is_finite() && value >= 0.0 && value < u64::MAX as f64).then(|| value.trunc() as u64)
}

type CompiledPatterns = (Vec<(Regex, f64)>, Regex);

fn compiled_price_patterns() -> Option<&'static CompiledPatterns> {
    static PATTERNS: OnceLock<Option<CompiledPatterns>> = OnceLock::new();

    PATTERNS
        .get_or_init(|| {
            let units = PRICE_UNITS
                .iter()
                .map(|unit| Regex::new(unit.pattern).map(|regex| (regex, unit.multiplier)))
                .collect::<Result<Vec<_>, _>>()
                .ok()?;
            let rupiah = Regex::new(RUPIAH_PREFIX.pattern).ok()?;
            Some((units, rupiah))
        })
        .as_ref()
}
