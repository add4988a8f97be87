//! Ranked product search
//!
//! Keyword relevance scoring plus the five-stage fallback cascade that always
//! produces a meaningfully ordered answer for a shopper query.

mod engine;
mod scoring;
mod stages;
mod types;

pub use engine::SearchEngine;
pub use scoring::{
    budget_bonus, keyword_matches, relevance_score, RelevanceScore, SearchableField,
    BUDGET_BONUS, RATING_WEIGHT,
};
pub use stages::SearchStage;
pub use types::{SearchCriteria, SearchMessage, SearchResult};

/// Default result count for keyword search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default result count for smart search.
pub const DEFAULT_SMART_LIMIT: usize = 5;
