//! Types for the ranked search engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::query;

use super::stages::SearchStage;

/// Filters for a smart search. Blank strings count as "not given".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub max_price: Option<u64>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = non_blank(keyword.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn with_max_price(mut self, max_price: u64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// Criteria for a free-text question. The question doubles as keyword only
    /// when it asks for the best products or no filter could be extracted.
    pub fn from_question(question: &str) -> Self {
        let intent = query::interpret(question);
        let keyword = (intent.best || !intent.has_filters()).then(|| question.to_owned());

        Self {
            keyword: keyword.and_then(non_blank),
            category: intent.category,
            max_price: intent.max_price,
        }
    }

    /// Lowercased keyword used for substring matching.
    pub fn needle(&self) -> Option<String> {
        self.keyword.as_deref().map(str::to_lowercase)
    }

    pub fn wants_best(&self) -> bool {
        self.keyword.as_deref().is_some_and(query::has_best_intent)
    }

    /// Case-insensitive substring match on the product category.
    pub fn category_matches(&self, product: &Product) -> bool {
        self.category.as_deref().map_or(true, |category| {
            product.category.to_lowercase().contains(&category.to_lowercase())
        })
    }

    pub fn within_budget(&self, product: &Product) -> bool {
        self.max_price.map_or(true, |max_price| product.price <= max_price)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Status line describing which cascade stage produced a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchMessage {
    BestInCategory(String),
    BestOverallForMissingCategory(String),
    BestOverall,
    CriteriaMatch,
    CheapestInCategory,
    WithinBudget,
    MostPopular,
}

impl fmt::Display for SearchMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BestInCategory(category) => {
                write!(f, "Berikut {category} terbaik berdasarkan rating:")
            }
            Self::BestOverallForMissingCategory(category) => write!(
                f,
                "Tidak ada produk kategori {category}, berikut produk terbaik secara umum:"
            ),
            Self::BestOverall => f.write_str("Berikut produk terbaik berdasarkan rating:"),
            Self::CriteriaMatch => f.write_str("Berikut produk yang sesuai dengan kriteria Anda."),
            Self::CheapestInCategory => f.write_str(
                "Tidak ada produk di bawah budget, berikut produk termurah di kategori tersebut.",
            ),
            Self::WithinBudget => f.write_str(
                "Tidak ada produk di kategori tersebut, berikut produk lain yang sesuai budget Anda.",
            ),
            Self::MostPopular => {
                f.write_str("Tidak ada produk yang sesuai, berikut rekomendasi produk terpopuler.")
            }
        }
    }
}

/// Products produced by a smart search plus the status message for the stage
/// that produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub message: String,
    pub stage: SearchStage,
}
