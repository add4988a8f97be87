//! Ranked search engine implementation

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::domain::product::Product;
use crate::errors::DomainError;

use super::scoring::{keyword_matches, rank_by_relevance};
use super::stages::{SearchStage, StageOutcome};
use super::types::{SearchCriteria, SearchMessage, SearchResult};

/// Searches a read-only catalog snapshot. Every operation is synchronous and
/// never fails: internal errors degrade to an empty or popularity result.
#[derive(Clone, Debug, Default)]
pub struct SearchEngine {
    catalog: Catalog,
}

impl SearchEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Keyword search over every searchable field, best matches first.
    /// A blank keyword matches the whole catalog.
    pub fn search(&self, keyword: &str, limit: usize) -> Vec<Product> {
        match self.rank_keyword(keyword) {
            Ok(ranked) => {
                let products: Vec<Product> = ranked.into_iter().take(limit).cloned().collect();
                debug!(
                    event_name = "search.simple.completed",
                    keyword,
                    limit,
                    result_count = products.len(),
                    "keyword search completed"
                );
                products
            }
            Err(error) => {
                warn!(
                    event_name = "search.simple.degraded",
                    keyword,
                    error = %error,
                    "keyword search failed, returning no products"
                );
                Vec::new()
            }
        }
    }

    fn rank_keyword(&self, keyword: &str) -> Result<Vec<&Product>, DomainError> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return rank_by_relevance(self.catalog.products(), None, None);
        }

        let matching =
            self.catalog.products().iter().filter(|product| keyword_matches(product, &needle));
        rank_by_relevance(matching, Some(&needle), None)
    }

    /// Runs the fallback cascade; the first stage with products wins.
    pub fn smart_search(&self, criteria: &SearchCriteria, limit: usize) -> SearchResult {
        for stage in SearchStage::CASCADE {
            if !stage.applies(criteria) {
                continue;
            }

            match stage.run(self.catalog.products(), criteria) {
                Ok(Some(outcome)) => return finish(stage, outcome, limit),
                Ok(None) => {
                    debug!(event_name = "search.smart.stage_empty", stage = ?stage, "stage empty");
                }
                Err(error) => {
                    warn!(
                        event_name = "search.smart.degraded",
                        stage = ?stage,
                        error = %error,
                        "smart search stage failed, falling back to popularity"
                    );
                    break;
                }
            }
        }

        self.most_popular(limit)
    }

    /// Interprets a free-text question and runs the cascade on the result.
    pub fn ask(&self, question: &str, limit: usize) -> SearchResult {
        let criteria = SearchCriteria::from_question(question);
        debug!(
            event_name = "search.ask.interpreted",
            category = criteria.category.as_deref().unwrap_or("-"),
            max_price = criteria.max_price.unwrap_or_default(),
            keyword_used = criteria.keyword.is_some(),
            "question interpreted"
        );
        self.smart_search(&criteria, limit)
    }

    fn most_popular(&self, limit: usize) -> SearchResult {
        match SearchStage::Popularity.run(self.catalog.products(), &SearchCriteria::default()) {
            Ok(Some(outcome)) => finish(SearchStage::Popularity, outcome, limit),
            Ok(None) | Err(_) => SearchResult {
                products: Vec::new(),
                message: SearchMessage::MostPopular.to_string(),
                stage: SearchStage::Popularity,
            },
        }
    }
}

fn finish(stage: SearchStage, outcome: StageOutcome<'_>, limit: usize) -> SearchResult {
    let products: Vec<Product> = outcome.products.into_iter().take(limit).cloned().collect();
    debug!(
        event_name = "search.smart.stage_selected",
        stage = ?stage,
        limit,
        result_count = products.len(),
        "smart search resolved"
    );

    SearchResult { products, message: outcome.message.to_string(), stage }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::catalog::{Catalog, SampleCatalog};
    use crate::domain::product::Product;
    use crate::search::{SearchCriteria, SearchEngine, SearchStage};

    const BEST_OVERALL: &str = "Berikut produk terbaik berdasarkan rating:";
    const CRITERIA_MATCH: &str = "Berikut produk yang sesuai dengan kriteria Anda.";
    const CHEAPEST_IN_CATEGORY: &str =
        "Tidak ada produk di bawah budget, berikut produk termurah di kategori tersebut.";
    const WITHIN_BUDGET: &str =
        "Tidak ada produk di kategori tersebut, berikut produk lain yang sesuai budget Anda.";
    const MOST_POPULAR: &str =
        "Tidak ada produk yang sesuai, berikut rekomendasi produk terpopuler.";

    fn sample_engine() -> SearchEngine {
        SearchEngine::new(SampleCatalog::catalog())
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|product| product.id.as_str()).collect()
    }

    #[test]
    fn keyword_search_ranks_field_matches() {
        let engine = sample_engine();

        let products = engine.search("Samsung", 10);

        assert_eq!(ids(&products), vec!["P001", "P008"]);
    }

    #[test]
    fn blank_keyword_matches_everything_by_rating() {
        let engine = sample_engine();

        let products = engine.search("  ", 3);

        assert_eq!(ids(&products), vec!["P002", "P004", "P001"]);
    }

    #[test]
    fn keyword_search_respects_limit_and_catalog_order_on_ties() {
        let engine = sample_engine();

        assert_eq!(ids(&engine.search("apple", 1)), vec!["P002"]);
        assert!(engine.search("apple", 0).is_empty());
        assert!(engine.search("kulkas", 10).is_empty());
    }

    #[test]
    fn best_intent_without_category_returns_top_rated() {
        let engine = sample_engine();

        let result = engine.smart_search(&SearchCriteria::new().with_keyword("terbaik"), 3);

        assert_eq!(ids(&result.products), vec!["P002", "P004", "P001"]);
        assert_eq!(result.message, BEST_OVERALL);
        assert_eq!(result.stage, SearchStage::BestRated);
    }

    #[test]
    fn best_intent_with_category_stays_in_category() {
        let engine = sample_engine();
        let criteria = SearchCriteria::new().with_keyword("laptop terbaik").with_category("Laptop");

        let result = engine.smart_search(&criteria, 5);

        assert_eq!(ids(&result.products), vec!["P004", "P005", "P006"]);
        assert_eq!(result.message, "Berikut Laptop terbaik berdasarkan rating:");
    }

    #[test]
    fn best_intent_with_unknown_category_is_terminal() {
        let engine = sample_engine();
        let criteria = SearchCriteria::new()
            .with_keyword("drone bagus")
            .with_category("drone")
            .with_max_price(1_000);

        let result = engine.smart_search(&criteria, 2);

        assert_eq!(ids(&result.products), vec!["P002", "P004"]);
        assert_eq!(
            result.message,
            "Tidak ada produk kategori drone, berikut produk terbaik secara umum:"
        );
        assert_eq!(result.stage, SearchStage::BestRated);
    }

    #[test]
    fn best_results_are_sorted_by_descending_rating() {
        let engine = sample_engine();

        let result = engine.smart_search(&SearchCriteria::new().with_keyword("best"), 8);

        assert_eq!(result.products.len(), 8);
        assert!(result.products.windows(2).all(|pair| pair[0].rating() >= pair[1].rating()));
    }

    #[test]
    fn combined_criteria_match_wins_before_fallbacks() {
        let catalog = Catalog::new(vec![
            Product::new("S1", "Galaxy A25", "Smartphone", 3_000_000).with_rating(4.5),
            Product::new("L1", "IdeaPad 1", "Laptop", 8_000_000).with_rating(4.1),
            Product::new("S2", "Redmi Note 13", "Smartphone", 2_500_000).with_rating(4.4),
            Product::new("S3", "Galaxy S24", "Smartphone", 13_000_000).with_rating(4.8),
        ]);
        let engine = SearchEngine::new(catalog);
        let criteria = SearchCriteria::new().with_category("Smartphone").with_max_price(3_000_000);

        let result = engine.smart_search(&criteria, 5);

        let found: HashSet<&str> = ids(&result.products).into_iter().collect();
        assert_eq!(found, HashSet::from(["S1", "S2"]));
        assert_eq!(result.message, CRITERIA_MATCH);
        assert_eq!(result.stage, SearchStage::CombinedCriteria);
    }

    #[test]
    fn combined_criteria_orders_by_relevance() {
        let engine = sample_engine();
        let criteria = SearchCriteria::new().with_keyword("samsung").with_max_price(15_000_000);

        let result = engine.smart_search(&criteria, 5);

        assert_eq!(ids(&result.products), vec!["P001", "P008"]);
        assert_eq!(result.message, CRITERIA_MATCH);
    }

    #[test]
    fn budget_bonus_breaks_keyword_and_rating_ties() {
        let catalog = Catalog::new(vec![
            Product::new("B1", "Galaxy Buds Pro", "Audio", 2_500_000).with_rating(4.5),
            Product::new("B2", "Galaxy Buds Live", "Audio", 1_000_000).with_rating(4.5),
        ]);
        let engine = SearchEngine::new(catalog);
        let keyword_only = SearchCriteria::new().with_keyword("galaxy buds");

        let unbounded = engine.smart_search(&keyword_only, 5);
        let budgeted = engine.smart_search(&keyword_only.clone().with_max_price(3_000_000), 5);

        assert_eq!(ids(&unbounded.products), vec!["B1", "B2"]);
        assert_eq!(ids(&budgeted.products), vec!["B2", "B1"]);
        assert_eq!(budgeted.stage, SearchStage::CombinedCriteria);
    }

    #[test]
    fn category_fallback_lists_cheapest_first() {
        let engine = sample_engine();
        let criteria = SearchCriteria::new()
            .with_keyword("very expensive")
            .with_category("Smartphone")
            .with_max_price(1_000_000);

        let result = engine.smart_search(&criteria, 5);

        assert_eq!(ids(&result.products), vec!["P003", "P001", "P002"]);
        assert_eq!(result.message, CHEAPEST_IN_CATEGORY);
        assert_eq!(result.stage, SearchStage::CategoryFallback);
    }

    #[test]
    fn budget_fallback_runs_when_category_is_empty() {
        let engine = sample_engine();
        let criteria = SearchCriteria::new().with_category("Drone").with_max_price(6_000_000);

        let result = engine.smart_search(&criteria, 5);

        assert_eq!(ids(&result.products), vec!["P003", "P007"]);
        assert_eq!(result.message, WITHIN_BUDGET);
        assert_eq!(result.stage, SearchStage::BudgetFallback);
    }

    #[test]
    fn nothing_matching_falls_back_to_popularity() {
        let engine = sample_engine();
        let criteria =
            SearchCriteria::new().with_keyword("xyz").with_category("abc").with_max_price(10_000);

        let result = engine.smart_search(&criteria, 3);

        assert_eq!(ids(&result.products), vec!["P003", "P001", "P002"]);
        assert_eq!(result.message, MOST_POPULAR);
        assert_eq!(result.stage, SearchStage::Popularity);
    }

    #[test]
    fn unmatched_keyword_without_filters_skips_to_popularity() {
        let engine = sample_engine();

        let result = engine.smart_search(&SearchCriteria::new().with_keyword("kulkas"), 2);

        assert_eq!(ids(&result.products), vec!["P003", "P001"]);
        assert_eq!(result.stage, SearchStage::Popularity);
    }

    #[test]
    fn empty_catalog_still_reports_a_message() {
        let engine = SearchEngine::new(Catalog::default());

        let result = engine.smart_search(&SearchCriteria::new().with_keyword("hp"), 5);

        assert!(result.products.is_empty());
        assert_eq!(result.message, MOST_POPULAR);
    }

    #[test]
    fn zero_limit_is_always_empty() {
        let engine = sample_engine();
        let queries = [
            SearchCriteria::new().with_keyword("terbaik"),
            SearchCriteria::new().with_category("Laptop"),
            SearchCriteria::new().with_category("Smartphone").with_max_price(1),
            SearchCriteria::new().with_max_price(5_000_000).with_category("Drone"),
            SearchCriteria::new().with_keyword("xyz"),
        ];

        for criteria in queries {
            let result = engine.smart_search(&criteria, 0);
            assert!(result.products.is_empty(), "{criteria:?} should return nothing");
            assert!(!result.message.is_empty());
        }
    }

    #[test]
    fn results_are_catalog_members_and_repeatable() {
        let engine = sample_engine();
        let catalog_ids: HashSet<&str> =
            engine.catalog().products().iter().map(|product| product.id.as_str()).collect();
        let criteria = SearchCriteria::new().with_keyword("laptop").with_max_price(20_000_000);

        let first = engine.smart_search(&criteria, 4);
        let second = engine.smart_search(&criteria, 4);

        assert_eq!(first, second);
        assert!(first.products.len() <= 4);
        assert!(ids(&first.products).iter().all(|id| catalog_ids.contains(id)));
    }

    #[test]
    fn ask_interprets_free_text() {
        let engine = sample_engine();

        let cheap_phone = engine.ask("hp murah", 5);
        assert_eq!(ids(&cheap_phone.products), vec!["P003"]);
        assert_eq!(cheap_phone.message, CRITERIA_MATCH);

        let best_laptop = engine.ask("laptop terbaik", 1);
        assert_eq!(ids(&best_laptop.products), vec!["P004"]);
        assert_eq!(best_laptop.message, "Berikut laptop terbaik berdasarkan rating:");
    }

    #[test]
    fn non_finite_rating_degrades_instead_of_failing() {
        let catalog = Catalog::new(vec![
            Product::new("A", "Alpha", "Audio", 100).with_rating(4.0).with_sold(5),
            Product::new("B", "Beta", "Audio", 200).with_rating(f64::NAN).with_sold(9),
        ]);
        let engine = SearchEngine::new(catalog);

        assert!(engine.search("audio", 5).is_empty());

        let best = engine.smart_search(&SearchCriteria::new().with_keyword("terbaik"), 5);
        assert_eq!(ids(&best.products), vec!["B", "A"]);
        assert_eq!(best.message, MOST_POPULAR);

        let combined = engine.smart_search(&SearchCriteria::new().with_keyword("alpha"), 5);
        assert_eq!(combined.stage, SearchStage::CombinedCriteria);
        assert_eq!(ids(&combined.products), vec!["A"]);
    }

    #[test]
    fn engine_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchEngine>();
    }
}
