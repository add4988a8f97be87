//! The smart-search fallback cascade.
//!
//! Stages are tried in [`SearchStage::CASCADE`] order. A stage that does not
//! apply to the criteria is skipped, a stage that yields nothing hands over to
//! the next one, and [`SearchStage::Popularity`] always answers.

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::errors::DomainError;

use super::scoring::{checked_rating, keyword_matches, rank_by_relevance};
use super::types::{SearchCriteria, SearchMessage};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStage {
    /// Keyword asks for the best products: top-rated, terminal once triggered.
    BestRated,
    /// Category, budget and keyword all satisfied, ordered by relevance.
    CombinedCriteria,
    /// Category only, cheapest first.
    CategoryFallback,
    /// Budget only, cheapest first.
    BudgetFallback,
    /// Whole catalog by units sold.
    Popularity,
}

/// Products chosen by a stage, already ordered but not yet limited.
#[derive(Debug)]
pub(crate) struct StageOutcome<'a> {
    pub products: Vec<&'a Product>,
    pub message: SearchMessage,
}

impl SearchStage {
    pub const CASCADE: [Self; 5] = [
        Self::BestRated,
        Self::CombinedCriteria,
        Self::CategoryFallback,
        Self::BudgetFallback,
        Self::Popularity,
    ];

    pub fn applies(self, criteria: &SearchCriteria) -> bool {
        match self {
            Self::BestRated => criteria.wants_best(),
            Self::CombinedCriteria | Self::Popularity => true,
            Self::CategoryFallback => criteria.category.is_some(),
            Self::BudgetFallback => criteria.max_price.is_some(),
        }
    }

    /// `Ok(None)` means the stage found nothing and the cascade moves on.
    pub(crate) fn run<'a>(
        self,
        products: &'a [Product],
        criteria: &SearchCriteria,
    ) -> Result<Option<StageOutcome<'a>>, DomainError> {
        let outcome = match self {
            Self::BestRated => Some(best_rated(products, criteria)?),
            Self::CombinedCriteria => {
                let needle = criteria.needle();
                let candidates = products.iter().filter(|product| {
                    criteria.category_matches(product)
                        && criteria.within_budget(product)
                        && needle.as_deref().map_or(true, |needle| keyword_matches(product, needle))
                });
                let ranked = rank_by_relevance(candidates, needle.as_deref(), criteria.max_price)?;
                non_empty(ranked, SearchMessage::CriteriaMatch)
            }
            Self::CategoryFallback => {
                let in_category =
                    products.iter().filter(|product| criteria.category_matches(product));
                non_empty(cheapest_first(in_category), SearchMessage::CheapestInCategory)
            }
            Self::BudgetFallback => {
                let affordable = products.iter().filter(|product| criteria.within_budget(product));
                non_empty(cheapest_first(affordable), SearchMessage::WithinBudget)
            }
            Self::Popularity => Some(StageOutcome {
                products: most_sold(products),
                message: SearchMessage::MostPopular,
            }),
        };

        Ok(outcome)
    }
}

fn non_empty(products: Vec<&Product>, message: SearchMessage) -> Option<StageOutcome<'_>> {
    (!products.is_empty()).then_some(StageOutcome { products, message })
}

fn best_rated<'a>(
    products: &'a [Product],
    criteria: &SearchCriteria,
) -> Result<StageOutcome<'a>, DomainError> {
    let Some(category) = criteria.category.as_deref() else {
        return Ok(StageOutcome {
            products: top_rated(products.iter())?,
            message: SearchMessage::BestOverall,
        });
    };

    let in_category =
        top_rated(products.iter().filter(|product| criteria.category_matches(product)))?;
    if in_category.is_empty() {
        return Ok(StageOutcome {
            products: top_rated(products.iter())?,
            message: SearchMessage::BestOverallForMissingCategory(category.to_owned()),
        });
    }

    Ok(StageOutcome {
        products: in_category,
        message: SearchMessage::BestInCategory(category.to_owned()),
    })
}

/// Descending rating; ties keep catalog order.
fn top_rated<'a>(
    products: impl Iterator<Item = &'a Product>,
) -> Result<Vec<&'a Product>, DomainError> {
    let mut rated = products
        .map(|product| checked_rating(product).map(|rating| (rating, product)))
        .collect::<Result<Vec<_>, _>>()?;
    rated.sort_by(|(left, _), (right, _)| right.total_cmp(left));
    Ok(rated.into_iter().map(|(_, product)| product).collect())
}

/// Ascending price; ties keep catalog order.
fn cheapest_first<'a>(products: impl Iterator<Item = &'a Product>) -> Vec<&'a Product> {
    let mut sorted: Vec<&Product> = products.collect();
    sorted.sort_by_key(|product| product.price);
    sorted
}

/// Descending units sold; ties keep catalog order.
fn most_sold(products: &[Product]) -> Vec<&Product> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    sorted.sort_by(|left, right| right.sold().cmp(&left.sold()));
    sorted
}
