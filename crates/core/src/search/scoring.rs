//! Relevance scoring for keyword and budget searches

use crate::domain::product::Product;
use crate::errors::DomainError;

/// Multiplier applied to `specifications.rating` for every scored product.
pub const RATING_WEIGHT: f64 = 2.0;

/// Largest price-closeness bonus, earned by a free product under a budget.
pub const BUDGET_BONUS: f64 = 5.0;

/// Product fields a keyword is matched against, in scoring-table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchableField {
    Name,
    Brand,
    Category,
    Description,
    Specifications,
}

impl SearchableField {
    pub const ALL: [Self; 5] =
        [Self::Name, Self::Brand, Self::Category, Self::Description, Self::Specifications];

    pub fn weight(self) -> f64 {
        match self {
            Self::Name => 10.0,
            Self::Brand => 8.0,
            Self::Category => 6.0,
            Self::Description => 4.0,
            Self::Specifications => 2.0,
        }
    }

    /// Case-insensitive substring match. `needle` must already be lowercase.
    pub fn matches(self, product: &Product, needle: &str) -> bool {
        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
        match self {
            Self::Name => contains(&product.name),
            Self::Brand => contains(&product.brand),
            Self::Category => contains(&product.category),
            Self::Description => contains(&product.description),
            Self::Specifications => {
                product.specifications.searchable_values().any(|value| contains(&value))
            }
        }
    }
}

/// True when `needle` (lowercase) appears in any searchable field.
pub fn keyword_matches(product: &Product, needle: &str) -> bool {
    SearchableField::ALL.iter().any(|field| field.matches(product, needle))
}

/// Score components for one product. Higher totals sort first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RelevanceScore {
    pub keyword: f64,
    pub rating: f64,
    pub budget: f64,
}

impl RelevanceScore {
    pub fn total(&self) -> f64 {
        self.keyword + self.rating + self.budget
    }
}

pub fn relevance_score(
    product: &Product,
    needle: Option<&str>,
    max_price: Option<u64>,
) -> Result<RelevanceScore, DomainError> {
    let rating = checked_rating(product)?;

    let keyword = needle
        .map(|needle| {
            SearchableField::ALL
                .iter()
                .filter(|field| field.matches(product, needle))
                .map(|field| field.weight())
                .sum()
        })
        .unwrap_or(0.0);

    Ok(RelevanceScore {
        keyword,
        rating: rating * RATING_WEIGHT,
        budget: budget_bonus(product.price, max_price),
    })
}

/// `(max - price) / max * BUDGET_BONUS` for products within budget.
pub fn budget_bonus(price: u64, max_price: Option<u64>) -> f64 {
    match max_price {
        Some(max) if max > 0 && price <= max => (max - price) as f64 / max as f64 * BUDGET_BONUS,
        _ => 0.0,
    }
}

pub fn checked_rating(product: &Product) -> Result<f64, DomainError> {
    let rating = product.rating();
    if rating.is_finite() {
        Ok(rating)
    } else {
        Err(DomainError::NonFiniteRating { product_id: product.id.0.clone() })
    }
}

/// Scores and orders `products` by descending total. The sort is stable, so
/// equal scores keep catalog order.
pub fn rank_by_relevance<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    needle: Option<&str>,
    max_price: Option<u64>,
) -> Result<Vec<&'a Product>, DomainError> {
    let mut scored = products
        .into_iter()
        .map(|product| relevance_score(product, needle, max_price).map(|score| (score, product)))
        .collect::<Result<Vec<_>, _>>()?;

    scored.sort_by(|(left, _), (right, _)| right.total().total_cmp(&left.total()));
    Ok(scored.into_iter().map(|(_, product)| product).collect())
}
