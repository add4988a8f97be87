use katalog_core::config::LoadOptions;
use katalog_core::{Product, SearchCriteria, SearchStage};
use serde::Serialize;

use crate::commands::{open_session, payload_fields, resolve_limit, CommandResult};

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    keyword: &'a str,
    limit: usize,
    products: &'a [Product],
}

pub fn run(options: &LoadOptions, keyword: &str, limit: Option<i64>) -> CommandResult {
    let session = match open_session(options) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("search", &error),
    };

    let limit = resolve_limit(limit, session.config.search.default_limit);
    let products = session.engine.search(keyword, limit);
    let message = format!("{} product(s) matched `{}`", products.len(), keyword.trim());

    CommandResult::success_with(
        "search",
        message,
        payload_fields(&SearchPayload { keyword, limit, products: &products }),
    )
}

#[derive(Debug, Clone, Default)]
pub struct SmartSearchArgs {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub max_price: Option<u64>,
    pub limit: Option<i64>,
}

impl SmartSearchArgs {
    fn criteria(&self) -> SearchCriteria {
        let mut criteria = SearchCriteria::new();
        if let Some(keyword) = &self.keyword {
            criteria = criteria.with_keyword(keyword.as_str());
        }
        if let Some(category) = &self.category {
            criteria = criteria.with_category(category.as_str());
        }
        if let Some(max_price) = self.max_price {
            criteria = criteria.with_max_price(max_price);
        }
        criteria
    }
}

#[derive(Debug, Serialize)]
struct SmartSearchPayload<'a> {
    criteria: &'a SearchCriteria,
    limit: usize,
    stage: SearchStage,
    products: &'a [Product],
}

pub fn run_smart(options: &LoadOptions, args: SmartSearchArgs) -> CommandResult {
    let session = match open_session(options) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("smart-search", &error),
    };

    let criteria = args.criteria();
    let limit = resolve_limit(args.limit, session.config.search.smart_limit);
    let result = session.engine.smart_search(&criteria, limit);

    let fields = payload_fields(&SmartSearchPayload {
        criteria: &criteria,
        limit,
        stage: result.stage,
        products: &result.products,
    });
    CommandResult::success_with("smart-search", result.message, fields)
}
