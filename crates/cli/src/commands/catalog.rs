use katalog_core::config::LoadOptions;
use serde::Serialize;

use crate::commands::{open_session, payload_fields, CommandResult};

#[derive(Debug, Serialize)]
struct CategoriesPayload {
    categories: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BrandsPayload {
    brands: Vec<String>,
}

pub fn categories(options: &LoadOptions) -> CommandResult {
    let session = match open_session(options) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("categories", &error),
    };

    let categories = session.engine.catalog().categories();
    let message = format!("{} categories", categories.len());
    let fields = payload_fields(&CategoriesPayload { categories });
    CommandResult::success_with("categories", message, fields)
}

pub fn brands(options: &LoadOptions) -> CommandResult {
    let session = match open_session(options) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("brands", &error),
    };

    let brands = session.engine.catalog().brands();
    let message = format!("{} brands", brands.len());
    CommandResult::success_with("brands", message, payload_fields(&BrandsPayload { brands }))
}
