use thiserror::Error;

use crate::{catalog::CatalogError, config::ConfigError};

/// Violations detected while scoring or ordering products. These never leave
/// the search engine; they select its degraded result instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("product `{product_id}` has a non-finite rating")]
    NonFiniteRating { product_id: String },
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::Catalog(_) => "catalog_load",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Catalog(_) => 3,
        }
    }
}
