//! Product-catalog search core
//!
//! Loads a catalog, interprets shopper questions and ranks products through a
//! keyword scorer and a staged fallback cascade.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod query;
pub mod search;

pub use catalog::{Catalog, CatalogError, CatalogProvider, JsonFileCatalog, SampleCatalog};
pub use domain::product::{Product, ProductId, Specifications};
pub use errors::{ApplicationError, DomainError};
pub use query::{interpret, QueryIntent};
pub use search::{SearchCriteria, SearchEngine, SearchMessage, SearchResult, SearchStage};
