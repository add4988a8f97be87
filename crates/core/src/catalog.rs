//! In-memory product catalog and the providers that build it.
//!
//! A [`Catalog`] is constructed once and treated as read-only afterwards;
//! search never mutates it, so shared references can be read concurrently.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::product::{Product, ProductId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("duplicate product id `{0}` in catalog")]
    DuplicateId(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct non-empty categories, ordered case-insensitively.
    pub fn categories(&self) -> Vec<String> {
        distinct_sorted(self.products.iter().map(|product| product.category.as_str()))
    }

    /// Distinct non-empty brands, ordered case-insensitively.
    pub fn brands(&self) -> Vec<String> {
        distinct_sorted(self.products.iter().map(|product| product.brand.as_str()))
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeMap::new();
    for value in values.map(str::trim).filter(|value| !value.is_empty()) {
        seen.entry(value.to_lowercase()).or_insert_with(|| value.to_owned());
    }
    seen.into_values().collect()
}

pub trait CatalogProvider: Send + Sync {
    fn load_catalog(&self) -> Result<Catalog, CatalogError>;
}

/// Loads a catalog from a JSON file holding either a product array or an
/// object with a `products` array.
#[derive(Clone, Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl CatalogProvider for JsonFileCatalog {
    fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let bytes = fs::read(&self.path)
            .map_err(|source| CatalogError::Read { path: self.path.clone(), source })?;

        let raw = match String::from_utf8(bytes) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(
                    event_name = "catalog.load.lossy_decode",
                    path = %self.path.display(),
                    "catalog file is not valid UTF-8, decoding lossily"
                );
                String::from_utf8_lossy(error.as_bytes()).into_owned()
            }
        };

        let document = serde_json::from_str::<CatalogDocument>(raw.trim_start_matches('\u{feff}'))
            .map_err(|source| CatalogError::Parse { path: self.path.clone(), source })?;
        let products = match document {
            CatalogDocument::List(products) | CatalogDocument::Wrapped { products } => products,
        };

        let catalog = normalize(products)?;
        info!(
            event_name = "catalog.load.completed",
            path = %self.path.display(),
            product_count = catalog.len(),
            "catalog loaded from file"
        );
        Ok(catalog)
    }
}

fn normalize(mut products: Vec<Product>) -> Result<Catalog, CatalogError> {
    let mut seen = HashSet::with_capacity(products.len());

    for (index, product) in products.iter_mut().enumerate() {
        if product.id.as_str().trim().is_empty() {
            product.id = ProductId(format!("item-{}", index + 1));
            debug!(
                event_name = "catalog.load.assigned_id",
                product_id = %product.id,
                "product without id received a positional id"
            );
        }
        if !seen.insert(product.id.clone()) {
            return Err(CatalogError::DuplicateId(product.id.0.clone()));
        }
    }

    Ok(Catalog::new(products))
}

/// Built-in eight product catalog used when no catalog file is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleCatalog;

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    brand: &'static str,
    price: u64,
    description: &'static str,
    rating: f64,
    sold: u64,
    stock: u64,
    ram: &'static str,
    storage: &'static str,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "P001",
        name: "Samsung Galaxy S24",
        category: "Smartphone",
        brand: "Samsung",
        price: 13_999_000,
        description: "Flagship Android dengan kamera 50MP dan layar Dynamic AMOLED 120Hz",
        rating: 4.8,
        sold: 1_250,
        stock: 45,
        ram: "8GB",
        storage: "256GB",
    },
    ProductSeed {
        id: "P002",
        name: "iPhone 15 Pro",
        category: "Smartphone",
        brand: "Apple",
        price: 21_999_000,
        description: "Chip A17 Pro, bodi titanium, dan kamera telefoto 3x",
        rating: 4.9,
        sold: 980,
        stock: 20,
        ram: "8GB",
        storage: "256GB",
    },
    ProductSeed {
        id: "P003",
        name: "Xiaomi Redmi Note 13",
        category: "Smartphone",
        brand: "Xiaomi",
        price: 4_599_000,
        description: "Smartphone terjangkau dengan baterai 5000mAh dan pengisian cepat 33W",
        rating: 4.5,
        sold: 2_100,
        stock: 120,
        ram: "8GB",
        storage: "128GB",
    },
    ProductSeed {
        id: "P004",
        name: "MacBook Air M3",
        category: "Laptop",
        brand: "Apple",
        price: 18_999_000,
        description: "Laptop tipis dan ringan dengan chip M3 dan baterai hingga 18 jam",
        rating: 4.9,
        sold: 640,
        stock: 15,
        ram: "8GB",
        storage: "256GB",
    },
    ProductSeed {
        id: "P005",
        name: "ASUS ROG Zephyrus G14",
        category: "Laptop",
        brand: "ASUS",
        price: 34_999_000,
        description: "Laptop gaming dengan RTX 4070 dan layar OLED 120Hz",
        rating: 4.7,
        sold: 210,
        stock: 8,
        ram: "32GB",
        storage: "1TB",
    },
    ProductSeed {
        id: "P006",
        name: "Lenovo IdeaPad Slim 5",
        category: "Laptop",
        brand: "Lenovo",
        price: 9_499_000,
        description: "Laptop kerja dan kuliah dengan Ryzen 7 dan layar 14 inci",
        rating: 4.3,
        sold: 530,
        stock: 30,
        ram: "16GB",
        storage: "512GB",
    },
    ProductSeed {
        id: "P007",
        name: "Sony WH-1000XM5",
        category: "Audio",
        brand: "Sony",
        price: 5_499_000,
        description: "Headphone wireless dengan noise cancelling terbaik di kelasnya",
        rating: 4.8,
        sold: 870,
        stock: 40,
        ram: "-",
        storage: "-",
    },
    ProductSeed {
        id: "P008",
        name: "Samsung Galaxy Tab S9",
        category: "Tablet",
        brand: "Samsung",
        price: 12_999_000,
        description: "Tablet Android dengan S Pen dan layar AMOLED 11 inci",
        rating: 4.6,
        sold: 320,
        stock: 25,
        ram: "8GB",
        storage: "128GB",
    },
];

impl SampleCatalog {
    pub fn catalog() -> Catalog {
        let products = PRODUCT_SEEDS
            .iter()
            .map(|seed| {
                Product::new(seed.id, seed.name, seed.category, seed.price)
                    .with_brand(seed.brand)
                    .with_description(seed.description)
                    .with_rating(seed.rating)
                    .with_sold(seed.sold)
                    .with_stock(seed.stock)
                    .with_spec("ram", seed.ram)
                    .with_spec("storage", seed.storage)
            })
            .collect();
        Catalog::new(products)
    }
}

impl CatalogProvider for SampleCatalog {
    fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        Ok(Self::catalog())
    }
}
