use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog entry. Missing fields default on deserialization so partially
/// populated catalog documents still load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "lenient_id")]
    pub id: ProductId,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub brand: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub price: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_specifications")]
    pub specifications: Specifications,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: u64,
    ) -> Self {
        Self {
            id: ProductId(id.into()),
            name: name.into(),
            category: category.into(),
            price,
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.specifications.rating = rating;
        self
    }

    pub fn with_sold(mut self, sold: u64) -> Self {
        self.specifications.sold = sold;
        self
    }

    pub fn with_stock(mut self, stock: u64) -> Self {
        self.specifications.stock = stock;
        self
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.specifications.extra.insert(key.into(), value.into());
        self
    }

    pub fn rating(&self) -> f64 {
        self.specifications.rating
    }

    pub fn sold(&self) -> u64 {
        self.specifications.sold
    }
}

/// Product specifications. `rating`, `sold` and `stock` are always present;
/// any other key is kept in `extra` and flattened back on serialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specifications {
    #[serde(deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(deserialize_with = "lenient_u64")]
    pub sold: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub stock: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Specifications {
    /// Stringified specification values in a stable order: rating, sold,
    /// stock, then the extra keys in key order.
    pub fn searchable_values(&self) -> impl Iterator<Item = String> + '_ {
        [self.rating.to_string(), self.sold.to_string(), self.stock.to_string()]
            .into_iter()
            .chain(self.extra.values().map(stringify_value))
    }
}

fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(ProductId)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        other => stringify_value(&other),
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(exact) = value.as_u64() {
        return Ok(exact);
    }

    Ok(number_from_value(&value)
        .filter(|number| number.is_finite() && *number > 0.0)
        .map(|number| number.trunc() as u64)
        .unwrap_or(0))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).filter(|number| number.is_finite()).unwrap_or(0.0))
}

fn lenient_specifications<'de, D>(deserializer: D) -> Result<Specifications, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Specifications>::deserialize(deserializer)?.unwrap_or_default())
}
