use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog category. The five storefront departments are named variants; any
/// other label round-trips through `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Electronics,
    Books,
    Clothing,
    HomeAndGarden,
    SportsAndOutdoors,
    Other(String),
}

impl Category {
    pub const KNOWN: [Category; 5] = [
        Category::Electronics,
        Category::Books,
        Category::Clothing,
        Category::HomeAndGarden,
        Category::SportsAndOutdoors,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Electronics => "Electronics",
            Self::Books => "Books",
            Self::Clothing => "Clothing",
            Self::HomeAndGarden => "Home & Garden",
            Self::SportsAndOutdoors => "Sports & Outdoors",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Electronics" => Self::Electronics,
            "Books" => Self::Books,
            "Clothing" => Self::Clothing,
            "Home & Garden" => Self::HomeAndGarden,
            "Sports & Outdoors" => Self::SportsAndOutdoors,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value))
    }
}

/// Free-form per-category attributes (author, display size, warranty...).
pub type Specifications = BTreeMap<String, Value>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub stock_quantity: u32,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rating: Decimal,
    pub image_url: String,
    pub specifications: Specifications,
}

impl Product {
    /// Case-insensitive substring match over name, description and brand.
    /// A blank needle matches every product.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [&self.name, &self.description, &self.brand]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
