//! Product catalog contract and the reference in-memory implementation.
//!
//! Search semantics shared by every store:
//! - the query text matches name, description or brand as a case-insensitive
//!   substring; blank text matches everything
//! - category and inclusive price bounds narrow the candidate set
//! - results are ordered by rating (highest first), then name (ascending)
//! - `limit` caps the result length and must be positive

use std::cmp::Ordering;
use std::collections::BTreeSet;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::product::{Category, Product, ProductId};
use crate::errors::{ApplicationError, DomainError};

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub category: Option<Category>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub limit: i64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: None,
            min_price: None,
            max_price: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_price_range(mut self, min_price: Option<Decimal>, max_price: Option<Decimal>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Trimmed query text; empty means "match everything".
    pub fn needle(&self) -> &str {
        self.text.trim()
    }

    /// Checks the query and returns the effective result cap.
    pub fn validate(&self) -> Result<usize, DomainError> {
        if self.limit <= 0 {
            return Err(DomainError::Validation(format!(
                "limit must be a positive integer (got {})",
                self.limit
            )));
        }

        for (name, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if bound.is_some_and(|value| value.is_sign_negative()) {
                return Err(DomainError::Validation(format!("{name} must not be negative")));
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(DomainError::Validation(format!(
                    "min_price ({min}) must not exceed max_price ({max})"
                )));
            }
        }

        usize::try_from(self.limit)
            .map_err(|_| DomainError::Validation("limit is out of range".to_string()))
    }

    pub fn accepts(&self, product: &Product) -> bool {
        product.matches_text(self.needle())
            && self.category.as_ref().map_or(true, |category| &product.category == category)
            && self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
    }
}

/// Display order for search results: best rated first, then alphabetical.
pub fn display_order(left: &Product, right: &Product) -> Ordering {
    right.rating.cmp(&left.rating).then_with(|| left.name.cmp(&right.name))
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, ApplicationError>;
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, ApplicationError>;
    async fn list_categories(&self) -> Result<Vec<String>, ApplicationError>;
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    fn matching(&self, query: &SearchQuery) -> Result<Vec<Product>, DomainError> {
        let limit = query.validate()?;
        let mut matched =
            self.products.iter().filter(|product| query.accepts(product)).cloned().collect::<Vec<_>>();
        matched.sort_by(display_order);
        matched.truncate(limit);
        Ok(matched)
    }
}

#[async_trait]
impl CatalogStore for Catalog {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.matching(query)?)
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, ApplicationError> {
        Ok(self.find(id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<String>, ApplicationError> {
        let categories = self
            .products
            .iter()
            .map(|product| product.category.as_str().to_string())
            .collect::<BTreeSet<_>>();
        Ok(categories.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Catalog, CatalogStore, SearchQuery};
    use crate::domain::product::{Category, Product, ProductId, Specifications};
    use crate::errors::{ApplicationError, DomainError};

    fn product(id: i64, name: &str, brand: &str, category: Category, price: i64, rating: i64) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            category,
            price: Decimal::new(price, 2),
            description: format!("{name} from {brand}"),
            stock_quantity: 10,
            brand: brand.to_string(),
            rating: Decimal::new(rating, 1),
            image_url: String::new(),
            specifications: Specifications::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, "Sony WH-1000XM5", "Sony", Category::Electronics, 39_999, 46),
            product(2, "Dell XPS 13", "Dell", Category::Electronics, 89_999, 45),
            product(3, "MacBook Pro 14-inch M3", "Apple", Category::Electronics, 159_999, 49),
            product(4, "iPhone 15 Pro", "Apple", Category::Electronics, 99_999, 48),
            product(5, "Atomic Habits", "Avery", Category::Books, 1_399, 48),
            product(6, "The Psychology of Money", "Harriman House", Category::Books, 1_499, 47),
            product(7, "Nike Hoodie - Style 3", "Nike", Category::Clothing, 4_099, 42),
            product(8, "Adidas Jeans - Style 2", "Adidas", Category::Clothing, 3_549, 41),
            product(9, "Kitchen Item 2", "Brand2", Category::HomeAndGarden, 6_229, 39),
            product(10, "Nike Sports Equipment 1", "Nike", Category::SportsAndOutdoors, 7_999, 42),
        ])
    }

    #[tokio::test]
    async fn single_brand_match_returns_only_that_product() {
        let results = catalog().search(&SearchQuery::new("sony").with_limit(5)).await.expect("search");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, ProductId(1));
    }

    #[tokio::test]
    async fn results_order_by_rating_then_name() {
        let results = catalog().search(&SearchQuery::new("")).await.expect("search");
        let names = results.iter().map(|product| product.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names[0], "MacBook Pro 14-inch M3");
        // equal 4.8 rating: alphabetical
        assert_eq!(names[1], "Atomic Habits");
        assert_eq!(names[2], "iPhone 15 Pro");
        for pair in results.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
        }
    }

    #[tokio::test]
    async fn limit_truncates_and_rejects_non_positive_values() {
        let store = catalog();
        let results = store.search(&SearchQuery::new("").with_limit(3)).await.expect("search");
        assert_eq!(results.len(), 3);

        for limit in [0, -4] {
            let error = store
                .search(&SearchQuery::new("").with_limit(limit))
                .await
                .expect_err("non-positive limit must be rejected");
            assert!(matches!(error, ApplicationError::Domain(DomainError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn price_bounds_are_inclusive_and_conjunctive_with_category() {
        let query = SearchQuery::new("")
            .with_category(Some(Category::Electronics))
            .with_price_range(Some(Decimal::new(39_999, 2)), Some(Decimal::new(99_999, 2)));
        let results = catalog().search(&query).await.expect("search");

        let ids = results.iter().map(|product| product.id.0).collect::<Vec<_>>();
        assert_eq!(ids, vec![4, 1, 2]);
        for product in &results {
            assert!(product.price >= Decimal::new(39_999, 2));
            assert!(product.price <= Decimal::new(99_999, 2));
        }
    }

    #[tokio::test]
    async fn inverted_price_range_is_a_validation_error() {
        let query = SearchQuery::new("")
            .with_price_range(Some(Decimal::new(100, 0)), Some(Decimal::new(10, 0)));
        assert!(query.validate().is_err());
        assert!(catalog().search(&query).await.is_err());
    }

    #[tokio::test]
    async fn lookup_and_categories() {
        let store = catalog();
        assert_eq!(
            store.get_by_id(ProductId(5)).await.expect("lookup").map(|p| p.name),
            Some("Atomic Habits".to_string())
        );
        assert!(store.get_by_id(ProductId(999)).await.expect("lookup").is_none());

        let categories = store.list_categories().await.expect("categories");
        assert_eq!(
            categories,
            vec!["Books", "Clothing", "Electronics", "Home & Garden", "Sports & Outdoors"]
        );
    }
}
