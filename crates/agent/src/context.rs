use std::fmt::Write as _;
use std::sync::Arc;

use shopwise_core::catalog::{CatalogStore, SearchQuery};
use shopwise_core::domain::product::Product;
use shopwise_core::errors::ApplicationError;

pub const NO_PRODUCTS_SENTINEL: &str = "No specific products found for this query.";

/// Grounding material for one message: the digest handed to the model and the
/// products shown to the shopper. The two come from separate searches so their
/// limits can differ.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductContext {
    pub digest: String,
    pub products: Vec<Product>,
}

#[derive(Clone)]
pub struct ContextBuilder {
    store: Arc<dyn CatalogStore>,
    digest_limit: i64,
    display_limit: i64,
}

impl ContextBuilder {
    pub fn new(store: Arc<dyn CatalogStore>, digest_limit: i64, display_limit: i64) -> Self {
        Self { store, digest_limit, display_limit }
    }

    pub async fn build_context(&self, user_message: &str) -> Result<ProductContext, ApplicationError> {
        let summarized =
            self.store.search(&SearchQuery::new(user_message).with_limit(self.digest_limit)).await?;
        let products =
            self.store.search(&SearchQuery::new(user_message).with_limit(self.display_limit)).await?;

        Ok(ProductContext { digest: digest(&summarized), products })
    }
}

pub fn digest(products: &[Product]) -> String {
    if products.is_empty() {
        return NO_PRODUCTS_SENTINEL.to_string();
    }

    let mut text = String::from("Relevant products in our inventory:\n");
    for product in products {
        let _ = writeln!(
            text,
            "- {} by {}: ${} (Rating: {}/5)",
            product.name, product.brand, product.price, product.rating
        );
        let _ = writeln!(text, "  Description: {}", product.description);
        let _ = writeln!(text, "  Stock: {} available\n", product.stock_quantity);
    }
    text
}
