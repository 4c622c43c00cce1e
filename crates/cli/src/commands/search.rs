use rust_decimal::Decimal;
use serde_json::json;
use shopwise_core::catalog::{CatalogStore, SearchQuery, DEFAULT_SEARCH_LIMIT};
use shopwise_core::domain::product::{Category, Product};
use shopwise_core::errors::{ApplicationError, DomainError};
use shopwise_db::SqlCatalogStore;

use crate::commands::{build_runtime, load_config, open_pool, CommandResult, StepError};

#[derive(Clone, Debug)]
pub struct SearchArgs {
    pub query: String,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub limit: i64,
}

impl Default for SearchArgs {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            min_price: None,
            max_price: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl SearchArgs {
    fn to_query(&self) -> SearchQuery {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Category::from);
        SearchQuery::new(self.query.clone())
            .with_category(category)
            .with_price_range(self.min_price, self.max_price)
            .with_limit(self.limit)
    }
}

pub fn run(args: SearchArgs) -> CommandResult {
    let query = args.to_query();
    if let Err(error) = query.validate() {
        return CommandResult::failure("search", "query_validation", error.to_string(), 7);
    }

    let config = match load_config("search") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("search") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let store = SqlCatalogStore::new(pool.clone());
        let found = store.search(&query).await.map_err(classify);
        pool.close().await;
        found
    });

    match result {
        Ok(products) => CommandResult::success_with_data(
            "search",
            format!("{} matching products", products.len()),
            Some(json!({ "count": products.len(), "products": render(&products) })),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("search", error_class, message, exit_code)
        }
    }
}

fn classify(error: ApplicationError) -> StepError {
    match error {
        ApplicationError::Domain(DomainError::Validation(message)) => {
            ("query_validation", message, 7u8)
        }
        other => ("catalog_query", other.to_string(), 5u8),
    }
}

fn render(products: &[Product]) -> serde_json::Value {
    serde_json::to_value(products).unwrap_or_else(|_| json!([]))
}
