use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use shopwise_core::catalog::{CatalogStore, SearchQuery};
use shopwise_core::domain::product::{Category, Product, ProductId, Specifications};
use shopwise_core::errors::ApplicationError;

use super::RepositoryError;
use crate::DbPool;

const PRODUCT_COLUMNS: &str = "id, name, category, price, description, stock_quantity, brand, \
     rating, image_url, specifications";

/// Catalog store over the `product` table. Every call checks a connection out
/// of the pool and returns it on every exit path.
#[derive(Clone)]
pub struct SqlCatalogStore {
    pool: DbPool,
}

impl SqlCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(sqlx::query_scalar("SELECT COUNT(1) FROM product").fetch_one(&self.pool).await?)
    }

    async fn search_rows(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE 1 = 1"));

        if let Some(category) = &query.category {
            builder.push(" AND category = ").push_bind(category.as_str().to_string());
        }
        if let Some(min_price) = query.min_price {
            builder.push(" AND price >= ").push_bind(decimal_to_f64(min_price)?);
        }
        if let Some(max_price) = query.max_price {
            builder.push(" AND price <= ").push_bind(decimal_to_f64(max_price)?);
        }

        builder.push(" ORDER BY rating DESC, name ASC");

        // SQLite only folds ASCII case, so text matching runs on decoded rows
        let needle = query.needle();
        if needle.is_empty() {
            let limit = i64::try_from(limit)
                .map_err(|_| RepositoryError::Decode("search limit out of range".to_string()))?;
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut products = Vec::with_capacity(rows.len().min(limit));
        for row in &rows {
            let product = product_from_row(row)?;
            if product.matches_text(needle) {
                products.push(product);
                if products.len() == limit {
                    break;
                }
            }
        }
        Ok(products)
    }
}

#[async_trait]
impl CatalogStore for SqlCatalogStore {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, ApplicationError> {
        let limit = query.validate()?;
        Ok(self.search_rows(query, limit).await?)
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, ApplicationError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    async fn list_categories(&self) -> Result<Vec<String>, ApplicationError> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM product ORDER BY category")
                .fetch_all(&self.pool)
                .await
                .map_err(RepositoryError::from)?;
        Ok(categories)
    }
}

fn decimal_to_f64(value: Decimal) -> Result<f64, RepositoryError> {
    value.to_f64().ok_or_else(|| RepositoryError::Decode(format!("price `{value}` out of range")))
}

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, RepositoryError> {
    let raw: f64 = row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))?;
    Decimal::from_f64_retain(raw)
        .map(|value| value.round_dp(2).normalize())
        .ok_or_else(|| RepositoryError::Decode(format!("{column} `{raw}` is not a finite number")))
}

pub(crate) fn product_from_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let stock: i64 =
        row.try_get("stock_quantity").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let specifications: String =
        row.try_get("specifications").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Product {
        id: ProductId(row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?),
        name: row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?,
        category: Category::from(category),
        price: decimal_column(row, "price")?,
        description: row
            .try_get("description")
            .map_err(|e| RepositoryError::Decode(e.to_string()))?,
        stock_quantity: u32::try_from(stock)
            .map_err(|_| RepositoryError::Decode(format!("invalid stock quantity `{stock}`")))?,
        brand: row.try_get("brand").map_err(|e| RepositoryError::Decode(e.to_string()))?,
        rating: decimal_column(row, "rating")?,
        image_url: row.try_get("image_url").map_err(|e| RepositoryError::Decode(e.to_string()))?,
        specifications: serde_json::from_str::<Specifications>(&specifications)
            .map_err(|e| RepositoryError::Decode(format!("invalid specifications: {e}")))?,
    })
}
