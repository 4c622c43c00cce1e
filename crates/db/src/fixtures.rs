use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use shopwise_core::domain::product::{Category, Product, ProductId, Specifications};

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const CLOTHING_BRANDS: [&str; 5] = ["Nike", "Adidas", "Zara", "H&M", "Uniqlo"];
const CLOTHING_TYPES: [&str; 5] = ["T-Shirt", "Jeans", "Hoodie", "Sneakers", "Jacket"];
const HOME_KINDS: [&str; 5] = ["Furniture", "Kitchen", "Decor", "Garden", "Storage"];
const SPORTS_BRANDS: [&str; 5] = ["Nike", "Adidas", "Under Armour", "Puma", "Reebok"];

/// Expected product count per storefront department after seeding.
const CATEGORY_CONTRACT: &[(&str, i64)] = &[
    ("Electronics", 5),
    ("Books", 2),
    ("Clothing", 20),
    ("Home & Garden", 30),
    ("Sports & Outdoors", 25),
];

/// Demo storefront catalog.
///
/// Seven hand-written flagship products plus generated clothing, home and
/// sports ranges. Ids are assigned in insertion order starting at 1.
pub struct CatalogSeed;

impl CatalogSeed {
    pub fn products() -> Vec<Product> {
        let mut products = flagship_products();
        products.extend(clothing_range());
        products.extend(home_range());
        products.extend(sports_range());

        for (index, product) in products.iter_mut().enumerate() {
            product.id = ProductId(index as i64 + 1);
        }
        products
    }

    /// Inserts the catalog when the product table is empty; otherwise leaves
    /// existing rows untouched.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM product").fetch_one(pool).await?;
        if existing > 0 {
            return Ok(SeedResult { inserted: 0, skipped_existing: existing });
        }

        let products = Self::products();
        let mut tx = pool.begin().await?;
        for product in &products {
            let specifications = serde_json::to_string(&product.specifications)
                .map_err(|e| RepositoryError::Decode(e.to_string()))?;
            sqlx::query(
                "INSERT INTO product (id, name, category, price, description, stock_quantity,
                                      brand, rating, image_url, specifications)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(product.id.0)
            .bind(&product.name)
            .bind(product.category.as_str())
            .bind(as_real(product.price)?)
            .bind(&product.description)
            .bind(i64::from(product.stock_quantity))
            .bind(&product.brand)
            .bind(as_real(product.rating)?)
            .bind(&product.image_url)
            .bind(specifications)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(SeedResult { inserted: products.len(), skipped_existing: 0 })
    }

    /// Checks every department holds at least its seeded product count.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(CATEGORY_CONTRACT.len());
        for (category, expected) in CATEGORY_CONTRACT {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM product WHERE category = ?")
                .bind(category)
                .fetch_one(pool)
                .await?;
            checks.push((*category, count >= *expected));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}

fn as_real(value: Decimal) -> Result<f64, RepositoryError> {
    value.to_f64().ok_or_else(|| RepositoryError::Decode(format!("`{value}` is out of range")))
}

fn specs(value: Value) -> Specifications {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => Specifications::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    name: impl Into<String>,
    category: Category,
    price: Decimal,
    description: impl Into<String>,
    stock_quantity: u32,
    brand: impl Into<String>,
    rating: Decimal,
    image_url: impl Into<String>,
    specifications: Value,
) -> Product {
    Product {
        id: ProductId(0),
        name: name.into(),
        category,
        price,
        description: description.into(),
        stock_quantity,
        brand: brand.into(),
        rating,
        image_url: image_url.into(),
        specifications: specs(specifications),
    }
}

fn flagship_products() -> Vec<Product> {
    vec![
        product(
            "iPhone 15 Pro",
            Category::Electronics,
            Decimal::new(99_999, 2),
            "Latest iPhone with A17 Pro chip and titanium design",
            50,
            "Apple",
            Decimal::new(48, 1),
            "/static/products/iphone15pro.jpg",
            json!({
                "display": "6.1-inch Super Retina XDR",
                "storage": "128GB",
                "camera": "48MP Main camera",
                "battery": "Up to 23 hours video playback"
            }),
        ),
        product(
            "Samsung Galaxy S24 Ultra",
            Category::Electronics,
            Decimal::new(119_999, 2),
            "Premium Android smartphone with S Pen and AI features",
            30,
            "Samsung",
            Decimal::new(47, 1),
            "/static/products/galaxy_s24_ultra.jpg",
            json!({
                "display": "6.8-inch Dynamic AMOLED 2X",
                "storage": "256GB",
                "camera": "200MP Main camera",
                "battery": "5000mAh"
            }),
        ),
        product(
            "MacBook Pro 14-inch M3",
            Category::Electronics,
            Decimal::new(159_999, 2),
            "Professional laptop with M3 chip for creative workflows",
            25,
            "Apple",
            Decimal::new(49, 1),
            "/static/products/macbook_pro_14.jpg",
            json!({
                "processor": "Apple M3 chip",
                "memory": "8GB unified memory",
                "storage": "512GB SSD",
                "display": "14.2-inch Liquid Retina XDR"
            }),
        ),
        product(
            "Dell XPS 13",
            Category::Electronics,
            Decimal::new(89_999, 2),
            "Ultra-portable laptop with InfinityEdge display",
            40,
            "Dell",
            Decimal::new(45, 1),
            "/static/products/dell_xps_13.jpg",
            json!({
                "processor": "Intel Core i7-1355U",
                "memory": "16GB LPDDR5",
                "storage": "512GB SSD",
                "display": "13.4-inch FHD+"
            }),
        ),
        product(
            "Sony WH-1000XM5",
            Category::Electronics,
            Decimal::new(39_999, 2),
            "Industry-leading noise canceling wireless headphones",
            60,
            "Sony",
            Decimal::new(46, 1),
            "/static/products/sony_wh1000xm5.jpg",
            json!({
                "battery_life": "30 hours",
                "noise_canceling": "Industry-leading",
                "connectivity": "Bluetooth 5.2",
                "weight": "250g"
            }),
        ),
        product(
            "The Psychology of Money",
            Category::Books,
            Decimal::new(1_499, 2),
            "Timeless lessons on wealth, greed, and happiness",
            100,
            "Harriman House",
            Decimal::new(47, 1),
            "/static/products/psychology_of_money.jpg",
            json!({
                "author": "Morgan Housel",
                "pages": 256,
                "format": "Paperback",
                "language": "English"
            }),
        ),
        product(
            "Atomic Habits",
            Category::Books,
            Decimal::new(1_399, 2),
            "An Easy & Proven Way to Build Good Habits & Break Bad Ones",
            80,
            "Avery",
            Decimal::new(48, 1),
            "/static/products/atomic_habits.jpg",
            json!({
                "author": "James Clear",
                "pages": 320,
                "format": "Hardcover",
                "language": "English"
            }),
        ),
    ]
}

fn clothing_range() -> Vec<Product> {
    (0..20u32)
        .map(|i| {
            let brand = CLOTHING_BRANDS[i as usize % CLOTHING_BRANDS.len()];
            let item_type = CLOTHING_TYPES[i as usize % CLOTHING_TYPES.len()];
            product(
                format!("{brand} {item_type} - Style {}", i + 1),
                Category::Clothing,
                Decimal::new(2_999, 2) + Decimal::from(i) * Decimal::new(55, 1),
                format!("Premium {} from {brand} with modern design", item_type.to_lowercase()),
                50 + i,
                brand,
                Decimal::new(40 + i64::from(i % 10), 1),
                format!(
                    "/static/products/{}_{}_{}.jpg",
                    brand.to_lowercase(),
                    item_type.to_lowercase(),
                    i + 1
                ),
                json!({
                    "material": "Cotton blend",
                    "sizes": "XS, S, M, L, XL",
                    "care": "Machine washable",
                    "origin": "Made in Vietnam"
                }),
            )
        })
        .collect()
}

fn home_range() -> Vec<Product> {
    (0..30u32)
        .map(|i| {
            let kind = HOME_KINDS[i as usize % HOME_KINDS.len()];
            let weight = Decimal::new(10, 1) + Decimal::from(i) * Decimal::new(5, 1);
            product(
                format!("{kind} Item {}", i + 1),
                Category::HomeAndGarden,
                Decimal::new(4_999, 2) + Decimal::from(i) * Decimal::new(123, 1),
                format!("High-quality {} item for your home", kind.to_lowercase()),
                25 + i,
                format!("Brand{}", i % 5 + 1),
                Decimal::new(38 + i64::from(i % 12), 1),
                format!("/static/products/home_{}_{}.jpg", kind.to_lowercase(), i + 1),
                json!({
                    "dimensions": format!("{}x{}x{} cm", 20 + i, 15 + i, 10 + i),
                    "weight": format!("{weight} kg"),
                    "material": "Premium materials",
                    "warranty": "2 years"
                }),
            )
        })
        .collect()
}

fn sports_range() -> Vec<Product> {
    (0..25u32)
        .map(|i| {
            let brand = SPORTS_BRANDS[i as usize % SPORTS_BRANDS.len()];
            product(
                format!("{brand} Sports Equipment {}", i + 1),
                Category::SportsAndOutdoors,
                Decimal::new(7_999, 2) + Decimal::from(i) * Decimal::new(87, 1),
                format!("Professional sports equipment from {brand}"),
                35 + i,
                brand,
                Decimal::new(42 + i64::from(i % 8), 1),
                format!("/static/products/sports_{}_{}.jpg", brand.to_lowercase(), i + 1),
                json!({
                    "type": "Professional grade",
                    "suitable_for": "All skill levels",
                    "warranty": "1 year",
                    "certification": "Official standards"
                }),
            )
        })
        .collect()
}

#[derive(Debug)]
pub struct SeedResult {
    pub inserted: usize,
    pub skipped_existing: i64,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
