// src/storage/postgres.rs
// =============================================================================
// Postgres-backed ProductStore.
//
// One table, `products`, with a SERIAL id. The id gives us insertion order,
// which is what "most recent first" in the CSV export sorts by.
// =============================================================================

use super::{ProductStore, StoreError};
use crate::product::ProductRecord;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        image_link TEXT,
        price TEXT,
        rating TEXT,
        store_name TEXT
    )
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and checks the connection with a first round trip.
    ///
    /// A page's worth of workers insert at the same time, so the pool is
    /// sized above sqlx's default.
    pub async fn connect(options: PgConnectOptions) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect_with(options)
            .await?;
        tracing::info!("Connected to Postgres");
        Ok(Self::new(pool))
    }

    /// Creates the products table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_PRODUCTS_TABLE).execute(&self.pool).await?;
        tracing::info!("Products table ready");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn insert(&self, record: &ProductRecord) -> Result<i64, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, description, image_link, price, rating, store_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.image_link)
        .bind(&record.price)
        .bind(&record.rating)
        .bind(&record.store_name)
        .fetch_one(&self.pool)
        .await?;

        let id: i32 = row.try_get("id")?;
        Ok(i64::from(id))
    }

    async fn latest(&self, limit: usize) -> Result<Vec<ProductRecord>, StoreError> {
        let limit = i64::try_from(limit)
            .map_err(|_| StoreError::Rejected(format!("limit {limit} is too large")))?;

        let rows = sqlx::query(
            r#"
            SELECT name, description, image_link, price, rating, store_name
            FROM products
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(records)
    }
}

// Only `name` is NOT NULL; rows written by other tools may hold NULLs
fn record_from_row(row: &PgRow) -> Result<ProductRecord, sqlx::Error> {
    let text = |column: &str| -> Result<String, sqlx::Error> {
        Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
    };

    Ok(ProductRecord {
        name: text("name")?,
        description: text("description")?,
        image_link: text("image_link")?,
        price: text("price")?,
        rating: text("rating")?,
        store_name: text("store_name")?,
    })
}
