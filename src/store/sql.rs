//! SQL-backed product store
//!
//! Runs on sqlx's Any driver: the connection string scheme selects SQLite
//! or PostgreSQL at startup.

use std::sync::Once;

use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::config::DatabaseConfig;
use crate::types::{NewProduct, Product, ProductPatch};
use crate::{Error, Result};

use super::ProductStore;

// The Any drivers may only be installed once per process.
static INSTALL_DRIVERS: Once = Once::new();

/// Product store over a sqlx connection pool.
pub struct SqlStore {
    pool: AnyPool,
    dialect: Dialect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Dialect::Postgres
        } else {
            Dialect::Sqlite
        }
    }
}

impl SqlStore {
    /// Open a connection pool for the configured database URL.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        Ok(Self {
            pool,
            dialect: Dialect::from_url(&config.url),
        })
    }

    /// Create the `product` table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        let id_column = match self.dialect {
            Dialect::Postgres => "BIGSERIAL PRIMARY KEY",
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        };

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS product (
                id {id_column},
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                brand TEXT NOT NULL,
                category TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                currency TEXT NOT NULL,
                stock BIGINT NOT NULL,
                ean TEXT NOT NULL,
                color TEXT NOT NULL,
                size TEXT NOT NULL,
                availability TEXT NOT NULL,
                internal_id TEXT NOT NULL
            )"
        );

        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for SqlStore {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let row = sqlx::query_as::<_, Product>(
            "INSERT INTO product \
                (name, description, brand, category, price, currency, stock, \
                 ean, color, size, availability, internal_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING id, name, description, brand, category, price, currency, \
                 stock, ean, color, size, availability, internal_id",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.currency)
        .bind(product.stock)
        .bind(&product.ean)
        .bind(&product.color)
        .bind(&product.size)
        .bind(&product.availability)
        .bind(&product.internal_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, brand, category, price, currency, \
                 stock, ean, color, size, availability, internal_id \
             FROM product WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, brand, category, price, currency, \
                 stock, ean, color, size, availability, internal_id \
             FROM product ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product> {
        let mut product = self.get(id).await?.ok_or(Error::ProductNotFound)?;
        patch.apply(&mut product);

        let result = sqlx::query(
            "UPDATE product SET \
                name = $1, description = $2, brand = $3, category = $4, \
                price = $5, currency = $6, stock = $7, ean = $8, color = $9, \
                size = $10, availability = $11, internal_id = $12 \
             WHERE id = $13",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.currency)
        .bind(product.stock)
        .bind(&product.ean)
        .bind(&product.color)
        .bind(&product.size)
        .bind(&product.availability)
        .bind(&product.internal_id)
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        // The row can disappear between the read and the write.
        if result.rows_affected() == 0 {
            return Err(Error::ProductNotFound);
        }

        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProductNotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
