mod entry_repo;
mod product_repo;
mod settings_repo;

pub use entry_repo::EntryRepository;
pub use product_repo::ProductRepository;
pub use settings_repo::{SettingsRepository, OWNER_KEY, REPO_KEY, TOKEN_KEY};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::{Entry, Product};

/// Initialize the database connection pool and run migrations.
pub async fn init_db(db_path: PathBuf) -> Result<SqlitePool, sqlx::Error> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Owned handle over the local store. Created once at startup and passed
/// by reference; every operation is its own transaction and reads always
/// reflect durable state.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn entries(&self) -> EntryRepository {
        EntryRepository::new(self.pool.clone())
    }

    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone())
    }

    /// Replaces the product and entry collections with a decoded snapshot
    /// in a single transaction. Either the whole snapshot lands or none of
    /// it does. Positive record ids from the snapshot are preserved so that
    /// entry `product_id` references stay intact; an id of 0 lets the store
    /// assign a fresh one.
    pub async fn replace_all(
        &self,
        products: &[Product],
        entries: &[Entry],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM entries").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM products")
            .execute(&mut *tx)
            .await?;

        for product in products {
            if product.id > 0 {
                sqlx::query("INSERT INTO products (id, name, price) VALUES (?, ?, ?)")
                    .bind(product.id)
                    .bind(&product.name)
                    .bind(product.price)
                    .execute(&mut *tx)
                    .await?;
            } else {
                sqlx::query("INSERT INTO products (name, price) VALUES (?, ?)")
                    .bind(&product.name)
                    .bind(product.price)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for entry in entries {
            let timestamp = entry.timestamp.to_rfc3339();
            if entry.id > 0 {
                sqlx::query(
                    r#"
                    INSERT INTO entries (id, product_id, product_name, quantity, total, timestamp)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(entry.id)
                .bind(entry.product_id)
                .bind(&entry.product_name)
                .bind(entry.quantity)
                .bind(entry.total)
                .bind(&timestamp)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    r#"
                    INSERT INTO entries (product_id, product_name, quantity, total, timestamp)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(entry.product_id)
                .bind(&entry.product_name)
                .bind(entry.quantity)
                .bind(entry.total)
                .bind(&timestamp)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await
    }

}
