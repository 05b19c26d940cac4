use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Entry, Product};

pub struct EntryRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    product_id: i64,
    product_name: String,
    quantity: f64,
    total: f64,
    timestamp: String,
}

impl EntryRow {
    fn into_entry(self) -> Entry {
        Entry {
            id: self.id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            total: self.total,
            timestamp: DateTime::parse_from_rfc3339(&self.timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        }
    }
}

impl EntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a sale of `quantity` of `product`, snapshotting its name and
    /// price into the entry. Returns the entry with its store-assigned id.
    pub async fn add(&self, product: &Product, quantity: f64) -> Result<Entry, sqlx::Error> {
        let mut entry = Entry::new(product, quantity);
        let timestamp = entry.timestamp.to_rfc3339();

        let result = sqlx::query(
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
        .execute(&self.pool)
        .await?;

        entry.id = result.last_insert_rowid();
        Ok(entry)
    }

    pub async fn list(&self) -> Result<Vec<Entry>, sqlx::Error> {
        let rows: Vec<EntryRow> = sqlx::query_as("SELECT * FROM entries ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EntryRow::into_entry).collect())
    }

    /// Entries with `timestamp` on or after the cutoff, oldest first.
    /// Timestamps are stored as RFC 3339 UTC strings, so the comparison is
    /// done lexically in SQL.
    pub async fn list_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Entry>, sqlx::Error> {
        let rows: Vec<EntryRow> =
            sqlx::query_as("SELECT * FROM entries WHERE timestamp >= ? ORDER BY timestamp")
                .bind(cutoff.to_rfc3339())
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(EntryRow::into_entry).collect())
    }

    /// Sum of `total` over entries on or after the cutoff.
    pub async fn total_since(&self, cutoff: DateTime<Utc>) -> Result<f64, sqlx::Error> {
        let (total,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total), 0.0) FROM entries WHERE timestamp >= ?",
        )
        .bind(cutoff.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM entries")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[cfg(test)]
    pub async fn insert_raw(&self, entry: &Entry) -> Result<(), sqlx::Error> {
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
        .bind(entry.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_store;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_add_snapshots_product_fields() {
        let ctx = setup_store().await;
        let product = ctx.store.products().add("Coffee", 2.5).await.unwrap();

        let entry = ctx.store.entries().add(&product, 3.0).await.unwrap();

        assert!(entry.id > 0);
        assert_eq!(entry.product_id, product.id);
        assert_eq!(entry.product_name, "Coffee");
        assert_eq!(entry.total, 7.5);
    }

    #[tokio::test]
    async fn test_deleting_product_leaves_entries_intact() {
        let ctx = setup_store().await;
        let product = ctx.store.products().add("Coffee", 2.5).await.unwrap();
        let entry = ctx.store.entries().add(&product, 2.0).await.unwrap();

        ctx.store.products().delete(product.id).await.unwrap();

        let entries = ctx.store.entries().list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry.id);
        assert_eq!(entries[0].product_name, "Coffee");
        assert_eq!(entries[0].product_id, product.id);
    }

    #[tokio::test]
    async fn test_list_since_boundary_is_inclusive() {
        let ctx = setup_store().await;
        let repo = ctx.store.entries();
        let product = Product {
            id: 1,
            name: "Coffee".to_string(),
            price: 2.0,
        };

        let cutoff = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let before = Entry::new(&product, 1.0)
            .with_timestamp(Utc.with_ymd_and_hms(2026, 7, 31, 23, 59, 59).unwrap());
        let at_boundary = Entry::new(&product, 2.0).with_timestamp(cutoff);
        let after = Entry::new(&product, 3.0)
            .with_timestamp(Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap());

        repo.insert_raw(&before).await.unwrap();
        repo.insert_raw(&at_boundary).await.unwrap();
        repo.insert_raw(&after).await.unwrap();

        let recent = repo.list_since(cutoff).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].quantity, 2.0);
        assert_eq!(recent[1].quantity, 3.0);
    }

    #[tokio::test]
    async fn test_total_since_sums_window() {
        let ctx = setup_store().await;
        let repo = ctx.store.entries();
        let product = Product {
            id: 1,
            name: "Coffee".to_string(),
            price: 2.0,
        };

        let cutoff = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let before = Entry::new(&product, 5.0)
            .with_timestamp(Utc.with_ymd_and_hms(2026, 7, 20, 10, 0, 0).unwrap());
        let inside = Entry::new(&product, 3.0)
            .with_timestamp(Utc.with_ymd_and_hms(2026, 8, 10, 10, 0, 0).unwrap());

        repo.insert_raw(&before).await.unwrap();
        repo.insert_raw(&inside).await.unwrap();

        let total = repo.total_since(cutoff).await.unwrap();
        assert_eq!(total, 6.0);
    }

    #[tokio::test]
    async fn test_total_since_empty_is_zero() {
        let ctx = setup_store().await;
        let total = ctx
            .store
            .entries()
            .total_since(Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap())
            .await
            .unwrap();
        assert_eq!(total, 0.0);
    }

    #[tokio::test]
    async fn test_entry_timestamp_roundtrips_through_store() {
        let ctx = setup_store().await;
        let product = ctx.store.products().add("Coffee", 2.5).await.unwrap();

        let created = ctx.store.entries().add(&product, 1.0).await.unwrap();
        let fetched = ctx.store.entries().list().await.unwrap();

        assert_eq!(fetched[0].timestamp, created.timestamp);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let ctx = setup_store().await;
        let product = ctx.store.products().add("Coffee", 2.5).await.unwrap();
        let entry = ctx.store.entries().add(&product, 1.0).await.unwrap();

        ctx.store.entries().delete(entry.id).await.unwrap();
        assert!(ctx.store.entries().list().await.unwrap().is_empty());
    }
}
