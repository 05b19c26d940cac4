use sqlx::SqlitePool;

use crate::models::Product;

pub struct ProductRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a product and returns it with its store-assigned id.
    pub async fn add(&self, name: &str, price: f64) -> Result<Product, sqlx::Error> {
        let mut product = Product::new(name, price);

        let result = sqlx::query("INSERT INTO products (name, price) VALUES (?, ?)")
            .bind(&product.name)
            .bind(product.price)
            .execute(&self.pool)
            .await?;

        product.id = result.last_insert_rowid();
        Ok(product)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Product>, sqlx::Error> {
        let row: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| Product {
            id: r.id,
            name: r.name,
            price: r.price,
        }))
    }

    pub async fn list(&self) -> Result<Vec<Product>, sqlx::Error> {
        let rows: Vec<ProductRow> = sqlx::query_as("SELECT * FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Product {
                id: r.id,
                name: r.name,
                price: r.price,
            })
            .collect())
    }

    pub async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::setup_store;

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let ctx = setup_store().await;
        let repo = ctx.store.products();

        let a = repo.add("Coffee", 2.5).await.unwrap();
        let b = repo.add("Tea", 1.5).await.unwrap();

        assert!(a.id > 0);
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_delete_leaves_survivors() {
        let ctx = setup_store().await;
        let repo = ctx.store.products();

        let a = repo.add("Coffee", 2.5).await.unwrap();
        let b = repo.add("Tea", 1.5).await.unwrap();
        let c = repo.add("Cake", 4.0).await.unwrap();

        repo.delete(b.id).await.unwrap();

        let remaining = repo.list().await.unwrap();
        let ids: Vec<i64> = remaining.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let ctx = setup_store().await;
        let repo = ctx.store.products();

        let a = repo.add("Coffee", 2.5).await.unwrap();
        repo.delete(a.id).await.unwrap();
        let b = repo.add("Tea", 1.5).await.unwrap();

        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_returns_none() {
        let ctx = setup_store().await;
        let repo = ctx.store.products();

        assert!(repo.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_empties_collection() {
        let ctx = setup_store().await;
        let repo = ctx.store.products();

        repo.add("Coffee", 2.5).await.unwrap();
        repo.add("Tea", 1.5).await.unwrap();
        repo.clear().await.unwrap();

        assert!(repo.list().await.unwrap().is_empty());
    }
}
