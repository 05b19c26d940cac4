use sqlx::SqlitePool;

/// The closed set of setting keys: remote repository owner, repository
/// identity, and the access token used against the content API.
pub const OWNER_KEY: &str = "owner";
pub const REPO_KEY: &str = "repo-identity";
pub const TOKEN_KEY: &str = "access-token";

pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert: a write replaces any existing value for the key.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_store;

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let ctx = setup_store().await;
        let repo = ctx.store.settings();

        assert!(repo.get(OWNER_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let ctx = setup_store().await;
        let repo = ctx.store.settings();

        repo.set(OWNER_KEY, "someone").await.unwrap();
        assert_eq!(
            repo.get(OWNER_KEY).await.unwrap(),
            Some("someone".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let ctx = setup_store().await;
        let repo = ctx.store.settings();

        repo.set(TOKEN_KEY, "old-token").await.unwrap();
        repo.set(TOKEN_KEY, "new-token").await.unwrap();

        assert_eq!(
            repo.get(TOKEN_KEY).await.unwrap(),
            Some("new-token".to_string())
        );
    }
}
