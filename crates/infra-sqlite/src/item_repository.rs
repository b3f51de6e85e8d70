// SQLite ItemRepository Implementation

use crate::error::map_sqlx_error;
use crate::rows::ItemRow;
use async_trait::async_trait;
use roster_core::domain::Item;
use roster_core::error::Result;
use roster_core::port::{ItemRepository, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;

pub struct SqliteItemRepository {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn save(&self, item: &Item) -> Result<Item> {
        item.validate()?;

        if item.is_new() {
            let created_at = self.time_provider.now_millis();
            sqlx::query("INSERT INTO item (item_id, created_at) VALUES (?, ?)")
                .bind(&item.id)
                .bind(created_at)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            debug!(item_id = %item.id, "Item inserted");
            return Ok(Item {
                id: item.id.clone(),
                created_at: Some(created_at),
            });
        }

        // Detached item: write it if missing, keep the stored row otherwise
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO item (item_id, created_at) VALUES (?, ?)
            ON CONFLICT (item_id) DO UPDATE SET item_id = excluded.item_id
            RETURNING item_id, created_at
            "#,
        )
        .bind(&item.id)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(item_id = %item.id, "Item merged");
        Ok(row.into_item())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT item_id, created_at FROM item WHERE item_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(ItemRow::into_item))
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
