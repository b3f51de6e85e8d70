// Item Repository Port (Interface)

use crate::domain::Item;
use crate::error::Result;
use async_trait::async_trait;

/// Repository for items with caller-assigned ids
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert when `item.is_new()`, otherwise merge (insert only if absent).
    ///
    /// A new item whose id already exists fails with `ConstraintViolation`.
    async fn save(&self, item: &Item) -> Result<Item>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>>;

    async fn count(&self) -> Result<u64>;
}
