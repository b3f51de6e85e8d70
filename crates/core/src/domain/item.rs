// Item Domain Model
//
// Identity is assigned by the caller, so "is this new?" cannot be answered by
// looking at the id. A missing creation stamp marks the item as new.

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Item ID (caller-assigned)
pub type ItemId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub created_at: Option<i64>, // epoch ms, set by the repository on insert
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
        }
    }

    /// New items are inserted; existing ones are merged.
    pub fn is_new(&self) -> bool {
        self.created_at.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::EmptyItemId);
        }
        Ok(())
    }
}
