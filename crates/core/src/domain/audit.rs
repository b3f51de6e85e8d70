// Audit metadata carried by members and teams

use serde::{Deserialize, Serialize};

/// One point in time plus the acting identity, taken from injected providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub at: i64, // epoch ms
    pub by: Option<String>,
}

impl AuditStamp {
    pub fn new(at: i64, by: Option<String>) -> Self {
        Self { at, by }
    }
}

/// Creation and last-modification stamps.
///
/// `created_*` never change after insert; update statements only write `updated_*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl Audit {
    /// Stamps for a freshly inserted row
    pub fn created(stamp: &AuditStamp) -> Self {
        Self {
            created_at: stamp.at,
            updated_at: stamp.at,
            created_by: stamp.by.clone(),
            updated_by: stamp.by.clone(),
        }
    }

    /// Copy with the modification stamp replaced
    pub fn touched(&self, stamp: &AuditStamp) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: stamp.at,
            created_by: self.created_by.clone(),
            updated_by: stamp.by.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_keeps_creation_stamp() {
        let created = Audit::created(&AuditStamp::new(1_000, Some("alice".into())));
        assert_eq!(created.created_at, 1_000);
        assert_eq!(created.updated_at, 1_000);

        let touched = created.touched(&AuditStamp::new(2_000, Some("bob".into())));
        assert_eq!(touched.created_at, 1_000);
        assert_eq!(touched.created_by.as_deref(), Some("alice"));
        assert_eq!(touched.updated_at, 2_000);
        assert_eq!(touched.updated_by.as_deref(), Some("bob"));
    }
}
