// Auditing - combines the injected clock and auditor into write stamps

use crate::domain::AuditStamp;
use crate::port::{AuditorProvider, NoAuditor, SystemTimeProvider, TimeProvider};
use std::sync::Arc;

/// Source of audit stamps for repository writes.
///
/// Cheap to clone; adapters keep one and stamp every insert/update with it.
#[derive(Clone)]
pub struct Auditing {
    time_provider: Arc<dyn TimeProvider>,
    auditor: Arc<dyn AuditorProvider>,
}

impl Auditing {
    pub fn new(time_provider: Arc<dyn TimeProvider>, auditor: Arc<dyn AuditorProvider>) -> Self {
        Self {
            time_provider,
            auditor,
        }
    }

    /// System clock, anonymous writes
    pub fn system() -> Self {
        Self::new(Arc::new(SystemTimeProvider), Arc::new(NoAuditor))
    }

    pub fn stamp(&self) -> AuditStamp {
        AuditStamp::new(
            self.time_provider.now_millis(),
            self.auditor.current_auditor(),
        )
    }

    pub fn now_millis(&self) -> i64 {
        self.time_provider.now_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{FixedAuditor, FixedTimeProvider};

    #[test]
    fn test_stamp_uses_injected_providers() {
        let clock = Arc::new(FixedTimeProvider::new(42_000));
        let auditing = Auditing::new(clock.clone(), Arc::new(FixedAuditor::new("admin")));

        let stamp = auditing.stamp();
        assert_eq!(stamp.at, 42_000);
        assert_eq!(stamp.by.as_deref(), Some("admin"));

        clock.set(43_000);
        assert_eq!(auditing.stamp().at, 43_000);
    }

    #[test]
    fn test_system_auditing_is_anonymous() {
        let stamp = Auditing::system().stamp();
        assert!(stamp.by.is_none());
        assert!(stamp.at > 0);
    }
}
