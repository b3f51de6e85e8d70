// Auditor Provider Port
//
// Supplies the identity written to created_by / updated_by. Passed in at
// construction; there is no process-wide auditor.

/// Auditor provider interface
pub trait AuditorProvider: Send + Sync {
    /// Identity of whoever performs the current write, if known
    fn current_auditor(&self) -> Option<String>;
}

/// No identity available (audit columns stay NULL)
pub struct NoAuditor;

impl AuditorProvider for NoAuditor {
    fn current_auditor(&self) -> Option<String> {
        None
    }
}

/// Same identity for every write (CLI user, service account)
pub struct FixedAuditor(String);

impl FixedAuditor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl AuditorProvider for FixedAuditor {
    fn current_auditor(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
