// Team Domain Model

use super::audit::Audit;
use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Team ID (store-assigned surrogate key)
pub type TeamId = i64;

/// Team that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Persisted team.
///
/// Members referencing a team are not owned by it; fetch them explicitly with
/// `TeamRepository::find_members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub audit: Audit,
}

impl Team {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyTeamName);
    }
    Ok(())
}
