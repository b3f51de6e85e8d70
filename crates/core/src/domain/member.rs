// Member Domain Model

use super::audit::Audit;
use super::error::{DomainError, Result};
use super::team::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// Member ID (store-assigned surrogate key)
pub type MemberId = i64;

/// Member that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub username: String,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: username.into(),
            age,
            team_id: None,
        }
    }

    /// Member belonging to a team. The team must already be persisted.
    pub fn with_team(username: impl Into<String>, age: i32, team_id: TeamId) -> Self {
        Self {
            username: username.into(),
            age,
            team_id: Some(team_id),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.username, self.age)
    }
}

/// Persisted member.
///
/// `version` is bumped by every update (explicit or bulk); an explicit update
/// carrying an older version is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub age: i32,
    pub team_id: Option<TeamId>,
    pub version: i64,
    pub audit: Audit,
}

impl Member {
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.username, self.age)?;
        if self.version < 0 {
            return Err(DomainError::NegativeVersion(self.version));
        }
        Ok(())
    }

    /// Move to another team (or none). Takes effect on the next explicit update.
    pub fn change_team(&mut self, team_id: Option<TeamId>) {
        self.team_id = team_id;
    }
}

/// Member joined with its team name (inner join projection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: MemberId,
    pub username: String,
    pub team_name: String,
}

/// Member fetched together with its team in one statement (left join)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberWithTeam {
    pub member: Member,
    pub team: Option<Team>,
}

fn validate_fields(username: &str, age: i32) -> Result<()> {
    if username.trim().is_empty() {
        return Err(DomainError::EmptyUsername);
    }
    if age < 0 {
        return Err(DomainError::NegativeAge(age));
    }
    Ok(())
}
