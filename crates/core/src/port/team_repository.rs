// Team Repository Port (Interface)

use crate::domain::{Member, NewTeam, Team, TeamId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Team persistence
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert a new team
    async fn save(&self, team: &NewTeam) -> Result<Team>;

    /// Rename an existing team
    async fn update(&self, team: &Team) -> Result<Team>;

    /// Find team by ID
    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>>;

    /// All teams ordered by id
    async fn find_all(&self) -> Result<Vec<Team>>;

    /// Count all teams
    async fn count(&self) -> Result<u64>;

    /// Delete team. Fails with `ConstraintViolation` while members reference it.
    async fn delete(&self, team: &Team) -> Result<()>;

    /// Members referencing the team (explicit reverse-collection fetch)
    async fn find_members(&self, id: TeamId) -> Result<Vec<Member>>;
}
