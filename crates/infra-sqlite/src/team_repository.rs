// SQLite TeamRepository Implementation

use crate::error::map_sqlx_error;
use crate::rows::{MemberRow, TeamRow};
use async_trait::async_trait;
use roster_core::application::Auditing;
use roster_core::domain::{Audit, Member, NewTeam, Team, TeamId};
use roster_core::error::{AppError, Result};
use roster_core::port::TeamRepository;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

const SELECT_TEAM: &str =
    "SELECT team_id, name, created_at, updated_at, created_by, updated_by FROM team";

pub struct SqliteTeamRepository {
    pool: SqlitePool,
    auditing: Auditing,
}

impl SqliteTeamRepository {
    pub fn new(pool: SqlitePool, auditing: Auditing) -> Self {
        Self { pool, auditing }
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn save(&self, team: &NewTeam) -> Result<Team> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        insert_team(&mut conn, &self.auditing, team).await
    }

    async fn update(&self, team: &Team) -> Result<Team> {
        team.validate()?;
        let stamp = self.auditing.stamp();

        let result =
            sqlx::query("UPDATE team SET name = ?, updated_at = ?, updated_by = ? WHERE team_id = ?")
                .bind(&team.name)
                .bind(stamp.at)
                .bind(&stamp.by)
                .bind(team.id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", team.id)));
        }

        Ok(Team {
            audit: team.audit.touched(&stamp),
            ..team.clone()
        })
    }

    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>> {
        let sql = format!("{} WHERE team_id = ?", SELECT_TEAM);
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(TeamRow::into_team))
    }

    async fn find_all(&self) -> Result<Vec<Team>> {
        let sql = format!("{} ORDER BY team_id", SELECT_TEAM);
        let rows = sqlx::query_as::<_, TeamRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(TeamRow::into_team).collect())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn delete(&self, team: &Team) -> Result<()> {
        // Members still pointing at the team make this a foreign key violation
        let result = sqlx::query("DELETE FROM team WHERE team_id = ?")
            .bind(team.id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            debug!(team_id = team.id, "Delete matched no team");
        }
        Ok(())
    }

    async fn find_members(&self, id: TeamId) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT m.member_id, m.username, m.age, m.team_id, m.version, \
             m.created_at, m.updated_at, m.created_by, m.updated_by \
             FROM member m WHERE m.team_id = ? ORDER BY m.member_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }
}

pub(crate) async fn insert_team(
    conn: &mut SqliteConnection,
    auditing: &Auditing,
    team: &NewTeam,
) -> Result<Team> {
    team.validate()?;
    let stamp = auditing.stamp();

    let id: TeamId = sqlx::query_scalar(
        r#"
        INSERT INTO team (name, created_at, updated_at, created_by, updated_by)
        VALUES (?, ?, ?, ?, ?)
        RETURNING team_id
        "#,
    )
    .bind(&team.name)
    .bind(stamp.at)
    .bind(stamp.at)
    .bind(&stamp.by)
    .bind(&stamp.by)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    debug!(team_id = id, name = %team.name, "Team inserted");

    Ok(Team {
        id,
        name: team.name.clone(),
        audit: Audit::created(&stamp),
    })
}
