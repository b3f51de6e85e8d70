//! Shared fixtures for the end-to-end tests in `tests/`

use roster_core::application::Auditing;
use roster_core::domain::{Member, NewMember};
use roster_core::error::Result;
use roster_core::port::{FixedAuditor, FixedTimeProvider, MemberRepository};
use roster_infra_sqlite::{
    create_pool, create_pool_with, run_migrations, SqliteMemberRepository, SqliteTeamRepository,
    StoreConfig,
};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Store {
    pub pool: SqlitePool,
    pub members: Arc<SqliteMemberRepository>,
    pub teams: Arc<SqliteTeamRepository>,
    pub clock: Arc<FixedTimeProvider>,
}

impl Store {
    /// Fresh in-memory database with the schema applied
    pub async fn in_memory() -> Result<Store> {
        let pool = create_pool("sqlite::memory:").await?;
        Self::from_pool(pool).await
    }

    /// File-backed database, needed when two connections must run at once
    pub async fn with_config(config: &StoreConfig) -> Result<Store> {
        let pool = create_pool_with(config).await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Store> {
        run_migrations(&pool).await?;

        let clock = Arc::new(FixedTimeProvider::new(1_000));
        let auditing = Auditing::new(clock.clone(), Arc::new(FixedAuditor::new("it")));

        Ok(Store {
            members: Arc::new(SqliteMemberRepository::new(pool.clone(), auditing.clone())),
            teams: Arc::new(SqliteTeamRepository::new(pool.clone(), auditing)),
            pool,
            clock,
        })
    }

    /// Save one member per age, named member1, member2, ...
    pub async fn save_ages(&self, ages: &[i32]) -> Result<Vec<Member>> {
        let mut saved = Vec::with_capacity(ages.len());
        for (i, age) in ages.iter().enumerate() {
            let member = self
                .members
                .save(&NewMember::new(format!("member{}", i + 1), *age))
                .await?;
            saved.push(member);
        }
        Ok(saved)
    }
}
