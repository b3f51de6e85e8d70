// SQLite MemberRepository Implementation
//
// Statement helpers take `&mut SqliteConnection` so the pool-backed
// repository and `SqliteRosterTransaction` run the same SQL.

use crate::bulk::bulk_update_members;
use crate::error::map_sqlx_error;
use crate::pager::{fetch_list, fetch_page, fetch_slice, PagedQuery};
use crate::rows::{MemberDtoRow, MemberRow, MemberWithTeamRow};
use crate::transaction::SqliteRosterTransaction;
use async_trait::async_trait;
use roster_core::application::Auditing;
use roster_core::domain::{
    Audit, Member, MemberDto, MemberId, MemberMutation, MemberPredicate, MemberWithTeam,
    NewMember, Page, PageRequest, Slice,
};
use roster_core::error::{AppError, Result};
use roster_core::port::{MemberRepository, RosterTransaction, TransactionalRepository};
use sqlx::pool::PoolConnection;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::time::Duration;
use tracing::debug;

const SELECT_MEMBER: &str = "SELECT m.member_id, m.username, m.age, m.team_id, m.version, \
     m.created_at, m.updated_at, m.created_by, m.updated_by \
     FROM member m";

const SELECT_MEMBER_WITH_TEAM: &str = "SELECT m.member_id, m.username, m.age, m.team_id, \
     m.version, m.created_at, m.updated_at, m.created_by, m.updated_by, \
     t.team_id AS t_team_id, t.name AS t_name, t.created_at AS t_created_at, \
     t.updated_at AS t_updated_at, t.created_by AS t_created_by, t.updated_by AS t_updated_by \
     FROM member m LEFT JOIN team t ON t.team_id = m.team_id";

const MEMBER_PAGE: PagedQuery = PagedQuery {
    content: SELECT_MEMBER,
    count: "SELECT COUNT(*) FROM member m",
};

// The count does not join team: every member row appears exactly once in the
// left join, so counting members alone gives the same total.
const MEMBER_WITH_TEAM_PAGE: PagedQuery = PagedQuery {
    content: SELECT_MEMBER_WITH_TEAM,
    count: "SELECT COUNT(*) FROM member m",
};

pub struct SqliteMemberRepository {
    pool: SqlitePool,
    auditing: Auditing,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool, auditing: Auditing) -> Self {
        Self { pool, auditing }
    }

    async fn conn(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool.acquire().await.map_err(map_sqlx_error)
    }

    async fn fetch_members(&self, sql: &str, binds: &[&str]) -> Result<Vec<Member>> {
        let mut query = sqlx::query_as::<_, MemberRow>(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }

    async fn fetch_members_with_team(
        &self,
        sql: &str,
        binds: &[&str],
    ) -> Result<Vec<MemberWithTeam>> {
        let mut query = sqlx::query_as::<_, MemberWithTeamRow>(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(rows
            .into_iter()
            .map(MemberWithTeamRow::into_member_with_team)
            .collect())
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn save(&self, member: &NewMember) -> Result<Member> {
        let mut conn = self.conn().await?;
        insert_member(&mut conn, &self.auditing, member).await
    }

    async fn update(&self, member: &Member) -> Result<Member> {
        let mut conn = self.conn().await?;
        update_member(&mut conn, &self.auditing, member).await
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        let mut conn = self.conn().await?;
        find_member_by_id(&mut conn, id).await
    }

    async fn find_all(&self) -> Result<Vec<Member>> {
        self.fetch_members(&format!("{} ORDER BY m.member_id", SELECT_MEMBER), &[])
            .await
    }

    async fn count(&self) -> Result<u64> {
        let mut conn = self.conn().await?;
        count_members(&mut conn).await
    }

    async fn delete(&self, member: &Member) -> Result<()> {
        let mut conn = self.conn().await?;
        delete_member(&mut conn, member.id).await
    }

    async fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        age: i32,
    ) -> Result<Vec<Member>> {
        let sql = format!(
            "{} WHERE m.username = ? AND m.age > ? ORDER BY m.member_id",
            SELECT_MEMBER
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(username)
            .bind(age)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }

    async fn find_user(&self, username: &str, age: i32) -> Result<Vec<Member>> {
        let sql = format!(
            "{} WHERE m.username = ? AND m.age = ? ORDER BY m.member_id",
            SELECT_MEMBER
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(username)
            .bind(age)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }

    async fn find_top3(&self) -> Result<Vec<Member>> {
        self.fetch_members(
            &format!("{} ORDER BY m.member_id LIMIT 3", SELECT_MEMBER),
            &[],
        )
        .await
    }

    async fn find_username_list(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT username FROM member ORDER BY member_id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_member_dto(&self) -> Result<Vec<MemberDto>> {
        let rows = sqlx::query_as::<_, MemberDtoRow>(
            "SELECT m.member_id, m.username, t.name AS team_name \
             FROM member m JOIN team t ON t.team_id = m.team_id \
             ORDER BY m.member_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(MemberDtoRow::into_dto).collect())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Member>> {
        // `IN ()` is a syntax error in SQLite
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_MEMBER);
        qb.push(" WHERE m.username IN (");
        let mut separated = qb.separated(", ");
        for name in names {
            separated.push_bind(name.clone());
        }
        separated.push_unseparated(") ORDER BY m.member_id");

        let rows = qb
            .build_query_as::<MemberRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }

    async fn find_list_by_username(&self, username: &str) -> Result<Vec<Member>> {
        self.fetch_members(
            &format!("{} WHERE m.username = ? ORDER BY m.member_id", SELECT_MEMBER),
            &[username],
        )
        .await
    }

    async fn find_optional_by_username(&self, username: &str) -> Result<Option<Member>> {
        // Two rows are enough to tell "one" from "many"
        let mut found = self
            .fetch_members(
                &format!(
                    "{} WHERE m.username = ? ORDER BY m.member_id LIMIT 2",
                    SELECT_MEMBER
                ),
                &[username],
            )
            .await?;
        match found.len() {
            0 | 1 => Ok(found.pop()),
            actual => Err(AppError::IncorrectResultSize {
                expected: 1,
                actual,
            }),
        }
    }

    async fn find_read_only_by_username(&self, username: &str) -> Result<Vec<Member>> {
        let mut conn = self.conn().await?;
        set_query_only(&mut conn, true).await?;

        let sql = format!("{} WHERE m.username = ? ORDER BY m.member_id", SELECT_MEMBER);
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(username)
            .fetch_all(&mut *conn)
            .await
            .map_err(map_sqlx_error);

        if let Err(err) = set_query_only(&mut conn, false).await {
            // Never hand a read-only connection back to the pool
            conn.close_on_drop();
            return Err(err);
        }

        Ok(rows?.into_iter().map(MemberRow::into_member).collect())
    }

    async fn find_list_by_predicate(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Vec<Member>> {
        let mut conn = self.conn().await?;
        fetch_list(
            &mut conn,
            MEMBER_PAGE,
            predicate,
            request,
            MemberRow::into_member,
        )
        .await
    }

    async fn find_all_with_team(&self) -> Result<Vec<MemberWithTeam>> {
        self.fetch_members_with_team(
            &format!("{} ORDER BY m.member_id", SELECT_MEMBER_WITH_TEAM),
            &[],
        )
        .await
    }

    async fn find_with_team_by_username(&self, username: &str) -> Result<Vec<MemberWithTeam>> {
        self.fetch_members_with_team(
            &format!(
                "{} WHERE m.username = ? ORDER BY m.member_id",
                SELECT_MEMBER_WITH_TEAM
            ),
            &[username],
        )
        .await
    }

    async fn find_page(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Page<Member>> {
        let mut conn = self.conn().await?;
        fetch_page(
            &mut conn,
            MEMBER_PAGE,
            predicate,
            request,
            MemberRow::into_member,
        )
        .await
    }

    async fn find_slice(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Slice<Member>> {
        let mut conn = self.conn().await?;
        fetch_slice(
            &mut conn,
            MEMBER_PAGE,
            predicate,
            request,
            MemberRow::into_member,
        )
        .await
    }

    async fn find_page_with_team(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Page<MemberWithTeam>> {
        let mut conn = self.conn().await?;
        fetch_page(
            &mut conn,
            MEMBER_WITH_TEAM_PAGE,
            predicate,
            request,
            MemberWithTeamRow::into_member_with_team,
        )
        .await
    }

    async fn bulk_update(
        &self,
        predicate: &MemberPredicate,
        mutation: &MemberMutation,
    ) -> Result<u64> {
        let mut conn = self.conn().await?;
        bulk_update_members(&mut conn, &self.auditing, predicate, mutation).await
    }
}

#[async_trait]
impl TransactionalRepository for SqliteMemberRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn RosterTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteRosterTransaction::new(
            tx,
            self.auditing.clone(),
            None,
        )))
    }

    async fn begin_transaction_with_deadline(
        &self,
        deadline: Duration,
    ) -> Result<Box<dyn RosterTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteRosterTransaction::new(
            tx,
            self.auditing.clone(),
            Some(deadline),
        )))
    }
}

pub(crate) async fn insert_member(
    conn: &mut SqliteConnection,
    auditing: &Auditing,
    member: &NewMember,
) -> Result<Member> {
    member.validate()?;
    let stamp = auditing.stamp();

    let id: MemberId = sqlx::query_scalar(
        r#"
        INSERT INTO member (
            username, age, team_id, version,
            created_at, updated_at, created_by, updated_by
        ) VALUES (?, ?, ?, 0, ?, ?, ?, ?)
        RETURNING member_id
        "#,
    )
    .bind(&member.username)
    .bind(member.age)
    .bind(member.team_id)
    .bind(stamp.at)
    .bind(stamp.at)
    .bind(&stamp.by)
    .bind(&stamp.by)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    debug!(member_id = id, username = %member.username, "Member inserted");

    Ok(Member {
        id,
        username: member.username.clone(),
        age: member.age,
        team_id: member.team_id,
        version: 0,
        audit: Audit::created(&stamp),
    })
}

/// Full-field update guarded by the member's version.
///
/// `created_*` columns are never written here.
pub(crate) async fn update_member(
    conn: &mut SqliteConnection,
    auditing: &Auditing,
    member: &Member,
) -> Result<Member> {
    member.validate()?;
    let stamp = auditing.stamp();

    let result = sqlx::query(
        r#"
        UPDATE member
        SET username = ?, age = ?, team_id = ?, version = version + 1,
            updated_at = ?, updated_by = ?
        WHERE member_id = ? AND version = ?
        "#,
    )
    .bind(&member.username)
    .bind(member.age)
    .bind(member.team_id)
    .bind(stamp.at)
    .bind(&stamp.by)
    .bind(member.id)
    .bind(member.version)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    if result.rows_affected() == 0 {
        let current: Option<i64> = sqlx::query_scalar("SELECT version FROM member WHERE member_id = ?")
            .bind(member.id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        return Err(match current {
            None => AppError::NotFound(format!("Member {} not found", member.id)),
            Some(version) => AppError::ConcurrentModification(format!(
                "Member {} is at version {}, update was based on version {}",
                member.id, version, member.version
            )),
        });
    }

    Ok(Member {
        version: member.version + 1,
        audit: member.audit.touched(&stamp),
        ..member.clone()
    })
}

pub(crate) async fn delete_member(conn: &mut SqliteConnection, id: MemberId) -> Result<()> {
    let result = sqlx::query("DELETE FROM member WHERE member_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    if result.rows_affected() == 0 {
        debug!(member_id = id, "Delete matched no member");
    }
    Ok(())
}

pub(crate) async fn find_member_by_id(
    conn: &mut SqliteConnection,
    id: MemberId,
) -> Result<Option<Member>> {
    let sql = format!("{} WHERE m.member_id = ?", SELECT_MEMBER);
    let row = sqlx::query_as::<_, MemberRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(row.map(MemberRow::into_member))
}

pub(crate) async fn count_members(conn: &mut SqliteConnection) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member")
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Switch `PRAGMA query_only` on the connection; writes fail while it is on
pub(crate) async fn set_query_only(conn: &mut SqliteConnection, on: bool) -> Result<()> {
    let sql = if on {
        "PRAGMA query_only = ON"
    } else {
        "PRAGMA query_only = OFF"
    };
    sqlx::query(sql)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

/// Members with `username`, read after taking the database write lock.
///
/// SQLite has no row locks. A no-op UPDATE makes this transaction the single
/// writer until it ends, so other writers wait (up to `busy_timeout`) and
/// then fail with `ConnectivityFailure`.
pub(crate) async fn find_lock_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Vec<Member>> {
    sqlx::query("UPDATE member SET username = username WHERE username = ?")
        .bind(username)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    let sql = format!("{} WHERE m.username = ? ORDER BY m.member_id", SELECT_MEMBER);
    let rows = sqlx::query_as::<_, MemberRow>(&sql)
        .bind(username)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(rows.into_iter().map(MemberRow::into_member).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteTeamRepository};
    use roster_core::domain::{Direction, NewTeam, Sort};
    use roster_core::port::{FixedAuditor, FixedTimeProvider, TeamRepository};
    use std::sync::Arc;

    struct Fixture {
        members: SqliteMemberRepository,
        teams: SqliteTeamRepository,
        clock: Arc<FixedTimeProvider>,
    }

    async fn setup() -> Fixture {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let clock = Arc::new(FixedTimeProvider::new(1_000));
        let auditing = Auditing::new(clock.clone(), Arc::new(FixedAuditor::new("tester")));

        Fixture {
            members: SqliteMemberRepository::new(pool.clone(), auditing.clone()),
            teams: SqliteTeamRepository::new(pool, auditing),
            clock,
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let fx = setup().await;

        let saved = fx.members.save(&NewMember::new("memberA", 10)).await.unwrap();
        assert!(saved.id > 0);
        assert_eq!(saved.version, 0);
        assert_eq!(saved.audit.created_at, 1_000);
        assert_eq!(saved.audit.created_by.as_deref(), Some("tester"));

        let found = fx.members.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found, saved);

        assert!(fx.members.find_by_id(saved.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unsaved_team_reference_is_constraint_violation() {
        let fx = setup().await;

        let err = fx
            .members
            .save(&NewMember::with_team("memberA", 10, 42))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConstraintViolation(_)));
        assert_eq!(fx.members.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_age_rejected() {
        let fx = setup().await;
        let err = fx
            .members
            .save(&NewMember::new("memberA", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_created_and_bumps_version() {
        let fx = setup().await;
        let mut member = fx.members.save(&NewMember::new("memberA", 10)).await.unwrap();

        fx.clock.set(2_000);
        member.username = "memberB".to_string();
        let updated = fx.members.update(&member).await.unwrap();

        assert_eq!(updated.version, 1);
        assert_eq!(updated.audit.created_at, 1_000);
        assert_eq!(updated.audit.updated_at, 2_000);

        let stored = fx.members.find_by_id(member.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_stale_update_is_concurrent_modification() {
        let fx = setup().await;
        let member = fx.members.save(&NewMember::new("memberA", 10)).await.unwrap();

        let mut first = member.clone();
        first.age = 11;
        fx.members.update(&first).await.unwrap();

        let mut stale = member;
        stale.age = 12;
        let err = fx.members.update(&stale).await.unwrap_err();
        assert!(matches!(err, AppError::ConcurrentModification(_)));
    }

    #[tokio::test]
    async fn test_update_missing_member_is_not_found() {
        let fx = setup().await;
        let member = fx.members.save(&NewMember::new("memberA", 10)).await.unwrap();
        fx.members.delete(&member).await.unwrap();

        let err = fx.members.update(&member).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let fx = setup().await;
        let member = fx.members.save(&NewMember::new("memberA", 10)).await.unwrap();

        fx.members.delete(&member).await.unwrap();
        fx.members.delete(&member).await.unwrap();
        assert_eq!(fx.members.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_named_queries() {
        let fx = setup().await;
        let team = fx.teams.save(&NewTeam::new("teamA")).await.unwrap();
        fx.members.save(&NewMember::new("AAA", 10)).await.unwrap();
        fx.members.save(&NewMember::new("AAA", 20)).await.unwrap();
        fx.members
            .save(&NewMember::with_team("BBB", 20, team.id))
            .await
            .unwrap();
        fx.members.save(&NewMember::new("CCC", 30)).await.unwrap();

        let older = fx
            .members
            .find_by_username_and_age_greater_than("AAA", 15)
            .await
            .unwrap();
        assert_eq!(older.len(), 1);
        assert_eq!(older[0].age, 20);

        let exact = fx.members.find_user("AAA", 10).await.unwrap();
        assert_eq!(exact.len(), 1);

        let top3 = fx.members.find_top3().await.unwrap();
        assert_eq!(top3.len(), 3);

        let names = fx.members.find_username_list().await.unwrap();
        assert_eq!(names, vec!["AAA", "AAA", "BBB", "CCC"]);

        // Inner join: members without a team are left out
        let dtos = fx.members.find_member_dto().await.unwrap();
        assert_eq!(dtos.len(), 1);
        assert_eq!(dtos[0].username, "BBB");
        assert_eq!(dtos[0].team_name, "teamA");

        let by_names = fx
            .members
            .find_by_names(&["BBB".to_string(), "CCC".to_string()])
            .await
            .unwrap();
        assert_eq!(by_names.len(), 2);

        assert!(fx.members.find_by_names(&[]).await.unwrap().is_empty());
        assert_eq!(fx.members.find_list_by_username("AAA").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_optional_by_username() {
        let fx = setup().await;
        fx.members.save(&NewMember::new("AAA", 10)).await.unwrap();
        fx.members.save(&NewMember::new("AAA", 20)).await.unwrap();
        fx.members.save(&NewMember::new("BBB", 20)).await.unwrap();

        assert!(fx
            .members
            .find_optional_by_username("ZZZ")
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            fx.members
                .find_optional_by_username("BBB")
                .await
                .unwrap()
                .unwrap()
                .age,
            20
        );

        let err = fx
            .members
            .find_optional_by_username("AAA")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::IncorrectResultSize {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_find_optional_reports_at_least_two() {
        let fx = setup().await;
        for age in [10, 20, 30] {
            fx.members.save(&NewMember::new("AAA", age)).await.unwrap();
        }

        let err = fx
            .members
            .find_optional_by_username("AAA")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::IncorrectResultSize {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_read_only_lookup_restores_writable_connection() {
        let fx = setup().await;
        fx.members.save(&NewMember::new("member1", 10)).await.unwrap();

        let found = fx
            .members
            .find_read_only_by_username("member1")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].age, 10);

        // The in-memory pool has a single connection, the one just used
        fx.members.save(&NewMember::new("member2", 20)).await.unwrap();
        assert_eq!(fx.members.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_only_connection_rejects_writes() {
        let fx = setup().await;
        let auditing = Auditing::new(fx.clock.clone(), Arc::new(FixedAuditor::new("tester")));
        let mut conn = fx.members.conn().await.unwrap();

        set_query_only(&mut conn, true).await.unwrap();
        let err = insert_member(&mut conn, &auditing, &NewMember::new("member1", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        set_query_only(&mut conn, false).await.unwrap();
        insert_member(&mut conn, &auditing, &NewMember::new("member1", 10))
            .await
            .unwrap();
        assert_eq!(count_members(&mut conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_with_team_fetches_join() {
        let fx = setup().await;
        let team = fx.teams.save(&NewTeam::new("teamA")).await.unwrap();
        fx.members
            .save(&NewMember::with_team("member1", 10, team.id))
            .await
            .unwrap();
        fx.members.save(&NewMember::new("member2", 20)).await.unwrap();

        let all = fx.members.find_all_with_team().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].team.as_ref().map(|t| t.name.as_str()), Some("teamA"));
        assert!(all[1].team.is_none());

        let one = fx.members.find_with_team_by_username("member1").await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].team.as_ref().map(|t| t.id), Some(team.id));
    }

    #[tokio::test]
    async fn test_page_with_team_counts_members_only() {
        let fx = setup().await;
        let team = fx.teams.save(&NewTeam::new("teamA")).await.unwrap();
        for i in 0..5 {
            let team_id = (i % 2 == 0).then_some(team.id);
            let member = NewMember {
                username: format!("member{}", i),
                age: 10,
                team_id,
            };
            fx.members.save(&member).await.unwrap();
        }

        let request = PageRequest::sorted(0, 3, Sort::by(Direction::Asc, &["username"])).unwrap();
        let page = fx
            .members
            .find_page_with_team(&MemberPredicate::AgeEquals(10), &request)
            .await
            .unwrap();

        assert_eq!(page.total_elements(), 5);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.content()[0].member.username, "member0");
        assert!(page.content()[0].team.is_some());
        assert!(page.content()[1].team.is_none());
    }

    #[tokio::test]
    async fn test_page_beyond_data() {
        let fx = setup().await;
        for i in 0..5 {
            fx.members
                .save(&NewMember::new(format!("member{}", i), 10))
                .await
                .unwrap();
        }

        let page = fx
            .members
            .find_page(&MemberPredicate::All, &PageRequest::of(9, 3).unwrap())
            .await
            .unwrap();
        assert!(page.content().is_empty());
        assert_eq!(page.total_elements(), 5);
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_next());
    }
}
