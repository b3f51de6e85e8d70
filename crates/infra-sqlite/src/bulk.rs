// Bulk updater - one set-based UPDATE per call
//
// The statement goes straight to the store. Nothing here knows about caller
// caches; `MemberSession` in core decides what to do with its entries.

use crate::error::map_sqlx_error;
use crate::query::{push_mutation, push_predicate};
use roster_core::application::Auditing;
use roster_core::domain::{MemberMutation, MemberPredicate};
use roster_core::error::Result;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::info;

/// Apply `mutation` to every member matching `predicate`; returns rows affected.
///
/// Each affected row gets `version + 1` and a fresh modification stamp.
pub(crate) async fn bulk_update_members(
    conn: &mut SqliteConnection,
    auditing: &Auditing,
    predicate: &MemberPredicate,
    mutation: &MemberMutation,
) -> Result<u64> {
    mutation.validate()?;
    let stamp = auditing.stamp();

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE member SET ");
    push_mutation(&mut qb, mutation);
    qb.push(", version = version + 1, updated_at = ")
        .push_bind(stamp.at)
        .push(", updated_by = ")
        .push_bind(stamp.by);
    push_predicate(&mut qb, predicate, "");

    let result = qb
        .build()
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    let affected = result.rows_affected();
    info!(
        predicate = ?predicate,
        mutation = ?mutation,
        affected = affected,
        "Bulk update applied"
    );

    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use roster_core::error::AppError;
    use roster_core::port::{FixedAuditor, FixedTimeProvider};
    use sqlx::SqlitePool;
    use std::sync::Arc;

    async fn setup(ages: &[i32]) -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        for (i, age) in ages.iter().enumerate() {
            sqlx::query(
                "INSERT INTO member (username, age, created_at, updated_at) VALUES (?, ?, 0, 0)",
            )
            .bind(format!("member{}", i + 1))
            .bind(age)
            .execute(&pool)
            .await
            .unwrap();
        }
        pool
    }

    fn auditing() -> Auditing {
        Auditing::new(
            Arc::new(FixedTimeProvider::new(5_000)),
            Arc::new(FixedAuditor::new("batch")),
        )
    }

    #[tokio::test]
    async fn test_increment_age_at_least() {
        let pool = setup(&[10, 19, 20, 21, 40]).await;
        let mut conn = pool.acquire().await.unwrap();

        let affected = bulk_update_members(
            &mut conn,
            &auditing(),
            &MemberPredicate::AgeAtLeast(20),
            &MemberMutation::IncrementAge(1),
        )
        .await
        .unwrap();
        assert_eq!(affected, 3);

        let ages: Vec<i32> = sqlx::query_scalar("SELECT age FROM member ORDER BY member_id")
            .fetch_all(&mut *conn)
            .await
            .unwrap();
        assert_eq!(ages, vec![10, 19, 21, 22, 41]);
    }

    #[tokio::test]
    async fn test_stamps_and_versions_affected_rows_only() {
        let pool = setup(&[10, 30]).await;
        let mut conn = pool.acquire().await.unwrap();

        bulk_update_members(
            &mut conn,
            &auditing(),
            &MemberPredicate::AgeGreaterThan(20),
            &MemberMutation::SetAge(31),
        )
        .await
        .unwrap();

        let rows: Vec<(i64, i64, Option<String>)> = sqlx::query_as(
            "SELECT version, updated_at, updated_by FROM member ORDER BY member_id",
        )
        .fetch_all(&mut *conn)
        .await
        .unwrap();
        assert_eq!(rows[0], (0, 0, None));
        assert_eq!(rows[1], (1, 5_000, Some("batch".to_string())));
    }

    #[tokio::test]
    async fn test_no_match_affects_nothing() {
        let pool = setup(&[10]).await;
        let mut conn = pool.acquire().await.unwrap();

        let affected = bulk_update_members(
            &mut conn,
            &auditing(),
            &MemberPredicate::UsernameEquals("nobody".to_string()),
            &MemberMutation::IncrementAge(1),
        )
        .await
        .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_set_team_to_missing_team_is_constraint_violation() {
        let pool = setup(&[10]).await;
        let mut conn = pool.acquire().await.unwrap();

        let err = bulk_update_members(
            &mut conn,
            &auditing(),
            &MemberPredicate::All,
            &MemberMutation::SetTeam(Some(999)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_increment_past_i32_fails_whole_statement() {
        let pool = setup(&[10, 40]).await;
        let mut conn = pool.acquire().await.unwrap();

        let err = bulk_update_members(
            &mut conn,
            &auditing(),
            &MemberPredicate::All,
            &MemberMutation::IncrementAge(i32::MAX),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ConstraintViolation(_)));

        // Statement-level abort: the row that would have fit is untouched too
        let rows: Vec<(i32, i64)> =
            sqlx::query_as("SELECT age, version FROM member ORDER BY member_id")
                .fetch_all(&mut *conn)
                .await
                .unwrap();
        assert_eq!(rows, vec![(10, 0), (40, 0)]);
    }

    #[tokio::test]
    async fn test_increment_to_i32_max_is_allowed() {
        let pool = setup(&[0]).await;
        let mut conn = pool.acquire().await.unwrap();

        let affected = bulk_update_members(
            &mut conn,
            &auditing(),
            &MemberPredicate::All,
            &MemberMutation::IncrementAge(i32::MAX),
        )
        .await
        .unwrap();
        assert_eq!(affected, 1);

        let age: i32 = sqlx::query_scalar("SELECT age FROM member")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(age, i32::MAX);
    }

    #[tokio::test]
    async fn test_negative_set_age_rejected_before_sql() {
        let pool = setup(&[10]).await;
        let mut conn = pool.acquire().await.unwrap();

        let err = bulk_update_members(
            &mut conn,
            &auditing(),
            &MemberPredicate::All,
            &MemberMutation::SetAge(-1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
