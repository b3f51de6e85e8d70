// SQLite Transaction Implementation

use crate::bulk::bulk_update_members;
use crate::error::map_sqlx_error;
use crate::member_repository::{
    count_members, delete_member, find_lock_by_username, find_member_by_id, insert_member,
    update_member,
};
use crate::team_repository::insert_team;
use async_trait::async_trait;
use roster_core::application::Auditing;
use roster_core::domain::{
    Member, MemberId, MemberMutation, MemberPredicate, NewMember, NewTeam, Team,
};
use roster_core::error::{AppError, Result};
use roster_core::port::{RosterTransaction, Transaction};
use sqlx::{Sqlite, SqliteConnection, Transaction as SqlxTransaction};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Transaction over one pooled connection, optionally bounded by a deadline.
///
/// When a statement runs past the deadline it is abandoned and the sqlx
/// transaction is dropped, which rolls it back. The transaction is then
/// poisoned: every later call, `commit` included, fails with
/// `DeadlineExceeded`.
pub struct SqliteRosterTransaction {
    tx: Option<SqlxTransaction<'static, Sqlite>>,
    auditing: Auditing,
    deadline: Option<Instant>,
}

impl SqliteRosterTransaction {
    pub fn new(
        tx: SqlxTransaction<'static, Sqlite>,
        auditing: Auditing,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            tx: Some(tx),
            auditing,
            deadline: deadline.map(|d| Instant::now() + d),
        }
    }

    fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.tx.as_deref_mut().ok_or_else(|| {
            AppError::DeadlineExceeded(
                "Transaction was rolled back after its deadline passed".to_string(),
            )
        })
    }

    /// Drop the sqlx transaction (rollback) if `result` hit the deadline
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(AppError::DeadlineExceeded(reason)) = &result {
            if self.tx.take().is_some() {
                warn!(reason = %reason, "Transaction deadline passed, rolling back");
            }
        }
        result
    }
}

/// Run `fut` unless the deadline has passed or passes while it runs
async fn within<T>(
    deadline: Option<Instant>,
    operation: &'static str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(deadline) = deadline else {
        return fut.await;
    };

    if Instant::now() >= deadline {
        return Err(deadline_exceeded(operation));
    }

    match tokio::time::timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(deadline_exceeded(operation)),
    }
}

fn deadline_exceeded(operation: &str) -> AppError {
    AppError::DeadlineExceeded(format!(
        "{} did not finish before the transaction deadline",
        operation
    ))
}

#[async_trait]
impl Transaction for SqliteRosterTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                let result = Err(deadline_exceeded("commit"));
                return self.settle(result);
            }
        }

        match self.tx.take() {
            Some(tx) => tx.commit().await.map_err(map_sqlx_error),
            None => Err(AppError::DeadlineExceeded(
                "Cannot commit: transaction was rolled back after its deadline passed".to_string(),
            )),
        }
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        match self.tx.take() {
            Some(tx) => tx.rollback().await.map_err(map_sqlx_error),
            // Already rolled back by the deadline
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RosterTransaction for SqliteRosterTransaction {
    async fn save_team(&mut self, team: &NewTeam) -> Result<Team> {
        let (deadline, auditing) = (self.deadline, self.auditing.clone());
        let conn = self.conn()?;
        let result = within(deadline, "save_team", insert_team(conn, &auditing, team)).await;
        self.settle(result)
    }

    async fn save_member(&mut self, member: &NewMember) -> Result<Member> {
        let (deadline, auditing) = (self.deadline, self.auditing.clone());
        let conn = self.conn()?;
        let result = within(
            deadline,
            "save_member",
            insert_member(conn, &auditing, member),
        )
        .await;
        self.settle(result)
    }

    async fn update_member(&mut self, member: &Member) -> Result<Member> {
        let (deadline, auditing) = (self.deadline, self.auditing.clone());
        let conn = self.conn()?;
        let result = within(
            deadline,
            "update_member",
            update_member(conn, &auditing, member),
        )
        .await;
        self.settle(result)
    }

    async fn delete_member(&mut self, member: &Member) -> Result<()> {
        let deadline = self.deadline;
        let conn = self.conn()?;
        let result = within(deadline, "delete_member", delete_member(conn, member.id)).await;
        self.settle(result)
    }

    async fn find_member_by_id(&mut self, id: MemberId) -> Result<Option<Member>> {
        let deadline = self.deadline;
        let conn = self.conn()?;
        let result = within(deadline, "find_member_by_id", find_member_by_id(conn, id)).await;
        self.settle(result)
    }

    async fn count_members(&mut self) -> Result<u64> {
        let deadline = self.deadline;
        let conn = self.conn()?;
        let result = within(deadline, "count_members", count_members(conn)).await;
        self.settle(result)
    }

    async fn find_lock_by_username(&mut self, username: &str) -> Result<Vec<Member>> {
        let deadline = self.deadline;
        let conn = self.conn()?;
        let result = within(
            deadline,
            "find_lock_by_username",
            find_lock_by_username(conn, username),
        )
        .await;
        self.settle(result)
    }

    async fn bulk_update(
        &mut self,
        predicate: &MemberPredicate,
        mutation: &MemberMutation,
    ) -> Result<u64> {
        let (deadline, auditing) = (self.deadline, self.auditing.clone());
        let conn = self.conn()?;
        let result = within(
            deadline,
            "bulk_update",
            bulk_update_members(conn, &auditing, predicate, mutation),
        )
        .await;
        self.settle(result)
    }
}
