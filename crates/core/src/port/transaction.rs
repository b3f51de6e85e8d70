// Transaction port for caller-demarcated units of work

use crate::domain::{
    Member, MemberId, MemberMutation, MemberPredicate, NewMember, NewTeam, Team,
};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction. Fails if an earlier statement hit the deadline.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Opens transactions against the store
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn RosterTransaction>>;

    /// Begin a transaction whose statements must all finish within `deadline`.
    ///
    /// Once the deadline passes the running statement is abandoned, the
    /// transaction rolls back and every later call fails with `DeadlineExceeded`.
    async fn begin_transaction_with_deadline(
        &self,
        deadline: Duration,
    ) -> Result<Box<dyn RosterTransaction>>;
}

/// Repository operations within a transaction
#[async_trait]
pub trait RosterTransaction: Transaction {
    async fn save_team(&mut self, team: &NewTeam) -> Result<Team>;

    async fn save_member(&mut self, member: &NewMember) -> Result<Member>;

    async fn update_member(&mut self, member: &Member) -> Result<Member>;

    async fn delete_member(&mut self, member: &Member) -> Result<()>;

    async fn find_member_by_id(&mut self, id: MemberId) -> Result<Option<Member>>;

    async fn count_members(&mut self) -> Result<u64>;

    /// Read members after taking the store's write lock (read-then-write safety)
    async fn find_lock_by_username(&mut self, username: &str) -> Result<Vec<Member>>;

    async fn bulk_update(
        &mut self,
        predicate: &MemberPredicate,
        mutation: &MemberMutation,
    ) -> Result<u64>;
}
