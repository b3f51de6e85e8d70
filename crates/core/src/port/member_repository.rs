// Member Repository Port (Interface)
//
// Every query method is a fixed statement declared by the adapter. Nothing is
// derived from method names at runtime and no identity cache sits in between:
// every call hits the store.

use crate::domain::{
    Member, MemberDto, MemberId, MemberMutation, MemberPredicate, MemberWithTeam, NewMember,
    Page, PageRequest, Slice,
};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Member persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a new member and return it with its assigned id
    async fn save(&self, member: &NewMember) -> Result<Member>;

    /// Write all fields of an existing member (optimistic version check)
    async fn update(&self, member: &Member) -> Result<Member>;

    /// Find member by ID (`None` on miss)
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>>;

    /// All members ordered by id
    async fn find_all(&self) -> Result<Vec<Member>>;

    /// Count all members
    async fn count(&self) -> Result<u64>;

    /// Delete member (no-op if already gone)
    async fn delete(&self, member: &Member) -> Result<()>;

    /// username = ? AND age > ?
    async fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        age: i32,
    ) -> Result<Vec<Member>>;

    /// username = ? AND age = ?
    async fn find_user(&self, username: &str, age: i32) -> Result<Vec<Member>>;

    /// First three members by id
    async fn find_top3(&self) -> Result<Vec<Member>>;

    /// Usernames of all members
    async fn find_username_list(&self) -> Result<Vec<String>>;

    /// Members that belong to a team, projected with the team name
    async fn find_member_dto(&self) -> Result<Vec<MemberDto>>;

    /// username IN (...); empty input yields an empty result
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Member>>;

    /// All members with the given username
    async fn find_list_by_username(&self, username: &str) -> Result<Vec<Member>>;

    /// Single member with the given username.
    ///
    /// Fails with `IncorrectResultSize` if more than one row matches; at most
    /// two rows are read, so `actual` is a lower bound.
    async fn find_optional_by_username(&self, username: &str) -> Result<Option<Member>>;

    /// Members with the given username, read on a connection that refuses writes
    async fn find_read_only_by_username(&self, username: &str) -> Result<Vec<Member>>;

    /// Windowed read with neither a count query nor an over-fetch
    async fn find_list_by_predicate(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Vec<Member>>;

    /// Every member with its team fetched by the same statement
    async fn find_all_with_team(&self) -> Result<Vec<MemberWithTeam>>;

    /// Members with the given username, team fetched by the same statement
    async fn find_with_team_by_username(&self, username: &str) -> Result<Vec<MemberWithTeam>>;

    /// Windowed read plus total count
    async fn find_page(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Page<Member>>;

    /// Windowed read without a count query (`size + 1` over-fetch)
    async fn find_slice(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Slice<Member>>;

    /// Windowed read joining team; the count query does not join
    async fn find_page_with_team(
        &self,
        predicate: &MemberPredicate,
        request: &PageRequest,
    ) -> Result<Page<MemberWithTeam>>;

    /// Single set-based UPDATE; returns affected row count.
    ///
    /// Bypasses every in-memory cache. Callers holding cached members must
    /// invalidate them (see `MemberSession`).
    async fn bulk_update(
        &self,
        predicate: &MemberPredicate,
        mutation: &MemberMutation,
    ) -> Result<u64>;
}
