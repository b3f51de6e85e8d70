//! Caller-owned member cache.
//!
//! A `MemberSession` remembers members it has loaded or written so repeated
//! point reads skip the store. It is owned by one logical session (`&mut self`)
//! and never shared across callers.
//!
//! Bulk updates run as one set-based statement and never pass through this
//! cache. Whatever it holds for the affected rows is stale afterwards:
//!
//! - [`CacheInvalidation::Manual`] (default): cached entries stay until the
//!   caller calls [`MemberSession::clear`] or [`MemberSession::evict`]. Point
//!   reads in between return the pre-update values.
//! - [`CacheInvalidation::Automatic`]: the session clears itself after every
//!   bulk update it issues.

use crate::domain::{Member, MemberId, MemberMutation, MemberPredicate, NewMember};
use crate::error::Result;
use crate::port::MemberRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a session does with its cache after a bulk update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheInvalidation {
    #[default]
    Manual,
    Automatic,
}

pub struct MemberSession {
    repo: Arc<dyn MemberRepository>,
    cache: HashMap<MemberId, Member>,
    invalidation: CacheInvalidation,
}

impl MemberSession {
    pub fn new(repo: Arc<dyn MemberRepository>, invalidation: CacheInvalidation) -> Self {
        Self {
            repo,
            cache: HashMap::new(),
            invalidation,
        }
    }

    pub fn invalidation(&self) -> CacheInvalidation {
        self.invalidation
    }

    /// Cache-first point read
    pub async fn find(&mut self, id: MemberId) -> Result<Option<Member>> {
        if let Some(member) = self.cache.get(&id) {
            debug!(member_id = id, "Session cache hit");
            return Ok(Some(member.clone()));
        }

        let found = self.repo.find_by_id(id).await?;
        if let Some(member) = &found {
            self.cache.insert(id, member.clone());
        }
        Ok(found)
    }

    pub async fn save(&mut self, member: &NewMember) -> Result<Member> {
        let saved = self.repo.save(member).await?;
        self.cache.insert(saved.id, saved.clone());
        Ok(saved)
    }

    pub async fn update(&mut self, member: &Member) -> Result<Member> {
        let updated = self.repo.update(member).await?;
        self.cache.insert(updated.id, updated.clone());
        Ok(updated)
    }

    pub async fn delete(&mut self, member: &Member) -> Result<()> {
        self.repo.delete(member).await?;
        self.cache.remove(&member.id);
        Ok(())
    }

    /// Set-based update through the repository; see module docs for cache effects
    pub async fn bulk_update(
        &mut self,
        predicate: &MemberPredicate,
        mutation: &MemberMutation,
    ) -> Result<u64> {
        let affected = self.repo.bulk_update(predicate, mutation).await?;

        match self.invalidation {
            CacheInvalidation::Automatic => {
                debug!(
                    affected = affected,
                    cleared = self.cache.len(),
                    "Session cache cleared after bulk update"
                );
                self.clear();
            }
            CacheInvalidation::Manual => {
                let stale = self
                    .cache
                    .values()
                    .filter(|member| predicate.matches(member))
                    .count();
                if stale > 0 {
                    warn!(
                        affected = affected,
                        stale_entries = stale,
                        "Bulk update left cached members stale until cleared"
                    );
                }
            }
        }

        Ok(affected)
    }

    /// Drop every cached member
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Drop one cached member; returns whether it was cached
    pub fn evict(&mut self, id: MemberId) -> bool {
        self.cache.remove(&id).is_some()
    }

    pub fn is_cached(&self, id: MemberId) -> bool {
        self.cache.contains_key(&id)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
