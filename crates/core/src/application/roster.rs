// Roster Service - multi-statement use cases run in one transaction

use crate::domain::{Member, NewMember, NewTeam, Team};
use crate::error::Result;
use crate::port::{RosterTransaction, TransactionalRepository};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A team and the members created with it
#[derive(Debug, Clone)]
pub struct TeamEnrollment {
    pub team: Team,
    pub members: Vec<Member>,
}

pub struct RosterService {
    tx_repo: Arc<dyn TransactionalRepository>,
    deadline: Option<Duration>,
}

impl RosterService {
    pub fn new(tx_repo: Arc<dyn TransactionalRepository>) -> Self {
        Self {
            tx_repo,
            deadline: None,
        }
    }

    /// Every transaction opened by this service must finish within `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Insert `count` members named `user{i}` aged `10 + i`, all or nothing
    pub async fn seed_members(&self, count: u32) -> Result<Vec<Member>> {
        let mut tx = self.begin().await?;
        let mut members = Vec::with_capacity(count as usize);

        // Early return drops the transaction, which rolls it back
        for i in 0..count {
            let age = i32::try_from(i)
                .map(|i| i.saturating_add(10))
                .unwrap_or(i32::MAX);
            let member = tx
                .save_member(&NewMember::new(format!("user{}", i), age))
                .await?;
            members.push(member);
        }

        tx.commit().await?;
        info!(count = members.len(), "Seeded members");
        Ok(members)
    }

    /// Create a team and its members atomically.
    ///
    /// The team row is written first so the members' foreign keys resolve.
    pub async fn enroll_team(
        &self,
        team_name: &str,
        members: &[(String, i32)],
    ) -> Result<TeamEnrollment> {
        let mut tx = self.begin().await?;

        let team = tx.save_team(&NewTeam::new(team_name)).await?;

        let mut saved = Vec::with_capacity(members.len());
        for (username, age) in members {
            let member = tx
                .save_member(&NewMember::with_team(username.clone(), *age, team.id))
                .await?;
            saved.push(member);
        }

        tx.commit().await?;
        info!(team_id = team.id, members = saved.len(), "Enrolled team");

        Ok(TeamEnrollment {
            team,
            members: saved,
        })
    }

    async fn begin(&self) -> Result<Box<dyn RosterTransaction>> {
        match self.deadline {
            Some(deadline) => self.tx_repo.begin_transaction_with_deadline(deadline).await,
            None => self.tx_repo.begin_transaction().await,
        }
    }
}
