// Member predicates and bulk mutations
//
// Every variant maps to a fixed SQL fragment in the adapter; values are always
// bound, never spliced into the statement text.

use super::error::{DomainError, Result};
use super::member::Member;
use super::team::TeamId;
use serde::{Deserialize, Serialize};

/// Filter applied to paged reads and bulk updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MemberPredicate {
    All,
    AgeEquals(i32),
    AgeAtLeast(i32),
    AgeGreaterThan(i32),
    UsernameEquals(String),
    TeamEquals(TeamId),
}

impl MemberPredicate {
    /// In-memory evaluation, used by the session cache
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            MemberPredicate::All => true,
            MemberPredicate::AgeEquals(age) => member.age == *age,
            MemberPredicate::AgeAtLeast(age) => member.age >= *age,
            MemberPredicate::AgeGreaterThan(age) => member.age > *age,
            MemberPredicate::UsernameEquals(name) => member.username == *name,
            MemberPredicate::TeamEquals(team_id) => member.team_id == Some(*team_id),
        }
    }
}

/// Set-based change applied by a bulk update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MemberMutation {
    IncrementAge(i32),
    SetAge(i32),
    SetTeam(Option<TeamId>),
}

impl MemberMutation {
    pub fn validate(&self) -> Result<()> {
        if let MemberMutation::SetAge(age) = self {
            if *age < 0 {
                return Err(DomainError::NegativeAge(*age));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Audit, AuditStamp};

    fn member(age: i32, team_id: Option<TeamId>) -> Member {
        Member {
            id: 1,
            username: "member1".to_string(),
            age,
            team_id,
            version: 0,
            audit: Audit::created(&AuditStamp::new(0, None)),
        }
    }

    #[test]
    fn test_predicate_matches() {
        let m = member(20, Some(3));
        assert!(MemberPredicate::All.matches(&m));
        assert!(MemberPredicate::AgeAtLeast(20).matches(&m));
        assert!(!MemberPredicate::AgeGreaterThan(20).matches(&m));
        assert!(MemberPredicate::AgeEquals(20).matches(&m));
        assert!(MemberPredicate::UsernameEquals("member1".into()).matches(&m));
        assert!(MemberPredicate::TeamEquals(3).matches(&m));
        assert!(!MemberPredicate::TeamEquals(4).matches(&member(20, None)));
    }

    #[test]
    fn test_mutation_validation() {
        assert!(MemberMutation::SetAge(0).validate().is_ok());
        assert_eq!(
            MemberMutation::SetAge(-5).validate(),
            Err(DomainError::NegativeAge(-5))
        );
        assert!(MemberMutation::IncrementAge(1).validate().is_ok());
    }

    #[test]
    fn test_predicate_wire_format() {
        let json = serde_json::to_value(MemberPredicate::AgeAtLeast(20)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "age_at_least", "value": 20}));

        let parsed: MemberMutation =
            serde_json::from_str(r#"{"kind": "set_team", "value": null}"#).unwrap();
        assert_eq!(parsed, MemberMutation::SetTeam(None));
    }
}
