// Row structs decoded by sqlx and converted into domain types

use roster_core::domain::{Audit, Item, Member, MemberDto, MemberWithTeam, Team};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(crate) struct MemberRow {
    member_id: i64,
    username: String,
    age: i32,
    team_id: Option<i64>,
    version: i64,
    created_at: i64,
    updated_at: i64,
    created_by: Option<String>,
    updated_by: Option<String>,
}

impl MemberRow {
    pub(crate) fn into_member(self) -> Member {
        Member {
            id: self.member_id,
            username: self.username,
            age: self.age,
            team_id: self.team_id,
            version: self.version,
            audit: Audit {
                created_at: self.created_at,
                updated_at: self.updated_at,
                created_by: self.created_by,
                updated_by: self.updated_by,
            },
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TeamRow {
    team_id: i64,
    name: String,
    created_at: i64,
    updated_at: i64,
    created_by: Option<String>,
    updated_by: Option<String>,
}

impl TeamRow {
    pub(crate) fn into_team(self) -> Team {
        Team {
            id: self.team_id,
            name: self.name,
            audit: Audit {
                created_at: self.created_at,
                updated_at: self.updated_at,
                created_by: self.created_by,
                updated_by: self.updated_by,
            },
        }
    }
}

/// Member LEFT JOIN team; every `t_` column is NULL when the member has no team
#[derive(Debug, FromRow)]
pub(crate) struct MemberWithTeamRow {
    #[sqlx(flatten)]
    member: MemberRow,
    t_team_id: Option<i64>,
    t_name: Option<String>,
    t_created_at: Option<i64>,
    t_updated_at: Option<i64>,
    t_created_by: Option<String>,
    t_updated_by: Option<String>,
}

impl MemberWithTeamRow {
    pub(crate) fn into_member_with_team(self) -> MemberWithTeam {
        let team = match (self.t_team_id, self.t_name, self.t_created_at, self.t_updated_at) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Team {
                id,
                name,
                audit: Audit {
                    created_at,
                    updated_at,
                    created_by: self.t_created_by,
                    updated_by: self.t_updated_by,
                },
            }),
            _ => None,
        };

        MemberWithTeam {
            member: self.member.into_member(),
            team,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct MemberDtoRow {
    member_id: i64,
    username: String,
    team_name: String,
}

impl MemberDtoRow {
    pub(crate) fn into_dto(self) -> MemberDto {
        MemberDto {
            id: self.member_id,
            username: self.username,
            team_name: self.team_name,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ItemRow {
    item_id: String,
    created_at: i64,
}

impl ItemRow {
    pub(crate) fn into_item(self) -> Item {
        Item {
            id: self.item_id,
            created_at: Some(self.created_at),
        }
    }
}
