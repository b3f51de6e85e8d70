// SQL fragments for predicates, mutations and sort orders
//
// Only fixed column names reach the statement text; every value is bound.

use roster_core::domain::{MemberMutation, MemberPredicate, Sort};
use roster_core::error::{AppError, Result};
use sqlx::{QueryBuilder, Sqlite};

/// Append ` WHERE ...` for `predicate` (nothing for `All`).
///
/// `qualifier` prefixes column names, e.g. `"m."` when `member` is aliased.
pub(crate) fn push_predicate(
    qb: &mut QueryBuilder<'_, Sqlite>,
    predicate: &MemberPredicate,
    qualifier: &str,
) {
    match predicate {
        MemberPredicate::All => {}
        MemberPredicate::AgeEquals(age) => {
            qb.push(" WHERE ").push(qualifier).push("age = ").push_bind(*age);
        }
        MemberPredicate::AgeAtLeast(age) => {
            qb.push(" WHERE ").push(qualifier).push("age >= ").push_bind(*age);
        }
        MemberPredicate::AgeGreaterThan(age) => {
            qb.push(" WHERE ").push(qualifier).push("age > ").push_bind(*age);
        }
        MemberPredicate::UsernameEquals(username) => {
            qb.push(" WHERE ")
                .push(qualifier)
                .push("username = ")
                .push_bind(username.clone());
        }
        MemberPredicate::TeamEquals(team_id) => {
            qb.push(" WHERE ")
                .push(qualifier)
                .push("team_id = ")
                .push_bind(*team_id);
        }
    }
}

/// Append the SET assignment for `mutation` (no leading keyword)
pub(crate) fn push_mutation(qb: &mut QueryBuilder<'_, Sqlite>, mutation: &MemberMutation) {
    match mutation {
        MemberMutation::IncrementAge(delta) => {
            qb.push("age = age + ").push_bind(*delta);
        }
        MemberMutation::SetAge(age) => {
            qb.push("age = ").push_bind(*age);
        }
        MemberMutation::SetTeam(team_id) => {
            qb.push("team_id = ").push_bind(*team_id);
        }
    }
}

fn member_sort_column(property: &str) -> Result<&'static str> {
    match property {
        "id" => Ok("m.member_id"),
        "username" => Ok("m.username"),
        "age" => Ok("m.age"),
        other => Err(AppError::InvalidArgument(format!(
            "Unknown sort property for member: {}",
            other
        ))),
    }
}

/// ` ORDER BY ...` for a member query aliased `m`.
///
/// `m.member_id ASC` is appended unless the caller already sorts by id, so
/// windows over equal sort keys stay stable between pages.
pub(crate) fn member_order_by(sort: &Sort) -> Result<String> {
    let mut terms = Vec::with_capacity(sort.orders().len() + 1);
    let mut sorted_by_id = false;

    for order in sort.orders() {
        let column = member_sort_column(&order.property)?;
        sorted_by_id |= column == "m.member_id";
        terms.push(format!("{} {}", column, order.direction.as_sql()));
    }

    if !sorted_by_id {
        terms.push("m.member_id ASC".to_string());
    }

    Ok(format!(" ORDER BY {}", terms.join(", ")))
}
