// Domain Layer - Entities, paging math and query definitions

pub mod audit;
pub mod error;
pub mod item;
pub mod member;
pub mod page;
pub mod predicate;
pub mod team;

// Re-exports
pub use audit::{Audit, AuditStamp};
pub use error::DomainError;
pub use item::{Item, ItemId};
pub use member::{Member, MemberDto, MemberId, MemberWithTeam, NewMember};
pub use page::{Direction, Order, Page, PageRequest, Slice, Sort};
pub use predicate::{MemberMutation, MemberPredicate};
pub use team::{NewTeam, Team, TeamId};
