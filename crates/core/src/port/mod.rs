// Port Layer - Interfaces for external dependencies

pub mod auditor_provider;
pub mod item_repository;
pub mod member_repository;
pub mod team_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use auditor_provider::{AuditorProvider, FixedAuditor, NoAuditor};
pub use item_repository::ItemRepository;
pub use member_repository::MemberRepository;
pub use team_repository::TeamRepository;
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
pub use transaction::{RosterTransaction, Transaction, TransactionalRepository};
