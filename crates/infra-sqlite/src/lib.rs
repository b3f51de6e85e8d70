// Roster Infrastructure - SQLite Adapter
// Implements: MemberRepository, TeamRepository, ItemRepository, TransactionalRepository

mod bulk;
mod config;
mod connection;
mod error;
mod item_repository;
mod member_repository;
mod migration;
mod pager;
mod query;
mod rows;
mod team_repository;
mod transaction;

pub use config::StoreConfig;
pub use connection::{create_pool, create_pool_with};
pub use item_repository::SqliteItemRepository;
pub use member_repository::SqliteMemberRepository;
pub use migration::{current_version, run_migrations};
pub use team_repository::SqliteTeamRepository;
pub use transaction::SqliteRosterTransaction;

// Note: sqlx::Error conversion is handled by `error::map_sqlx_error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
