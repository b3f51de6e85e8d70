// Application Layer - Use Cases and Session Services

pub mod auditing;
pub mod roster;
pub mod session;

// Re-exports
pub use auditing::Auditing;
pub use roster::{RosterService, TeamEnrollment};
pub use session::{CacheInvalidation, MemberSession};
