// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Age must be non-negative, got {0}")]
    NegativeAge(i32),

    #[error("Team name must not be empty")]
    EmptyTeamName,

    #[error("Item id must not be empty")]
    EmptyItemId,

    #[error("Version must be non-negative, got {0}")]
    NegativeVersion(i64),
}

pub type Result<T> = std::result::Result<T, DomainError>;
