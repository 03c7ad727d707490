pub mod expense_service;
pub mod roster_service;

pub use expense_service::ExpenseRepository;
pub use roster_service::{MemberRoster, UNKNOWN_MEMBER};

use crate::domain::MemberId;
use crate::errors::SplitError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] SplitError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Invalid(String),
}

/// Input that was refused before anything changed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("amount must be a number greater than zero (got {0})")]
    InvalidAmount(f64),
    #[error("invalid date `{0}` (use YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("payer {0} is not a member")]
    UnknownPayer(MemberId),
    #[error("member name must not be empty")]
    EmptyName,
}
