//! Plain data types shared by the services, storage, and reports.
//! No I/O lives here.

pub mod expense;
pub mod member;

pub use expense::{Expense, ExpenseDraft, ExpenseId, DATE_FORMAT, DESCRIPTION_MAX_CHARS};
pub use member::{default_members, Member, MemberId, MEMBER_NAME_MAX_CHARS};

/// Returns at most `max` characters of `value`, respecting char boundaries.
pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
