use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::member::MemberId;

/// Longest description stored for an expense.
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// Storage format for expense dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub Uuid);

impl ExpenseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, used as a handle in listings.
    pub fn short(&self) -> String {
        let mut short = self.0.simple().to_string();
        short.truncate(8);
        short
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single shared purchase paid by one member.
///
/// `date` stays textual (`YYYY-MM-DD`) so that records with a damaged date
/// still load; they simply never match a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: MemberId,
}

impl Expense {
    /// Parses the stored date, returning `None` for malformed values.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Replaces every field except the identifier.
    pub(crate) fn apply(&mut self, draft: ExpenseDraft) {
        self.date = draft.date;
        self.description = draft.description;
        self.amount = draft.amount;
        self.paid_by = draft.paid_by;
    }
}

/// Expense fields as entered, before an identifier is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: MemberId,
}

impl ExpenseDraft {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        paid_by: MemberId,
    ) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            description: description.into(),
            amount,
            paid_by,
        }
    }

    pub(crate) fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            paid_by: self.paid_by,
        }
    }
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            date: expense.date.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            paid_by: expense.paid_by,
        }
    }
}
