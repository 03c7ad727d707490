//! Month partitioning and navigation.

use std::{cmp::Reverse, collections::BTreeSet, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

use super::clock::Clock;
use crate::domain::Expense;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month with a zero-based month index (`0` = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month0: u32,
}

impl MonthKey {
    /// Returns `None` when `month0` is outside `0..=11`.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(Self { year, month0 })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn current(clock: &dyn Clock) -> Self {
        Self::from_date(clock.today())
    }

    /// Parses a `YYYY-MM` key.
    pub fn parse(input: &str) -> Option<Self> {
        let (year, month) = input.trim().split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        Self::new(year, month.checked_sub(1)?)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// `YYYY-MM`, the prefix matched against expense dates.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month0 + 1)
    }

    /// Human label such as `March 2024`.
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month0 as usize], self.year)
    }

    pub fn next(&self) -> Self {
        if self.month0 == 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        }
    }

    /// True when `date` is `YYYY-MM-…` for this month.
    pub fn contains(&self, date: &str) -> bool {
        date.strip_prefix(self.key().as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid month `{s}` (use YYYY-MM)"))
    }
}

/// Expenses dated within `month`, in their stored order.
///
/// Dates that are empty or do not start with `YYYY-MM-` never match.
pub fn filter_by_month<'a>(expenses: &'a [Expense], month: &MonthKey) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|expense| month.contains(&expense.date))
        .collect()
}

/// Distinct months that at least one well-formed expense date falls in, ascending.
pub fn months_present(expenses: &[Expense]) -> Vec<MonthKey> {
    expenses
        .iter()
        .filter_map(|expense| {
            let month = MonthKey::parse(expense.date.get(..7)?)?;
            month.contains(&expense.date).then_some(month)
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Newest first; ties broken by identifier, also descending.
pub fn sort_for_listing(expenses: &mut [&Expense]) {
    expenses.sort_by_key(|expense| Reverse((expense.date.clone(), expense.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseId, MemberId};

    fn expense(date: &str) -> Expense {
        Expense {
            id: ExpenseId::new(),
            date: date.into(),
            description: "x".into(),
            amount: 1.0,
            paid_by: MemberId::new(),
        }
    }

    #[test]
    fn december_rolls_into_next_year() {
        let dec = MonthKey::new(2024, 11).unwrap();
        assert_eq!(dec.next(), MonthKey::new(2025, 0).unwrap());
        assert_eq!(MonthKey::new(2025, 0).unwrap().prev(), dec);
    }

    #[test]
    fn label_and_key() {
        let month = MonthKey::new(2024, 2).unwrap();
        assert_eq!(month.label(), "March 2024");
        assert_eq!(month.key(), "2024-03");
        assert_eq!(MonthKey::parse("2024-03"), Some(month));
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        for bad in ["2024-13", "2024-00", "24-03", "2024/03", "2024-3", "", "abcd-ef"] {
            assert!(MonthKey::parse(bad).is_none(), "{bad} should not parse");
        }
    }

    #[test]
    fn filter_excludes_malformed_and_neighbouring_dates() {
        let expenses = vec![
            expense("2024-03-01"),
            expense("2024-03-31"),
            expense("2024-04-01"),
            expense(""),
            expense("2024-031"),
            expense("garbage"),
        ];
        let march = MonthKey::new(2024, 2).unwrap();
        let matched = filter_by_month(&expenses, &march);
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|e| e.date.starts_with("2024-03-")));
    }

    #[test]
    fn months_present_is_sorted_and_distinct() {
        let expenses = vec![
            expense("2024-05-02"),
            expense("2023-12-31"),
            expense("2024-05-20"),
            expense("bad"),
        ];
        let months: Vec<String> = months_present(&expenses).iter().map(MonthKey::key).collect();
        assert_eq!(months, ["2023-12", "2024-05"]);
    }

    #[test]
    fn listing_order_is_newest_first() {
        let expenses = vec![expense("2024-05-02"), expense("2024-05-20"), expense("2024-05-10")];
        let mut refs: Vec<&Expense> = expenses.iter().collect();
        sort_for_listing(&mut refs);
        let dates: Vec<&str> = refs.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2024-05-20", "2024-05-10", "2024-05-02"]);
    }
}
