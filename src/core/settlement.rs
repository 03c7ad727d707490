//! Equal-split settlement.
//!
//! Every member owes the same share of the total; whoever paid more than
//! that share is owed the difference and whoever paid less owes it. Amounts
//! are not rounded here.

use std::collections::HashMap;

use crate::domain::{Expense, Member, MemberId};

/// Per-member balance for a set of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSummary {
    pub member_id: MemberId,
    pub name: String,
    pub total_paid: f64,
    pub share: f64,
    pub will_pay: f64,
    pub will_receive: f64,
}

/// Summaries together with the figures they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub total: f64,
    pub share: f64,
    pub summaries: Vec<MemberSummary>,
}

/// Computes one summary per member, in roster order.
///
/// An empty roster yields an empty list rather than dividing by zero.
pub fn compute_summaries<'a>(
    members: &[Member],
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Vec<MemberSummary> {
    settle(members, expenses).summaries
}

pub fn settle<'a>(
    members: &[Member],
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Settlement {
    let mut total = 0.0;
    let mut paid: HashMap<MemberId, f64> = HashMap::with_capacity(members.len());
    for expense in expenses {
        total += expense.amount;
        *paid.entry(expense.paid_by).or_insert(0.0) += expense.amount;
    }

    if members.is_empty() {
        return Settlement {
            total,
            share: 0.0,
            summaries: Vec::new(),
        };
    }

    let share = total / members.len() as f64;
    let summaries = members
        .iter()
        .map(|member| {
            let total_paid = paid.get(&member.id).copied().unwrap_or(0.0);
            let delta = total_paid - share;
            MemberSummary {
                member_id: member.id,
                name: member.name.clone(),
                total_paid,
                share,
                will_pay: if delta < 0.0 { -delta } else { 0.0 },
                will_receive: if delta > 0.0 { delta } else { 0.0 },
            }
        })
        .collect();

    Settlement {
        total,
        share,
        summaries,
    }
}
