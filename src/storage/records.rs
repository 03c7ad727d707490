//! Typed expense and member records on top of a [`KeyValueStore`].
//!
//! Both collections are stored whole as JSON arrays under fixed keys and are
//! rewritten in full on every save. Reads never fail on bad data: a record
//! that does not parse is replaced by its default and reported as a warning.

use std::{collections::HashSet, sync::Arc};

use serde::Deserialize;

use super::{KeyValueStore, Result};
use crate::domain::{
    default_members, truncate_chars, Expense, ExpenseId, Member, MemberId, MEMBER_NAME_MAX_CHARS,
};

pub const EXPENSES_KEY: &str = "splitbite_expenses";
pub const MEMBERS_KEY: &str = "splitbite_members";
pub const ADMIN_FLAG_KEY: &str = "adminLoggedIn";

/// Collections read at startup plus everything noteworthy that happened
/// while reading them.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

/// Persistence adapter shared by the expense repository and the roster.
#[derive(Clone)]
pub struct SplitStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SplitStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Reads both collections, repairing and upgrading them where needed.
    ///
    /// A missing or unreadable roster is replaced by the default four members
    /// and written back immediately so their identifiers stay stable.
    pub fn load(&self) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        let (members, members_dirty) = self.load_members(&mut report)?;
        let (expenses, expenses_dirty) = self.load_expenses(&members, &mut report)?;

        if members_dirty {
            self.save_members(&members)?;
        }
        if expenses_dirty {
            self.save_expenses(&expenses)?;
        }

        for warning in &report.warnings {
            tracing::warn!("{warning}");
        }
        for note in &report.migrations {
            tracing::info!("{note}");
        }

        report.members = members;
        report.expenses = expenses;
        Ok(report)
    }

    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        let json = serde_json::to_string(expenses)?;
        self.backend.set(EXPENSES_KEY, &json)?;
        tracing::debug!(count = expenses.len(), "expenses persisted");
        Ok(())
    }

    pub fn save_members(&self, members: &[Member]) -> Result<()> {
        let json = serde_json::to_string(members)?;
        self.backend.set(MEMBERS_KEY, &json)?;
        tracing::debug!(count = members.len(), "members persisted");
        Ok(())
    }

    /// Deletes both collections. The admin flag is left alone.
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(MEMBERS_KEY)?;
        self.backend.remove(EXPENSES_KEY)?;
        tracing::info!("stored expenses and members cleared");
        Ok(())
    }

    pub fn admin_flag(&self) -> Result<bool> {
        Ok(self.backend.get(ADMIN_FLAG_KEY)?.as_deref() == Some("true"))
    }

    pub fn set_admin_flag(&self, logged_in: bool) -> Result<()> {
        if logged_in {
            self.backend.set(ADMIN_FLAG_KEY, "true")
        } else {
            self.backend.remove(ADMIN_FLAG_KEY)
        }
    }

    fn load_members(&self, report: &mut LoadReport) -> Result<(Vec<Member>, bool)> {
        let Some(raw) = self.backend.get(MEMBERS_KEY)? else {
            report
                .migrations
                .push("no stored members; seeded the default roster".into());
            return Ok((default_members(), true));
        };

        let stored: Vec<StoredMember> = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                report.warnings.push(format!(
                    "stored members are unreadable ({err}); using the default roster"
                ));
                return Ok((default_members(), true));
            }
        };

        let mut assigned = false;
        let mut repaired = 0usize;
        let members = stored
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let id = entry.id.unwrap_or_else(|| {
                    assigned = true;
                    MemberId::new()
                });
                let name = stored_name(&entry.name, index + 1);
                if name != entry.name {
                    repaired += 1;
                }
                Member { id, name }
            })
            .collect();
        if assigned {
            report
                .migrations
                .push("assigned stable identifiers to members".into());
        }
        if repaired > 0 {
            report.warnings.push(format!(
                "repaired {repaired} member name(s) that were blank or too long"
            ));
        }
        Ok((members, assigned || repaired > 0))
    }

    fn load_expenses(
        &self,
        members: &[Member],
        report: &mut LoadReport,
    ) -> Result<(Vec<Expense>, bool)> {
        let Some(raw) = self.backend.get(EXPENSES_KEY)? else {
            return Ok((Vec::new(), false));
        };

        let stored: Vec<StoredExpense> = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                report.warnings.push(format!(
                    "stored expenses are unreadable ({err}); starting with no expenses"
                ));
                return Ok((Vec::new(), false));
            }
        };

        let known: HashSet<MemberId> = members.iter().map(|member| member.id).collect();
        let mut expenses = Vec::with_capacity(stored.len());
        let mut converted = 0usize;
        let mut dropped = false;

        for entry in stored {
            let paid_by = match entry.paid_by {
                StoredPayer::Member(id) => {
                    if !known.contains(&id) {
                        report.warnings.push(format!(
                            "expense {} references unknown member {}",
                            entry.id, id
                        ));
                    }
                    id
                }
                StoredPayer::Index(index) => match members.get(index) {
                    Some(member) => {
                        converted += 1;
                        member.id
                    }
                    None => {
                        report.warnings.push(format!(
                            "expense {} points at member #{} which does not exist; dropped",
                            entry.id,
                            index + 1
                        ));
                        dropped = true;
                        continue;
                    }
                },
            };
            expenses.push(Expense {
                id: entry.id,
                date: entry.date,
                description: entry.description,
                amount: entry.amount,
                paid_by,
            });
        }

        if converted > 0 {
            report.migrations.push(format!(
                "re-pointed {converted} expense(s) from member positions to member identifiers"
            ));
        }
        Ok((expenses, converted > 0 || dropped))
    }
}

/// Trimmed and capped like a rename; blank names fall back to the placeholder.
fn stored_name(raw: &str, position: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Member::placeholder_name(position)
    } else {
        truncate_chars(trimmed, MEMBER_NAME_MAX_CHARS)
    }
}

#[derive(Deserialize)]
struct StoredMember {
    #[serde(default)]
    id: Option<MemberId>,
    name: String,
}

/// Expense as found in storage; older records carry the payer's position.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredExpense {
    id: ExpenseId,
    #[serde(default)]
    date: String,
    description: String,
    amount: f64,
    paid_by: StoredPayer,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPayer {
    Member(MemberId),
    Index(usize),
}
