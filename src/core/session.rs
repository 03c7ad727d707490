//! The loaded state of one SplitBite data store.

use super::month::{filter_by_month, months_present, sort_for_listing, MonthKey};
use super::services::{ExpenseRepository, MemberRoster, ServiceError, ServiceResult};
use super::settlement::{settle, Settlement};
use crate::domain::{Expense, ExpenseDraft, ExpenseId, Member, MemberId};
use crate::errors::SplitError;
use crate::storage::SplitStore;

/// Expenses of one month in listing order, with their settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub month: MonthKey,
    pub expenses: Vec<Expense>,
    pub settlement: Settlement,
}

/// Owns the roster and the expense list after they were read from storage.
///
/// The only constructor is [`Session::open`], so nothing can be written
/// before the stored collections have been loaded (and migrated).
pub struct Session {
    store: SplitStore,
    roster: MemberRoster,
    expenses: ExpenseRepository,
    warnings: Vec<String>,
    migrations: Vec<String>,
    admin: bool,
}

impl Session {
    pub fn open(store: SplitStore) -> Result<Self, SplitError> {
        let report = store.load()?;
        let admin = store.admin_flag()?;
        tracing::info!(
            members = report.members.len(),
            expenses = report.expenses.len(),
            "session opened"
        );
        Ok(Self {
            roster: MemberRoster::new(store.clone(), report.members),
            expenses: ExpenseRepository::new(store.clone(), report.expenses),
            store,
            warnings: report.warnings,
            migrations: report.migrations,
            admin,
        })
    }

    /// Problems recovered from while loading.
    pub fn load_warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Upgrades applied to stored records while loading.
    pub fn migrations(&self) -> &[String] {
        &self.migrations
    }

    pub fn roster(&self) -> &MemberRoster {
        &self.roster
    }

    pub fn members(&self) -> &[Member] {
        self.roster.members()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.expenses.all()
    }

    pub fn add_member(&mut self) -> ServiceResult<Member> {
        self.roster.add()
    }

    pub fn rename_member(&mut self, id: MemberId, name: &str) -> ServiceResult<bool> {
        self.roster.rename(id, name)
    }

    /// Removes a member who has not paid for anything.
    pub fn remove_member(&mut self, id: MemberId) -> ServiceResult<bool> {
        let paid = self.expenses.paid_by_count(id);
        if paid > 0 {
            return Err(ServiceError::Invalid(format!(
                "{} paid for {paid} expense(s); delete or reassign them first",
                self.roster.name_of(id)
            )));
        }
        self.roster.remove(id)
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> ServiceResult<Expense> {
        self.expenses.add(draft, &self.roster)
    }

    pub fn edit_expense(&mut self, updated: Expense) -> ServiceResult<bool> {
        self.expenses.edit(updated, &self.roster)
    }

    pub fn delete_expense(&mut self, id: ExpenseId) -> ServiceResult<bool> {
        self.expenses.delete(id)
    }

    pub fn find_expense(&self, prefix: &str) -> Option<&Expense> {
        self.expenses.find_by_prefix(prefix)
    }

    pub fn months_present(&self) -> Vec<MonthKey> {
        months_present(self.expenses.all())
    }

    pub fn month_view(&self, month: MonthKey) -> MonthView {
        let mut selected = filter_by_month(self.expenses.all(), &month);
        let settlement = settle(self.roster.members(), selected.iter().copied());
        sort_for_listing(&mut selected);
        MonthView {
            month,
            expenses: selected.into_iter().cloned().collect(),
            settlement,
        }
    }

    /// Wipes both collections and reloads, which reseeds the default roster.
    pub fn reset(&mut self) -> Result<(), SplitError> {
        self.store.clear()?;
        let report = self.store.load()?;
        self.roster.replace_all(report.members);
        self.expenses.replace_all(report.expenses);
        self.warnings = report.warnings;
        self.migrations = report.migrations;
        tracing::info!("all data reset");
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Opens the admin gate when `password` matches `expected`.
    pub fn login(&mut self, password: &str, expected: &str) -> Result<bool, SplitError> {
        if password != expected {
            tracing::info!("admin login refused");
            return Ok(false);
        }
        self.store.set_admin_flag(true)?;
        self.admin = true;
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<(), SplitError> {
        self.store.set_admin_flag(false)?;
        self.admin = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn session() -> Session {
        Session::open(SplitStore::new(MemoryStore::new())).unwrap()
    }

    fn draft(session: &Session, date: &str, amount: f64, payer: usize) -> ExpenseDraft {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        ExpenseDraft::new(date, "Lunch", amount, session.members()[payer].id)
    }

    #[test]
    fn month_view_filters_sorts_and_settles() {
        let mut session = session();
        session.add_expense(draft(&session, "2024-03-02", 40.0, 0)).unwrap();
        session.add_expense(draft(&session, "2024-03-20", 20.0, 1)).unwrap();
        session.add_expense(draft(&session, "2024-04-01", 99.0, 1)).unwrap();

        let view = session.month_view(MonthKey::new(2024, 2).unwrap());
        let dates: Vec<&str> = view.expenses.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2024-03-20", "2024-03-02"]);
        assert_eq!(view.settlement.total, 60.0);
        assert_eq!(view.settlement.share, 15.0);
        assert_eq!(view.settlement.summaries[0].will_receive, 25.0);
        assert_eq!(view.settlement.summaries[2].will_pay, 15.0);
    }

    #[test]
    fn payer_cannot_be_removed() {
        let mut session = session();
        session.add_expense(draft(&session, "2024-03-02", 40.0, 0)).unwrap();
        let payer = session.members()[0].id;
        assert!(matches!(
            session.remove_member(payer),
            Err(ServiceError::Invalid(_))
        ));
        let idle = session.members()[3].id;
        assert!(session.remove_member(idle).unwrap());
        assert_eq!(session.members().len(), 3);
    }

    #[test]
    fn reset_reseeds_defaults() {
        let mut session = session();
        let id = session.members()[0].id;
        session.rename_member(id, "Asha").unwrap();
        session.add_expense(draft(&session, "2024-03-02", 40.0, 0)).unwrap();

        session.reset().unwrap();
        assert!(session.expenses().is_empty());
        assert_eq!(session.members()[0].name, "Member 1");
        assert_ne!(session.members()[0].id, id);
    }

    #[test]
    fn login_requires_matching_password_and_persists() {
        let store = SplitStore::new(MemoryStore::new());
        let mut session = Session::open(store.clone()).unwrap();
        assert!(!session.login("wrong", "Khana").unwrap());
        assert!(!session.is_admin());
        assert!(session.login("Khana", "Khana").unwrap());

        let reopened = Session::open(store.clone()).unwrap();
        assert!(reopened.is_admin());

        session.logout().unwrap();
        assert!(!Session::open(store).unwrap().is_admin());
    }
}
