//! Validated CRUD over the expense collection.

use chrono::NaiveDate;

use super::{MemberRoster, ServiceResult, ValidationError};
use crate::domain::{
    truncate_chars, Expense, ExpenseDraft, ExpenseId, MemberId, DATE_FORMAT,
    DESCRIPTION_MAX_CHARS,
};
use crate::storage::SplitStore;

/// Owns the in-memory expense list and writes it through on every change.
pub struct ExpenseRepository {
    store: SplitStore,
    expenses: Vec<Expense>,
}

impl ExpenseRepository {
    pub fn new(store: SplitStore, expenses: Vec<Expense>) -> Self {
        Self { store, expenses }
    }

    pub fn all(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// Resolves a unique identifier prefix (as shown in listings).
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Expense> {
        let needle = prefix.trim().to_ascii_lowercase().replace('-', "");
        if needle.is_empty() {
            return None;
        }
        let mut matches = self
            .expenses
            .iter()
            .filter(|expense| expense.id.0.simple().to_string().starts_with(&needle));
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    /// Number of expenses paid by `member`.
    pub fn paid_by_count(&self, member: MemberId) -> usize {
        self.expenses
            .iter()
            .filter(|expense| expense.paid_by == member)
            .count()
    }

    /// Validates `draft`, assigns a fresh identifier, and appends it.
    pub fn add(&mut self, draft: ExpenseDraft, roster: &MemberRoster) -> ServiceResult<Expense> {
        let draft = validate(draft, roster)?;
        let expense = draft.into_expense(ExpenseId::new());
        let previous = self.expenses.clone();
        self.expenses.push(expense.clone());
        self.commit(previous)?;
        tracing::debug!(id = %expense.id, amount = expense.amount, "expense added");
        Ok(expense)
    }

    /// Replaces the expense with the same identifier.
    ///
    /// Returns `Ok(false)` without touching storage when no expense matches.
    pub fn edit(&mut self, updated: Expense, roster: &MemberRoster) -> ServiceResult<bool> {
        let draft = validate(ExpenseDraft::from(&updated), roster)?;
        let previous = self.expenses.clone();
        let Some(existing) = self.expenses.iter_mut().find(|e| e.id == updated.id) else {
            return Ok(false);
        };
        existing.apply(draft);
        self.commit(previous)?;
        tracing::debug!(id = %updated.id, "expense edited");
        Ok(true)
    }

    /// Removes the expense with `id`; `Ok(false)` when it does not exist.
    pub fn delete(&mut self, id: ExpenseId) -> ServiceResult<bool> {
        let Some(position) = self.expenses.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        let previous = self.expenses.clone();
        self.expenses.remove(position);
        self.commit(previous)?;
        tracing::debug!(%id, "expense deleted");
        Ok(true)
    }

    pub(crate) fn replace_all(&mut self, expenses: Vec<Expense>) {
        self.expenses = expenses;
    }

    /// Writes the collection, rolling back to `previous` if the write fails.
    fn commit(&mut self, previous: Vec<Expense>) -> ServiceResult<()> {
        if let Err(err) = self.store.save_expenses(&self.expenses) {
            self.expenses = previous;
            return Err(err.into());
        }
        Ok(())
    }
}

/// Normalizes a draft: trims and truncates the description and checks the
/// date, amount, and payer.
pub fn validate(draft: ExpenseDraft, roster: &MemberRoster) -> Result<ExpenseDraft, ValidationError> {
    let description = draft.description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        return Err(ValidationError::InvalidAmount(draft.amount));
    }
    let date = NaiveDate::parse_from_str(draft.date.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(draft.date.clone()))?;
    if !roster.contains(draft.paid_by) {
        return Err(ValidationError::UnknownPayer(draft.paid_by));
    }
    Ok(ExpenseDraft {
        date: date.format(DATE_FORMAT).to_string(),
        description: truncate_chars(description, DESCRIPTION_MAX_CHARS),
        amount: draft.amount,
        paid_by: draft.paid_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::ServiceError;
    use crate::domain::default_members;
    use crate::storage::{MemoryStore, SplitStore};

    fn fixture() -> (ExpenseRepository, MemberRoster) {
        let store = SplitStore::new(MemoryStore::new());
        let roster = MemberRoster::new(store.clone(), default_members());
        (ExpenseRepository::new(store, Vec::new()), roster)
    }

    fn draft(roster: &MemberRoster, amount: f64) -> ExpenseDraft {
        ExpenseDraft {
            date: "2024-02-14".into(),
            description: "  Dinner  ".into(),
            amount,
            paid_by: roster.members()[0].id,
        }
    }

    #[test]
    fn zero_amount_is_rejected_and_cent_is_accepted() {
        let (mut repo, roster) = fixture();
        let err = repo.add(draft(&roster, 0.0), &roster).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::InvalidAmount(_))));
        assert!(repo.all().is_empty());

        let added = repo.add(draft(&roster, 0.01), &roster).unwrap();
        assert_eq!(added.description, "Dinner");
        assert_eq!(repo.all().len(), 1);
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        let (mut repo, roster) = fixture();
        for amount in [f64::NAN, f64::INFINITY, -3.0] {
            assert!(repo.add(draft(&roster, amount), &roster).is_err());
        }
        assert!(repo.all().is_empty());
    }

    #[test]
    fn blank_description_unknown_payer_and_bad_date_are_rejected() {
        let (mut repo, roster) = fixture();

        let mut blank = draft(&roster, 5.0);
        blank.description = "   ".into();
        assert!(matches!(
            repo.add(blank, &roster),
            Err(ServiceError::Validation(ValidationError::EmptyDescription))
        ));

        let mut stranger = draft(&roster, 5.0);
        stranger.paid_by = MemberId::new();
        assert!(matches!(
            repo.add(stranger, &roster),
            Err(ServiceError::Validation(ValidationError::UnknownPayer(_)))
        ));

        let mut bad_date = draft(&roster, 5.0);
        bad_date.date = "2024-02-30".into();
        assert!(matches!(
            repo.add(bad_date, &roster),
            Err(ServiceError::Validation(ValidationError::InvalidDate(_)))
        ));
        assert!(repo.all().is_empty());
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let (mut repo, roster) = fixture();
        let mut long = draft(&roster, 5.0);
        long.description = "é".repeat(150);
        let added = repo.add(long, &roster).unwrap();
        assert_eq!(added.description.chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn edit_keeps_id_and_missing_id_is_noop() {
        let (mut repo, roster) = fixture();
        let added = repo.add(draft(&roster, 10.0), &roster).unwrap();

        let mut updated = added.clone();
        updated.amount = 12.5;
        updated.paid_by = roster.members()[2].id;
        assert!(repo.edit(updated, &roster).unwrap());
        let stored = repo.get(added.id).unwrap();
        assert_eq!(stored.amount, 12.5);
        assert_eq!(stored.paid_by, roster.members()[2].id);

        let mut ghost = added.clone();
        ghost.id = ExpenseId::new();
        assert!(!repo.edit(ghost, &roster).unwrap());
        assert_eq!(repo.all().len(), 1);
    }

    #[test]
    fn deleting_unknown_id_leaves_collection_unchanged() {
        let (mut repo, roster) = fixture();
        repo.add(draft(&roster, 1.0), &roster).unwrap();
        repo.add(draft(&roster, 2.0), &roster).unwrap();
        let before = repo.all().to_vec();

        assert!(!repo.delete(ExpenseId::new()).unwrap());
        assert_eq!(repo.all(), before.as_slice());
    }

    #[test]
    fn mutations_are_written_through() {
        let store = SplitStore::new(MemoryStore::new());
        let roster = MemberRoster::new(store.clone(), default_members());
        roster.persist().unwrap();
        let mut repo = ExpenseRepository::new(store.clone(), Vec::new());
        let added = repo.add(draft(&roster, 3.0), &roster).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.expenses, vec![added.clone()]);

        repo.delete(added.id).unwrap();
        assert!(store.load().unwrap().expenses.is_empty());
    }

    #[test]
    fn prefix_lookup_requires_a_unique_match() {
        let (mut repo, roster) = fixture();
        let added = repo.add(draft(&roster, 1.0), &roster).unwrap();
        assert_eq!(repo.find_by_prefix(&added.id.short()).map(|e| e.id), Some(added.id));
        assert!(repo.find_by_prefix("").is_none());
        assert!(repo.find_by_prefix("zzzz").is_none());
    }
}
