use super::{ServiceError, ServiceResult, ValidationError};
use crate::domain::{truncate_chars, Member, MemberId, MEMBER_NAME_MAX_CHARS};
use crate::storage::SplitStore;

/// Name shown for a payer that is no longer on the roster.
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// The ordered member list. Order is the display order everywhere.
pub struct MemberRoster {
    store: SplitStore,
    members: Vec<Member>,
}

impl MemberRoster {
    pub fn new(store: SplitStore, members: Vec<Member>) -> Self {
        Self { store, members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Member at a 1-based display position.
    pub fn at(&self, position: usize) -> Option<&Member> {
        position.checked_sub(1).and_then(|index| self.members.get(index))
    }

    pub fn name_of(&self, id: MemberId) -> &str {
        self.get(id)
            .map(|member| member.name.as_str())
            .unwrap_or(UNKNOWN_MEMBER)
    }

    /// Appends a placeholder member named after its position.
    pub fn add(&mut self) -> ServiceResult<Member> {
        let member = Member::new(Member::placeholder_name(self.members.len() + 1));
        let previous = self.members.clone();
        self.members.push(member.clone());
        self.commit(previous)?;
        tracing::debug!(id = %member.id, name = %member.name, "member added");
        Ok(member)
    }

    /// Renames a member. The name is trimmed and capped at 30 characters.
    pub fn rename(&mut self, id: MemberId, name: &str) -> ServiceResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let previous = self.members.clone();
        let Some(member) = self.members.iter_mut().find(|member| member.id == id) else {
            return Ok(false);
        };
        member.name = truncate_chars(name, MEMBER_NAME_MAX_CHARS);
        self.commit(previous)?;
        Ok(true)
    }

    /// Removes a member; the last remaining member cannot be removed.
    pub fn remove(&mut self, id: MemberId) -> ServiceResult<bool> {
        let Some(position) = self.members.iter().position(|member| member.id == id) else {
            return Ok(false);
        };
        if self.members.len() == 1 {
            return Err(ServiceError::Invalid(
                "the roster needs at least one member".into(),
            ));
        }
        let previous = self.members.clone();
        let removed = self.members.remove(position);
        self.commit(previous)?;
        tracing::debug!(id = %removed.id, "member removed");
        Ok(true)
    }

    pub fn persist(&self) -> ServiceResult<()> {
        self.store.save_members(&self.members)?;
        Ok(())
    }

    /// Writes the roster, rolling back to `previous` if the write fails.
    fn commit(&mut self, previous: Vec<Member>) -> ServiceResult<()> {
        if let Err(err) = self.store.save_members(&self.members) {
            self.members = previous;
            return Err(err.into());
        }
        Ok(())
    }

    pub(crate) fn replace_all(&mut self, members: Vec<Member>) {
        self.members = members;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_members;
    use crate::storage::MemoryStore;

    fn roster() -> MemberRoster {
        MemberRoster::new(SplitStore::new(MemoryStore::new()), default_members())
    }

    #[test]
    fn added_member_is_named_after_its_position() {
        let mut roster = roster();
        let added = roster.add().unwrap();
        assert_eq!(added.name, "Member 5");
        assert_eq!(roster.at(5).map(|m| m.id), Some(added.id));
        assert!(roster.at(0).is_none());
    }

    #[test]
    fn rename_trims_and_truncates() {
        let mut roster = roster();
        let id = roster.members()[0].id;
        assert!(roster.rename(id, "  Asha  ").unwrap());
        assert_eq!(roster.name_of(id), "Asha");

        assert!(roster.rename(id, &"x".repeat(45)).unwrap());
        assert_eq!(roster.name_of(id).chars().count(), MEMBER_NAME_MAX_CHARS);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut roster = roster();
        let id = roster.members()[1].id;
        let err = roster.rename(id, "   ").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::EmptyName)));
        assert_eq!(roster.name_of(id), "Member 2");
    }

    #[test]
    fn unknown_member_is_reported_by_name() {
        let roster = roster();
        assert_eq!(roster.name_of(MemberId::new()), UNKNOWN_MEMBER);
    }

    #[test]
    fn last_member_cannot_be_removed() {
        let store = SplitStore::new(MemoryStore::new());
        let only = Member::new("Solo");
        let mut roster = MemberRoster::new(store, vec![only.clone()]);
        assert!(roster.remove(only.id).is_err());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn removing_missing_member_is_a_noop() {
        let mut roster = roster();
        assert!(!roster.remove(MemberId::new()).unwrap());
        assert_eq!(roster.len(), 4);
    }
}
