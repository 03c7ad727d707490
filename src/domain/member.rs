use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest display name a member can carry.
pub const MEMBER_NAME_MAX_CHARS: usize = 30;

const DEFAULT_MEMBER_COUNT: usize = 4;

/// Stable identifier assigned when a member joins the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A participant in the expense split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            name: name.into(),
        }
    }

    /// Placeholder name given to the member at 1-based `position`.
    pub fn placeholder_name(position: usize) -> String {
        format!("Member {position}")
    }
}

/// The roster used when nothing has been stored yet: `Member 1` to `Member 4`.
pub fn default_members() -> Vec<Member> {
    (1..=DEFAULT_MEMBER_COUNT)
        .map(|position| Member::new(Member::placeholder_name(position)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_has_four_distinct_members() {
        let members = default_members();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Member 1", "Member 2", "Member 3", "Member 4"]);
        assert_ne!(members[0].id, members[1].id);
    }

    #[test]
    fn member_id_serializes_as_plain_string() {
        let member = Member::new("Asha");
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["id"], serde_json::Value::String(member.id.to_string()));
        assert_eq!(json["name"], "Asha");
    }
}
