//! Group metadata attached to a membership notice.

/// Name used when a group's name is unknown or empty.
pub const UNNAMED_GROUP: &str = "Unnamed Group";
/// Category of an ordinary group.
pub const REGULAR_GROUP: &str = "Regular Group";
/// Category of a group the bot is subscribed to.
pub const PREMIUM_GROUP: &str = "Premium Group";

/// Always fully populated; lookups that fail produce [`ThreadSnapshot::fallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSnapshot {
    pub name: String,
    pub member_count: usize,
    pub category: String,
}

impl ThreadSnapshot {
    /// The snapshot used when no source could answer.
    pub fn fallback() -> Self {
        Self {
            name: UNNAMED_GROUP.to_string(),
            member_count: 0,
            category: REGULAR_GROUP.to_string(),
        }
    }

    /// Build a snapshot, substituting [`UNNAMED_GROUP`] for a missing or
    /// blank name.
    pub fn new(name: Option<&str>, member_count: usize, premium: bool) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_GROUP);
        Self {
            name: name.to_string(),
            member_count,
            category: if premium { PREMIUM_GROUP } else { REGULAR_GROUP }.to_string(),
        }
    }
}

impl Default for ThreadSnapshot {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_values() {
        let snap = ThreadSnapshot::fallback();
        assert_eq!(snap.name, "Unnamed Group");
        assert_eq!(snap.member_count, 0);
        assert_eq!(snap.category, "Regular Group");
    }

    #[test]
    fn test_new_blank_name_is_unnamed() {
        assert_eq!(ThreadSnapshot::new(Some("  "), 3, false).name, UNNAMED_GROUP);
        assert_eq!(ThreadSnapshot::new(None, 3, false).name, UNNAMED_GROUP);
    }

    #[test]
    fn test_new_premium_category() {
        let snap = ThreadSnapshot::new(Some("Crabs"), 12, true);
        assert_eq!(snap.name, "Crabs");
        assert_eq!(snap.member_count, 12);
        assert_eq!(snap.category, PREMIUM_GROUP);
    }
}
