//! Account model (status author)

use serde::{Deserialize, Serialize};

/// The author of a status, as decoded from the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    /// Network-specific identifier
    pub id: String,
    /// Handle/username (e.g., user or user@mastodon.social)
    pub acct: String,
    /// Bare username without the instance
    #[serde(default)]
    pub username: String,
    /// Display name (for UI)
    #[serde(default)]
    pub display_name: String,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether the account is a bot
    #[serde(default)]
    pub bot: bool,
}

impl Account {
    /// Get the full handle with a leading `@`
    #[must_use]
    pub fn full_handle(&self) -> String {
        if self.acct.is_empty() {
            format!("@{}", self.username)
        } else {
            format!("@{}", self.acct)
        }
    }

    /// The name to show in a status header: display name when set, handle
    /// otherwise
    #[must_use]
    pub fn shown_name(&self) -> &str {
        if self.display_name.is_empty() {
            if self.acct.is_empty() {
                &self.username
            } else {
                &self.acct
            }
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_handle() {
        let account = Account {
            acct: "user@example.social".into(),
            ..Account::default()
        };
        assert_eq!(account.full_handle(), "@user@example.social");

        let local = Account {
            username: "local".into(),
            ..Account::default()
        };
        assert_eq!(local.full_handle(), "@local");
    }

    #[test]
    fn test_shown_name_prefers_display_name() {
        let account = Account {
            acct: "user".into(),
            display_name: "A User".into(),
            ..Account::default()
        };
        assert_eq!(account.shown_name(), "A User");

        let bare = Account {
            acct: "user".into(),
            ..Account::default()
        };
        assert_eq!(bare.shown_name(), "user");
    }
}
