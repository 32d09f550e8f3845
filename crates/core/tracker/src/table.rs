use std::collections::HashMap;

use invitebot_config::InviteRole;

/// Invite codes we track, and the role each of them grants
///
/// A code configured with an empty role is tracked but grants nothing.
#[derive(Debug, Clone, Default)]
pub struct InviteTable {
    roles: HashMap<String, String>,
    labels: HashMap<String, String>,
}

impl InviteTable {
    /// Build a table from (code, role) pairs
    pub fn new<C: Into<String>, R: Into<String>>(
        entries: impl IntoIterator<Item = (C, R)>,
    ) -> InviteTable {
        let mut roles = HashMap::new();
        for (code, role) in entries {
            let code = code.into();
            let role = role.into();
            if let Some(previous) = roles.insert(code.clone(), role) {
                warn!("Invite {code} is configured more than once, ignoring role {previous}.");
            }
        }

        InviteTable {
            roles,
            labels: HashMap::new(),
        }
    }

    /// Build a table from the configured invite list
    pub fn from_settings(invites: &[InviteRole]) -> InviteTable {
        let mut table = InviteTable::new(
            invites
                .iter()
                .map(|invite| (invite.code.clone(), invite.role.clone())),
        );

        table.labels = invites
            .iter()
            .filter_map(|invite| Some((invite.code.clone(), invite.label.clone()?)))
            .collect();

        table
    }

    /// Whether the invite code takes part in role resolution
    pub fn is_configured(&self, code: &str) -> bool {
        self.roles.contains_key(code)
    }

    /// Role granted for joining through the invite
    pub fn role_for(&self, code: &str) -> Option<&str> {
        self.roles
            .get(code)
            .map(String::as_str)
            .filter(|role| !role.is_empty())
    }

    /// Human readable name of the invite, falling back to its code
    pub fn label_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.labels.get(code).map(String::as_str).unwrap_or(code)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
