use std::collections::HashMap;
use std::sync::Arc;

use futures_locks::RwLock;
use invitebot_platform::Invite;

/// Use counts of every invite of a server at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteSnapshot(HashMap<String, u64>);

impl InviteSnapshot {
    /// Build a snapshot from a freshly fetched invite list
    pub fn from_invites(invites: &[Invite]) -> InviteSnapshot {
        InviteSnapshot(
            invites
                .iter()
                .map(|invite| (invite.code.clone(), invite.uses))
                .collect(),
        )
    }

    /// Last observed use count of an invite, zero if it was never seen
    pub fn uses(&self, code: &str) -> u64 {
        self.0.get(code).copied().unwrap_or_default()
    }

    /// Whether the invite was part of this snapshot
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for InviteSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        InviteSnapshot(
            iter.into_iter()
                .map(|(code, uses)| (code.into(), uses))
                .collect(),
        )
    }
}

/// In-memory store of the latest invite snapshot per server
///
/// Snapshots are only ever replaced as a whole, readers get a shared
/// immutable copy of whatever was stored last.
#[derive(Clone)]
pub struct InviteUsageCache {
    servers: RwLock<HashMap<String, Arc<InviteSnapshot>>>,
}

impl Default for InviteUsageCache {
    fn default() -> Self {
        InviteUsageCache {
            servers: RwLock::new(HashMap::new()),
        }
    }
}

impl InviteUsageCache {
    /// Fetch the last stored snapshot of a server, empty if there is none
    pub async fn get(&self, server_id: &str) -> Arc<InviteSnapshot> {
        self.servers
            .read()
            .await
            .get(server_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the stored snapshot of a server
    pub async fn set(&self, server_id: &str, snapshot: InviteSnapshot) {
        self.servers
            .write()
            .await
            .insert(server_id.to_string(), Arc::new(snapshot));
    }
}
