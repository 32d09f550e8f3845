use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::lock::Mutex;
use invitebot_result::{Error, Result};

use crate::{Invite, Member, MemberCompositeKey, Role};

/// Role assignment recorded by the reference platform
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RoleGrant {
    pub server: String,
    pub user: String,
    pub role: String,
    pub reason: String,
}

platform_derived!(
    /// Reference implementation
    ///
    /// Invite lists and member states are queued per key: each fetch consumes
    /// the front entry until only one remains, which is then served forever.
    #[derive(Default)]
    pub struct ReferencePlatform {
        pub invites: Arc<Mutex<HashMap<String, VecDeque<Result<Vec<Invite>>>>>>,
        pub vanity_codes: Arc<Mutex<HashMap<String, String>>>,
        pub members: Arc<Mutex<HashMap<MemberCompositeKey, VecDeque<Member>>>>,
        pub roles: Arc<Mutex<HashMap<String, Vec<Role>>>>,
        pub grants: Arc<Mutex<Vec<RoleGrant>>>,
        pub invite_fetches: Arc<AtomicUsize>,
    }
);

/// Take the next queued state, keeping the last one in place
pub(crate) fn advance<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl ReferencePlatform {
    /// Queue the invite list a server returns on its next fetch
    pub async fn queue_invites(&self, server_id: &str, invites: Vec<Invite>) {
        self.queue_invite_result(server_id, Ok(invites)).await;
    }

    /// Queue a failure for the next invite fetch of a server
    pub async fn queue_invite_error(&self, server_id: &str, error: Error) {
        self.queue_invite_result(server_id, Err(error)).await;
    }

    async fn queue_invite_result(&self, server_id: &str, result: Result<Vec<Invite>>) {
        self.invites
            .lock()
            .await
            .entry(server_id.to_string())
            .or_default()
            .push_back(result);
    }

    /// Set the vanity code of a server
    pub async fn set_vanity_code(&self, server_id: &str, code: &str) {
        self.vanity_codes
            .lock()
            .await
            .insert(server_id.to_string(), code.to_string());
    }

    /// Queue the state a member is returned in on their next fetch
    pub async fn queue_member(&self, member: Member) {
        self.members
            .lock()
            .await
            .entry(member.id.clone())
            .or_default()
            .push_back(member);
    }

    /// Add a role to a server
    pub async fn insert_role(&self, server_id: &str, role: Role) {
        self.roles
            .lock()
            .await
            .entry(server_id.to_string())
            .or_default()
            .push(role);
    }

    /// All role grants made so far
    pub async fn grants(&self) -> Vec<RoleGrant> {
        self.grants.lock().await.clone()
    }

    /// Number of invite list fetches made so far
    pub fn invite_fetch_count(&self) -> usize {
        self.invite_fetches.load(Ordering::SeqCst)
    }
}
