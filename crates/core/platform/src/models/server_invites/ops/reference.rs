use std::sync::atomic::Ordering;

use invitebot_result::Result;

use crate::drivers::advance;
use crate::Invite;
use crate::ReferencePlatform;

use super::AbstractServerInvites;

#[async_trait]
impl AbstractServerInvites for ReferencePlatform {
    /// Fetch all active invites for a server
    async fn fetch_invites(&self, server_id: &str) -> Result<Vec<Invite>> {
        self.invite_fetches.fetch_add(1, Ordering::SeqCst);

        let mut invites = self.invites.lock().await;
        invites
            .get_mut(server_id)
            .and_then(advance)
            .unwrap_or_else(|| Err(create_error!(UnknownServer)))
    }

    /// Fetch the vanity invite code of a server
    async fn fetch_vanity_code(&self, server_id: &str) -> Result<Option<String>> {
        Ok(self.vanity_codes.lock().await.get(server_id).cloned())
    }
}
