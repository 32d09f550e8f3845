use invitebot_result::Result;

use crate::Invite;

#[cfg(feature = "discord")]
mod discord;
mod reference;

#[async_trait]
pub trait AbstractServerInvites: Sync + Send {
    /// Fetch all active invites for a server
    async fn fetch_invites(&self, server_id: &str) -> Result<Vec<Invite>>;

    /// Fetch the vanity invite code of a server, if it has one
    async fn fetch_vanity_code(&self, server_id: &str) -> Result<Option<String>>;
}
