use invitebot_result::Result;

use crate::Role;

#[cfg(feature = "discord")]
mod discord;
mod reference;

#[async_trait]
pub trait AbstractServerRoles: Sync + Send {
    /// Fetch a role by its id from a server's role set
    async fn fetch_role(&self, server_id: &str, role_id: &str) -> Result<Role>;
}
