use invitebot_result::Result;

use crate::Member;

#[cfg(feature = "discord")]
mod discord;
mod reference;

#[async_trait]
pub trait AbstractServerMembers: Sync + Send {
    /// Fetch the current state of a server member
    async fn fetch_member(&self, server_id: &str, user_id: &str) -> Result<Member>;

    /// Give a server member a role
    async fn add_member_role(
        &self,
        server_id: &str,
        user_id: &str,
        role_id: &str,
        reason: &str,
    ) -> Result<()>;
}
