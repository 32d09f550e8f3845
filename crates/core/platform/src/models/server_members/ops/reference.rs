use invitebot_result::Result;

use crate::drivers::advance;
use crate::{Member, MemberCompositeKey, ReferencePlatform, RoleGrant};

use super::AbstractServerMembers;

#[async_trait]
impl AbstractServerMembers for ReferencePlatform {
    /// Fetch the current state of a server member
    async fn fetch_member(&self, server_id: &str, user_id: &str) -> Result<Member> {
        let mut members = self.members.lock().await;
        members
            .get_mut(&MemberCompositeKey {
                server: server_id.to_string(),
                user: user_id.to_string(),
            })
            .and_then(advance)
            .ok_or_else(|| create_error!(UnknownMember))
    }

    /// Give a server member a role
    async fn add_member_role(
        &self,
        server_id: &str,
        user_id: &str,
        role_id: &str,
        reason: &str,
    ) -> Result<()> {
        let role_exists = self
            .roles
            .lock()
            .await
            .get(server_id)
            .is_some_and(|roles| roles.iter().any(|role| role.id == role_id));

        if !role_exists {
            return Err(create_error!(UnknownRole));
        }

        let mut members = self.members.lock().await;
        let states = members
            .get_mut(&MemberCompositeKey {
                server: server_id.to_string(),
                user: user_id.to_string(),
            })
            .ok_or_else(|| create_error!(UnknownMember))?;

        for member in states.iter_mut() {
            if !member.roles.iter().any(|role| role == role_id) {
                member.roles.push(role_id.to_string());
            }
        }

        self.grants.lock().await.push(RoleGrant {
            server: server_id.to_string(),
            user: user_id.to_string(),
            role: role_id.to_string(),
            reason: reason.to_string(),
        });

        Ok(())
    }
}
