use invitebot_result::Result;

use crate::{ReferencePlatform, Role};

use super::AbstractServerRoles;

#[async_trait]
impl AbstractServerRoles for ReferencePlatform {
    /// Fetch a role by its id
    async fn fetch_role(&self, server_id: &str, role_id: &str) -> Result<Role> {
        self.roles
            .lock()
            .await
            .get(server_id)
            .and_then(|roles| roles.iter().find(|role| role.id == role_id))
            .cloned()
            .ok_or_else(|| create_error!(UnknownRole))
    }
}
