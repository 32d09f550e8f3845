use invitebot_result::Result;

use crate::drivers::{parse_guild_id, parse_role_id, to_platform_error};
use crate::{DiscordPlatform, Role};

use super::AbstractServerRoles;

#[async_trait]
impl AbstractServerRoles for DiscordPlatform {
    /// Fetch a role by its id from the server's current role set
    async fn fetch_role(&self, server_id: &str, role_id: &str) -> Result<Role> {
        let wanted = parse_role_id(role_id)?;
        let roles = self
            .0
            .get_guild_roles(parse_guild_id(server_id)?)
            .await
            .map_err(|error| to_platform_error("fetch_role", error))?;

        roles
            .into_iter()
            .find(|role| role.id == wanted)
            .map(|role| Role {
                id: role.id.to_string(),
                name: role.name,
            })
            .ok_or_else(|| create_error!(UnknownRole))
    }
}
