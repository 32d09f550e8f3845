use invitebot_result::Result;

use crate::drivers::{parse_guild_id, to_platform_error};
use crate::{DiscordPlatform, Invite};

use super::AbstractServerInvites;

#[async_trait]
impl AbstractServerInvites for DiscordPlatform {
    /// Fetch all active invites for a server
    async fn fetch_invites(&self, server_id: &str) -> Result<Vec<Invite>> {
        let invites = self
            .0
            .get_guild_invites(parse_guild_id(server_id)?)
            .await
            .map_err(|error| to_platform_error("fetch_invites", error))?;

        Ok(invites
            .into_iter()
            .map(|invite| Invite::new(invite.code, invite.uses))
            .collect())
    }

    /// Fetch the vanity invite code of a server
    async fn fetch_vanity_code(&self, server_id: &str) -> Result<Option<String>> {
        let vanity = self
            .0
            .get_guild_vanity_url(parse_guild_id(server_id)?)
            .await
            .map_err(|error| to_platform_error("fetch_vanity_code", error))?;

        // Accept either a bare code or a full discord.gg link
        Ok(vanity
            .rsplit('/')
            .next()
            .filter(|code| !code.is_empty())
            .map(ToString::to_string))
    }
}
