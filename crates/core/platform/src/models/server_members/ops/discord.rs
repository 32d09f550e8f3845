use invitebot_result::Result;
use serenity::model::guild::Member as DiscordMember;

use crate::drivers::{parse_guild_id, parse_role_id, parse_user_id, to_platform_error};
use crate::{DiscordPlatform, Member, MemberCompositeKey};

use super::AbstractServerMembers;

impl From<&DiscordMember> for Member {
    fn from(member: &DiscordMember) -> Self {
        Member {
            id: MemberCompositeKey {
                server: member.guild_id.to_string(),
                user: member.user.id.to_string(),
            },
            tag: member.user.tag(),
            pending: member.pending,
            roles: member.roles.iter().map(ToString::to_string).collect(),
        }
    }
}

#[async_trait]
impl AbstractServerMembers for DiscordPlatform {
    /// Fetch the current state of a server member, bypassing the cache
    async fn fetch_member(&self, server_id: &str, user_id: &str) -> Result<Member> {
        self.0
            .get_member(parse_guild_id(server_id)?, parse_user_id(user_id)?)
            .await
            .map(|member| Member::from(&member))
            .map_err(|error| to_platform_error("fetch_member", error))
    }

    /// Give a server member a role
    async fn add_member_role(
        &self,
        server_id: &str,
        user_id: &str,
        role_id: &str,
        reason: &str,
    ) -> Result<()> {
        self.0
            .add_member_role(
                parse_guild_id(server_id)?,
                parse_user_id(user_id)?,
                parse_role_id(role_id)?,
                Some(reason),
            )
            .await
            .map_err(|error| to_platform_error("add_member_role", error))
    }
}
