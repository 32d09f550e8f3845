use std::sync::Arc;

use invitebot_result::{Error, Result};
use serenity::http::Http;
use serenity::model::id::{GuildId, RoleId, UserId};

/// Discord implementation backed by serenity's HTTP client
#[derive(Clone)]
pub struct DiscordPlatform(pub Arc<Http>);

impl DiscordPlatform {
    /// Create a new HTTP client for the given bot token
    pub fn new(token: &str) -> DiscordPlatform {
        DiscordPlatform(Arc::new(Http::new(token)))
    }
}

/// Parse a snowflake, rejecting zero which serenity cannot represent
fn parse_snowflake(id: &str) -> Result<u64> {
    id.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| create_error!(InvalidId { id: id.to_string() }))
}

pub(crate) fn parse_guild_id(id: &str) -> Result<GuildId> {
    parse_snowflake(id).map(GuildId::new)
}

pub(crate) fn parse_user_id(id: &str) -> Result<UserId> {
    parse_snowflake(id).map(UserId::new)
}

pub(crate) fn parse_role_id(id: &str) -> Result<RoleId> {
    parse_snowflake(id).map(RoleId::new)
}

/// Translate a serenity error into our error type
pub(crate) fn to_platform_error(operation: &str, error: serenity::Error) -> Error {
    debug!("Discord request {operation} failed: {error:?}");

    let status = match &error {
        serenity::Error::Http(http) => http.status_code().map(|status| status.as_u16()),
        _ => None,
    };

    from_status(operation, status).unwrap_or_else(|| create_platform_error!(operation, error))
}

/// Map the HTTP status of a failed request onto our error type
fn from_status(operation: &str, status: Option<u16>) -> Option<Error> {
    match status? {
        401 => Some(create_error!(InvalidToken)),
        403 => Some(create_error!(MissingPermission {
            operation: operation.to_string()
        })),
        404 => Some(create_error!(NotFound)),
        _ => None,
    }
}
