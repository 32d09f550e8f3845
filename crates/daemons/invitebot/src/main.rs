use invitebot_config::{capture_error, configure};
use invitebot_platform::PlatformInfo;
use invitebot_result::{create_error, Error, ErrorType, Result};
use invitebot_tracker::{JoinTracker, TrackerSettings};
use serenity::gateway::GatewayError;
use serenity::prelude::*;

#[macro_use]
extern crate log;

mod handler;

use handler::Handler;

#[tokio::main]
async fn main() {
    configure!(invitebot);

    // Refuse to start without a token before touching the network
    let token = read_token(std::env::var("DISCORD_TOKEN").ok()).unwrap_or_else(|error| exit(error));

    let settings = TrackerSettings::from(&invitebot_config::config().await);
    if settings.table.is_empty() {
        warn!("No invites are configured, joins will never be assigned a role.");
    }

    info!(
        "Tracking {} invites on server {}.",
        settings.table.len(),
        settings.server_id
    );

    let platform = PlatformInfo::Discord {
        token: token.clone(),
    }
    .connect();

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS | GatewayIntents::GUILD_INVITES;

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler::new(JoinTracker::new(platform, settings)))
        .await
        .unwrap_or_else(|error| exit(to_start_error(error)));

    if let Err(error) = client.start().await {
        exit(to_start_error(error));
    }
}

/// Read the bot token, which must be present and not blank
fn read_token(value: Option<String>) -> Result<String> {
    value
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| create_error!(MissingToken))
}

/// Classify a failure to build or start the client
fn to_start_error(error: serenity::Error) -> Error {
    match &error {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => {
            create_error!(InvalidToken)
        }
        serenity::Error::Http(http)
            if http.status_code().map(|status| status.as_u16()) == Some(401) =>
        {
            create_error!(InvalidToken)
        }
        _ => create_error!(ConnectionFailed {
            error: error.to_string()
        }),
    }
}

/// Log a fatal startup error with a hint on how to fix it, then exit
fn exit(error: Error) -> ! {
    match error.error_type {
        ErrorType::MissingToken => error!(
            "DISCORD_TOKEN is not set. Add DISCORD_TOKEN=... to your .env file or environment."
        ),
        ErrorType::InvalidToken => error!(
            "DISCORD_TOKEN is invalid. Reset the bot token in the Discord Developer Portal and update your .env file, the \"Bot \" prefix is not needed."
        ),
        _ => error!("Failed to log in to Discord: {error}"),
    }

    capture_error(&error);
    std::process::exit(1)
}
