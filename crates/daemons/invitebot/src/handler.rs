use invitebot_config::capture_error;
use invitebot_platform::Member;
use invitebot_result::Error;
use invitebot_tracker::JoinTracker;
use serenity::async_trait;
use serenity::gateway::{ConnectionStage, ShardStageUpdateEvent};
use serenity::model::event::{InviteCreateEvent, InviteDeleteEvent};
use serenity::model::gateway::Ready;
use serenity::model::guild::Member as DiscordMember;
use serenity::prelude::*;

/// Gateway event handler
///
/// serenity runs every event on its own task, so a failure here only ever
/// affects the event being handled.
pub struct Handler {
    tracker: JoinTracker,
}

impl Handler {
    pub fn new(tracker: JoinTracker) -> Handler {
        Handler { tracker }
    }
}

/// Log and report an error that ended the handling of an event
fn report(action: &str, error: &Error) {
    error!("Failed to {action}: {error}");
    capture_error(error);
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        info!("Logged in as {}!", ready.user.tag());

        if let Err(error) = self.tracker.handle_ready().await {
            report("populate the initial invite cache", &error);
        }
    }

    async fn invite_create(&self, _: Context, data: InviteCreateEvent) {
        let server_id = data.guild_id.map(|id| id.to_string());
        if let Err(error) = self.tracker.handle_invite_change(server_id.as_deref()).await {
            report("refresh invites after an invite was created", &error);
        }
    }

    async fn invite_delete(&self, _: Context, data: InviteDeleteEvent) {
        let server_id = data.guild_id.map(|id| id.to_string());
        if let Err(error) = self.tracker.handle_invite_change(server_id.as_deref()).await {
            report("refresh invites after an invite was deleted", &error);
        }
    }

    async fn guild_member_addition(&self, _: Context, new_member: DiscordMember) {
        let member = Member::from(&new_member);
        let tag = member.tag.clone();

        match self.tracker.handle_member_join(member).await {
            Ok(outcome) => debug!("Finished handling join of {tag}: {outcome:?}"),
            Err(error) => report(&format!("handle the join of {tag}"), &error),
        }
    }

    async fn shard_stage_update(&self, _: Context, event: ShardStageUpdateEvent) {
        match event.new {
            ConnectionStage::Disconnected => warn!(
                "Shard {:?} disconnected (was {}).",
                event.shard_id, event.old
            ),
            stage => debug!("Shard {:?} is now {stage}.", event.shard_id),
        }
    }
}
