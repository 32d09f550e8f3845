use std::time::Duration;

use invitebot_config::Settings;

use crate::{InviteTable, OnboardingPolicy, RetryPolicy};

/// Everything a tracker needs to know about the server it watches
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub server_id: String,
    pub table: InviteTable,
    pub retry: RetryPolicy,
    pub vanity_fallback: bool,
    pub serialize_joins: bool,
    pub onboarding: OnboardingPolicy,
}

impl From<&Settings> for TrackerSettings {
    fn from(settings: &Settings) -> Self {
        TrackerSettings {
            server_id: settings.discord.guild.clone(),
            table: InviteTable::from_settings(&settings.invites),
            retry: RetryPolicy::new(
                settings.reconcile.max_attempts,
                Duration::from_millis(settings.reconcile.retry_delay),
            ),
            vanity_fallback: settings.reconcile.vanity_fallback,
            serialize_joins: settings.reconcile.serialize_joins,
            onboarding: OnboardingPolicy {
                poll_interval: Duration::from_millis(settings.onboarding.poll_interval),
                timeout: Duration::from_millis(settings.onboarding.timeout),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TrackerSettings;

    #[tokio::test]
    async fn from_default_configuration() {
        let settings = TrackerSettings::from(&invitebot_config::config().await);

        assert_eq!(settings.server_id, "1408017302724808704");
        assert_eq!(settings.table.len(), 2);
        assert_eq!(
            settings.table.role_for("NFpHNYtRxp"),
            Some("1409136318319038495")
        );
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.retry.delay, Duration::from_secs(3));
        assert_eq!(settings.onboarding.poll_interval, Duration::from_secs(3));
        assert_eq!(settings.onboarding.timeout, Duration::from_secs(300));
        assert!(settings.serialize_joins);
    }
}
