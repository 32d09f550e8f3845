use std::time::Duration;

use invitebot_platform::{AbstractServerInvites, Invite, Platform};
use invitebot_result::Result;
use tokio::time::sleep;

use crate::{InviteSnapshot, InviteTable, InviteUsageCache};

/// How often and how patiently invites are re-fetched for a join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy, always making at least one attempt
    pub fn new(max_attempts: usize, delay: Duration) -> RetryPolicy {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Invite a member is believed to have joined through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsedInvite {
    /// An invite whose use count went up
    Counted { code: String, uses: u64 },
    /// The server's vanity URL, matched by code alone
    Vanity { code: String },
}

impl UsedInvite {
    pub fn code(&self) -> &str {
        match self {
            UsedInvite::Counted { code, .. } | UsedInvite::Vanity { code } => code,
        }
    }
}

/// Find the first configured invite whose use count went up since `previous`
pub fn find_used_invite<'a>(
    previous: &InviteSnapshot,
    current: &'a [Invite],
    table: &InviteTable,
) -> Option<&'a Invite> {
    current
        .iter()
        .filter(|invite| table.is_configured(&invite.code))
        .find(|invite| invite.uses > previous.uses(&invite.code))
}

/// Works out which invite was consumed by diffing invite snapshots
#[derive(Clone)]
pub struct Reconciler {
    platform: Platform,
    cache: InviteUsageCache,
    table: InviteTable,
    policy: RetryPolicy,
    vanity_fallback: bool,
}

impl Reconciler {
    pub fn new(
        platform: Platform,
        cache: InviteUsageCache,
        table: InviteTable,
        policy: RetryPolicy,
        vanity_fallback: bool,
    ) -> Reconciler {
        Reconciler {
            platform,
            cache,
            table,
            policy,
            vanity_fallback,
        }
    }

    /// Fetch every invite of a server and replace its cached snapshot
    ///
    /// Returns the number of invites now cached.
    pub async fn refresh(&self, server_id: &str) -> Result<usize> {
        let invites = self.platform.fetch_invites(server_id).await?;
        self.cache
            .set(server_id, InviteSnapshot::from_invites(&invites))
            .await;

        Ok(invites.len())
    }

    /// Find the invite used by the member who just joined
    ///
    /// Every attempt compares against the snapshot cached before the first
    /// attempt and then replaces the cache with what it fetched. Fetch
    /// failures only cost the attempt they happen in.
    pub async fn resolve(&self, server_id: &str, member_tag: &str) -> Option<UsedInvite> {
        let previous = self.cache.get(server_id).await;
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            match self.platform.fetch_invites(server_id).await {
                Ok(invites) => {
                    let used = find_used_invite(&previous, &invites, &self.table).cloned();
                    self.cache
                        .set(server_id, InviteSnapshot::from_invites(&invites))
                        .await;

                    if let Some(Invite { code, uses }) = used {
                        info!(
                            "Invite {code} was used by {member_tag} ({} -> {uses} uses, attempt {attempt}/{max_attempts}).",
                            previous.uses(&code)
                        );

                        return Some(UsedInvite::Counted { code, uses });
                    }

                    debug!(
                        "No configured invite use went up for {member_tag} (attempt {attempt}/{max_attempts})."
                    );
                }
                Err(error) => warn!(
                    "Failed to fetch invites of server {server_id} for {member_tag} (attempt {attempt}/{max_attempts}): {error}"
                ),
            }

            if attempt < max_attempts {
                sleep(self.policy.delay).await;
            }
        }

        if self.vanity_fallback {
            self.resolve_vanity(server_id).await
        } else {
            None
        }
    }

    /// Attribute the join to the vanity URL if its code is configured
    async fn resolve_vanity(&self, server_id: &str) -> Option<UsedInvite> {
        match self.platform.fetch_vanity_code(server_id).await {
            Ok(Some(code)) if self.table.is_configured(&code) => {
                info!("Vanity URL used and configured: {code}");
                Some(UsedInvite::Vanity { code })
            }
            Ok(Some(code)) => {
                info!("Vanity URL join detected (code: {code}), but this code is not configured.");
                None
            }
            Ok(None) => None,
            Err(error) => {
                debug!("Could not fetch the vanity URL of server {server_id}: {error}");
                None
            }
        }
    }
}
