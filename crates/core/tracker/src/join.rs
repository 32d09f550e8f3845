use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::lock::Mutex;
use invitebot_platform::{AbstractServerMembers, AbstractServerRoles, Member, Platform};
use invitebot_result::{ErrorType, Result};

use crate::{
    InviteTable, InviteUsageCache, OnboardingGate, Reconciler, TrackerSettings, UsedInvite,
};

/// What happened to a member join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The member joined a server we do not track
    ForeignServer,
    /// The member never passed membership screening in time
    OnboardingTimedOut,
    /// No configured invite could be matched to the join
    Unresolved,
    /// The invite is tracked but grants no role
    UnmappedInvite { code: String },
    /// The role configured for the invite does not exist on the server
    UnknownRole { code: String, role: String },
    /// The role was granted
    Granted { code: String, role: String },
}

/// Drives cache upkeep and role assignment for the tracked server
#[derive(Clone)]
pub struct JoinTracker {
    server_id: String,
    platform: Platform,
    table: InviteTable,
    cache: InviteUsageCache,
    reconciler: Reconciler,
    onboarding: OnboardingGate,
    join_lock: Option<Arc<Mutex<()>>>,
    seeded: Arc<AtomicBool>,
}

impl JoinTracker {
    pub fn new(platform: Platform, settings: TrackerSettings) -> JoinTracker {
        let cache = InviteUsageCache::default();

        JoinTracker {
            reconciler: Reconciler::new(
                platform.clone(),
                cache.clone(),
                settings.table.clone(),
                settings.retry,
                settings.vanity_fallback,
            ),
            onboarding: OnboardingGate::new(platform.clone(), settings.onboarding),
            join_lock: settings
                .serialize_joins
                .then(|| Arc::new(Mutex::new(()))),
            seeded: Arc::new(AtomicBool::new(false)),
            server_id: settings.server_id,
            table: settings.table,
            platform,
            cache,
        }
    }

    /// Whether events from this server concern us
    pub fn is_tracked(&self, server_id: &str) -> bool {
        self.server_id == server_id
    }

    pub fn cache(&self) -> &InviteUsageCache {
        &self.cache
    }

    /// Seed the invite cache once the connection is ready
    ///
    /// Only the first call does anything, later ones return `None`.
    pub async fn handle_ready(&self) -> Result<Option<usize>> {
        if self.seeded.swap(true, Ordering::SeqCst) {
            debug!("Invite cache was already seeded, ignoring repeated ready.");
            return Ok(None);
        }

        let count = self.reconciler.refresh(&self.server_id).await?;
        info!("Cached {count} invites for server {}", self.server_id);
        Ok(Some(count))
    }

    /// Refresh the invite cache after an invite was created or deleted
    ///
    /// Returns whether the event concerned the tracked server.
    pub async fn handle_invite_change(&self, server_id: Option<&str>) -> Result<bool> {
        match server_id {
            Some(server_id) if self.is_tracked(server_id) => {
                let count = self.reconciler.refresh(server_id).await?;
                debug!("Refreshed invite cache for server {server_id} ({count} invites).");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Handle a member joining, granting them the role of their invite
    pub async fn handle_member_join(&self, member: Member) -> Result<JoinOutcome> {
        info!("New member joined: {}", member.tag);
        if !self.is_tracked(&member.id.server) {
            return Ok(JoinOutcome::ForeignServer);
        }

        let Some(member) = self.onboarding.wait(member).await else {
            return Ok(JoinOutcome::OnboardingTimedOut);
        };

        // Two increments that show up in the same fetch stay ambiguous
        let used = {
            let _guard = match &self.join_lock {
                Some(lock) => Some(lock.lock().await),
                None => None,
            };

            self.reconciler.resolve(&self.server_id, &member.tag).await
        };

        match used {
            Some(used) => self.grant(&member, used).await,
            None => {
                info!(
                    "Could not work out which invite {} used. Make sure the bot was running before the invite was used, that it has the Manage Server permission, and that the member joined through a configured invite or vanity URL.",
                    member.tag
                );

                Ok(JoinOutcome::Unresolved)
            }
        }
    }

    /// Grant the role mapped to the used invite
    async fn grant(&self, member: &Member, used: UsedInvite) -> Result<JoinOutcome> {
        let code = used.code().to_string();
        let Some(role_id) = self.table.role_for(&code) else {
            info!("Invite {code} has no role configured, check the invite table.");
            return Ok(JoinOutcome::UnmappedInvite { code });
        };

        let invite = match self.table.label_for(&code) {
            label if label == code => code.clone(),
            label => format!("{code} ({label})"),
        };

        let role = match self.platform.fetch_role(&self.server_id, role_id).await {
            Ok(role) => role,
            Err(error) if matches!(error.error_type, ErrorType::UnknownRole | ErrorType::NotFound) => {
                info!("Role not found: {role_id}");
                return Ok(JoinOutcome::UnknownRole {
                    code,
                    role: role_id.to_string(),
                });
            }
            Err(error) => return Err(error),
        };

        self.platform
            .add_member_role(
                &self.server_id,
                &member.id.user,
                &role.id,
                &format!("Joined through invite {invite}"),
            )
            .await?;

        info!(
            "Assigned role ({}) to {} via invite {invite}",
            role.name, member.tag
        );

        Ok(JoinOutcome::Granted {
            code,
            role: role.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use invitebot_platform::{Invite, Member, PlatformInfo, ReferencePlatform, Role};
    use tokio::time::Instant;

    use super::{JoinOutcome, JoinTracker};
    use crate::{InviteSnapshot, InviteTable, OnboardingPolicy, RetryPolicy, TrackerSettings};

    const SERVER: &str = "server";

    fn settings(serialize_joins: bool) -> TrackerSettings {
        TrackerSettings {
            server_id: SERVER.to_string(),
            table: InviteTable::new([("A", "role-a"), ("B", "role-b"), ("observe", "")]),
            retry: RetryPolicy::new(3, Duration::from_secs(3)),
            vanity_fallback: true,
            serialize_joins,
            onboarding: OnboardingPolicy {
                poll_interval: Duration::from_secs(3),
                timeout: Duration::from_secs(5 * 60),
            },
        }
    }

    async fn tracker(serialize_joins: bool) -> (JoinTracker, ReferencePlatform) {
        let platform = PlatformInfo::Reference.connect();
        let invitebot_platform::Platform::Reference(reference) = &platform else {
            unreachable!()
        };
        let reference = reference.clone();

        for id in ["role-a", "role-b"] {
            reference
                .insert_role(
                    SERVER,
                    Role {
                        id: id.to_string(),
                        name: id.to_uppercase(),
                    },
                )
                .await;
        }

        (JoinTracker::new(platform, settings(serialize_joins)), reference)
    }

    async fn join(reference: &ReferencePlatform, user: &str, pending: bool) -> Member {
        let member = Member::new(SERVER, user, &format!("{user}#0001"), pending);
        reference.queue_member(member.clone()).await;
        member
    }

    #[tokio::test(start_paused = true)]
    async fn grants_role_of_increased_invite() {
        let (tracker, reference) = tracker(true).await;
        tracker
            .cache()
            .set(SERVER, InviteSnapshot::from_iter([("A", 5), ("B", 2)]))
            .await;
        reference
            .queue_invites(
                SERVER,
                vec![Invite::new("A", 5), Invite::new("B", 3), Invite::new("C", 0)],
            )
            .await;

        let member = join(&reference, "user", false).await;
        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::Granted {
                code: "B".to_string(),
                role: "role-b".to_string()
            })
        );

        assert_eq!(
            *tracker.cache().get(SERVER).await,
            InviteSnapshot::from_iter([("A", 5), ("B", 3), ("C", 0)])
        );

        let grants = reference.grants().await;
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].user, "user");
        assert_eq!(grants[0].role, "role-b");
    }

    #[tokio::test(start_paused = true)]
    async fn unresolved_join_grants_nothing() {
        let (tracker, reference) = tracker(true).await;
        tracker
            .cache()
            .set(SERVER, InviteSnapshot::from_iter([("A", 5)]))
            .await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 5)])
            .await;
        reference.set_vanity_code(SERVER, "Z").await;

        let member = join(&reference, "user", false).await;
        let started = Instant::now();
        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::Unresolved)
        );
        assert_eq!(started.elapsed(), Duration::from_secs(6));
        assert_eq!(reference.invite_fetch_count(), 3);
        assert!(reference.grants().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn configured_vanity_code_grants_role() {
        let (tracker, reference) = tracker(true).await;
        reference.queue_invites(SERVER, vec![]).await;
        reference.set_vanity_code(SERVER, "A").await;

        let member = join(&reference, "user", false).await;
        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::Granted {
                code: "A".to_string(),
                role: "role-a".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tracked_invite_without_role() {
        let (tracker, reference) = tracker(true).await;
        reference
            .queue_invites(SERVER, vec![Invite::new("observe", 1)])
            .await;

        let member = join(&reference, "user", false).await;
        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::UnmappedInvite {
                code: "observe".to_string()
            })
        );
        assert!(reference.grants().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_role_is_not_an_error() {
        let platform = PlatformInfo::Reference.connect();
        let invitebot_platform::Platform::Reference(reference) = &platform else {
            unreachable!()
        };
        let reference = reference.clone();
        let tracker = JoinTracker::new(platform, settings(true));

        reference
            .queue_invites(SERVER, vec![Invite::new("A", 1)])
            .await;

        let member = join(&reference, "user", false).await;
        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::UnknownRole {
                code: "A".to_string(),
                role: "role-a".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pending_member_is_granted_after_onboarding() {
        let (tracker, reference) = tracker(true).await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 1)])
            .await;

        let member = join(&reference, "user", true).await;
        join(&reference, "user", false).await;

        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::Granted {
                code: "A".to_string(),
                role: "role-a".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pending_member_never_reaches_resolution() {
        let (tracker, reference) = tracker(true).await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 1)])
            .await;

        let member = join(&reference, "user", true).await;
        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::OnboardingTimedOut)
        );
        assert_eq!(reference.invite_fetch_count(), 0);
        assert!(reference.grants().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_server_is_ignored() {
        let (tracker, reference) = tracker(true).await;
        let member = Member::new("elsewhere", "user", "user#0001", false);

        assert_eq!(
            tracker.handle_member_join(member).await,
            Ok(JoinOutcome::ForeignServer)
        );
        assert_eq!(
            tracker.handle_invite_change(Some("elsewhere")).await,
            Ok(false)
        );
        assert_eq!(tracker.handle_invite_change(None).await, Ok(false));
        assert_eq!(reference.invite_fetch_count(), 0);
    }

    #[tokio::test]
    async fn ready_seeds_cache_once() {
        let (tracker, reference) = tracker(true).await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 5), Invite::new("C", 2)])
            .await;

        assert_eq!(tracker.handle_ready().await, Ok(Some(2)));
        assert_eq!(tracker.handle_ready().await, Ok(None));
        assert_eq!(reference.invite_fetch_count(), 1);
        assert_eq!(tracker.cache().get(SERVER).await.uses("C"), 2);
    }

    #[tokio::test]
    async fn invite_change_refreshes_cache() {
        let (tracker, reference) = tracker(true).await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 5)])
            .await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 5), Invite::new("D", 0)])
            .await;

        tracker.handle_ready().await.unwrap();
        assert_eq!(tracker.handle_invite_change(Some(SERVER)).await, Ok(true));
        assert!(tracker.cache().get(SERVER).await.contains("D"));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_joins_get_their_own_invite() {
        let (tracker, reference) = tracker(true).await;
        tracker
            .cache()
            .set(SERVER, InviteSnapshot::from_iter([("A", 0), ("B", 0)]))
            .await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 1), Invite::new("B", 0)])
            .await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 1), Invite::new("B", 1)])
            .await;

        let first = join(&reference, "first", false).await;
        let second = join(&reference, "second", false).await;

        let (first, second) = tokio::join!(
            tracker.handle_member_join(first),
            tracker.handle_member_join(second)
        );

        assert_eq!(
            first,
            Ok(JoinOutcome::Granted {
                code: "A".to_string(),
                role: "role-a".to_string()
            })
        );
        assert_eq!(
            second,
            Ok(JoinOutcome::Granted {
                code: "B".to_string(),
                role: "role-b".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unserialized_joins_can_claim_the_same_increment() {
        let (tracker, reference) = tracker(false).await;
        tracker
            .cache()
            .set(SERVER, InviteSnapshot::from_iter([("A", 0), ("B", 0)]))
            .await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 0), Invite::new("B", 0)])
            .await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 1), Invite::new("B", 1)])
            .await;

        let first = join(&reference, "first", false).await;
        let second = join(&reference, "second", false).await;

        // The first join sees no increase and sleeps, the second diffs
        // against the same snapshot before the first one wakes up
        let (first, second) = tokio::join!(
            tracker.handle_member_join(first),
            tracker.handle_member_join(second)
        );

        let granted_a = Ok(JoinOutcome::Granted {
            code: "A".to_string(),
            role: "role-a".to_string(),
        });
        assert_eq!(first, granted_a);
        assert_eq!(second, granted_a);
        assert_eq!(reference.invite_fetch_count(), 3);
        assert!(reference
            .grants()
            .await
            .iter()
            .all(|grant| grant.role == "role-a"));
    }

    #[tokio::test(start_paused = true)]
    async fn pending_join_overlapping_another_join_is_ambiguous() {
        let (tracker, reference) = tracker(true).await;
        tracker
            .cache()
            .set(SERVER, InviteSnapshot::from_iter([("A", 0), ("B", 0)]))
            .await;
        reference
            .queue_invites(SERVER, vec![Invite::new("A", 1), Invite::new("B", 1)])
            .await;

        // Joined through A, passes screening on the third refresh
        let pending = join(&reference, "pending", true).await;
        join(&reference, "pending", true).await;
        join(&reference, "pending", false).await;

        // Joined through B, resolves while the other join is still waiting
        let screened = join(&reference, "screened", false).await;

        let (pending, screened) = tokio::join!(
            tracker.handle_member_join(pending),
            tracker.handle_member_join(screened)
        );

        // Both increments are visible at once, the first in fetch order wins
        assert_eq!(
            screened,
            Ok(JoinOutcome::Granted {
                code: "A".to_string(),
                role: "role-a".to_string()
            })
        );
        assert_eq!(pending, Ok(JoinOutcome::Unresolved));
        assert_eq!(reference.grants().await.len(), 1);
    }
}
