use std::time::Duration;

use invitebot_platform::{AbstractServerMembers, Member, Platform};
use tokio::time::{sleep, Instant};

/// How long to wait on members who have yet to pass membership screening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

/// Holds joins back until the member is allowed to receive roles
#[derive(Clone)]
pub struct OnboardingGate {
    platform: Platform,
    policy: OnboardingPolicy,
}

impl OnboardingGate {
    pub fn new(platform: Platform, policy: OnboardingPolicy) -> OnboardingGate {
        OnboardingGate { platform, policy }
    }

    /// Wait for a member to leave the pending state
    ///
    /// Returns the refreshed member, or `None` if they were still pending
    /// once the timeout ran out.
    pub async fn wait(&self, member: Member) -> Option<Member> {
        if !member.pending {
            return Some(member);
        }

        info!(
            "Member {} is pending onboarding. Waiting to complete before assigning role.",
            member.tag
        );

        let mut member = self.refresh(member).await;
        let started = Instant::now();
        while member.pending && started.elapsed() < self.policy.timeout {
            sleep(self.policy.poll_interval).await;
            member = self.refresh(member).await;
        }

        if member.pending {
            info!(
                "Onboarding not completed within {:?} for {}. Skipping role assignment.",
                self.policy.timeout, member.tag
            );

            None
        } else {
            debug!("Member {} completed onboarding.", member.tag);
            Some(member)
        }
    }

    /// Re-fetch a member, keeping what we had if that fails
    async fn refresh(&self, member: Member) -> Member {
        match self
            .platform
            .fetch_member(&member.id.server, &member.id.user)
            .await
        {
            Ok(fresh) => fresh,
            Err(error) => {
                debug!("Failed to refresh member {}: {error}", member.tag);
                member
            }
        }
    }
}
