mod server_invites;
mod server_members;
mod server_roles;

pub use server_invites::*;
pub use server_members::*;
pub use server_roles::*;

#[cfg(feature = "discord")]
use crate::DiscordPlatform;
use crate::{Platform, ReferencePlatform};

pub trait AbstractPlatform:
    Sync
    + Send
    + server_invites::AbstractServerInvites
    + server_members::AbstractServerMembers
    + server_roles::AbstractServerRoles
{
}

impl AbstractPlatform for ReferencePlatform {}
#[cfg(feature = "discord")]
impl AbstractPlatform for DiscordPlatform {}

impl std::ops::Deref for Platform {
    type Target = dyn AbstractPlatform;

    fn deref(&self) -> &Self::Target {
        match &self {
            Platform::Reference(reference) => reference,
            #[cfg(feature = "discord")]
            Platform::Discord(discord) => discord,
        }
    }
}
