#[cfg(feature = "discord")]
mod discord;
mod reference;

#[cfg(feature = "discord")]
pub use self::discord::*;
pub use self::reference::*;

/// Platform information to use to create a client
pub enum PlatformInfo {
    /// Use the in-memory reference platform
    Reference,
    /// Talk to Discord over HTTP using a bot token
    #[cfg(feature = "discord")]
    Discord { token: String },
}

/// Platform
#[derive(Clone)]
pub enum Platform {
    /// In-memory platform
    Reference(ReferencePlatform),
    /// Discord REST API
    #[cfg(feature = "discord")]
    Discord(DiscordPlatform),
}

impl PlatformInfo {
    /// Create a platform client from the given information
    pub fn connect(self) -> Platform {
        match self {
            PlatformInfo::Reference => Platform::Reference(Default::default()),
            #[cfg(feature = "discord")]
            PlatformInfo::Discord { token } => Platform::Discord(DiscordPlatform::new(&token)),
        }
    }
}
