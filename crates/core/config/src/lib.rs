use cached::proc_macro::cached;
use config::{Config, Environment, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

pub use sentry::ClientInitGuard;

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../Invitebot.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("Invitebot.toml").exists() {
            builder = builder.add_source(File::new("Invitebot.toml", FileFormat::Toml));
        }

        builder
            .add_source(
                Environment::with_prefix("INVITEBOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .expect("configuration sources could not be read")
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Discord {
    pub guild: String,
}

/// Invite code to role mapping entry
#[derive(Deserialize, Debug, Clone)]
pub struct InviteRole {
    pub code: String,
    pub role: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Reconcile {
    pub max_attempts: usize,
    /// Milliseconds between attempts
    pub retry_delay: u64,
    pub vanity_fallback: bool,
    pub serialize_joins: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Onboarding {
    /// Milliseconds between member refreshes
    pub poll_interval: u64,
    /// Milliseconds before a pending member is given up on
    pub timeout: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Sentry {
    pub dsn: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub discord: Discord,
    #[serde(default)]
    pub invites: Vec<InviteRole>,
    pub reconcile: Reconcile,
    pub onboarding: Onboarding,
    pub sentry: Sentry,
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read()
        .await
        .try_deserialize::<Settings>()
        .expect("configuration does not match the expected layout")
}

/// Configure logging and error reporting
pub async fn setup_logging(release: &'static str) -> Option<ClientInitGuard> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::init();
    log::info!("Starting {release}");

    let config = config().await;
    if config.sentry.dsn.is_empty() {
        None
    } else {
        Some(sentry::init((
            config.sentry.dsn,
            sentry::ClientOptions {
                release: Some(release.into()),
                ..Default::default()
            },
        )))
    }
}

/// Report an error to sentry, if it is configured
pub fn capture_error<E: std::fmt::Debug>(error: &E) {
    sentry::capture_message(&format!("{error:?}"), sentry::Level::Error);
}

#[macro_export]
macro_rules! configure {
    ($application: ident) => {
        let _sentry = $crate::setup_logging(concat!(
            stringify!($application),
            "@",
            env!("CARGO_PKG_VERSION")
        ))
        .await;
    };
}
