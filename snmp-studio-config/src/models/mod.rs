pub mod sources;

use std::fmt;
use std::time::Duration;

use url::Url;

/// Fully resolved console configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Origin serving the `/api` surface.
    pub backend_url: Url,
    /// Base that `<route>.html` fragments are resolved against.
    pub fragment_base_url: Url,
    /// HTTP basic credentials for the protected endpoints.
    pub credentials: Option<Credentials>,
    pub poll: PollSettings,
    pub fragment_cache: CachePolicySetting,
    pub request_timeout: Duration,
    /// Location fragment to navigate to on startup; `None` means home.
    pub initial_route: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_url: default_origin(),
            fragment_base_url: default_origin(),
            credentials: None,
            poll: PollSettings::default(),
            fragment_cache: CachePolicySetting::default(),
            request_timeout: Duration::from_secs(30),
            initial_route: None,
        }
    }
}

fn default_origin() -> Url {
    Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL")
}

pub(crate) const DEFAULT_ORIGIN: &str = "http://localhost:8080/";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fixed polling periods. No jitter and no backoff are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub health: Duration,
    pub dashboard: Duration,
    pub simulator: Duration,
    pub traps: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            health: Duration::from_secs(30),
            dashboard: Duration::from_secs(5),
            simulator: Duration::from_secs(10),
            traps: Duration::from_secs(3),
        }
    }
}

/// How long fetched view fragments stay cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicySetting {
    /// Session lifetime; the first fetched copy is kept.
    #[default]
    NoEviction,
    TimeToLive(Duration),
    /// Kept until explicitly invalidated.
    Manual,
}
