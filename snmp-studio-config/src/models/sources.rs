use serde::{Deserialize, Serialize};

use crate::util::non_blank;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_route: Option<String>,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub poll: FilePollConfig,
    #[serde(default)]
    pub fragment_cache: FileCacheConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Durations in humantime form, e.g. `"5s"`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePollConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traps: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCacheConfig {
    /// `no-eviction`, `ttl` or `manual`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

/// Values sourced from `SNMP_STUDIO_*` environment variables.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub backend_url: Option<String>,
    pub fragment_base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub health_interval: Option<String>,
    pub cache_policy: Option<String>,
    pub cache_ttl: Option<String>,
    pub config_path: Option<String>,
}

impl EnvConfig {
    pub const BACKEND_URL: &'static str = "SNMP_STUDIO_BACKEND_URL";
    pub const FRAGMENT_URL: &'static str = "SNMP_STUDIO_FRAGMENT_URL";
    pub const USERNAME: &'static str = "SNMP_STUDIO_USERNAME";
    pub const PASSWORD: &'static str = "SNMP_STUDIO_PASSWORD";
    pub const HEALTH_INTERVAL: &'static str = "SNMP_STUDIO_HEALTH_INTERVAL";
    pub const CACHE_POLICY: &'static str = "SNMP_STUDIO_CACHE_POLICY";
    pub const CACHE_TTL: &'static str = "SNMP_STUDIO_CACHE_TTL";
    pub const CONFIG_PATH: &'static str = "SNMP_STUDIO_CONFIG";

    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds from an arbitrary key lookup so callers can avoid touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));
        Self {
            backend_url: get(Self::BACKEND_URL),
            fragment_base_url: get(Self::FRAGMENT_URL),
            username: get(Self::USERNAME),
            password: lookup(Self::PASSWORD).filter(|p| !p.is_empty()),
            health_interval: get(Self::HEALTH_INTERVAL),
            cache_policy: get(Self::CACHE_POLICY),
            cache_ttl: get(Self::CACHE_TTL),
            config_path: get(Self::CONFIG_PATH),
        }
    }
}
