pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use url::Url;

use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{
    CachePolicySetting, ConsoleConfig, Credentials, PollSettings,
};
use crate::util::parse_duration;
use error::ConfigLoadError;

/// Values supplied on the command line. These win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub fragment_base_url: Option<String>,
    pub initial_route: Option<String>,
    pub cache_policy: Option<String>,
    pub cache_ttl: Option<String>,
}

/// Composes defaults, the TOML file, the environment and CLI overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    overrides: Overrides,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Loads `.env` into the process environment, then composes all layers.
    pub fn load(&self) -> Result<ConsoleConfig, ConfigLoadError> {
        self.load_dotenv()?;
        self.load_with_env(&EnvConfig::from_process())
    }

    /// Composes all layers using an already captured environment.
    pub fn load_with_env(
        &self,
        env: &EnvConfig,
    ) -> Result<ConsoleConfig, ConfigLoadError> {
        let path = self
            .config_path
            .clone()
            .or_else(|| env.config_path.as_ref().map(PathBuf::from));

        let file = match path {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };

        compose(file, env, &self.overrides)
    }

    fn load_dotenv(&self) -> Result<(), ConfigLoadError> {
        match &self.env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|source| {
                    ConfigLoadError::EnvFile {
                        path: path.clone(),
                        source,
                    }
                })?;
                debug!("Loaded env file {}", path.display());
            }
            None => {
                if let Err(err) = dotenvy::dotenv()
                    && !err.not_found()
                {
                    warn!("Ignoring unreadable .env file: {err}");
                }
            }
        }
        Ok(())
    }
}

pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merges the raw layers and validates the result.
pub fn compose(
    file: FileConfig,
    env: &EnvConfig,
    overrides: &Overrides,
) -> Result<ConsoleConfig, ConfigLoadError> {
    let defaults = ConsoleConfig::default();

    let backend_url = first_of([
        &overrides.backend_url,
        &env.backend_url,
        &file.backend_url,
    ])
    .map(|raw| parse_base_url("backend_url", raw))
    .transpose()?
    .unwrap_or(defaults.backend_url);

    // Fragments are served from the same origin as the API unless told otherwise.
    let fragment_base_url = first_of([
        &overrides.fragment_base_url,
        &env.fragment_base_url,
        &file.fragment_base_url,
    ])
    .map(|raw| parse_base_url("fragment_base_url", raw))
    .transpose()?
    .unwrap_or_else(|| backend_url.clone());

    let credentials = match (
        env.username.clone().or(file.auth.username),
        env.password.clone().or(file.auth.password),
    ) {
        (Some(username), Some(password)) => Some(Credentials {
            username,
            password,
        }),
        (None, None) => None,
        _ => return Err(ConfigLoadError::PartialCredentials),
    };

    let poll = PollSettings {
        health: interval_or(
            "poll.health",
            first_of([&env.health_interval, &file.poll.health]),
            defaults.poll.health,
        )?,
        dashboard: interval_or(
            "poll.dashboard",
            file.poll.dashboard.as_deref(),
            defaults.poll.dashboard,
        )?,
        simulator: interval_or(
            "poll.simulator",
            file.poll.simulator.as_deref(),
            defaults.poll.simulator,
        )?,
        traps: interval_or(
            "poll.traps",
            file.poll.traps.as_deref(),
            defaults.poll.traps,
        )?,
    };

    let request_timeout = interval_or(
        "request_timeout",
        file.request_timeout.as_deref(),
        defaults.request_timeout,
    )?;

    let fragment_cache = parse_cache_policy(
        first_of([
            &overrides.cache_policy,
            &env.cache_policy,
            &file.fragment_cache.policy,
        ]),
        first_of([
            &overrides.cache_ttl,
            &env.cache_ttl,
            &file.fragment_cache.ttl,
        ]),
    )?;

    Ok(ConsoleConfig {
        backend_url,
        fragment_base_url,
        credentials,
        poll,
        fragment_cache,
        request_timeout,
        initial_route: overrides.initial_route.clone().or(file.initial_route),
    })
}

fn first_of<'a, const N: usize>(
    layers: [&'a Option<String>; N],
) -> Option<&'a str> {
    layers.into_iter().find_map(|layer| layer.as_deref())
}

/// Parses a base URL and guarantees a trailing slash so relative joins keep
/// the full path.
fn parse_base_url(field: &'static str, raw: &str) -> Result<Url, ConfigLoadError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| {
        ConfigLoadError::InvalidUrl {
            field,
            value: raw.to_string(),
            source,
        }
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigLoadError::UnsupportedScheme {
            field,
            value: raw.to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn interval_or(
    field: &'static str,
    raw: Option<&str>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = parse_duration(raw).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            field,
            value: raw.to_string(),
            source,
        }
    })?;
    if value.is_zero() {
        return Err(ConfigLoadError::ZeroDuration { field });
    }
    Ok(value)
}

fn parse_cache_policy(
    policy: Option<&str>,
    ttl: Option<&str>,
) -> Result<CachePolicySetting, ConfigLoadError> {
    let Some(policy) = policy else {
        if ttl.is_some() {
            warn!("fragment cache ttl set without policy = \"ttl\"; ignoring");
        }
        return Ok(CachePolicySetting::NoEviction);
    };

    match policy.to_ascii_lowercase().as_str() {
        "no-eviction" | "none" | "session" => Ok(CachePolicySetting::NoEviction),
        "manual" => Ok(CachePolicySetting::Manual),
        "ttl" | "time-to-live" => {
            let raw = ttl.ok_or(ConfigLoadError::MissingCacheTtl)?;
            let ttl = interval_or("fragment_cache.ttl", Some(raw), Duration::ZERO)?;
            Ok(CachePolicySetting::TimeToLive(ttl))
        }
        other => Err(ConfigLoadError::InvalidCachePolicy(other.to_string())),
    }
}
