use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("{field} is not a valid URL ({value}): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{field} must be an http(s) URL, got {value}")]
    UnsupportedScheme { field: &'static str, value: String },

    #[error("{field} is not a valid duration ({value}): {source}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("unknown fragment cache policy '{0}' (expected no-eviction, ttl or manual)")]
    InvalidCachePolicy(String),

    #[error("fragment cache policy 'ttl' requires a ttl")]
    MissingCacheTtl,

    #[error("credentials require both a username and a password")]
    PartialCredentials,
}
