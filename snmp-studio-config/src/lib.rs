//! Shared configuration library for the SNMP Studio console.
//!
//! Configuration is layered, later layers winning: compiled defaults, an
//! optional TOML file, `.env` plus the process environment (`SNMP_STUDIO_*`),
//! and finally command line flags. The result is a validated
//! [`ConsoleConfig`] whose durations and URLs are already parsed.

pub mod cli;
pub mod loader;
pub mod models;
pub mod util;

pub use cli::ConsoleArgs;
pub use loader::{ConfigLoader, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    CachePolicySetting, ConsoleConfig, Credentials, PollSettings,
};
