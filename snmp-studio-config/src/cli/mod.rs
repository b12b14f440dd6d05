use std::path::PathBuf;

use clap::Parser;

use crate::loader::{ConfigLoader, Overrides};

/// Headless SNMP Studio console.
///
/// Reads location fragments (`#walker`, `simulator`, ...) from stdin, one per
/// line, and drives the screen router with them.
#[derive(Debug, Clone, Parser)]
#[command(name = "snmp-studio-console", version, about)]
pub struct ConsoleArgs {
    /// TOML configuration file (also `SNMP_STUDIO_CONFIG`)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Env file loaded before reading `SNMP_STUDIO_*` variables
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Backend origin serving `/api`
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Base URL view fragments are fetched from
    #[arg(long)]
    pub fragment_url: Option<String>,

    /// Initial location fragment
    #[arg(long, short = 'r')]
    pub route: Option<String>,

    /// Fragment cache policy: no-eviction, ttl or manual
    #[arg(long)]
    pub cache_policy: Option<String>,

    /// Fragment time-to-live when the policy is `ttl` (e.g. `5m`)
    #[arg(long)]
    pub cache_ttl: Option<String>,
}

impl ConsoleArgs {
    pub fn loader(&self) -> ConfigLoader {
        let mut loader = ConfigLoader::new().with_overrides(Overrides {
            backend_url: self.backend_url.clone(),
            fragment_base_url: self.fragment_url.clone(),
            initial_route: self.route.clone(),
            cache_policy: self.cache_policy.clone(),
            cache_ttl: self.cache_ttl.clone(),
        });
        if let Some(path) = &self.config {
            loader = loader.with_config_path(path);
        }
        if let Some(path) = &self.env_file {
            loader = loader.with_env_file(path);
        }
        loader
    }
}
