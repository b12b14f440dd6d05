//! Application bootstrap.
//!
//! [`Console::boot`] runs the authentication gate and, only when it passes,
//! reveals the shell, starts the health poller, builds the router over the
//! standard screen set and performs the initial navigation.

pub mod commands;
pub mod terminal;

use std::sync::Arc;

use log::{info, warn};
use snmp_studio_config::ConsoleConfig;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::fragments::{FragmentError, FragmentSource, HttpFragmentSource};
use crate::core::health::HealthPoller;
use crate::core::registry::ModuleRegistry;
use crate::core::router::{
    NavigationError, NavigationOutcome, Router, spawn_hash_listener,
};
use crate::core::shell::Shell;
use crate::core::state::{SharedState, shared_state};
use crate::infra::api_client::ApiClient;
use crate::infra::services::api::{ApiError, ApiService};
use crate::screens::ScreenContext;

pub const AUTH_REQUIRED: &str = "Authentication Required. Please refresh.";
pub const CONNECTION_FAILED: &str = "Connection Failed. Backend offline?";

#[derive(Debug, Error)]
pub enum BootError {
    #[error("Authentication Required. Please refresh.")]
    Unauthorized(#[source] ApiError),

    #[error("Connection Failed. Backend offline?")]
    Unreachable(#[source] ApiError),

    #[error("failed to build API client: {0}")]
    Client(#[source] ApiError),

    #[error("failed to build fragment source: {0}")]
    Fragments(#[from] FragmentError),
}

/// A booted console: gate passed, router running.
#[derive(Debug)]
pub struct Console {
    context: ScreenContext,
    router: Arc<Router>,
    locations: mpsc::UnboundedSender<String>,
    health: JoinHandle<()>,
    listener: JoinHandle<()>,
}

impl Console {
    /// Boots against the configured backend over HTTP.
    pub async fn boot(
        config: ConsoleConfig,
        shell: Arc<dyn Shell>,
    ) -> Result<Self, BootError> {
        let api = ApiClient::from_config(&config).map_err(BootError::Client)?;
        let fragments = HttpFragmentSource::new(
            config.fragment_base_url.clone(),
            config.request_timeout,
        )?;
        Self::boot_with(config, shell, Arc::new(api), Arc::new(fragments)).await
    }

    /// Boots with explicit service implementations.
    pub async fn boot_with(
        config: ConsoleConfig,
        shell: Arc<dyn Shell>,
        api: Arc<dyn ApiService>,
        fragments: Arc<dyn FragmentSource>,
    ) -> Result<Self, BootError> {
        authenticate(api.as_ref(), shell.as_ref()).await?;
        shell.reveal();

        let health =
            HealthPoller::spawn(Arc::clone(&api), Arc::clone(&shell), config.poll.health);

        let context =
            ScreenContext::new(api, Arc::clone(&shell), shared_state(), config.poll);
        let router = Arc::new(
            Router::new(shell, fragments, ModuleRegistry::standard(&context))
                .with_cache_policy(config.fragment_cache.into())
                .with_active_screen(context.shown.clone()),
        );

        let (locations, changes) = mpsc::unbounded_channel();
        let listener = spawn_hash_listener(Arc::clone(&router), changes);

        let initial = config.initial_route.unwrap_or_default();
        if let Err(err) = router.navigate(&initial).await {
            warn!("[Console] initial navigation failed: {err}");
        }
        info!("[Console] ready");

        Ok(Self {
            context,
            router,
            locations,
            health,
            listener,
        })
    }

    /// Reports a location change, like the browser's hashchange event.
    /// Returns `false` once the listener has stopped.
    pub fn set_location(&self, fragment: impl Into<String>) -> bool {
        self.locations.send(fragment.into()).is_ok()
    }

    /// Navigates and waits for the outcome.
    pub async fn navigate(
        &self,
        fragment: &str,
    ) -> Result<NavigationOutcome, NavigationError> {
        self.router.navigate(fragment).await
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Context the registered screens were built with. Screen actions can be
    /// invoked on any screen built from it.
    pub fn context(&self) -> &ScreenContext {
        &self.context
    }

    pub fn state(&self) -> &SharedState {
        &self.context.state
    }

    pub fn shutdown(self) {
        self.listener.abort();
        self.health.abort();
        info!("[Console] shut down");
    }
}

/// Probes a protected endpoint. On failure the application stays hidden
/// behind a gate message.
async fn authenticate(api: &dyn ApiService, shell: &dyn Shell) -> Result<(), BootError> {
    match api.check_auth().await {
        Ok(_) => Ok(()),
        // A 2xx with an unexpected body still proves the credentials.
        Err(ApiError::Decode(detail)) => {
            warn!("[Console] auth check body not understood: {detail}");
            Ok(())
        }
        Err(err) if err.is_rejection() => {
            warn!("[Console] authentication rejected: {err}");
            shell.set_gate_message(AUTH_REQUIRED);
            Err(BootError::Unauthorized(err))
        }
        Err(err) => {
            warn!("[Console] backend unreachable: {err}");
            shell.set_gate_message(CONNECTION_FAILED);
            Err(BootError::Unreachable(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::commands::{self, Command};
    use crate::core::route::Route;
    use crate::core::shell::{BackendStatus, MemoryShell, Shell};
    use crate::screens::{simulator, walker};
    use crate::infra::testing::stubs::{StaticFragmentSource, StubFailure, TestApiService};

    async fn boot(
        config: ConsoleConfig,
        api: &TestApiService,
        fragments: &StaticFragmentSource,
        shell: &MemoryShell,
    ) -> Result<Console, BootError> {
        Console::boot_with(
            config,
            Arc::new(shell.clone()),
            Arc::new(api.clone()),
            Arc::new(fragments.clone()),
        )
        .await
    }

    #[tokio::test]
    async fn rejected_credentials_keep_the_app_hidden() {
        let api = TestApiService::new()
            .failing("check_auth", StubFailure::rejected(401, "Unauthorized"));
        let fragments = StaticFragmentSource::standard();
        let shell = MemoryShell::new();

        let err = boot(ConsoleConfig::default(), &api, &fragments, &shell)
            .await
            .unwrap_err();
        assert!(matches!(err, BootError::Unauthorized(_)));
        assert_eq!(shell.gate_message().as_deref(), Some(AUTH_REQUIRED));
        assert!(!shell.is_revealed());
        assert!(fragments.fetches().is_empty());
        assert_eq!(api.calls(), vec!["check_auth"]);
    }

    #[tokio::test]
    async fn unreachable_backend_reports_connection_failure() {
        let api = TestApiService::new().failing("check_auth", StubFailure::Offline);
        let fragments = StaticFragmentSource::standard();
        let shell = MemoryShell::new();

        let err = boot(ConsoleConfig::default(), &api, &fragments, &shell)
            .await
            .unwrap_err();
        assert!(matches!(err, BootError::Unreachable(_)));
        assert_eq!(shell.gate_message().as_deref(), Some(CONNECTION_FAILED));
        assert!(!shell.is_revealed());
    }

    #[tokio::test(start_paused = true)]
    async fn passing_the_gate_reveals_and_lands_on_home() {
        let api = TestApiService::new();
        let fragments = StaticFragmentSource::standard();
        let shell = MemoryShell::new();

        let console = boot(ConsoleConfig::default(), &api, &fragments, &shell)
            .await
            .unwrap();
        assert!(shell.is_revealed());
        assert_eq!(shell.gate_message(), None);
        assert_eq!(console.router().active_route(), Some(Route::HOME));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(shell.backend_status(), BackendStatus::Online);
        console.shutdown();
    }

    #[tokio::test]
    async fn configured_initial_route_is_used() {
        let api = TestApiService::new();
        let fragments = StaticFragmentSource::standard();
        let shell = MemoryShell::new();
        let config = ConsoleConfig {
            initial_route: Some("#files".into()),
            ..ConsoleConfig::default()
        };

        let console = boot(config, &api, &fragments, &shell).await.unwrap();
        assert_eq!(console.router().active_route(), Some(Route::Files));
        assert_eq!(fragments.fetches(), vec!["files".to_string()]);
        console.shutdown();
    }

    #[tokio::test]
    async fn failed_initial_navigation_still_boots() {
        let api = TestApiService::new();
        let fragments = StaticFragmentSource::new();
        let shell = MemoryShell::new();

        let console = boot(ConsoleConfig::default(), &api, &fragments, &shell)
            .await
            .unwrap();
        assert!(shell.is_revealed());
        assert_eq!(console.router().active_route(), None);
        console.shutdown();
    }

    #[tokio::test]
    async fn location_changes_reach_the_router() {
        let api = TestApiService::new();
        let fragments = StaticFragmentSource::standard();
        let shell = MemoryShell::new();

        let console = boot(ConsoleConfig::default(), &api, &fragments, &shell)
            .await
            .unwrap();
        assert!(console.set_location("#settings"));
        for _ in 0..10 {
            if console.router().active_route() == Some(Route::Settings) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(console.router().active_route(), Some(Route::Settings));
        assert_eq!(shell.field("set-auth-user").as_deref(), Some("admin"));
        console.shutdown();
    }

    async fn run(console: &Console, line: &str) {
        let command: Command = line.parse().unwrap();
        commands::run(console, command).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn actions_run_from_another_screen_leave_its_content_alone() {
        let api = TestApiService::new();
        let fragments = StaticFragmentSource::standard();
        let shell = MemoryShell::new();
        let console = boot(ConsoleConfig::default(), &api, &fragments, &shell)
            .await
            .unwrap();
        console.navigate("#settings").await.unwrap();

        run(&console, "sim start").await;
        run(&console, "walk 1.3.6.1").await;

        assert_eq!(console.router().active_route(), Some(Route::Settings));
        assert_eq!(shell.field(simulator::BADGE), None);
        assert_eq!(shell.field(simulator::LOG_AREA), None);
        assert_eq!(shell.field(walker::OUTPUT), None);
        {
            let state = console.state().read();
            assert_eq!(state.simulator.as_ref().map(|s| s.running), Some(true));
            assert_eq!(state.logs.len(), 2);
            assert!(state.walk_result.is_some());
        }

        console.navigate("#simulator").await.unwrap();
        assert_eq!(shell.field(simulator::BADGE).as_deref(), Some("RUNNING"));
        assert!(shell.field(simulator::LOG_AREA).unwrap().contains("Simulator started"));
        console.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn actions_on_the_shown_screen_render_immediately() {
        let api = TestApiService::new();
        let fragments = StaticFragmentSource::standard();
        let shell = MemoryShell::new();
        let console = boot(ConsoleConfig::default(), &api, &fragments, &shell)
            .await
            .unwrap();
        console.navigate("#walker").await.unwrap();

        run(&console, "walk 1.3.6.1").await;
        assert_eq!(shell.field(walker::COUNT).as_deref(), Some("0 items"));
        assert_eq!(console.context().shown.current(), Some(Route::Walker));
        console.shutdown();
    }
}
