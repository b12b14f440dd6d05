//! Simulator control screen.
//!
//! Shows the cached simulator snapshot and event log as soon as it is
//! activated, then refreshes the status every poll period. Start, stop and
//! custom data edits append to the shared event log so the history survives
//! navigating away. Actions run from another screen still update the log and
//! the cached snapshot, which are rendered on the next activation.

use std::time::Duration;

use anyhow::Context;
use log::{debug, warn};
use snmp_studio_model::{
    ActionResponse, CustomData, SimulatorConfig, SimulatorStatus,
};

use crate::core::lifecycle::{Liveness, PollTask, ScreenModule};
use crate::core::route::Route;
use crate::core::state::LogLevel;
use crate::infra::services::api::{ApiError, ApiResult};
use crate::screens::ScreenContext;

pub const LOG_AREA: &str = "sim-log-area";
pub const CUSTOM_DATA_EDITOR: &str = "custom-data-editor";
pub const BADGE: &str = "sim-badge";
pub const STATE_TEXT: &str = "sim-state-text";
pub const DETAIL_TEXT: &str = "sim-detail-text";

pub const EMPTY_LOG: &str = "Waiting for events...";

/// Pause between stopping and starting again on restart.
pub const RESTART_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct SimulatorScreen {
    ctx: ScreenContext,
    poll: Option<PollTask>,
    custom_data: Option<PollTask>,
}

impl SimulatorScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            poll: None,
            custom_data: None,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(PollTask::is_running)
    }

    pub async fn start(
        &self,
        port: u16,
        community: &str,
    ) -> ApiResult<ActionResponse> {
        self.log(LogLevel::Info, format!("Starting simulator on Port {port}..."));
        let config = SimulatorConfig {
            port: Some(port),
            community: Some(community.to_string()),
        };
        let result = self.ctx.api.start_simulator(&config).await;
        self.report(&result, "Start");
        self.refresh().await;
        result
    }

    pub async fn stop(&self) -> ApiResult<ActionResponse> {
        self.log(LogLevel::Info, "Stopping simulator...");
        let result = self.ctx.api.stop_simulator().await;
        self.report(&result, "Stop");
        self.refresh().await;
        result
    }

    /// Stops, waits [`RESTART_DELAY`], then starts with the given settings.
    pub async fn restart(
        &self,
        port: u16,
        community: &str,
    ) -> ApiResult<ActionResponse> {
        self.log(LogLevel::Info, "Restarting...");
        self.stop().await?;
        tokio::time::sleep(RESTART_DELAY).await;
        self.start(port, community).await
    }

    /// Validates the editor text as a JSON object before sending it.
    pub async fn save_custom_data(&self, text: &str) -> ApiResult<ActionResponse> {
        let data = match CustomData::parse(text) {
            Ok(data) => data,
            Err(err) => {
                self.log(LogLevel::Error, format!("Failed to save custom data: {err}"));
                return Err(ApiError::Invalid(err));
            }
        };

        let result = self.ctx.api.save_simulator_custom_data(&data).await;
        match &result {
            Ok(response) => self.log(
                LogLevel::Success,
                format!("Custom data saved: {}", response.summary()),
            ),
            Err(err) => self.log(
                LogLevel::Error,
                format!("Failed to save custom data: {}", err.detail()),
            ),
        }
        result
    }

    /// Fetches the status once and renders it if the simulator screen is
    /// shown; failures are only logged.
    pub async fn refresh(&self) {
        match self.ctx.api.simulator_status().await {
            Ok(status) => {
                self.ctx.state.write().simulator = Some(status.clone());
                self.ctx
                    .when_shown(Route::Simulator, || render_status(&self.ctx, &status));
            }
            Err(err) => warn!("[Simulator] status refresh failed: {err}"),
        }
    }

    fn report(&self, result: &ApiResult<ActionResponse>, action: &str) {
        match result {
            Ok(response) => self.log(LogLevel::Success, response.summary().to_string()),
            Err(err) => {
                self.log(LogLevel::Error, format!("{action} failed: {}", err.detail()))
            }
        }
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.ctx.state.write().log(level, message);
        self.ctx.when_shown(Route::Simulator, || render_log(&self.ctx));
    }
}

impl ScreenModule for SimulatorScreen {
    fn name(&self) -> &'static str {
        "simulator"
    }

    fn activate(&mut self) {
        self.teardown();

        render_log(&self.ctx);
        let cached = self.ctx.state.read().simulator.clone();
        render_status(&self.ctx, &cached.unwrap_or_default());

        let ctx = self.ctx.clone();
        self.custom_data = Some(PollTask::once("simulator-data", move |liveness| {
            load_custom_data(ctx, liveness)
        }));

        let ctx = self.ctx.clone();
        self.poll = Some(PollTask::spawn(
            "simulator",
            ctx.poll.simulator,
            move |liveness| fetch_status(ctx.clone(), liveness),
        ));
    }

    fn teardown(&mut self) {
        if let Some(mut poll) = self.poll.take() {
            poll.cancel();
        }
        if let Some(mut load) = self.custom_data.take() {
            load.cancel();
        }
    }
}

fn render_log(ctx: &ScreenContext) {
    let text = {
        let state = ctx.state.read();
        if state.logs.is_empty() {
            EMPTY_LOG.to_string()
        } else {
            state
                .logs
                .iter()
                .map(|entry| entry.render())
                .collect::<Vec<_>>()
                .join("\n")
        }
    };
    ctx.shell.set_field(LOG_AREA, &text);
}

fn render_status(ctx: &ScreenContext, status: &SimulatorStatus) {
    let (badge, state) = if status.running {
        ("RUNNING", "Online")
    } else {
        ("STOPPED", "Offline")
    };
    ctx.shell.set_field(BADGE, badge);
    ctx.shell.set_field(STATE_TEXT, state);
    ctx.shell.set_field(DETAIL_TEXT, &status.describe());
}

async fn fetch_status(ctx: ScreenContext, liveness: Liveness) -> anyhow::Result<()> {
    let status = ctx
        .api
        .simulator_status()
        .await
        .context("loading simulator status")?;
    let stored = liveness.while_alive(|| {
        ctx.state.write().simulator = Some(status.clone());
        render_status(&ctx, &status);
    });
    if stored.is_none() {
        debug!("[Simulator] dropping status from a torn down screen");
    }
    Ok(())
}

async fn load_custom_data(ctx: ScreenContext, liveness: Liveness) -> anyhow::Result<()> {
    let text = match ctx.api.simulator_custom_data().await {
        Ok(data) => data.to_pretty(),
        Err(err) => {
            warn!("[Simulator] failed to load custom data: {err}");
            "{}".to_string()
        }
    };
    liveness.while_alive(|| ctx.shell.set_field(CUSTOM_DATA_EDITOR, &text));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use snmp_studio_config::PollSettings;

    use super::*;
    use crate::core::shell::{MemoryShell, Shell};
    use crate::core::state::{SharedState, shared_state};
    use crate::infra::testing::stubs::{StubFailure, TestApiService};

    fn context(api: &TestApiService, shell: &MemoryShell, state: &SharedState) -> ScreenContext {
        let ctx = ScreenContext::new(
            Arc::new(api.clone()),
            Arc::new(shell.clone()),
            state.clone(),
            PollSettings::default(),
        );
        ctx.shown.set(Some(Route::Simulator));
        ctx
    }

    #[tokio::test(start_paused = true)]
    async fn activation_renders_cached_state_before_fetching() {
        let api = TestApiService::new().with_latency(Duration::from_secs(2));
        let shell = MemoryShell::new();
        let state = shared_state();
        state.write().simulator = Some(SimulatorStatus {
            running: true,
            pid: Some(7),
            port: Some(1061),
            community: Some("public".into()),
        });
        state.write().log(LogLevel::Info, "earlier event");

        let mut screen = SimulatorScreen::new(context(&api, &shell, &state));
        screen.activate();

        assert_eq!(shell.field(BADGE).as_deref(), Some("RUNNING"));
        assert!(shell.field(LOG_AREA).unwrap().ends_with("earlier event"));
        screen.teardown();
    }

    #[tokio::test(start_paused = true)]
    async fn empty_log_shows_placeholder_and_editor_falls_back() {
        let api = TestApiService::new()
            .failing("simulator_custom_data", StubFailure::rejected(500, "boom"));
        let shell = MemoryShell::new();
        let state = shared_state();
        let mut screen = SimulatorScreen::new(context(&api, &shell, &state));

        screen.activate();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(shell.field(LOG_AREA).as_deref(), Some(EMPTY_LOG));
        assert_eq!(shell.field(CUSTOM_DATA_EDITOR).as_deref(), Some("{}"));
        assert_eq!(shell.field(STATE_TEXT).as_deref(), Some("Offline"));
        screen.teardown();
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_status_is_discarded_after_teardown() {
        let api = TestApiService::new()
            .with_simulator(SimulatorStatus {
                running: true,
                ..SimulatorStatus::default()
            })
            .with_latency(Duration::from_secs(2));
        let shell = MemoryShell::new();
        let state = shared_state();
        let mut screen = SimulatorScreen::new(context(&api, &shell, &state));

        screen.activate();
        tokio::time::sleep(Duration::from_secs(1)).await;
        screen.teardown();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(api.call_count("simulator_status"), 1);
        assert!(state.read().simulator.is_none());
        assert_eq!(shell.field(BADGE).as_deref(), Some("STOPPED"));
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_logged_and_refresh_status() {
        let api = TestApiService::new();
        let shell = MemoryShell::new();
        let state = shared_state();
        let screen = SimulatorScreen::new(context(&api, &shell, &state));

        screen.start(2161, "private").await.unwrap();
        assert_eq!(state.read().simulator.as_ref().map(|s| s.running), Some(true));
        assert_eq!(shell.field(BADGE).as_deref(), Some("RUNNING"));

        screen.stop().await.unwrap();
        assert_eq!(shell.field(BADGE).as_deref(), Some("STOPPED"));

        let messages: Vec<_> = state
            .read()
            .logs
            .iter()
            .map(|entry| entry.message.clone())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Starting simulator on Port 2161...",
                "Simulator started",
                "Stopping simulator...",
                "Simulator stopped",
            ]
        );
        assert_eq!(
            api.started_configs(),
            vec![SimulatorConfig {
                port: Some(2161),
                community: Some("private".into()),
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restart_waits_between_stop_and_start() {
        let api = TestApiService::new();
        let shell = MemoryShell::new();
        let state = shared_state();
        let screen = SimulatorScreen::new(context(&api, &shell, &state));

        let started = tokio::time::Instant::now();
        screen.restart(1061, "public").await.unwrap();
        assert!(started.elapsed() >= RESTART_DELAY);
        assert_eq!(api.call_count("stop_simulator"), 1);
        assert_eq!(api.call_count("start_simulator"), 1);
    }

    #[tokio::test]
    async fn invalid_custom_data_is_not_sent() {
        let api = TestApiService::new();
        let shell = MemoryShell::new();
        let state = shared_state();
        let screen = SimulatorScreen::new(context(&api, &shell, &state));

        let err = screen.save_custom_data("[1, 2]").await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
        assert_eq!(api.call_count("save_simulator_custom_data"), 0);
        assert_eq!(state.read().logs.len(), 1);

        screen
            .save_custom_data(r#"{"1.3.6.1.2.1.1.5.0": "lab-router"}"#)
            .await
            .unwrap();
        assert!(api.custom_data().0.contains_key("1.3.6.1.2.1.1.5.0"));
    }

    #[tokio::test(start_paused = true)]
    async fn actions_from_another_screen_only_update_state() {
        let api = TestApiService::new();
        let shell = MemoryShell::new();
        let state = shared_state();
        let ctx = context(&api, &shell, &state);
        ctx.shown.set(Some(Route::Settings));
        let screen = SimulatorScreen::new(ctx);

        screen.start(1061, "public").await.unwrap();

        assert_eq!(state.read().simulator.as_ref().map(|s| s.running), Some(true));
        assert_eq!(state.read().logs.len(), 2);
        assert_eq!(shell.field(BADGE), None);
        assert_eq!(shell.field(LOG_AREA), None);
    }
}
