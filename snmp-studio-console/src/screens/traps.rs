use anyhow::Context;
use log::warn;
use snmp_studio_model::{
    ActionResponse, ReceivedTrap, TrapReceiverConfig, TrapReceiverStatus,
};

use crate::core::lifecycle::{Liveness, PollTask, ScreenModule};
use crate::core::route::Route;
use crate::infra::services::api::ApiResult;
use crate::screens::ScreenContext;

pub const STATUS: &str = "trap-status";
pub const COUNT: &str = "trap-count";
pub const TABLE: &str = "trap-table";

pub const NO_TRAPS: &str = "No traps received.";

/// Received traps requested per refresh.
pub const RECEIVED_LIMIT: usize = 50;

/// Trap receiver monitor.
#[derive(Debug)]
pub struct TrapsScreen {
    ctx: ScreenContext,
    poll: Option<PollTask>,
}

impl TrapsScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self { ctx, poll: None }
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(PollTask::is_running)
    }

    /// Starts the receiver, then shows its new status.
    pub async fn start(&self, config: &TrapReceiverConfig) -> ApiResult<ActionResponse> {
        let response = self.ctx.api.start_trap_receiver(config).await?;
        self.refresh_status().await;
        Ok(response)
    }

    pub async fn stop(&self) -> ApiResult<ActionResponse> {
        let response = self.ctx.api.stop_trap_receiver().await?;
        self.refresh_status().await;
        Ok(response)
    }

    /// Clears the received list on the backend and re-renders it.
    pub async fn clear(&self) -> ApiResult<ActionResponse> {
        let response = self.ctx.api.clear_traps().await?;
        self.ctx.when_shown(Route::Traps, || render_traps(&self.ctx, &[]));
        Ok(response)
    }

    async fn refresh_status(&self) {
        match self.ctx.api.trap_receiver_status().await {
            Ok(status) => {
                self.ctx
                    .when_shown(Route::Traps, || render_status(&self.ctx, &status));
            }
            Err(err) => warn!("[Traps] status refresh failed: {err}"),
        }
    }
}

impl ScreenModule for TrapsScreen {
    fn name(&self) -> &'static str {
        "traps"
    }

    fn activate(&mut self) {
        let ctx = self.ctx.clone();
        self.poll = Some(PollTask::spawn("traps", ctx.poll.traps, move |liveness| {
            refresh(ctx.clone(), liveness)
        }));
    }

    fn teardown(&mut self) {
        if let Some(mut poll) = self.poll.take() {
            poll.cancel();
        }
    }
}

async fn refresh(ctx: ScreenContext, liveness: Liveness) -> anyhow::Result<()> {
    let status = ctx
        .api
        .trap_receiver_status()
        .await
        .context("loading trap receiver status")?;
    if liveness.while_alive(|| render_status(&ctx, &status)).is_none() {
        return Ok(());
    }

    let received = ctx
        .api
        .received_traps(RECEIVED_LIMIT)
        .await
        .context("loading received traps")?;
    liveness.while_alive(|| render_traps(&ctx, &received.data));
    Ok(())
}

fn render_status(ctx: &ScreenContext, status: &TrapReceiverStatus) {
    let label = if status.running { "RUNNING" } else { "STOPPED" };
    ctx.shell.set_field(STATUS, label);
}

fn render_traps(ctx: &ScreenContext, traps: &[ReceivedTrap]) {
    ctx.shell.set_field(COUNT, &traps.len().to_string());
    if traps.is_empty() {
        ctx.shell.set_field(TABLE, NO_TRAPS);
        return;
    }
    let rows = traps
        .iter()
        .map(|trap| {
            format!(
                "{}  {}  {}",
                trap.timestamp.as_deref().unwrap_or("-"),
                trap.source.as_deref().unwrap_or("-"),
                trap.trap_type.as_deref().unwrap_or("Unknown"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    ctx.shell.set_field(TABLE, &rows);
}
