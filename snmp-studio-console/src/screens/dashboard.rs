use anyhow::Context;

use crate::core::lifecycle::{Liveness, PollTask, ScreenModule};
use crate::screens::ScreenContext;

pub const STAT_MIBS: &str = "stat-mibs";
pub const STAT_TRAPS: &str = "stat-traps";
pub const STAT_SIMULATOR: &str = "stat-simulator";
pub const STAT_RECEIVER: &str = "stat-receiver";

/// Overview counters, refreshed while the dashboard is shown.
#[derive(Debug)]
pub struct DashboardScreen {
    ctx: ScreenContext,
    poll: Option<PollTask>,
}

impl DashboardScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self { ctx, poll: None }
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(PollTask::is_running)
    }
}

impl ScreenModule for DashboardScreen {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn activate(&mut self) {
        let ctx = self.ctx.clone();
        self.poll = Some(PollTask::spawn(
            "dashboard",
            ctx.poll.dashboard,
            move |liveness| load_stats(ctx.clone(), liveness),
        ));
    }

    fn teardown(&mut self) {
        if let Some(mut poll) = self.poll.take() {
            poll.cancel();
        }
    }
}

async fn load_stats(ctx: ScreenContext, liveness: Liveness) -> anyhow::Result<()> {
    let mibs = ctx.api.mib_status().await.context("loading MIB status")?;
    if !show(&ctx, &liveness, STAT_MIBS, &mibs.loaded.to_string()) {
        return Ok(());
    }

    let traps = ctx.api.mib_traps().await.context("loading trap definitions")?;
    if !show(&ctx, &liveness, STAT_TRAPS, &traps.traps.len().to_string()) {
        return Ok(());
    }

    let simulator = ctx
        .api
        .simulator_status()
        .await
        .context("loading simulator status")?;
    let label = if simulator.running { "Online" } else { "Offline" };
    if !show(&ctx, &liveness, STAT_SIMULATOR, label) {
        return Ok(());
    }

    let receiver = ctx
        .api
        .trap_receiver_status()
        .await
        .context("loading trap receiver status")?;
    let label = if receiver.running { "Running" } else { "Stopped" };
    show(&ctx, &liveness, STAT_RECEIVER, label);

    Ok(())
}

/// Writes one counter; `false` once the dashboard has been torn down.
fn show(ctx: &ScreenContext, liveness: &Liveness, field: &str, value: &str) -> bool {
    liveness
        .while_alive(|| ctx.shell.set_field(field, value))
        .is_some()
}
