use anyhow::Context;
use log::warn;
use snmp_studio_model::{MibFileList, MibReload};

use crate::core::lifecycle::{Liveness, PollTask, ScreenModule};
use crate::core::route::Route;
use crate::core::state::LogLevel;
use crate::infra::services::api::ApiResult;
use crate::screens::ScreenContext;

pub const MIB_FILES: &str = "mib-files";
pub const MIB_SUMMARY: &str = "mib-summary";

pub const NO_FILES: &str = "No MIB files uploaded.";

/// MIB file listing. Loaded once per activation, no polling.
#[derive(Debug)]
pub struct FilesScreen {
    ctx: ScreenContext,
    load: Option<PollTask>,
}

impl FilesScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self { ctx, load: None }
    }

    /// Reloads every MIB and records the outcome in the event log.
    pub async fn reload(&self) -> ApiResult<MibReload> {
        let result = self.ctx.api.reload_mibs().await;
        {
            let mut state = self.ctx.state.write();
            match &result {
                Ok(reload) => state.log(LogLevel::Success, reload.summary()),
                Err(err) => {
                    state.log(LogLevel::Error, format!("Reload failed: {}", err.detail()))
                }
            }
        }
        let reload = result?;
        self.ctx.when_shown(Route::Files, || {
            render_summary(&self.ctx, reload.loaded, reload.failed)
        });
        self.refresh_listing().await;
        Ok(reload)
    }

    /// Deletes one MIB file, then reloads so the loaded set matches the
    /// directory.
    pub async fn delete(&self, file_name: &str) -> ApiResult<MibReload> {
        self.ctx.api.delete_mib(file_name).await?;
        self.ctx
            .state
            .write()
            .log(LogLevel::Info, format!("Deleted {}", file_name.trim()));
        self.reload().await
    }

    async fn refresh_listing(&self) {
        match self.ctx.api.mib_files().await {
            Ok(files) => {
                self.ctx
                    .when_shown(Route::Files, || render_listing(&self.ctx, &files));
            }
            Err(err) => warn!("[Files] listing refresh failed: {err}"),
        }
    }
}

impl ScreenModule for FilesScreen {
    fn name(&self) -> &'static str {
        "files"
    }

    fn activate(&mut self) {
        let ctx = self.ctx.clone();
        self.load = Some(PollTask::once("files", move |liveness| {
            load_files(ctx, liveness)
        }));
    }

    fn teardown(&mut self) {
        if let Some(mut load) = self.load.take() {
            load.cancel();
        }
    }
}

async fn load_files(ctx: ScreenContext, liveness: Liveness) -> anyhow::Result<()> {
    let files = ctx.api.mib_files().await.context("listing MIB files")?;
    if liveness.while_alive(|| render_listing(&ctx, &files)).is_none() {
        return Ok(());
    }

    let status = ctx.api.mib_status().await.context("loading MIB status")?;
    liveness.while_alive(|| render_summary(&ctx, status.loaded, status.failed));
    Ok(())
}

fn render_listing(ctx: &ScreenContext, files: &MibFileList) {
    let listing = if files.mibs.is_empty() {
        NO_FILES.to_string()
    } else {
        files.mibs.join("\n")
    };
    ctx.shell.set_field(MIB_FILES, &listing);
}

fn render_summary(ctx: &ScreenContext, loaded: u32, failed: u32) {
    ctx.shell
        .set_field(MIB_SUMMARY, &format!("{loaded} loaded, {failed} failed"));
}
