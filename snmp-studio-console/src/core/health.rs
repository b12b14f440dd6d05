//! Backend reachability badge.
//!
//! Started once at boot, independent of the router, and never stopped.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::lifecycle::{MIN_POLL_PERIOD, clamp_period};
use crate::core::shell::{BackendStatus, Shell};
use crate::infra::services::api::ApiService;

#[derive(Debug)]
pub struct HealthPoller;

impl HealthPoller {
    /// Probes immediately, then every `period`. Periods shorter than
    /// [`MIN_POLL_PERIOD`] are raised to it.
    pub fn spawn(
        api: Arc<dyn ApiService>,
        shell: Arc<dyn Shell>,
        period: Duration,
    ) -> JoinHandle<()> {
        let period = clamp_period(period);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = BackendStatus::Unknown;
            loop {
                interval.tick().await;
                let status = Self::probe(api.as_ref()).await;
                if status != last {
                    debug!("[Health] backend {}", status.label());
                    last = status;
                }
                shell.set_backend_status(status);
            }
        })
    }

    pub async fn probe(api: &dyn ApiService) -> BackendStatus {
        match api.meta().await {
            Ok(_) => BackendStatus::Online,
            Err(err) => {
                warn!("[Health] probe failed: {err}");
                BackendStatus::Offline
            }
        }
    }
}
