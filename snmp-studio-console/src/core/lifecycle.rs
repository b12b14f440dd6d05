//! Screen module contract and the owned polling primitive.
//!
//! A screen that polls must start its [`PollTask`] inside
//! [`ScreenModule::activate`], keep it on `self`, and cancel it in
//! [`ScreenModule::teardown`]. Cancelling before the first tick is allowed.
//! Once cancelled, the callback never runs again, and callbacks already
//! suspended on I/O observe [`Liveness::is_alive`] returning `false`.
//!
//! Writes that must not land after teardown go through
//! [`Liveness::while_alive`]. The check and the write happen under one lock
//! that cancellation also takes, so this holds on a multi-threaded runtime.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::route::Route;

/// Per-route unit of screen behavior. Both lifecycle hooks are optional.
pub trait ScreenModule: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Called after the screen's fragment has been injected.
    fn activate(&mut self) {}

    /// Called exactly once before another screen renders. Must not block on
    /// network I/O.
    fn teardown(&mut self) {}
}

/// Smallest period a [`PollTask`] or health poller will tick at. Shorter
/// periods, including zero, are raised to this.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(100);

pub(crate) fn clamp_period(period: Duration) -> Duration {
    if period < MIN_POLL_PERIOD {
        log::warn!("poll period {period:?} raised to {MIN_POLL_PERIOD:?}");
        MIN_POLL_PERIOD
    } else {
        period
    }
}

/// Shared flag telling a poll callback whether its owner is still active.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<Mutex<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        *self.0.lock()
    }

    /// Runs `write` only if still alive. Cancellation waits for a running
    /// `write` to finish, so nothing it does can land after teardown.
    pub fn while_alive<R>(&self, write: impl FnOnce() -> R) -> Option<R> {
        let alive = self.0.lock();
        if *alive { Some(write()) } else { None }
    }

    pub(crate) fn kill(&self) {
        *self.0.lock() = false;
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Route whose screen currently owns the content region.
///
/// The router updates it on every activation and teardown. Screen actions
/// started by the host, rather than by the screen's own polling, render
/// through [`ActiveScreen::while_showing`] so they never write into another
/// screen's content.
#[derive(Debug, Clone, Default)]
pub struct ActiveScreen(Arc<Mutex<Option<Route>>>);

impl ActiveScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        *self.0.lock()
    }

    pub fn is_showing(&self, route: Route) -> bool {
        self.current() == Some(route)
    }

    /// Runs `write` only while `route` is shown. The router cannot switch
    /// screens until it returns.
    pub fn while_showing<R>(&self, route: Route, write: impl FnOnce() -> R) -> Option<R> {
        let shown = self.0.lock();
        if *shown == Some(route) {
            Some(write())
        } else {
            None
        }
    }

    pub(crate) fn set(&self, route: Option<Route>) {
        *self.0.lock() = route;
    }
}

/// Recurring background operation owned by an active screen.
///
/// The callback runs immediately and then once per `period`, which is never
/// shorter than [`MIN_POLL_PERIOD`]. Errors are logged and the loop keeps
/// going. Dropping the task cancels it.
#[derive(Debug)]
pub struct PollTask {
    label: &'static str,
    liveness: Liveness,
    handle: Option<JoinHandle<()>>,
}

impl PollTask {
    pub fn spawn<F, Fut>(label: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut(Liveness) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let period = clamp_period(period);
        let liveness = Liveness::new();
        let task_liveness = liveness.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !task_liveness.is_alive() {
                    break;
                }
                if let Err(err) = tick(task_liveness.clone()).await {
                    log::warn!("[Poll:{label}] tick failed: {err:#}");
                }
            }
        });

        log::debug!("[Poll:{label}] started, every {period:?}");
        Self {
            label,
            liveness,
            handle: Some(handle),
        }
    }

    /// Runs `work` a single time under the same cancellation rules.
    pub fn once<F, Fut>(label: &'static str, work: F) -> Self
    where
        F: FnOnce(Liveness) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let liveness = Liveness::new();
        let work = work(liveness.clone());
        let handle = tokio::spawn(async move {
            if let Err(err) = work.await {
                log::warn!("[Poll:{label}] load failed: {err:#}");
            }
        });

        Self {
            label,
            liveness,
            handle: Some(handle),
        }
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn cancel(&mut self) {
        self.liveness.kill();
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("[Poll:{}] cancelled", self.label);
        }
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
