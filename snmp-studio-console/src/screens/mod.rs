//! Per-route screen behavior.
//!
//! Each screen is a [`ScreenModule`](crate::core::ScreenModule) registered
//! under its route. Screens hold a [`ScreenContext`] and nothing else that
//! outlives a navigation, apart from the poll handle they own while active.
//!
//! User actions (starting the simulator, running a walk) are async methods
//! on `&self`. They only go through the context, so a host can call them on
//! any instance built from the same context. Actions always update shared
//! state but only render while their own route is shown.

use std::sync::Arc;

use snmp_studio_config::PollSettings;

use crate::core::lifecycle::ActiveScreen;
use crate::core::route::Route;
use crate::core::shell::Shell;
use crate::core::state::SharedState;
use crate::infra::services::api::ApiService;

pub mod dashboard;
pub mod files;
pub mod settings;
pub mod simulator;
pub mod traps;
pub mod walker;

pub use dashboard::DashboardScreen;
pub use files::FilesScreen;
pub use settings::{CredentialError, SettingsScreen};
pub use simulator::SimulatorScreen;
pub use traps::TrapsScreen;
pub use walker::{ExportError, ExportFormat, WalkExport, WalkerScreen};

/// Everything a screen may touch, passed in at construction.
#[derive(Debug, Clone)]
pub struct ScreenContext {
    pub api: Arc<dyn ApiService>,
    pub shell: Arc<dyn Shell>,
    pub state: SharedState,
    pub poll: PollSettings,
    /// Route currently shown, kept up to date by the router.
    pub shown: ActiveScreen,
}

impl ScreenContext {
    pub fn new(
        api: Arc<dyn ApiService>,
        shell: Arc<dyn Shell>,
        state: SharedState,
        poll: PollSettings,
    ) -> Self {
        Self {
            api,
            shell,
            state,
            poll,
            shown: ActiveScreen::new(),
        }
    }

    /// Runs `render` only while `route` owns the content region.
    pub fn when_shown<R>(&self, route: Route, render: impl FnOnce() -> R) -> Option<R> {
        self.shown.while_showing(route, render)
    }
}
