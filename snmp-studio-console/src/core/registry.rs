//! Route → screen module mapping.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::lifecycle::ScreenModule;
use crate::core::route::Route;
use crate::screens::{
    DashboardScreen, FilesScreen, ScreenContext, SettingsScreen,
    SimulatorScreen, TrapsScreen, WalkerScreen,
};

/// Fixed set of screen modules keyed by [`Route`].
///
/// Routes without an entry still render their fragment; they simply have no
/// behavior to activate.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<Route, Box<dyn ScreenModule>>,
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.modules.iter().map(|(route, module)| (route, module.name())))
            .finish()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The production screen set, each screen holding its own clone of `ctx`.
    pub fn standard(ctx: &ScreenContext) -> Self {
        Self::new()
            .with(Route::Dashboard, DashboardScreen::new(ctx.clone()))
            .with(Route::Simulator, SimulatorScreen::new(ctx.clone()))
            .with(Route::Walker, WalkerScreen::new(ctx.clone()))
            .with(Route::Traps, TrapsScreen::new(ctx.clone()))
            .with(Route::Files, FilesScreen::new(ctx.clone()))
            .with(Route::Settings, SettingsScreen::new(ctx.clone()))
    }

    pub fn with(mut self, route: Route, module: impl ScreenModule + 'static) -> Self {
        self.register(route, module);
        self
    }

    /// Registers a module, replacing any previous one for the route.
    pub fn register(&mut self, route: Route, module: impl ScreenModule + 'static) {
        if let Some(previous) = self.modules.insert(route, Box::new(module)) {
            log::debug!(
                "[Registry] replaced '{}' for route {route}",
                previous.name()
            );
        }
    }

    pub fn get_mut(&mut self, route: Route) -> Option<&mut (dyn ScreenModule + 'static)> {
        self.modules.get_mut(&route).map(|module| module.as_mut())
    }

    pub fn contains(&self, route: Route) -> bool {
        self.modules.contains_key(&route)
    }

    pub fn routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.modules.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
