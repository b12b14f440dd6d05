//! Route identifiers and location-fragment resolution.

use std::fmt;

/// A screen of the console. Closed set; each variant owns one view fragment
/// and at most one screen module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Route {
    Dashboard,
    Simulator,
    Walker,
    Traps,
    Files,
    Settings,
}

impl Route {
    /// Where an empty or missing location fragment lands.
    pub const HOME: Route = Route::Dashboard;

    pub const ALL: [Route; 6] = [
        Route::Dashboard,
        Route::Simulator,
        Route::Walker,
        Route::Traps,
        Route::Files,
        Route::Settings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Simulator => "simulator",
            Route::Walker => "walker",
            Route::Traps => "traps",
            Route::Files => "files",
            Route::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "System Overview",
            Route::Simulator => "Simulator Manager",
            Route::Walker => "Walk & Parse Studio",
            Route::Traps => "Trap Manager",
            Route::Files => "File Manager",
            Route::Settings => "Settings",
        }
    }

    pub fn from_name(name: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.name() == name)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Title shown for routes outside the known set.
pub const FALLBACK_TITLE: &str = "SNMP Studio";

/// Result of resolving a location fragment.
///
/// Unknown names are carried through untouched; the fragment fetch is what
/// rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteTarget {
    Known(Route),
    Unknown(String),
}

impl RouteTarget {
    pub fn name(&self) -> &str {
        match self {
            RouteTarget::Known(route) => route.name(),
            RouteTarget::Unknown(name) => name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            RouteTarget::Known(route) => route.title(),
            RouteTarget::Unknown(_) => FALLBACK_TITLE,
        }
    }

    pub fn route(&self) -> Option<Route> {
        match self {
            RouteTarget::Known(route) => Some(*route),
            RouteTarget::Unknown(_) => None,
        }
    }

    /// Relative resource path of the view fragment.
    pub fn fragment_path(&self) -> String {
        format!("{}.html", self.name())
    }
}

impl From<Route> for RouteTarget {
    fn from(route: Route) -> Self {
        RouteTarget::Known(route)
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strips a single leading `#` and maps the remainder to a route.
pub fn resolve_route(raw_fragment: &str) -> RouteTarget {
    let name = raw_fragment.strip_prefix('#').unwrap_or(raw_fragment);
    if name.is_empty() {
        return RouteTarget::Known(Route::HOME);
    }
    match Route::from_name(name) {
        Some(route) => RouteTarget::Known(route),
        None => RouteTarget::Unknown(name.to_string()),
    }
}
