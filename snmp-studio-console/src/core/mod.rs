pub mod cache;
pub mod fragments;
pub mod health;
pub mod lifecycle;
pub mod registry;
pub mod route;
pub mod router;
pub mod shell;
pub mod state;

pub use cache::{CachePolicy, FragmentCache};
pub use fragments::{FragmentError, FragmentSource, HttpFragmentSource};
pub use health::HealthPoller;
pub use lifecycle::{ActiveScreen, Liveness, MIN_POLL_PERIOD, PollTask, ScreenModule};
pub use registry::ModuleRegistry;
pub use route::{Route, RouteTarget, resolve_route};
pub use router::{NavigationError, NavigationOutcome, Router, spawn_hash_listener};
pub use shell::{BackendStatus, ContentView, MemoryShell, Shell};
pub use state::{AppState, LogEntry, LogLevel, LogRing, SharedState, shared_state};
