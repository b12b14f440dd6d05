//! SNMP Studio console library
//!
//! The console drives the SNMP Studio management screens: a location
//! fragment router with a fragment cache, per-screen lifecycles that own
//! their polling timers, and the typed client for the backend API. The
//! `snmp-studio-console` binary in `src/main.rs` is a headless host for it.
//!
//! Notes
//! - The host surface is abstracted behind [`crate::core::shell::Shell`], so the
//!   same router runs against a terminal, a test double or a real view.
//! - The library is exposed mainly to enable integration testing.

pub mod app;
/// Router, cache, lifecycle and the host surface abstraction
pub mod core;
pub mod infra;
pub mod screens;

pub use app::{BootError, Console};
pub use crate::core::route::{Route, RouteTarget};
pub use crate::core::router::{NavigationError, NavigationOutcome, Router};
pub use crate::core::shell::{BackendStatus, MemoryShell, Shell};
