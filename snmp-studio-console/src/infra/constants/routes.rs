//! Backend API paths consumed by the console.
//!
//! Paths are relative to the configured backend origin. None of them are
//! versioned.

/// Service identity and credential endpoints
pub mod system {
    /// Lightweight identity document, also used as the health probe
    pub const META: &str = "/api/meta";
}

pub mod settings {
    /// Protected endpoint used as the authentication gate
    pub const CHECK: &str = "/api/settings/check";
    /// Credential update
    pub const AUTH: &str = "/api/settings/auth";
}

pub mod mibs {
    /// Loaded/failed MIB summary
    pub const STATUS: &str = "/api/mibs/status";
    /// Trap definitions across loaded MIBs
    pub const TRAPS: &str = "/api/mibs/traps";
    /// Reload every MIB (POST)
    pub const RELOAD: &str = "/api/mibs/reload";
    /// Parent of `/api/mibs/{file}`, which deletes one file (DELETE)
    pub const FILE_BASE: &str = "/api/mibs/";
}

pub mod files {
    /// MIB files present in the backend's MIB directory
    pub const MIBS: &str = "/api/files/mibs";
}

pub mod simulator {
    pub const STATUS: &str = "/api/simulator/status";
    pub const START: &str = "/api/simulator/start";
    pub const STOP: &str = "/api/simulator/stop";
    /// Custom OID overrides, read with GET and replaced with POST
    pub const DATA: &str = "/api/simulator/data";
}

pub mod traps {
    /// Trap receiver status
    pub const STATUS: &str = "/api/traps/status";
    pub const START: &str = "/api/traps/start";
    pub const STOP: &str = "/api/traps/stop";
    /// Received traps (GET with `limit`) and clearing them (DELETE)
    pub const RECEIVED: &str = "/api/traps/";
}

pub mod walk {
    pub const EXECUTE: &str = "/api/walk/execute";
}
