use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One MIB module as reported by `GET /api/mibs/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MibInfo {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub objects: u32,
    #[serde(default)]
    pub traps: u32,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/mibs/status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MibStatus {
    pub loaded: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub mibs: Vec<MibInfo>,
    #[serde(default)]
    pub errors: Vec<MibInfo>,
}

/// A NOTIFICATION-TYPE definition from a loaded MIB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapDefinition {
    pub name: String,
    pub oid: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `GET /api/mibs/traps`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapList {
    pub traps: Vec<TrapDefinition>,
}

/// `GET /api/files/mibs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MibFileList {
    pub mibs: Vec<String>,
}

/// Checks that `name` is a bare file name inside the MIB directory.
pub fn validate_mib_file_name(name: &str) -> Result<&str> {
    let name = name.trim();
    let bare = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if bare {
        Ok(name)
    } else {
        Err(ModelError::InvalidFileName(name.to_string()))
    }
}

/// `POST /api/mibs/reload`. Reloading also restarts a running simulator and
/// trap receiver; the two messages say what happened to each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MibReload {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub loaded: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub simulator: Option<String>,
    #[serde(default)]
    pub trap_receiver: Option<String>,
}

impl MibReload {
    pub fn summary(&self) -> String {
        format!("Reloaded: {} loaded, {} failed", self.loaded, self.failed)
    }
}
