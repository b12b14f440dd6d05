use serde::{Deserialize, Serialize};

/// `GET /api/traps/status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapReceiverStatus {
    pub running: bool,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub community: Option<String>,
}

/// Body of `POST /api/traps/start`. Unset port and community use backend
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapReceiverConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    /// Translate trap OIDs through the loaded MIBs.
    pub resolve_mibs: bool,
}

impl Default for TrapReceiverConfig {
    fn default() -> Self {
        Self {
            port: None,
            community: None,
            resolve_mibs: true,
        }
    }
}

/// A trap captured by the receiver. Varbind layout depends on whether MIB
/// resolution was enabled, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivedTrap {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub trap_type: Option<String>,
    #[serde(default)]
    pub varbinds: serde_json::Value,
}

/// `GET /api/traps/?limit=N`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivedTraps {
    pub data: Vec<ReceivedTrap>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_config_resolves_mibs_by_default() {
        let body = serde_json::to_string(&TrapReceiverConfig {
            port: Some(1162),
            ..TrapReceiverConfig::default()
        })
        .unwrap();
        assert_eq!(body, r#"{"port":1162,"resolve_mibs":true}"#);
    }
}
