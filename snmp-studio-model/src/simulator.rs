//! SNMP agent simulator status and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// `GET /api/simulator/status`
///
/// Port, pid and community are only reported while the agent runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorStatus {
    pub running: bool,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub community: Option<String>,
}

impl SimulatorStatus {
    pub fn describe(&self) -> String {
        if !self.running {
            return "Service is stopped.".to_string();
        }
        format!(
            "Listening on UDP {} | Community: {} | PID: {}",
            self.port.map(|p| p.to_string()).unwrap_or_else(|| "?".into()),
            self.community.as_deref().unwrap_or("?"),
            self.pid.map(|p| p.to_string()).unwrap_or_else(|| "?".into()),
        )
    }
}

/// Body of `POST /api/simulator/start`. Missing fields use backend defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
}

/// User supplied OID overrides served by the simulator.
///
/// Always a JSON object on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomData(pub serde_json::Map<String, serde_json::Value>);

impl CustomData {
    /// Parses editor text, rejecting anything that is not a JSON object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        match value {
            serde_json::Value::Object(map) => Ok(Self(map)),
            other => Err(ModelError::InvalidCustomData(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".into())
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
