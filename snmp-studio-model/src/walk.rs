//! `POST /api/walk/execute` request and response.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkRequest {
    pub target: String,
    pub port: u16,
    pub community: String,
    pub oid: String,
    pub parse: bool,
    pub use_mibs: bool,
}

impl Default for WalkRequest {
    fn default() -> Self {
        Self {
            target: "127.0.0.1".to_string(),
            port: 1061,
            community: "public".to_string(),
            oid: String::new(),
            parse: true,
            use_mibs: true,
        }
    }
}

impl WalkRequest {
    /// Checks required fields and applies the parse/MIB coupling: parsed
    /// output needs symbolic names, so `parse` forces `use_mibs`.
    pub fn normalized(mut self) -> Result<Self> {
        if self.target.trim().is_empty() {
            return Err(ModelError::InvalidWalk("target is required".into()));
        }
        if self.oid.trim().is_empty() {
            return Err(ModelError::InvalidWalk("oid is required".into()));
        }
        if self.port == 0 {
            return Err(ModelError::InvalidWalk("port must be non-zero".into()));
        }
        if self.parse {
            self.use_mibs = true;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkMode {
    Raw,
    Parsed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkResponse {
    pub mode: WalkMode,
    pub count: usize,
    /// Raw mode: array of snmpwalk lines. Parsed mode: array of objects.
    pub data: serde_json::Value,
}

impl WalkResponse {
    /// Text for the output pane, driven by the server reported mode.
    pub fn render(&self) -> String {
        match (self.mode, &self.data) {
            (WalkMode::Parsed, data) => {
                serde_json::to_string_pretty(data).unwrap_or_default()
            }
            (WalkMode::Raw, serde_json::Value::Array(lines)) => lines
                .iter()
                .map(|line| match line {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            (WalkMode::Raw, serde_json::Value::String(s)) => s.clone(),
            (WalkMode::Raw, other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_forces_mib_usage() {
        let req = WalkRequest {
            oid: "1.3.6.1.2.1.1".into(),
            use_mibs: false,
            ..WalkRequest::default()
        }
        .normalized()
        .unwrap();
        assert!(req.use_mibs);
    }

    #[test]
    fn raw_walk_keeps_mib_choice() {
        let req = WalkRequest {
            oid: "1.3.6.1.2.1.1".into(),
            parse: false,
            use_mibs: false,
            ..WalkRequest::default()
        }
        .normalized()
        .unwrap();
        assert!(!req.use_mibs);
    }

    #[test]
    fn missing_oid_is_rejected() {
        assert!(WalkRequest::default().normalized().is_err());
    }

    #[test]
    fn raw_render_joins_lines() {
        let resp = WalkResponse {
            mode: WalkMode::Raw,
            count: 2,
            data: json!(["SNMPv2-MIB::sysName.0 = STRING: lab", "IF-MIB::ifNumber.0 = INTEGER: 4"]),
        };
        assert_eq!(
            resp.render(),
            "SNMPv2-MIB::sysName.0 = STRING: lab\nIF-MIB::ifNumber.0 = INTEGER: 4"
        );
    }

    #[test]
    fn parsed_render_is_pretty_json() {
        let resp: WalkResponse = serde_json::from_value(json!({
            "mode": "parsed",
            "count": 1,
            "data": [{"oid": "1.3.6.1.2.1.1.5.0", "value": "lab"}]
        }))
        .unwrap();
        assert!(resp.render().contains("\"oid\": \"1.3.6.1.2.1.1.5.0\""));
    }
}
