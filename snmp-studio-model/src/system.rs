//! Backend metadata, auth probe and generic action/error bodies.

use serde::{Deserialize, Serialize};

/// `GET /api/meta`, also used as the health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// `GET /api/settings/check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCheck {
    pub status: String,
}

/// Body returned alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

impl ApiErrorBody {
    /// Extracts `detail` from an error body, falling back to the raw text
    /// when the body is not the expected JSON shape.
    pub fn detail_from(body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed.detail,
            Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
            Err(_) => body.trim().to_string(),
        }
    }
}

/// Acknowledgement returned by start/stop/save style endpoints.
///
/// The backend is loose about which keys it includes, so everything except
/// `status` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub community: Option<String>,
}

impl ActionResponse {
    /// Human readable summary: the message if present, else the status.
    pub fn summary(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prefers_json_field() {
        assert_eq!(
            ApiErrorBody::detail_from(r#"{"detail":"File not found"}"#),
            "File not found"
        );
    }

    #[test]
    fn detail_falls_back_to_text() {
        assert_eq!(
            ApiErrorBody::detail_from("Internal Server Error\n"),
            "Internal Server Error"
        );
        assert_eq!(ApiErrorBody::detail_from("  "), "Unknown error");
    }

    #[test]
    fn action_summary_uses_message_first() {
        let saved: ActionResponse = serde_json::from_str(
            r#"{"status":"saved","message":"Custom data saved"}"#,
        )
        .unwrap();
        assert_eq!(saved.summary(), "Custom data saved");

        let stopped: ActionResponse =
            serde_json::from_str(r#"{"status":"stopped"}"#).unwrap();
        assert_eq!(stopped.summary(), "stopped");
    }
}
