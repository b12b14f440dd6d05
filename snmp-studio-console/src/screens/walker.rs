//! SNMP walk runner and result export.
//!
//! The walker has no background work, so it relies on the default lifecycle
//! hooks. The last successful result lives in the shared state so an export
//! still works after navigating away and back. Output is only rendered while
//! the walker is shown, including for a walk that resolves after leaving it.

use log::warn;
use serde_json::Value;
use snmp_studio_model::{WalkRequest, WalkResponse};
use thiserror::Error;

use crate::core::lifecycle::ScreenModule;
use crate::core::route::Route;
use crate::infra::services::api::ApiResult;
use crate::screens::ScreenContext;

pub const OUTPUT: &str = "walk-output";
pub const COUNT: &str = "walk-count";

pub const NO_CSV_DATA: &str = "No CSV compatible data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export!")]
    NoData,

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("export buffer error: {0}")]
    Buffer(String),
}

/// A rendered export ready to be saved by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkExport {
    pub format: ExportFormat,
    pub file_name: String,
    pub content: String,
}

#[derive(Debug)]
pub struct WalkerScreen {
    ctx: ScreenContext,
}

impl WalkerScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self { ctx }
    }

    /// Runs the walk and renders its output. Parsed output needs MIB names,
    /// so `parse` forces `use_mibs` before the request is sent.
    pub async fn execute(&self, request: WalkRequest) -> ApiResult<WalkResponse> {
        let mut request = request;
        if request.parse {
            request.use_mibs = true;
        }

        self.render(|| self.ctx.shell.set_field(OUTPUT, "Walking..."));
        match self.ctx.api.execute_walk(&request).await {
            Ok(response) => {
                self.ctx.state.write().walk_result = Some(response.data.clone());
                self.render(|| {
                    self.ctx
                        .shell
                        .set_field(COUNT, &format!("{} items", response.count));
                    self.ctx.shell.set_field(OUTPUT, &response.render());
                });
                Ok(response)
            }
            Err(err) => {
                warn!("[Walker] walk failed: {err}");
                self.ctx.state.write().walk_result = None;
                self.render(|| {
                    self.ctx
                        .shell
                        .set_field(OUTPUT, &format!("Error: {}", err.detail()));
                    self.ctx.shell.set_field(COUNT, "0 items");
                });
                Err(err)
            }
        }
    }

    fn render(&self, write: impl FnOnce()) {
        self.ctx.when_shown(Route::Walker, write);
    }

    pub fn export(&self, format: ExportFormat) -> Result<WalkExport, ExportError> {
        let data = self
            .ctx
            .state
            .read()
            .walk_result
            .clone()
            .ok_or(ExportError::NoData)?;

        let content = match format {
            ExportFormat::Json => serde_json::to_string_pretty(&data)
                .map_err(|err| ExportError::Buffer(err.to_string()))?,
            ExportFormat::Csv => to_csv(&data)?,
        };

        Ok(WalkExport {
            format,
            file_name: format!(
                "snmp_export_{}.{}",
                chrono::Utc::now().timestamp_millis(),
                format.extension()
            ),
            content,
        })
    }
}

impl ScreenModule for WalkerScreen {
    fn name(&self) -> &'static str {
        "walker"
    }
}

/// Header is the union of object keys in first-seen order; every cell is
/// quoted. Nested values are written as JSON text.
pub fn to_csv(data: &Value) -> Result<String, ExportError> {
    let rows = match data {
        Value::Array(rows) if !rows.is_empty() => rows,
        _ => return Ok(NO_CSV_DATA.to_string()),
    };

    let mut keys: Vec<&str> = Vec::new();
    for row in rows {
        if let Value::Object(fields) = row {
            for key in fields.keys() {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&keys)?;
    for row in rows {
        writer.write_record(keys.iter().map(|key| cell(row.get(*key))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    let text =
        String::from_utf8(bytes).map_err(|err| ExportError::Buffer(err.to_string()))?;
    Ok(text.trim_end_matches('\n').to_string())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use snmp_studio_config::PollSettings;
    use snmp_studio_model::WalkMode;

    use super::*;
    use crate::core::shell::{MemoryShell, Shell};
    use crate::core::state::shared_state;
    use crate::infra::testing::stubs::{StubFailure, TestApiService};

    fn walker(api: &TestApiService, shell: &MemoryShell) -> WalkerScreen {
        let ctx = ScreenContext::new(
            Arc::new(api.clone()),
            Arc::new(shell.clone()),
            shared_state(),
            PollSettings::default(),
        );
        ctx.shown.set(Some(Route::Walker));
        WalkerScreen::new(ctx)
    }

    fn request() -> WalkRequest {
        WalkRequest {
            oid: "1.3.6.1.2.1.1".into(),
            parse: false,
            use_mibs: false,
            ..WalkRequest::default()
        }
    }

    #[test]
    fn csv_header_is_key_union_in_first_seen_order() {
        let data = json!([
            {"oid": "1.3.6.1.2.1.1.1.0", "value": "Linux \"lab\" box"},
            {"oid": "1.3.6.1.2.1.1.3.0", "type": "Timeticks", "value": 4200},
            {"oid": "1.3.6.1.2.1.1.9.1.2.1", "value": {"index": 1}},
        ]);
        let csv = to_csv(&data).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], r#""oid","value","type""#);
        assert_eq!(lines[1], r#""1.3.6.1.2.1.1.1.0","Linux ""lab"" box","""#);
        assert_eq!(lines[2], r#""1.3.6.1.2.1.1.3.0","4200","Timeticks""#);
        assert_eq!(lines[3], r#""1.3.6.1.2.1.1.9.1.2.1","{""index"":1}","""#);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn csv_of_nothing_is_a_notice() {
        assert_eq!(to_csv(&json!([])).unwrap(), NO_CSV_DATA);
        assert_eq!(to_csv(&json!("raw text")).unwrap(), NO_CSV_DATA);
    }

    #[tokio::test]
    async fn raw_walk_renders_lines_and_keeps_result_for_export() {
        let api = TestApiService::new().with_walk_response(WalkResponse {
            mode: WalkMode::Raw,
            count: 2,
            data: json!(["SNMPv2-MIB::sysName.0 = lab", "SNMPv2-MIB::sysLocation.0 = rack 4"]),
        });
        let shell = MemoryShell::new();
        let walker = walker(&api, &shell);

        walker.execute(request()).await.unwrap();
        assert_eq!(shell.field(COUNT).as_deref(), Some("2 items"));
        assert_eq!(
            shell.field(OUTPUT).as_deref(),
            Some("SNMPv2-MIB::sysName.0 = lab\nSNMPv2-MIB::sysLocation.0 = rack 4")
        );

        let export = walker.export(ExportFormat::Json).unwrap();
        assert!(export.file_name.starts_with("snmp_export_"));
        assert!(export.file_name.ends_with(".json"));
        assert!(export.content.contains("rack 4"));
    }

    #[tokio::test]
    async fn parse_forces_mib_resolution() {
        let api = TestApiService::new();
        let shell = MemoryShell::new();
        walker(&api, &shell)
            .execute(WalkRequest {
                parse: true,
                use_mibs: false,
                ..request()
            })
            .await
            .unwrap();
        assert!(api.walk_requests()[0].use_mibs);
    }

    #[tokio::test]
    async fn failure_renders_detail_and_clears_last_result() {
        let api = TestApiService::new();
        let shell = MemoryShell::new();
        let walker = walker(&api, &shell);
        walker.execute(request()).await.unwrap();
        assert!(walker.export(ExportFormat::Csv).is_ok());

        api.set_failure("execute_walk", StubFailure::rejected(504, "Timeout"));
        assert!(walker.execute(request()).await.is_err());
        assert_eq!(shell.field(OUTPUT).as_deref(), Some("Error: Timeout"));
        assert_eq!(shell.field(COUNT).as_deref(), Some("0 items"));
        assert!(matches!(
            walker.export(ExportFormat::Json),
            Err(ExportError::NoData)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn walk_resolving_after_leaving_keeps_the_result_but_renders_nothing() {
        let api = TestApiService::new()
            .with_walk_response(WalkResponse {
                mode: WalkMode::Raw,
                count: 1,
                data: json!(["SNMPv2-MIB::sysName.0 = lab"]),
            })
            .with_latency(std::time::Duration::from_secs(2));
        let shell = MemoryShell::new();
        let screen = walker(&api, &shell);
        let shown = screen.ctx.shown.clone();

        let walk = screen.execute(request());
        let leave = async {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            shown.set(Some(Route::Dashboard));
        };
        let (result, ()) = tokio::join!(walk, leave);

        assert_eq!(result.unwrap().count, 1);
        assert_eq!(shell.field(OUTPUT).as_deref(), Some("Walking..."));
        assert_eq!(shell.field(COUNT), None);
        assert!(screen.ctx.state.read().walk_result.is_some());
    }
}
