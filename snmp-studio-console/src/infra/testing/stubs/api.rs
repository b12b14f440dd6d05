use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use snmp_studio_model::{
    ActionResponse, AuthCheck, AuthUpdate, CustomData, Meta, MibFileList,
    MibReload, MibStatus, ReceivedTrap, ReceivedTraps, SimulatorConfig,
    SimulatorStatus, TrapList, TrapReceiverConfig, TrapReceiverStatus,
    WalkMode, WalkRequest, WalkResponse, validate_mib_file_name,
};

use crate::infra::services::api::{ApiError, ApiResult, ApiService};

/// How a stubbed call fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubFailure {
    /// Backend answered with a non-2xx status.
    Rejected { status: u16, detail: String },
    /// Backend unreachable.
    Offline,
}

impl StubFailure {
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        StubFailure::Rejected {
            status,
            detail: detail.into(),
        }
    }

    fn to_error(&self) -> ApiError {
        match self {
            StubFailure::Rejected { status, detail } => ApiError::Status {
                status: *status,
                detail: detail.clone(),
            },
            StubFailure::Offline => ApiError::Transport(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }
}

#[derive(Debug)]
struct InnerApiState {
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, StubFailure>,
    latency: Option<Duration>,
    meta: Meta,
    mib_status: MibStatus,
    trap_list: TrapList,
    mib_files: MibFileList,
    simulator: SimulatorStatus,
    custom_data: CustomData,
    receiver: TrapReceiverStatus,
    receiver_starts: Vec<TrapReceiverConfig>,
    received: Vec<ReceivedTrap>,
    walk_response: Option<WalkResponse>,
    walk_requests: Vec<WalkRequest>,
    started: Vec<SimulatorConfig>,
    credential_updates: Vec<AuthUpdate>,
}

/// Scriptable [`ApiService`] recording every call by method name.
///
/// Clones share state, so a test can keep one handle while the screens own
/// another.
#[derive(Debug, Clone)]
pub struct TestApiService {
    inner: Arc<Mutex<InnerApiState>>,
}

impl Default for TestApiService {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApiService {
    pub fn new() -> Self {
        let inner = InnerApiState {
            calls: Vec::new(),
            failures: HashMap::new(),
            latency: None,
            meta: Meta {
                name: "SNMP Studio".into(),
                version: "test".into(),
                author: None,
            },
            mib_status: MibStatus::default(),
            trap_list: TrapList::default(),
            mib_files: MibFileList::default(),
            simulator: SimulatorStatus::default(),
            custom_data: CustomData::default(),
            receiver: TrapReceiverStatus::default(),
            receiver_starts: Vec::new(),
            received: Vec::new(),
            walk_response: None,
            walk_requests: Vec::new(),
            started: Vec::new(),
            credential_updates: Vec::new(),
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn with_mib_status(self, status: MibStatus) -> Self {
        self.inner.lock().mib_status = status;
        self
    }

    pub fn with_trap_list(self, traps: TrapList) -> Self {
        self.inner.lock().trap_list = traps;
        self
    }

    pub fn with_mib_files<I, S>(self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.lock().mib_files = MibFileList {
            mibs: files.into_iter().map(Into::into).collect(),
        };
        self
    }

    pub fn with_simulator(self, status: SimulatorStatus) -> Self {
        self.set_simulator(status);
        self
    }

    pub fn with_custom_data(self, data: CustomData) -> Self {
        self.inner.lock().custom_data = data;
        self
    }

    pub fn with_receiver(self, status: TrapReceiverStatus) -> Self {
        self.inner.lock().receiver = status;
        self
    }

    pub fn with_received(self, traps: Vec<ReceivedTrap>) -> Self {
        self.inner.lock().received = traps;
        self
    }

    pub fn with_walk_response(self, response: WalkResponse) -> Self {
        self.inner.lock().walk_response = Some(response);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.inner.lock().latency = Some(latency);
        self
    }

    pub fn failing(self, method: &'static str, failure: StubFailure) -> Self {
        self.set_failure(method, failure);
        self
    }

    pub fn set_failure(&self, method: &'static str, failure: StubFailure) {
        self.inner.lock().failures.insert(method, failure);
    }

    pub fn clear_failure(&self, method: &'static str) {
        self.inner.lock().failures.remove(method);
    }

    pub fn set_simulator(&self, status: SimulatorStatus) {
        self.inner.lock().simulator = status;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| **call == method)
            .count()
    }

    pub fn custom_data(&self) -> CustomData {
        self.inner.lock().custom_data.clone()
    }

    pub fn started_configs(&self) -> Vec<SimulatorConfig> {
        self.inner.lock().started.clone()
    }

    pub fn receiver_starts(&self) -> Vec<TrapReceiverConfig> {
        self.inner.lock().receiver_starts.clone()
    }

    pub fn mib_file_names(&self) -> Vec<String> {
        self.inner.lock().mib_files.mibs.clone()
    }

    pub fn walk_requests(&self) -> Vec<WalkRequest> {
        self.inner.lock().walk_requests.clone()
    }

    pub fn credential_updates(&self) -> Vec<AuthUpdate> {
        self.inner.lock().credential_updates.clone()
    }

    /// Records the call, waits out the latency, then applies any failure.
    async fn enter(&self, method: &'static str) -> ApiResult<()> {
        let latency = {
            let mut inner = self.inner.lock();
            inner.calls.push(method);
            inner.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.inner.lock().failures.get(method) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

fn ok(message: &str) -> ActionResponse {
    ActionResponse {
        status: "ok".into(),
        message: Some(message.into()),
        ..ActionResponse::default()
    }
}

#[async_trait]
impl ApiService for TestApiService {
    async fn meta(&self) -> ApiResult<Meta> {
        self.enter("meta").await?;
        Ok(self.inner.lock().meta.clone())
    }

    async fn check_auth(&self) -> ApiResult<AuthCheck> {
        self.enter("check_auth").await?;
        Ok(AuthCheck {
            status: "ok".into(),
        })
    }

    async fn mib_status(&self) -> ApiResult<MibStatus> {
        self.enter("mib_status").await?;
        Ok(self.inner.lock().mib_status.clone())
    }

    async fn mib_traps(&self) -> ApiResult<TrapList> {
        self.enter("mib_traps").await?;
        Ok(self.inner.lock().trap_list.clone())
    }

    async fn mib_files(&self) -> ApiResult<MibFileList> {
        self.enter("mib_files").await?;
        Ok(self.inner.lock().mib_files.clone())
    }

    async fn reload_mibs(&self) -> ApiResult<MibReload> {
        self.enter("reload_mibs").await?;
        let inner = self.inner.lock();
        Ok(MibReload {
            status: "reloaded".into(),
            loaded: inner.mib_status.loaded,
            failed: inner.mib_status.failed,
            simulator: None,
            trap_receiver: None,
        })
    }

    async fn delete_mib(&self, file_name: &str) -> ApiResult<ActionResponse> {
        self.enter("delete_mib").await?;
        let file_name = validate_mib_file_name(file_name)?;
        let mut inner = self.inner.lock();
        let before = inner.mib_files.mibs.len();
        inner.mib_files.mibs.retain(|name| name != file_name);
        if inner.mib_files.mibs.len() == before {
            return Err(ApiError::Status {
                status: 404,
                detail: "File not found".into(),
            });
        }
        Ok(ActionResponse {
            status: "deleted".into(),
            ..ActionResponse::default()
        })
    }

    async fn simulator_status(&self) -> ApiResult<SimulatorStatus> {
        self.enter("simulator_status").await?;
        Ok(self.inner.lock().simulator.clone())
    }

    async fn start_simulator(
        &self,
        config: &SimulatorConfig,
    ) -> ApiResult<ActionResponse> {
        self.enter("start_simulator").await?;
        let mut inner = self.inner.lock();
        inner.started.push(config.clone());
        inner.simulator = SimulatorStatus {
            running: true,
            pid: Some(4242),
            port: Some(config.port.unwrap_or(1061)),
            community: Some(
                config.community.clone().unwrap_or_else(|| "public".into()),
            ),
        };
        Ok(ok("Simulator started"))
    }

    async fn stop_simulator(&self) -> ApiResult<ActionResponse> {
        self.enter("stop_simulator").await?;
        self.inner.lock().simulator = SimulatorStatus::default();
        Ok(ok("Simulator stopped"))
    }

    async fn simulator_custom_data(&self) -> ApiResult<CustomData> {
        self.enter("simulator_custom_data").await?;
        Ok(self.inner.lock().custom_data.clone())
    }

    async fn save_simulator_custom_data(
        &self,
        data: &CustomData,
    ) -> ApiResult<ActionResponse> {
        self.enter("save_simulator_custom_data").await?;
        self.inner.lock().custom_data = data.clone();
        Ok(ok("Custom data saved"))
    }

    async fn trap_receiver_status(&self) -> ApiResult<TrapReceiverStatus> {
        self.enter("trap_receiver_status").await?;
        Ok(self.inner.lock().receiver.clone())
    }

    async fn start_trap_receiver(
        &self,
        config: &TrapReceiverConfig,
    ) -> ApiResult<ActionResponse> {
        self.enter("start_trap_receiver").await?;
        let mut inner = self.inner.lock();
        inner.receiver_starts.push(config.clone());
        inner.receiver = TrapReceiverStatus {
            running: true,
            port: Some(config.port.unwrap_or(1162)),
            community: Some(
                config.community.clone().unwrap_or_else(|| "public".into()),
            ),
        };
        Ok(ok("Trap receiver started"))
    }

    async fn stop_trap_receiver(&self) -> ApiResult<ActionResponse> {
        self.enter("stop_trap_receiver").await?;
        self.inner.lock().receiver = TrapReceiverStatus::default();
        Ok(ok("Trap receiver stopped"))
    }

    async fn received_traps(&self, limit: usize) -> ApiResult<ReceivedTraps> {
        self.enter("received_traps").await?;
        let data = self.inner.lock().received.iter().take(limit).cloned().collect();
        Ok(ReceivedTraps { data })
    }

    async fn clear_traps(&self) -> ApiResult<ActionResponse> {
        self.enter("clear_traps").await?;
        self.inner.lock().received.clear();
        Ok(ok("Traps cleared"))
    }

    async fn execute_walk(&self, request: &WalkRequest) -> ApiResult<WalkResponse> {
        self.enter("execute_walk").await?;
        let request = request.clone().normalized()?;
        let mut inner = self.inner.lock();
        inner.walk_requests.push(request);
        Ok(inner.walk_response.clone().unwrap_or(WalkResponse {
            mode: WalkMode::Raw,
            count: 0,
            data: serde_json::Value::Array(Vec::new()),
        }))
    }

    async fn update_credentials(
        &self,
        update: &AuthUpdate,
    ) -> ApiResult<ActionResponse> {
        self.enter("update_credentials").await?;
        self.inner.lock().credential_updates.push(update.clone());
        Ok(ok("Credentials updated"))
    }
}
