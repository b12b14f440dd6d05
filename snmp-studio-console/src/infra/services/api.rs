//! API service trait
//!
//! Screens never hold an [`ApiClient`](crate::infra::ApiClient) directly;
//! they receive an `Arc<dyn ApiService>` so tests can swap in
//! [`TestApiService`](crate::infra::testing::stubs::TestApiService).

use std::fmt::Debug;

use async_trait::async_trait;
use snmp_studio_model::{
    ActionResponse, AuthCheck, AuthUpdate, CustomData, Meta, MibFileList,
    MibReload, MibStatus, ModelError, ReceivedTraps, SimulatorConfig,
    SimulatorStatus, TrapList, TrapReceiverConfig, TrapReceiverStatus,
    WalkRequest, WalkResponse,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout or connection refused.
    #[error("request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-2xx answer. `detail` comes from the JSON error body when present.
    #[error("{detail} (HTTP {status})")]
    Status { status: u16, detail: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Rejected locally before anything was sent.
    #[error(transparent)]
    Invalid(#[from] ModelError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(Box::new(err))
    }
}

impl ApiError {
    /// The backend answered, but not with success.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    /// Human readable message for inline error rendering.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Backend operations used by the console screens.
#[async_trait]
pub trait ApiService: Send + Sync + Debug {
    /// Identity document; also the health probe.
    async fn meta(&self) -> ApiResult<Meta>;

    /// Authentication gate: succeeds only with valid credentials.
    async fn check_auth(&self) -> ApiResult<AuthCheck>;

    async fn mib_status(&self) -> ApiResult<MibStatus>;

    async fn mib_traps(&self) -> ApiResult<TrapList>;

    async fn mib_files(&self) -> ApiResult<MibFileList>;

    /// Reloads every MIB; the backend restarts a running simulator and trap
    /// receiver along the way.
    async fn reload_mibs(&self) -> ApiResult<MibReload>;

    /// Removes one file from the MIB directory. Does not reload.
    async fn delete_mib(&self, file_name: &str) -> ApiResult<ActionResponse>;

    async fn simulator_status(&self) -> ApiResult<SimulatorStatus>;

    async fn start_simulator(
        &self,
        config: &SimulatorConfig,
    ) -> ApiResult<ActionResponse>;

    async fn stop_simulator(&self) -> ApiResult<ActionResponse>;

    async fn simulator_custom_data(&self) -> ApiResult<CustomData>;

    async fn save_simulator_custom_data(
        &self,
        data: &CustomData,
    ) -> ApiResult<ActionResponse>;

    async fn trap_receiver_status(&self) -> ApiResult<TrapReceiverStatus>;

    async fn start_trap_receiver(
        &self,
        config: &TrapReceiverConfig,
    ) -> ApiResult<ActionResponse>;

    async fn stop_trap_receiver(&self) -> ApiResult<ActionResponse>;

    /// Most recent received traps, newest first, at most `limit`.
    async fn received_traps(&self, limit: usize) -> ApiResult<ReceivedTraps>;

    async fn clear_traps(&self) -> ApiResult<ActionResponse>;

    async fn execute_walk(&self, request: &WalkRequest) -> ApiResult<WalkResponse>;

    async fn update_credentials(
        &self,
        update: &AuthUpdate,
    ) -> ApiResult<ActionResponse>;
}
