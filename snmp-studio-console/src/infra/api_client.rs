use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use snmp_studio_config::{ConsoleConfig, Credentials};
use snmp_studio_model::{
    ActionResponse, ApiErrorBody, AuthCheck, AuthUpdate, CustomData, Meta,
    MibFileList, MibReload, MibStatus, ReceivedTraps, SimulatorConfig,
    SimulatorStatus, TrapList, TrapReceiverConfig, TrapReceiverStatus,
    WalkRequest, WalkResponse, validate_mib_file_name,
};
use url::Url;

use crate::infra::constants::routes;
use crate::infra::services::api::{ApiError, ApiResult, ApiService};

/// JSON client for the backend `/api` surface.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        info!("[ApiClient] Creating API client with base URL: {base_url}");
        Ok(Self {
            client,
            base_url,
            credentials: None,
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> ApiResult<Self> {
        let client =
            Self::new(config.backend_url.clone(), config.request_timeout)?;
        Ok(match &config.credentials {
            Some(credentials) => client.with_credentials(credentials.clone()),
            None => client,
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an absolute API path against the backend origin.
    pub fn build_url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Decode(format!("bad path '{path}': {err}")))
    }

    /// `/api/mibs/{file}` with the file name percent-encoded as one segment.
    pub fn mib_file_url(&self, file_name: &str) -> ApiResult<Url> {
        let file_name = validate_mib_file_name(file_name)?;
        let mut url = self.build_url(routes::mibs::FILE_BASE)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Decode("backend url cannot take a path".into()))?
            .pop_if_empty()
            .push(file_name);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(Credentials { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = ApiErrorBody::detail_from(&body);
            warn!("[ApiClient] Request failed with status {status}: {detail}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path)?;
        debug!("[ApiClient] GET {url}");
        self.execute(self.client.get(url)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.build_url(path)?;
        debug!("[ApiClient] POST {url}");
        self.execute(self.client.post(url).json(body)).await
    }

    /// POST without a body, for action endpoints.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path)?;
        debug!("[ApiClient] POST {url}");
        self.execute(self.client.post(url)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path)?;
        debug!("[ApiClient] DELETE {url}");
        self.execute(self.client.delete(url)).await
    }
}

#[async_trait]
impl ApiService for ApiClient {
    async fn meta(&self) -> ApiResult<Meta> {
        self.get(routes::system::META).await
    }

    async fn check_auth(&self) -> ApiResult<AuthCheck> {
        self.get(routes::settings::CHECK).await
    }

    async fn mib_status(&self) -> ApiResult<MibStatus> {
        self.get(routes::mibs::STATUS).await
    }

    async fn mib_traps(&self) -> ApiResult<TrapList> {
        self.get(routes::mibs::TRAPS).await
    }

    async fn mib_files(&self) -> ApiResult<MibFileList> {
        self.get(routes::files::MIBS).await
    }

    async fn reload_mibs(&self) -> ApiResult<MibReload> {
        self.post_empty(routes::mibs::RELOAD).await
    }

    async fn delete_mib(&self, file_name: &str) -> ApiResult<ActionResponse> {
        let url = self.mib_file_url(file_name)?;
        debug!("[ApiClient] DELETE {url}");
        self.execute(self.client.delete(url)).await
    }

    async fn simulator_status(&self) -> ApiResult<SimulatorStatus> {
        self.get(routes::simulator::STATUS).await
    }

    async fn start_simulator(
        &self,
        config: &SimulatorConfig,
    ) -> ApiResult<ActionResponse> {
        self.post(routes::simulator::START, config).await
    }

    async fn stop_simulator(&self) -> ApiResult<ActionResponse> {
        self.post_empty(routes::simulator::STOP).await
    }

    async fn simulator_custom_data(&self) -> ApiResult<CustomData> {
        self.get(routes::simulator::DATA).await
    }

    async fn save_simulator_custom_data(
        &self,
        data: &CustomData,
    ) -> ApiResult<ActionResponse> {
        self.post(routes::simulator::DATA, data).await
    }

    async fn trap_receiver_status(&self) -> ApiResult<TrapReceiverStatus> {
        self.get(routes::traps::STATUS).await
    }

    async fn start_trap_receiver(
        &self,
        config: &TrapReceiverConfig,
    ) -> ApiResult<ActionResponse> {
        self.post(routes::traps::START, config).await
    }

    async fn stop_trap_receiver(&self) -> ApiResult<ActionResponse> {
        self.post_empty(routes::traps::STOP).await
    }

    async fn received_traps(&self, limit: usize) -> ApiResult<ReceivedTraps> {
        let url = self.build_url(routes::traps::RECEIVED)?;
        debug!("[ApiClient] GET {url} (limit {limit})");
        self.execute(self.client.get(url).query(&[("limit", limit)]))
            .await
    }

    async fn clear_traps(&self) -> ApiResult<ActionResponse> {
        self.delete(routes::traps::RECEIVED).await
    }

    async fn execute_walk(&self, request: &WalkRequest) -> ApiResult<WalkResponse> {
        let request = request.clone().normalized()?;
        self.post(routes::walk::EXECUTE, &request).await
    }

    async fn update_credentials(
        &self,
        update: &AuthUpdate,
    ) -> ApiResult<ActionResponse> {
        self.post(routes::settings::AUTH, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(
            Url::parse("http://127.0.0.1:8000/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn api_paths_resolve_against_origin() {
        let client = client();
        assert_eq!(
            client.build_url(routes::system::META).unwrap().as_str(),
            "http://127.0.0.1:8000/api/meta"
        );
        assert_eq!(
            client.build_url(routes::traps::RECEIVED).unwrap().as_str(),
            "http://127.0.0.1:8000/api/traps/"
        );
    }

    #[test]
    fn mib_file_names_are_a_single_encoded_segment() {
        let client = client();
        assert_eq!(
            client.mib_file_url("MY MIB#2.txt").unwrap().as_str(),
            "http://127.0.0.1:8000/api/mibs/MY%20MIB%232.txt"
        );
        assert!(matches!(
            client.mib_file_url("../settings.py"),
            Err(ApiError::Invalid(_))
        ));
    }

    #[test]
    fn debug_output_hides_credentials() {
        let client = client().with_credentials(Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        });
        let printed = format!("{client:?}");
        assert!(printed.contains("has_credentials: true"));
        assert!(!printed.contains("hunter2"));
    }

    #[tokio::test]
    async fn invalid_walk_is_rejected_before_sending() {
        let request = WalkRequest {
            oid: String::new(),
            ..WalkRequest::default()
        };
        let err = client().execute_walk(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let client = ApiClient::new(
            Url::parse("http://127.0.0.1:9/").unwrap(),
            Duration::from_millis(500),
        )
        .unwrap();
        let err = client.meta().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
