pub mod api_client;
pub mod constants;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api_client::ApiClient;
pub use services::api::{ApiError, ApiResult, ApiService};
