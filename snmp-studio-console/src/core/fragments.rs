//! Fragment source: fetches raw view markup by route name.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("Module not found (HTTP {status})")]
    Status { status: u16 },

    #[error("fragment request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid fragment path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Where view fragments come from. One GET per route name.
#[async_trait]
pub trait FragmentSource: Send + Sync + Debug {
    async fn fetch(&self, name: &str) -> Result<String, FragmentError>;
}

/// Fetches `<base>/<name>.html` over HTTP. Any 2xx is a success.
#[derive(Debug, Clone)]
pub struct HttpFragmentSource {
    client: Client,
    base_url: Url,
}

impl HttpFragmentSource {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, FragmentError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn url_for(&self, name: &str) -> Result<Url, FragmentError> {
        let path = format!("{name}.html");
        self.base_url
            .join(&path)
            .map_err(|source| FragmentError::InvalidPath { path, source })
    }
}

#[async_trait]
impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, name: &str) -> Result<String, FragmentError> {
        let url = self.url_for(name)?;
        log::debug!("[Fragments] GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FragmentError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_urls_are_relative_to_base() {
        let source = HttpFragmentSource::with_client(
            Client::new(),
            Url::parse("http://console.local/ui/").unwrap(),
        );
        assert_eq!(
            source.url_for("simulator").unwrap().as_str(),
            "http://console.local/ui/simulator.html"
        );
    }

    #[test]
    fn status_error_reads_like_the_inline_message() {
        let err = FragmentError::Status { status: 404 };
        assert_eq!(err.to_string(), "Module not found (HTTP 404)");
    }
}
