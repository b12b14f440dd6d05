use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::fragments::{FragmentError, FragmentSource};
use crate::core::route::Route;

#[derive(Debug, Default)]
struct InnerFragments {
    markup: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    fetches: Vec<String>,
}

/// Serves fixed markup per route name; unknown names answer 404.
#[derive(Debug, Clone, Default)]
pub struct StaticFragmentSource {
    inner: Arc<Mutex<InnerFragments>>,
}

impl StaticFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// One small fragment per known route.
    pub fn standard() -> Self {
        Route::ALL.iter().fold(Self::new(), |source, route| {
            let markup = format!("<section id=\"{}\"></section>", route.name());
            source.with_fragment(route.name(), markup)
        })
    }

    pub fn with_fragment(self, name: &str, markup: impl Into<String>) -> Self {
        self.inner
            .lock()
            .markup
            .insert(name.to_string(), markup.into());
        self
    }

    /// Delays every fetch of `name`.
    pub fn with_delay(self, name: &str, delay: Duration) -> Self {
        self.inner.lock().delays.insert(name.to_string(), delay);
        self
    }

    /// Names fetched so far, in request order.
    pub fn fetches(&self) -> Vec<String> {
        self.inner.lock().fetches.clone()
    }

    pub fn fetch_count(&self, name: &str) -> usize {
        self.inner
            .lock()
            .fetches
            .iter()
            .filter(|fetched| *fetched == name)
            .count()
    }
}

#[async_trait]
impl FragmentSource for StaticFragmentSource {
    async fn fetch(&self, name: &str) -> Result<String, FragmentError> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.fetches.push(name.to_string());
            inner.delays.get(name).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner
            .lock()
            .markup
            .get(name)
            .cloned()
            .ok_or(FragmentError::Status { status: 404 })
    }
}
