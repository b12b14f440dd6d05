//! Maps location fragments to screen content and owns the active screen.
//!
//! Every navigation runs the same sequence: tear down the active screen,
//! update the nav indicator, resolve the fragment (cache first, then the
//! fragment source), inject it, and activate the route's screen.
//!
//! Navigations are not cancelled. Each one takes a generation number instead,
//! and a navigation whose fetch resolves after a newer navigation started is
//! dropped without touching the content region or activating anything. Its
//! fragment is still cached.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::cache::{CachePolicy, FragmentCache};
use crate::core::fragments::{FragmentError, FragmentSource};
use crate::core::lifecycle::ActiveScreen;
use crate::core::registry::ModuleRegistry;
use crate::core::route::{Route, RouteTarget, resolve_route};
use crate::core::shell::Shell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Fragment injected and the route's screen activated.
    Activated(Route),
    /// Fragment injected; no screen is registered for the route.
    Rendered(RouteTarget),
    /// A newer navigation started while this one was fetching.
    Superseded(RouteTarget),
}

#[derive(Debug, Error)]
pub enum NavigationError {
    /// The inline error has already been rendered and no screen is active.
    #[error("failed to load view '{route}': {source}")]
    Fragment {
        route: String,
        #[source]
        source: FragmentError,
    },
}

#[derive(Debug)]
struct Lifecycle {
    registry: ModuleRegistry,
    active: Option<Route>,
}

#[derive(Debug)]
pub struct Router {
    shell: Arc<dyn Shell>,
    source: Arc<dyn FragmentSource>,
    cache: Mutex<FragmentCache>,
    lifecycle: Mutex<Lifecycle>,
    shown: ActiveScreen,
    generation: AtomicU64,
}

impl Router {
    pub fn new(
        shell: Arc<dyn Shell>,
        source: Arc<dyn FragmentSource>,
        registry: ModuleRegistry,
    ) -> Self {
        Self {
            shell,
            source,
            cache: Mutex::new(FragmentCache::default()),
            lifecycle: Mutex::new(Lifecycle {
                registry,
                active: None,
            }),
            shown: ActiveScreen::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_cache_policy(self, policy: CachePolicy) -> Self {
        *self.cache.lock() = FragmentCache::new(policy);
        self
    }

    /// Publishes the active route through `shown`, normally the handle held
    /// by every screen's context.
    pub fn with_active_screen(self, shown: ActiveScreen) -> Self {
        shown.set(self.lifecycle.lock().active);
        Self { shown, ..self }
    }

    pub fn active_screen(&self) -> &ActiveScreen {
        &self.shown
    }

    pub fn active_route(&self) -> Option<Route> {
        self.lifecycle.lock().active
    }

    /// Direct access for inspection and manual invalidation.
    pub fn cache(&self) -> MutexGuard<'_, FragmentCache> {
        self.cache.lock()
    }

    /// Number of navigations started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn navigate(
        &self,
        raw_fragment: &str,
    ) -> Result<NavigationOutcome, NavigationError> {
        let target = resolve_route(raw_fragment);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("[Router] navigate #{generation} -> {target}");

        self.teardown_active();

        self.shell.highlight_nav(target.name());
        self.shell.set_page_title(target.title());

        let cached = self.cache.lock().get(target.name());
        let markup = match cached {
            Some(markup) => {
                debug!("[Router] fragment '{target}' served from cache");
                markup
            }
            None => {
                self.shell.show_loading();
                match self.source.fetch(target.name()).await {
                    Ok(text) => self.cache.lock().put(target.name(), text),
                    Err(source) => {
                        if !self.is_current(generation) {
                            debug!("[Router] dropping stale failure for '{target}'");
                            return Ok(NavigationOutcome::Superseded(target));
                        }
                        warn!("[Router] failed to load '{target}': {source}");
                        self.shell.show_error(&format!("Error: {source}"));
                        return Err(NavigationError::Fragment {
                            route: target.name().to_string(),
                            source,
                        });
                    }
                }
            }
        };

        let mut guard = self.lifecycle.lock();
        let lifecycle = &mut *guard;
        if !self.is_current(generation) {
            debug!("[Router] navigation #{generation} to '{target}' superseded");
            return Ok(NavigationOutcome::Superseded(target));
        }

        self.shell.replace_content(markup);

        let Some(route) = target.route() else {
            return Ok(NavigationOutcome::Rendered(target));
        };
        let Some(module) = lifecycle.registry.get_mut(route) else {
            return Ok(NavigationOutcome::Rendered(target));
        };

        debug!("[Router] activating '{}'", module.name());
        lifecycle.active = Some(route);
        self.shown.set(Some(route));
        module.activate();
        Ok(NavigationOutcome::Activated(route))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn teardown_active(&self) {
        let mut lifecycle = self.lifecycle.lock();
        self.shown.set(None);
        let Some(route) = lifecycle.active.take() else {
            return;
        };
        if let Some(module) = lifecycle.registry.get_mut(route) {
            debug!("[Router] tearing down '{}'", module.name());
            module.teardown();
        }
    }
}

/// Feeds host location changes into the router.
///
/// Each change is navigated on its own task, matching a browser hashchange
/// listener that never awaits the previous navigation.
pub fn spawn_hash_listener(
    router: Arc<Router>,
    mut changes: mpsc::UnboundedReceiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(fragment) = changes.recv().await {
            let router = Arc::clone(&router);
            tokio::spawn(async move {
                if let Err(err) = router.navigate(&fragment).await {
                    warn!("[Router] {err}");
                }
            });
        }
        debug!("[Router] location listener closed");
    })
}
