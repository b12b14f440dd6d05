use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use snmp_studio_console::core::cache::CachePolicy;
use snmp_studio_console::core::fragments::{FragmentError, FragmentSource};
use snmp_studio_console::core::lifecycle::{PollTask, ScreenModule};
use snmp_studio_console::core::registry::ModuleRegistry;
use snmp_studio_console::core::route::{Route, RouteTarget};
use snmp_studio_console::core::router::{
    NavigationError, NavigationOutcome, Router, spawn_hash_listener,
};
use snmp_studio_console::core::shell::{ContentView, MemoryShell};
use tokio::sync::mpsc;

type Events = Arc<Mutex<Vec<String>>>;

/// Serves `<name>-markup` for every known route and records each fetch.
#[derive(Debug, Default)]
struct RecordingSource {
    events: Events,
    delays: HashMap<String, Duration>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl RecordingSource {
    fn new(events: Events) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    fn fetch_count(&self, name: &str) -> usize {
        self.fetches.lock().get(name).copied().unwrap_or_default()
    }
}

#[async_trait]
impl FragmentSource for RecordingSource {
    async fn fetch(&self, name: &str) -> Result<String, FragmentError> {
        self.events.lock().push(format!("fetch:{name}"));
        *self.fetches.lock().entry(name.to_string()).or_default() += 1;
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        if Route::from_name(name).is_none() {
            return Err(FragmentError::Status { status: 404 });
        }
        Ok(format!("{name}-markup"))
    }
}

/// Records hooks and owns a one-second ticker while active.
#[derive(Debug)]
struct RecordingModule {
    name: &'static str,
    events: Events,
    ticks: Arc<AtomicUsize>,
    poll: Option<PollTask>,
}

impl RecordingModule {
    fn new(name: &'static str, events: &Events) -> (Self, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let module = Self {
            name,
            events: Arc::clone(events),
            ticks: Arc::clone(&ticks),
            poll: None,
        };
        (module, ticks)
    }
}

impl ScreenModule for RecordingModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn activate(&mut self) {
        self.events.lock().push(format!("activate:{}", self.name));
        let ticks = Arc::clone(&self.ticks);
        self.poll = Some(PollTask::spawn(
            self.name,
            Duration::from_secs(1),
            move |_liveness| {
                let ticks = Arc::clone(&ticks);
                async move {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
        ));
    }

    fn teardown(&mut self) {
        self.events.lock().push(format!("teardown:{}", self.name));
        if let Some(mut poll) = self.poll.take() {
            poll.cancel();
        }
    }
}

struct Harness {
    router: Arc<Router>,
    shell: MemoryShell,
    source: Arc<RecordingSource>,
    events: Events,
    ticks: HashMap<Route, Arc<AtomicUsize>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_source(RecordingSource::new)
    }

    fn with_source(build: impl FnOnce(Events) -> RecordingSource) -> Self {
        let events: Events = Arc::default();
        let source = Arc::new(build(Arc::clone(&events)));
        let shell = MemoryShell::new();

        let mut registry = ModuleRegistry::new();
        let mut ticks = HashMap::new();
        for route in [Route::Dashboard, Route::Simulator, Route::Walker, Route::Traps] {
            let (module, counter) = RecordingModule::new(route.name(), &events);
            registry.register(route, module);
            ticks.insert(route, counter);
        }

        let router = Arc::new(
            Router::new(Arc::new(shell.clone()), source.clone(), registry)
                .with_cache_policy(CachePolicy::NoEviction),
        );
        Self {
            router,
            shell,
            source,
            events,
            ticks,
        }
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    fn ticks(&self, route: Route) -> usize {
        self.ticks[&route].load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn empty_fragment_lands_on_dashboard() {
    let harness = Harness::new();

    let outcome = harness.router.navigate("").await.unwrap();
    assert_eq!(outcome, NavigationOutcome::Activated(Route::Dashboard));
    assert_eq!(harness.router.active_route(), Some(Route::Dashboard));
    assert_eq!(harness.shell.active_links(), vec!["dashboard".to_string()]);
    assert_eq!(
        harness.shell.content(),
        ContentView::Fragment("dashboard-markup".into())
    );

    let outcome = harness.router.navigate("#").await.unwrap();
    assert_eq!(outcome, NavigationOutcome::Activated(Route::Dashboard));
}

#[tokio::test]
async fn previous_screen_is_torn_down_before_the_next_fetch() {
    let harness = Harness::new();

    harness.router.navigate("#simulator").await.unwrap();
    harness.router.navigate("#walker").await.unwrap();

    assert_eq!(
        harness.events(),
        vec![
            "fetch:simulator",
            "activate:simulator",
            "teardown:simulator",
            "fetch:walker",
            "activate:walker",
        ]
    );
    assert_eq!(harness.shell.active_links(), vec!["walker".to_string()]);
}

#[tokio::test]
async fn revisiting_routes_never_refetches() {
    let harness = Harness::new();

    for fragment in [
        "#dashboard",
        "#settings",
        "#simulator",
        "#walker",
        "#traps",
        "#dashboard",
        "#settings",
    ] {
        harness.router.navigate(fragment).await.unwrap();
    }

    assert_eq!(harness.source.fetch_count("dashboard"), 1);
    assert_eq!(harness.source.fetch_count("settings"), 1);
    assert_eq!(harness.router.cache().len(), 5);

    // Revisits still reactivate the screen.
    let activations = harness
        .events()
        .iter()
        .filter(|event| *event == "activate:dashboard")
        .count();
    assert_eq!(activations, 2);
}

#[tokio::test]
async fn routes_without_a_module_only_render() {
    let harness = Harness::new();

    let outcome = harness.router.navigate("files").await.unwrap();
    assert_eq!(outcome, NavigationOutcome::Rendered(Route::Files.into()));
    assert_eq!(harness.router.active_route(), None);
    assert_eq!(harness.shell.title(), Route::Files.title());
}

#[tokio::test]
async fn shown_route_follows_activation_and_teardown() {
    let harness = Harness::new();
    let shown = harness.router.active_screen().clone();
    assert_eq!(shown.current(), None);

    harness.router.navigate("#walker").await.unwrap();
    assert_eq!(shown.current(), Some(Route::Walker));

    harness.router.navigate("files").await.unwrap();
    assert_eq!(shown.current(), None);

    harness.router.navigate("#nowhere").await.unwrap_err();
    assert_eq!(shown.current(), None);
}

#[tokio::test]
async fn unknown_route_renders_an_inline_error() {
    let harness = Harness::new();
    harness.router.navigate("#traps").await.unwrap();

    let err = harness.router.navigate("#nowhere").await.unwrap_err();
    let NavigationError::Fragment { route, .. } = &err;
    assert_eq!(route, "nowhere");

    assert_eq!(
        harness.shell.content(),
        ContentView::Error("Error: Module not found (HTTP 404)".into())
    );
    assert_eq!(harness.router.active_route(), None);
    assert!(harness.shell.active_links().is_empty());
    assert!(harness.events().contains(&"teardown:traps".to_string()));
    assert!(!harness.router.cache().contains("nowhere"));
}

#[tokio::test(start_paused = true)]
async fn left_screens_stop_polling() {
    let harness = Harness::new();

    harness.router.navigate("#traps").await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(harness.ticks(Route::Traps), 3);

    harness.router.navigate("#dashboard").await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(harness.ticks(Route::Traps), 3);
    assert!(harness.ticks(Route::Dashboard) >= 10);
}

#[tokio::test(start_paused = true)]
async fn slow_navigation_is_superseded_by_a_newer_one() {
    let harness = Harness::with_source(|events| {
        RecordingSource::new(events).with_delay("walker", Duration::from_millis(500))
    });

    let slow = tokio::spawn({
        let router = Arc::clone(&harness.router);
        async move { router.navigate("#walker").await }
    });
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(harness.shell.content(), ContentView::Loading);

    let fast = harness.router.navigate("#traps").await.unwrap();
    assert_eq!(fast, NavigationOutcome::Activated(Route::Traps));

    let slow = slow.await.unwrap().unwrap();
    assert_eq!(slow, NavigationOutcome::Superseded(RouteTarget::Known(Route::Walker)));

    assert_eq!(harness.router.active_route(), Some(Route::Traps));
    assert_eq!(
        harness.shell.content(),
        ContentView::Fragment("traps-markup".into())
    );
    assert!(!harness.events().contains(&"activate:walker".to_string()));
    // The late fragment is still kept for the next visit.
    assert!(harness.router.cache().contains("walker"));
}

#[tokio::test]
async fn location_changes_drive_the_router() {
    let harness = Harness::new();
    let (locations, changes) = mpsc::unbounded_channel();
    let listener = spawn_hash_listener(Arc::clone(&harness.router), changes);

    locations.send("#simulator".to_string()).unwrap();
    for _ in 0..10 {
        if harness.router.active_route() == Some(Route::Simulator) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(harness.router.active_route(), Some(Route::Simulator));

    drop(locations);
    listener.await.unwrap();
}
