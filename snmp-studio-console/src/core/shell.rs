//! Host surface port.
//!
//! The router and the screens only touch the page through [`Shell`]. A
//! browser host backs it with the DOM; [`MemoryShell`] keeps everything in
//! process for the headless binary and for tests.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::route::Route;

/// Backend reachability badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl BackendStatus {
    pub fn label(self) -> &'static str {
        match self {
            BackendStatus::Unknown => "Checking...",
            BackendStatus::Online => "Online",
            BackendStatus::Offline => "Offline",
        }
    }
}

/// What the content region currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    Empty,
    Loading,
    Fragment(Arc<str>),
    Error(String),
}

pub trait Shell: Send + Sync + Debug {
    fn set_page_title(&self, title: &str);

    /// Spinner shown while a fragment is being fetched.
    fn show_loading(&self);

    /// Replaces the content region with the given markup.
    fn replace_content(&self, markup: Arc<str>);

    /// Inline error rendered in place of the content.
    fn show_error(&self, message: &str);

    /// Marks exactly the navigation links whose route equals `route_name`.
    fn highlight_nav(&self, route_name: &str);

    /// Sets the text of a named element inside the current content.
    fn set_field(&self, id: &str, text: &str);

    fn field(&self, id: &str) -> Option<String>;

    fn set_backend_status(&self, status: BackendStatus);

    /// Shows the application once the authentication gate passed.
    fn reveal(&self);

    /// Status line shown while the application stays hidden.
    fn set_gate_message(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub route: String,
    pub active: bool,
}

#[derive(Debug)]
struct MemoryShellState {
    title: String,
    content: ContentView,
    history: Vec<ContentView>,
    nav: Vec<NavLink>,
    fields: HashMap<String, String>,
    backend_status: BackendStatus,
    revealed: bool,
    gate_message: Option<String>,
}

/// In-process [`Shell`] recording every change.
#[derive(Debug, Clone)]
pub struct MemoryShell {
    inner: Arc<Mutex<MemoryShellState>>,
}

impl Default for MemoryShell {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryShell {
    /// One navigation link per known route.
    pub fn new() -> Self {
        Self::with_nav_links(Route::ALL.iter().map(|route| route.name()))
    }

    pub fn with_nav_links<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nav = links
            .into_iter()
            .map(|route| NavLink {
                route: route.into(),
                active: false,
            })
            .collect();
        Self {
            inner: Arc::new(Mutex::new(MemoryShellState {
                title: String::new(),
                content: ContentView::Empty,
                history: Vec::new(),
                nav,
                fields: HashMap::new(),
                backend_status: BackendStatus::Unknown,
                revealed: false,
                gate_message: None,
            })),
        }
    }

    pub fn title(&self) -> String {
        self.inner.lock().title.clone()
    }

    pub fn content(&self) -> ContentView {
        self.inner.lock().content.clone()
    }

    /// Every content region state in order, loading spinners included.
    pub fn content_history(&self) -> Vec<ContentView> {
        self.inner.lock().history.clone()
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        self.inner.lock().nav.clone()
    }

    pub fn active_links(&self) -> Vec<String> {
        self.inner
            .lock()
            .nav
            .iter()
            .filter(|link| link.active)
            .map(|link| link.route.clone())
            .collect()
    }

    pub fn backend_status(&self) -> BackendStatus {
        self.inner.lock().backend_status
    }

    pub fn is_revealed(&self) -> bool {
        self.inner.lock().revealed
    }

    pub fn gate_message(&self) -> Option<String> {
        self.inner.lock().gate_message.clone()
    }

    fn set_content(&self, view: ContentView) {
        let mut state = self.inner.lock();
        // New content means a new element tree.
        state.fields.clear();
        state.history.push(view.clone());
        state.content = view;
    }
}

impl Shell for MemoryShell {
    fn set_page_title(&self, title: &str) {
        self.inner.lock().title = title.to_string();
    }

    fn show_loading(&self) {
        self.set_content(ContentView::Loading);
    }

    fn replace_content(&self, markup: Arc<str>) {
        self.set_content(ContentView::Fragment(markup));
    }

    fn show_error(&self, message: &str) {
        self.set_content(ContentView::Error(message.to_string()));
    }

    fn highlight_nav(&self, route_name: &str) {
        for link in self.inner.lock().nav.iter_mut() {
            link.active = link.route == route_name;
        }
    }

    fn set_field(&self, id: &str, text: &str) {
        self.inner
            .lock()
            .fields
            .insert(id.to_string(), text.to_string());
    }

    fn field(&self, id: &str) -> Option<String> {
        self.inner.lock().fields.get(id).cloned()
    }

    fn set_backend_status(&self, status: BackendStatus) {
        self.inner.lock().backend_status = status;
    }

    fn reveal(&self) {
        let mut state = self.inner.lock();
        state.revealed = true;
        state.gate_message = None;
    }

    fn set_gate_message(&self, message: &str) {
        self.inner.lock().gate_message = Some(message.to_string());
    }
}
