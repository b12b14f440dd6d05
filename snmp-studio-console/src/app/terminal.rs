//! Line-oriented host surface for the headless binary.

use std::io::Write;
use std::sync::Arc;

use crate::core::shell::{BackendStatus, MemoryShell, Shell};

/// Echoes every visible change to stdout while keeping the state in an
/// inner [`MemoryShell`].
#[derive(Debug, Clone, Default)]
pub struct TerminalShell {
    inner: MemoryShell,
}

impl TerminalShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &MemoryShell {
        &self.inner
    }

    fn print(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // Nothing useful to do if stdout is gone.
        let _ = writeln!(out, "{line}");
    }
}

impl Shell for TerminalShell {
    fn set_page_title(&self, title: &str) {
        self.inner.set_page_title(title);
        self.print(&format!("== {title} =="));
    }

    fn show_loading(&self) {
        self.inner.show_loading();
        self.print("Loading...");
    }

    fn replace_content(&self, markup: Arc<str>) {
        self.print(&format!("[content: {} bytes]", markup.len()));
        self.inner.replace_content(markup);
    }

    fn show_error(&self, message: &str) {
        self.inner.show_error(message);
        self.print(message);
    }

    fn highlight_nav(&self, route_name: &str) {
        self.inner.highlight_nav(route_name);
    }

    fn set_field(&self, id: &str, text: &str) {
        if self.inner.field(id).as_deref() == Some(text) {
            return;
        }
        self.inner.set_field(id, text);
        if text.contains('\n') {
            self.print(&format!("{id}:\n{text}"));
        } else {
            self.print(&format!("{id}: {text}"));
        }
    }

    fn field(&self, id: &str) -> Option<String> {
        self.inner.field(id)
    }

    fn set_backend_status(&self, status: BackendStatus) {
        if self.inner.backend_status() != status {
            self.print(&format!("[backend {}]", status.label()));
        }
        self.inner.set_backend_status(status);
    }

    fn reveal(&self) {
        self.inner.reveal();
    }

    fn set_gate_message(&self, message: &str) {
        self.inner.set_gate_message(message);
        self.print(message);
    }
}
