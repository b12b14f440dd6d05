//! Cross-navigation application state.
//!
//! Screens are rebuilt on every activation but still need the most recent
//! simulator snapshot, the event log and the last walk result, so they live
//! here and a handle is passed into every screen at construction.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use snmp_studio_model::SimulatorStatus;

/// Maximum number of log entries kept.
pub const LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "OK",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall clock, `HH:MM:SS`.
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:<5} {}", self.time, self.level.tag(), self.message)
    }
}

/// Bounded FIFO log; the oldest entry is evicted on overflow.
#[derive(Debug, Clone)]
pub struct LogRing {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogRing {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl LogRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Last simulator status seen by any screen.
    pub simulator: Option<SimulatorStatus>,
    pub logs: LogRing,
    /// Data of the last successful walk, kept for export.
    pub walk_result: Option<serde_json::Value>,
}

impl AppState {
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogEntry::now(level, message));
    }
}

/// Handle passed to every screen. Most recent writer wins.
pub type SharedState = Arc<RwLock<AppState>>;

pub fn shared_state() -> SharedState {
    Arc::new(RwLock::new(AppState::default()))
}
