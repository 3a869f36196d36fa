//! Per-run log sink handed to every hook.
//!
//! A [`HookLog`] belongs to one dispatcher, so two runs never see each
//! other's lines. Every line is also emitted as a `tracing` event on the
//! `hooks` target.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

/// Ordered record of the lines hooks logged during a run.
///
/// Cloning yields another handle to the same record.
#[derive(Clone, Default)]
pub struct HookLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl HookLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one line.
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "hooks", "{message}");
        self.lines.lock().push(message);
    }

    /// Snapshot of every line logged so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines logged so far.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl std::fmt::Debug for HookLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookLog")
            .field("line_count", &self.len())
            .finish()
    }
}
