use log::{debug, info, warn};

/// Thin `log` wrapper that tags every record with a component target.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub const STORE: &'static str = "drishti::store";
    pub const ANALYSIS: &'static str = "drishti::analysis";
    pub const SYNC: &'static str = "drishti::sync";
    pub const NOTIFY: &'static str = "drishti::notify";

    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn trace(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    /// Best-effort failures land here; they are never surfaced to callers.
    pub fn failure(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new(Self::STORE)
    }
}
