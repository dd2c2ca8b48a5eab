use crate::config::SimulationConfig;
use crate::model::{Severity, SimulationAlert};
use crate::prelude::{now, Timestamp};
use crate::telemetry::LogManager;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

/// View the operator lands on after opening an alert notification.
pub const SIMULATION_ROUTE: &str = "/dashboard/simulation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Critical,
}

impl From<Severity> for NotificationLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => NotificationLevel::Critical,
            Severity::Warning => NotificationLevel::Warning,
            Severity::Info => NotificationLevel::Info,
        }
    }
}

/// Ephemeral toast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    pub timestamp: Timestamp,
    pub read: bool,
}

/// Caller-supplied part of a notification; id, timestamp and read flag are filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    #[serde(rename = "type")]
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub alert_id: Option<String>,
}

impl NotificationDraft {
    pub fn from_alert(alert: &SimulationAlert) -> Self {
        Self {
            level: alert.severity.into(),
            title: format!("{} Alert", alert.severity),
            message: alert.message.clone(),
            alert_id: Some(alert.id.clone()),
        }
    }
}

type Entries = Arc<Mutex<Vec<Notification>>>;

fn lock(entries: &Mutex<Vec<Notification>>) -> MutexGuard<'_, Vec<Notification>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn remove_by_id(entries: &Mutex<Vec<Notification>>, id: &str) {
    lock(entries).retain(|n| n.id != id);
}

/// Newest-first list of transient notifications, bounded in length.
///
/// Each entry expires after the configured TTL on a spawned timer when a
/// tokio runtime is available. Dismissing early does not cancel the timer;
/// it later fires against a missing id and does nothing.
#[derive(Clone)]
pub struct NotificationStore {
    entries: Entries,
    ttl: Duration,
    capacity: usize,
    logger: LogManager,
}

impl NotificationStore {
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_limits(config.notification_ttl(), config.notification_capacity)
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            ttl,
            capacity: capacity.max(1),
            logger: LogManager::new(LogManager::NOTIFY),
        }
    }

    fn next_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        format!(
            "notif-{}-{}",
            now().timestamp_millis(),
            suffix.to_ascii_lowercase()
        )
    }

    pub fn add_notification(&self, draft: NotificationDraft) -> Notification {
        let notification = Notification {
            id: Self::next_id(),
            level: draft.level,
            title: draft.title,
            message: draft.message,
            alert_id: draft.alert_id,
            timestamp: now(),
            read: false,
        };

        {
            let mut entries = lock(&self.entries);
            entries.insert(0, notification.clone());
            entries.truncate(self.capacity);
        }
        self.logger
            .trace(&format!("notification {}: {}", notification.id, notification.title));
        self.schedule_expiry(notification.id.clone());
        notification
    }

    fn schedule_expiry(&self, id: String) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let entries: Weak<Mutex<Vec<Notification>>> = Arc::downgrade(&self.entries);
        let ttl = self.ttl;
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(entries) = entries.upgrade() {
                remove_by_id(&entries, &id);
            }
        });
    }

    pub fn dismiss_notification(&self, id: &str) {
        remove_by_id(&self.entries, id);
    }

    pub fn clear_all_notifications(&self) {
        lock(&self.entries).clear();
    }

    /// Drops every notification tied to `alert_id` and returns the route to open.
    pub fn navigate_to_alert(&self, alert_id: &str) -> &'static str {
        lock(&self.entries).retain(|n| n.alert_id.as_deref() != Some(alert_id));
        SIMULATION_ROUTE
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
