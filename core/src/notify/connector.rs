use crate::model::SimulationAlert;
use crate::notify::store::{NotificationDraft, NotificationStore};
use crate::store::SimulationStore;
use std::sync::Arc;

/// Bridges store alerts into toast notifications through the store's single
/// callback slot.
pub struct NotificationConnector;

impl NotificationConnector {
    pub fn attach(store: &SimulationStore, notifications: NotificationStore) {
        store.set_notification_callback(Some(Arc::new(move |alert: &SimulationAlert| {
            notifications.add_notification(NotificationDraft::from_alert(alert));
        })));
    }

    pub fn detach(store: &SimulationStore) {
        store.set_notification_callback(None);
    }
}
