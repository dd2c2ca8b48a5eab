pub mod connector;
pub mod store;

pub use connector::NotificationConnector;
pub use store::{
    Notification, NotificationDraft, NotificationLevel, NotificationStore, SIMULATION_ROUTE,
};
