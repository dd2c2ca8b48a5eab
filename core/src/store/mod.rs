//! Authoritative simulation state, its persisted snapshot and the sync outbox.

pub mod backend;
pub mod outbox;
pub mod state;
pub mod storage;

pub use backend::{BackendSync, HttpBackend, NullBackend};
pub use outbox::{FlushReport, SyncOutbox, SyncTask};
pub use state::{AlertCallback, ApplyOutcome, SimulationState, SimulationStore};
pub use storage::{FileStorage, MemoryStorage, PersistedSnapshot, SnapshotStorage, STORAGE_KEY};
