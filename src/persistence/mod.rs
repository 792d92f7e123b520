//! Progress persistence
//!
//! Features:
//! - Versionless camelCase JSON record (`coins`, `level`, `upgrades`)
//! - Lenient loading: missing or invalid fields merge from defaults
//! - Atomic file writes (tmp → save)
//! - Injected store so the simulation never touches storage directly

pub mod progress;
pub mod store;

pub use progress::Progress;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::{FileStore, MemoryStore, ProgressStore, SAVE_KEY};
