//! Progress stores
//!
//! - `MemoryStore`: JSON text held in memory (tests, embedding)
//! - `FileStore`: JSON file on disk, written via temp file + rename (native)
//! - `LocalStorageStore`: browser LocalStorage (WASM only)

use std::path::{Path, PathBuf};

use super::Progress;
use crate::error::ProgressError;

/// Storage key shared by every store
pub const SAVE_KEY: &str = "smashloop-save";

/// Port through which progress is loaded and saved
///
/// `load` never fails: an absent record yields defaults and a corrupted one
/// is merged with defaults. `save` overwrites the record wholesale.
pub trait ProgressStore {
    fn load(&self) -> Progress;
    fn save(&mut self, progress: &Progress) -> Result<(), ProgressError>;
}

/// In-memory store holding the serialized record
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<String>,
    saves: usize,
}

impl MemoryStore {
    /// Empty store; loads return defaults
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record
    pub fn new(progress: Progress) -> Self {
        Self {
            record: serde_json::to_string(&progress).ok(),
            saves: 0,
        }
    }

    /// Store holding raw text, valid or not
    pub fn from_raw(record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            saves: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Progress {
        match &self.record {
            Some(json) => Progress::from_json_or_default(json),
            None => Progress::default(),
        }
    }

    fn save(&mut self, progress: &Progress) -> Result<(), ProgressError> {
        self.record = Some(progress.to_json()?);
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProgressStore for FileStore {
    fn load(&self) -> Progress {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => {
                log::info!("Loaded progress from {}", self.path.display());
                Progress::from_json_or_default(&json)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No progress at {}, starting fresh", self.path.display());
                Progress::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                Progress::default()
            }
        }
    }

    fn save(&mut self, progress: &Progress) -> Result<(), ProgressError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = progress.to_json()?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Progress saved ({} coins)", progress.coins);
        Ok(())
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ProgressStore for LocalStorageStore {
    fn load(&self) -> Progress {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(SAVE_KEY) {
                log::info!("Loaded progress from LocalStorage");
                return Progress::from_json_or_default(&json);
            }
        }

        log::info!("No saved progress found, starting fresh");
        Progress::default()
    }

    fn save(&mut self, progress: &Progress) -> Result<(), ProgressError> {
        let storage = Self::storage()
            .ok_or_else(|| ProgressError::Unavailable("LocalStorage".to_string()))?;
        let json = progress.to_json()?;
        storage
            .set_item(SAVE_KEY, &json)
            .map_err(|e| ProgressError::Unavailable(format!("{e:?}")))?;
        log::info!("Progress saved ({} coins)", progress.coins);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrades::UpgradeKey;
    use proptest::prelude::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("smashloop-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        assert_eq!(MemoryStore::empty().load(), Progress::default());
    }

    #[test]
    fn test_corrupted_record_loads_defaults() {
        let store = MemoryStore::from_raw("\u{0}garbage");
        assert_eq!(store.load(), Progress::default());
    }

    #[test]
    fn test_save_of_load_is_a_no_op() {
        let mut progress = Progress::default();
        progress.coins = 77;
        progress.set_level(UpgradeKey::PaddleWidth, 3);
        let mut store = MemoryStore::new(progress);
        let before = store.raw().unwrap().to_string();

        let loaded = store.load();
        store.save(&loaded).unwrap();
        assert_eq!(store.raw().unwrap(), before);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("roundtrip");
        let mut store = FileStore::new(&path);
        assert_eq!(store.load(), Progress::default());

        let mut progress = Progress::default();
        progress.coins = 310;
        progress.level = 2;
        progress.set_level(UpgradeKey::Missile, 1);
        store.save(&progress).unwrap();

        assert_eq!(FileStore::new(&path).load(), progress);
        assert!(!store.tmp_path().exists());
        let _ = std::fs::remove_file(&path);
    }

    proptest! {
        #[test]
        fn prop_load_of_save_reconstructs(
            coins in 0u64..1_000_000,
            level in 1u32..4,
            levels in proptest::collection::vec(0u32..4, 6),
        ) {
            let mut progress = Progress { coins, level, ..Progress::default() };
            for (key, l) in UpgradeKey::ALL.into_iter().zip(levels) {
                let max = crate::upgrades::catalog::find(key).unwrap().max_level;
                progress.set_level(key, l.min(max));
            }
            let mut store = MemoryStore::empty();
            store.save(&progress).unwrap();
            prop_assert_eq!(store.load(), progress);
        }
    }
}
