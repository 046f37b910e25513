use std::{cell::RefCell, collections::BTreeMap};

use crate::{traits::KeyValueStore, StoreError};

/// Storage that lives as long as the value does. Used as the session scope
/// outside of the browser
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use std::{cell::RefCell, collections::BTreeMap, path::PathBuf};

    use tracing::debug;

    use crate::{traits::KeyValueStore, StoreError};

    /// Persistent storage kept in a single RON file. The whole file is
    /// rewritten on every change
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        entries: RefCell<BTreeMap<String, String>>,
    }

    impl FileStore {
        /// Loads the existing entries, a missing file is treated as empty
        #[tracing::instrument(err(Debug))]
        pub fn open(path: PathBuf) -> Result<Self, StoreError> {
            let entries = match std::fs::read_to_string(&path) {
                Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
                Ok(contents) => ron::from_str(&contents)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("no storage file found, starting empty");
                    BTreeMap::new()
                }
                Err(e) => return Err(e.into()),
            };
            Ok(Self {
                path,
                entries: RefCell::new(entries),
            })
        }

        /// Writes `entries` to the file then makes them the current entries.
        /// Nothing changes in memory if the write fails
        fn commit(&self, entries: BTreeMap<String, String>) -> Result<(), StoreError> {
            let contents =
                ron::ser::to_string_pretty(&entries, ron::ser::PrettyConfig::default())?;
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, contents)?;
            *self.entries.borrow_mut() = entries;
            Ok(())
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            let mut entries = self.entries.borrow().clone();
            entries.insert(key.to_string(), value.to_string());
            self.commit(entries)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            if !self.entries.borrow().contains_key(key) {
                return Ok(());
            }
            let mut entries = self.entries.borrow().clone();
            entries.remove(key);
            self.commit(entries)
        }
    }
}
