//! Local key-value persistence.
//!
//! Every value lives under a single string key. The file store keeps one
//! file per key inside the data directory:
//!
//! ```text
//! <data_dir>/
//!   task_manager_tasks   # JSON array of tasks
//!   theme                # "light" or "dark"
//! ```

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
#[cfg(test)]
use std::rc::Rc;

use crate::error::Result;
use crate::task::Task;

pub const TASKS_KEY: &str = "task_manager_tasks";
pub const THEME_KEY: &str = "theme";

/// Synchronous text store addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory store; clones share the same map.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store whose writes always fail, as a full disk or exhausted quota would.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(io::Error::other("quota exceeded").into())
    }
}

/// Reads and writes the whole task list as one JSON blob.
#[derive(Debug, Clone)]
pub struct TaskStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> TaskStorage<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: TASKS_KEY.to_string(),
        }
    }

    /// Never fails: unreadable or corrupt data is logged and treated as empty.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "Failed reading tasks");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "Failed reading tasks");
                Vec::new()
            }
        }
    }

    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let data = serde_json::to_string(tasks)?;
        self.store.set(&self.key, &data)?;
        tracing::debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }
}
