// ABOUTME: Key/value persistence for conversation state — a local-storage style string map.
// ABOUTME: FileStorage keeps one JSON object per profile and rewrites it atomically on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// String key/value storage scoped to one profile.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Storage backed by a JSON file on disk.
///
/// The whole map is written on each mutation (tmp file + rename), so the file
/// is never left half-written. Concurrent processes are not coordinated: the
/// last writer wins.
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file, starting empty if it does not exist yet.
    ///
    /// A file that is not a JSON string map is moved aside to
    /// `<name>.json.corrupt` and the storage starts empty.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let entries = if path.exists() {
            let content = std::fs::read(path)?;
            if content.iter().all(u8::is_ascii_whitespace) {
                BTreeMap::new()
            } else {
                match serde_json::from_slice(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        quarantine(path, &e);
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&tmp_path, &content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

}

fn quarantine(path: &Path, error: &serde_json::Error) {
    let aside = path.with_extension("json.corrupt");
    match std::fs::rename(path, &aside) {
        Ok(()) => tracing::warn!(
            error = %error,
            moved_to = %aside.display(),
            "unreadable storage file moved aside, starting empty"
        ),
        Err(rename_err) => tracing::warn!(
            error = %error,
            rename_error = %rename_err,
            path = %path.display(),
            "unreadable storage file, starting empty"
        ),
    }
}

/// In-memory storage. Clones share the same map, which lets a test "reload"
/// a store from what a previous instance persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
