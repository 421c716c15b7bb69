//! Persistent task tokens.
//!
//! The backend hands out one token per task at creation time, and reading the
//! task later requires it. Tokens are written once and only read afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use taskdash_core::TaskId;

use crate::error::StoreError;

/// Key prefix used for each task's token entry.
const KEY_PREFIX: &str = "task_token_";

/// Storage for task tokens keyed by task id.
pub trait TokenStore {
    /// Token for a task, if one was stored.
    fn get(&self, task_id: &TaskId) -> Result<Option<String>, StoreError>;

    /// Store the token for a task, replacing any previous one.
    fn put(&mut self, task_id: &TaskId, token: &str) -> Result<(), StoreError>;

    /// All stored `(task_id, token)` pairs, ordered by task id.
    fn entries(&self) -> Result<Vec<(TaskId, String)>, StoreError>;
}

/// Token store backed by a JSON file.
///
/// The file holds a flat object of `"task_token_{id}": "{token}"` entries.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    tokens: BTreeMap<String, String>,
}

impl FileTokenStore {
    /// Open the store at `path`. A missing file is treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tokens = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = tokens.len(), "Opened token store");
        Ok(Self { path, tokens })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.tokens)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, task_id: &TaskId) -> Result<Option<String>, StoreError> {
        Ok(self.tokens.get(&key(task_id)).cloned())
    }

    fn put(&mut self, task_id: &TaskId, token: &str) -> Result<(), StoreError> {
        self.tokens.insert(key(task_id), token.to_string());
        self.save()?;
        debug!(task_id = %task_id, path = %self.path.display(), "Stored task token");
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(TaskId, String)>, StoreError> {
        Ok(self
            .tokens
            .iter()
            .filter_map(|(k, token)| {
                k.strip_prefix(KEY_PREFIX)
                    .map(|id| (TaskId::new(id), token.clone()))
            })
            .collect())
    }
}

/// In-memory token store.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    tokens: BTreeMap<TaskId, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, task_id: &TaskId) -> Result<Option<String>, StoreError> {
        Ok(self.tokens.get(task_id).cloned())
    }

    fn put(&mut self, task_id: &TaskId, token: &str) -> Result<(), StoreError> {
        self.tokens.insert(task_id.clone(), token.to_string());
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(TaskId, String)>, StoreError> {
        Ok(self
            .tokens
            .iter()
            .map(|(id, token)| (id.clone(), token.clone()))
            .collect())
    }
}

fn key(task_id: &TaskId) -> String {
    format!("{}{}", KEY_PREFIX, task_id)
}
