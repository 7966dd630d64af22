use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::info;

use crate::error::{PaletteError, Result};

/// Where uploaded images live between the upload and later exclusion updates.
pub trait ImageStore {
    /// Persist `bytes` under a key derived from `name` and return the key.
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String>;
    /// Fetch previously stored bytes.
    fn retrieve(&self, key: &str) -> Result<Vec<u8>>;
}

fn not_found() -> PaletteError {
    PaletteError::MissingReference("Image file not found, please upload again.".into())
}

/// Reduce an uploaded file name to a bare file name usable as a key.
pub fn storage_key(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.to_string())
}

/// Flat directory of uploads keyed by file name. Same name overwrites.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        storage_key(key).map(|k| self.root.join(k))
    }
}

impl ImageStore for DirStore {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let key = storage_key(name).ok_or_else(|| {
            PaletteError::MissingReference("Missing image reference, please upload again.".into())
        })?;
        let path = self.root.join(&key);
        fs::write(&path, bytes)?;
        info!("stored {} bytes at {}", bytes.len(), path.display());
        Ok(key)
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key).ok_or_else(not_found)?;
        if !path.is_file() {
            return Err(not_found());
        }
        Ok(fs::read(path)?)
    }
}

/// In-memory store for tests and the browser build.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryStore {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let key = storage_key(name).ok_or_else(|| {
            PaletteError::MissingReference("Missing image reference, please upload again.".into())
        })?;
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.insert(key.clone(), bytes.to_vec());
        Ok(key)
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>> {
        let key = storage_key(key).ok_or_else(not_found)?;
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.get(&key).cloned().ok_or_else(not_found)
    }
}
