use crate::core::Storage;
use crate::utils::error::{Result, RuleError};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

/// Filesystem storage. Relative paths resolve against `base_path`.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: Option<PathBuf>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self { base_path: None }
    }

    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.base_path {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_to_string(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path);
        fs::read_to_string(&full_path).map_err(|e| RuleError::io(path, e))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RuleError::io(path, e))?;
        }

        fs::write(&full_path, data).map_err(|e| RuleError::io(path, e))?;
        Ok(())
    }
}

/// In-memory storage keyed by path, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file. Owning the storage means no other holder can be mid-write,
    /// so a poisoned map is taken over as-is.
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), content.into().into_bytes());
        self
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }
}

fn not_found(path: &str) -> RuleError {
    RuleError::io(
        path,
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    )
}

fn poisoned(path: &str) -> RuleError {
    RuleError::io(path, std::io::Error::other("storage lock poisoned"))
}

impl Storage for MemoryStorage {
    async fn read_to_string(&self, path: &str) -> Result<String> {
        let files = self.files.read().map_err(|_| poisoned(path))?;
        let data = files.get(path).ok_or_else(|| not_found(path))?;
        String::from_utf8(data.clone()).map_err(|e| {
            RuleError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.write().map_err(|_| poisoned(path))?;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}
