//! Filesystem driver.
//!
//! Each key is one file under the root directory; `:` separated key segments
//! map to nested directories. Values are written atomically through a
//! uniquely named temp file and a rename.

use crate::driver::{normalize_key, Clearer, Disposer, Driver, ItemRemover, ItemWriter};
use async_trait::async_trait;
use sc_core::{Payload, Result, StorageError, TransactionOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const TMP_SUFFIX: &str = ".tmp";

pub struct FsDriver {
    root: PathBuf,
}

impl FsDriver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a key to its file path. Keys may not escape the root.
    pub fn key_to_path(&self, key: &str) -> Result<PathBuf> {
        let normalized = normalize_key(key);
        if normalized.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let mut path = self.root.clone();
        for segment in normalized.split(':') {
            if segment == "." || segment == ".." {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
            path.push(segment);
        }
        Ok(path)
    }

    fn path_to_key(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        Some(segments.join(":"))
    }

    #[async_recursion::async_recursion]
    async fn walk(&self, current: &Path, out: &mut Vec<String>) -> Result<()> {
        let mut rd = match fs::read_dir(current).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = rd.next_entry().await? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let meta = entry.metadata().await?;
            if meta.is_dir() {
                self.walk(&path, out).await?;
            } else if !is_temp_file(&name) {
                if let Some(key) = self.path_to_key(&path) {
                    out.push(key);
                }
            }
        }
        Ok(())
    }
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TMP_SUFFIX)
}

fn is_not_found(e: &std::io::Error) -> bool {
    e.kind() == ErrorKind::NotFound
}

#[async_trait]
impl Driver for FsDriver {
    fn name(&self) -> &str {
        "fs"
    }

    async fn has_item(&self, key: &str, _opts: &TransactionOptions) -> Result<bool> {
        let path = self.key_to_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_item(&self, key: &str, _opts: &TransactionOptions) -> Result<Option<Payload>> {
        let path = self.key_to_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(Payload::String(text))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => match fs::metadata(&path).await {
                // A key that is only a prefix of other keys maps to a directory.
                Ok(meta) if meta.is_dir() => Ok(None),
                _ => Err(StorageError::Backend(format!("read {key}: {e}"))),
            },
        }
    }

    async fn get_keys(&self, base: &str, _opts: &TransactionOptions) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        self.walk(&self.root, &mut keys).await?;
        let base = normalize_key(base);
        keys.retain(|k| k.starts_with(&base));
        keys.sort();
        Ok(keys)
    }

    fn writer(&self) -> Option<&dyn ItemWriter> {
        Some(self)
    }

    fn remover(&self) -> Option<&dyn ItemRemover> {
        Some(self)
    }

    fn clearer(&self) -> Option<&dyn Clearer> {
        Some(self)
    }

    fn disposer(&self) -> Option<&dyn Disposer> {
        Some(self)
    }
}

#[async_trait]
impl ItemWriter for FsDriver {
    async fn set_item(&self, key: &str, value: Payload, _opts: &TransactionOptions) -> Result<()> {
        let path = self.key_to_path(key)?;
        let text = match value {
            Payload::String(text) => text,
            other => other.to_string(),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Backend(format!("mkdir {}: {e}", parent.display())))?;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let tmp_path = path.with_file_name(format!(".{file_name}.{}{TMP_SUFFIX}", uuid::Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, text.as_bytes()).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::Backend(format!("write {key}: {e}")));
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::Backend(format!("rename {key}: {e}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRemover for FsDriver {
    async fn remove_item(&self, key: &str, _opts: &TransactionOptions) -> Result<()> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(StorageError::Backend(format!("remove {key}: {e}"))),
        }
    }
}

#[async_trait]
impl Clearer for FsDriver {
    async fn clear(&self, base: &str, opts: &TransactionOptions) -> Result<()> {
        for key in self.get_keys(base, opts).await? {
            self.remove_item(&key, opts).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Disposer for FsDriver {
    /// Nothing is held open between calls.
    async fn dispose(&self) -> Result<()> {
        Ok(())
    }
}
