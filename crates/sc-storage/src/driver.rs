//! Backend contract for key-value drivers.
//!
//! Lookups are required. Writes, removal, clearing, disposal and change
//! notification are optional capabilities: a driver exposes each one through
//! an accessor returning `Some` only when it supports it.

use async_trait::async_trait;
use sc_core::{Payload, Result, TransactionOptions};
use std::fmt;
use std::sync::Arc;

/// Kind of change reported to watchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    Update,
    Remove,
}

impl WatchEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

pub type WatchCallback = Arc<dyn Fn(WatchEvent, &str) + Send + Sync>;

/// Handle returned by [`Watcher::watch`]; calling [`Unwatch::unwatch`] stops
/// the subscription.
pub struct Unwatch(Box<dyn FnOnce() + Send>);

impl Unwatch {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn unwatch(self) {
        (self.0)()
    }
}

impl fmt::Debug for Unwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unwatch")
    }
}

#[async_trait]
pub trait Driver: Send + Sync {
    fn name(&self) -> &str;

    async fn has_item(&self, key: &str, opts: &TransactionOptions) -> Result<bool>;

    /// `Ok(None)` when the key holds no value.
    async fn get_item(&self, key: &str, opts: &TransactionOptions) -> Result<Option<Payload>>;

    /// Keys starting with `base`; an empty base lists everything.
    async fn get_keys(&self, base: &str, opts: &TransactionOptions) -> Result<Vec<String>>;

    fn writer(&self) -> Option<&dyn ItemWriter> {
        None
    }

    fn remover(&self) -> Option<&dyn ItemRemover> {
        None
    }

    fn clearer(&self) -> Option<&dyn Clearer> {
        None
    }

    fn disposer(&self) -> Option<&dyn Disposer> {
        None
    }

    fn watcher(&self) -> Option<&dyn Watcher> {
        None
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            write: self.writer().is_some(),
            remove: self.remover().is_some(),
            clear: self.clearer().is_some(),
            dispose: self.disposer().is_some(),
            watch: self.watcher().is_some(),
        }
    }
}

#[async_trait]
pub trait ItemWriter: Send + Sync {
    async fn set_item(&self, key: &str, value: Payload, opts: &TransactionOptions) -> Result<()>;
}

#[async_trait]
pub trait ItemRemover: Send + Sync {
    async fn remove_item(&self, key: &str, opts: &TransactionOptions) -> Result<()>;
}

#[async_trait]
pub trait Clearer: Send + Sync {
    /// Remove every key starting with `base`.
    async fn clear(&self, base: &str, opts: &TransactionOptions) -> Result<()>;
}

#[async_trait]
pub trait Disposer: Send + Sync {
    async fn dispose(&self) -> Result<()>;
}

#[async_trait]
pub trait Watcher: Send + Sync {
    async fn watch(&self, callback: WatchCallback) -> Result<Unwatch>;
}

/// Optional capabilities a driver supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub write: bool,
    pub remove: bool,
    pub clear: bool,
    pub dispose: bool,
    pub watch: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self { write: true, remove: true, clear: true, dispose: true, watch: true }
    }

    pub fn read_only() -> Self {
        Self::default()
    }
}

/// Normalize a key: `/` and `\` become `:`, empty segments are dropped.
pub fn normalize_key(key: &str) -> String {
    key.split([':', '/', '\\'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("a/b:c"), "a:b:c");
        assert_eq!(normalize_key(":a::b/"), "a:b");
        assert_eq!(normalize_key("a\\b"), "a:b");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_unwatch_runs_once() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let handle = Unwatch::new(move || flag.store(true, Ordering::SeqCst));
        assert!(!called.load(Ordering::SeqCst));
        handle.unwatch();
        assert!(called.load(Ordering::SeqCst));
        Unwatch::noop().unwatch();
    }

    #[test]
    fn test_capability_presets() {
        assert!(Capabilities::all().watch);
        assert_eq!(Capabilities::read_only(), Capabilities::default());
        assert_eq!(WatchEvent::Remove.as_str(), "remove");
    }
}
