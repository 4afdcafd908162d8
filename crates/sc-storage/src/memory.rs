//! In-memory driver. Supports every capability.

use crate::driver::{
    Clearer, Disposer, Driver, ItemRemover, ItemWriter, Unwatch, WatchCallback, WatchEvent, Watcher,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use sc_core::{Payload, Result, TransactionOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Listeners = Arc<RwLock<HashMap<u64, WatchCallback>>>;

pub struct MemoryDriver {
    data: RwLock<HashMap<String, Payload>>,
    listeners: Listeners,
    next_listener: AtomicU64,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            listeners: Arc::new(RwLock::new(HashMap::new())),
            next_listener: AtomicU64::new(0),
        }
    }

    /// Raw stored value, bypassing any decorator.
    pub fn raw(&self, key: &str) -> Option<Payload> {
        self.data.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(&self, event: WatchEvent, keys: &[String]) {
        // Snapshot so callbacks may (un)subscribe without deadlocking.
        let listeners: Vec<WatchCallback> = self.listeners.read().values().cloned().collect();
        for key in keys {
            for listener in &listeners {
                listener(event, key);
            }
        }
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    async fn has_item(&self, key: &str, _opts: &TransactionOptions) -> Result<bool> {
        Ok(self.data.read().contains_key(key))
    }

    async fn get_item(&self, key: &str, _opts: &TransactionOptions) -> Result<Option<Payload>> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn get_keys(&self, base: &str, _opts: &TransactionOptions) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .data
            .read()
            .keys()
            .filter(|k| k.starts_with(base))
            .cloned()
            .collect();
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

    fn watcher(&self) -> Option<&dyn Watcher> {
        Some(self)
    }
}

#[async_trait]
impl ItemWriter for MemoryDriver {
    async fn set_item(&self, key: &str, value: Payload, _opts: &TransactionOptions) -> Result<()> {
        self.data.write().insert(key.to_string(), value);
        self.notify(WatchEvent::Update, &[key.to_string()]);
        Ok(())
    }
}

#[async_trait]
impl ItemRemover for MemoryDriver {
    async fn remove_item(&self, key: &str, _opts: &TransactionOptions) -> Result<()> {
        let removed = self.data.write().remove(key).is_some();
        if removed {
            self.notify(WatchEvent::Remove, &[key.to_string()]);
        }
        Ok(())
    }
}

#[async_trait]
impl Clearer for MemoryDriver {
    async fn clear(&self, base: &str, _opts: &TransactionOptions) -> Result<()> {
        let removed: Vec<String> = {
            let mut data = self.data.write();
            let keys: Vec<String> = data.keys().filter(|k| k.starts_with(base)).cloned().collect();
            for key in &keys {
                data.remove(key);
            }
            keys
        };
        self.notify(WatchEvent::Remove, &removed);
        Ok(())
    }
}

#[async_trait]
impl Disposer for MemoryDriver {
    async fn dispose(&self) -> Result<()> {
        self.data.write().clear();
        self.listeners.write().clear();
        Ok(())
    }
}

#[async_trait]
impl Watcher for MemoryDriver {
    async fn watch(&self, callback: WatchCallback) -> Result<Unwatch> {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().insert(id, callback);
        let listeners = Arc::clone(&self.listeners);
        Ok(Unwatch::new(move || {
            listeners.write().remove(&id);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Capabilities;
    use serde_json::json;

    fn opts() -> TransactionOptions {
        TransactionOptions::new()
    }

    #[tokio::test]
    async fn test_set_get_has() {
        let driver = MemoryDriver::new();
        driver.set_item("a", json!("x"), &opts()).await.unwrap();
        assert!(driver.has_item("a", &opts()).await.unwrap());
        assert_eq!(driver.get_item("a", &opts()).await.unwrap(), Some(json!("x")));
        assert_eq!(driver.get_item("missing", &opts()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_by_prefix() {
        let driver = MemoryDriver::new();
        for key in ["cache:b", "cache:a", "other:c"] {
            driver.set_item(key, json!(1), &opts()).await.unwrap();
        }
        assert_eq!(driver.get_keys("cache:", &opts()).await.unwrap(), vec!["cache:a", "cache:b"]);
        assert_eq!(driver.get_keys("", &opts()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let driver = MemoryDriver::new();
        for key in ["a:1", "a:2", "b:1"] {
            driver.set_item(key, json!(true), &opts()).await.unwrap();
        }
        driver.remove_item("b:1", &opts()).await.unwrap();
        assert_eq!(driver.len(), 2);
        driver.clear("a:", &opts()).await.unwrap();
        assert!(driver.is_empty());
    }

    #[tokio::test]
    async fn test_watch_and_unwatch() {
        let driver = MemoryDriver::new();
        let seen: Arc<parking_lot::Mutex<Vec<(WatchEvent, String)>>> = Arc::default();
        let sink = seen.clone();
        let unwatch = driver
            .watch(Arc::new(move |event: WatchEvent, key: &str| sink.lock().push((event, key.to_string()))))
            .await
            .unwrap();

        driver.set_item("k", json!(1), &opts()).await.unwrap();
        driver.remove_item("k", &opts()).await.unwrap();
        driver.remove_item("k", &opts()).await.unwrap();
        unwatch.unwatch();
        driver.set_item("k", json!(2), &opts()).await.unwrap();

        assert_eq!(
            *seen.lock(),
            vec![(WatchEvent::Update, "k".to_string()), (WatchEvent::Remove, "k".to_string())]
        );
    }

    #[tokio::test]
    async fn test_dispose_drops_everything() {
        let driver = MemoryDriver::new();
        driver.set_item("k", json!(1), &opts()).await.unwrap();
        driver.dispose().await.unwrap();
        assert!(driver.is_empty());
        assert_eq!(driver.capabilities(), Capabilities::all());
    }
}
