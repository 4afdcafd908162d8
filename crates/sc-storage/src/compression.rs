//! Compression decorator.
//!
//! [`CompressionDriver`] wraps another [`Driver`]: values are compressed before
//! they reach the backend and decompressed on the way out. Codec failures
//! never surface as errors. A value that cannot be compressed is not written,
//! and a stored value that cannot be decompressed reads as absent.

use crate::driver::{
    Clearer, Disposer, Driver, ItemRemover, ItemWriter, Unwatch, WatchCallback, Watcher,
};
use async_trait::async_trait;
use sc_codec::trace;
use sc_core::payload::is_missing;
use sc_core::{CodecError, CompressionConfig, Encoding, Payload, Result, TransactionOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DRIVER_NAME: &str = "compression";

/// Construction options, named after the fields callers configure.
#[derive(Clone)]
pub struct CompressionDriverOptions {
    pub passthrough_driver: Arc<dyn Driver>,
    pub encoding: Encoding,
}

pub struct CompressionDriver {
    backend: Arc<dyn Driver>,
    config: CompressionConfig,
}

impl CompressionDriver {
    pub fn new(backend: Arc<dyn Driver>, encoding: Encoding) -> Self {
        Self::with_config(backend, CompressionConfig::new(encoding))
    }

    pub fn from_options(options: CompressionDriverOptions) -> Self {
        Self::new(options.passthrough_driver, options.encoding)
    }

    pub fn with_config(backend: Arc<dyn Driver>, config: CompressionConfig) -> Self {
        Self { backend, config }
    }

    pub fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn Driver> {
        &self.backend
    }

    fn trace(&self) -> bool {
        self.config.trace || trace::enabled()
    }

    fn report_miss(&self, key: &str) {
        if self.config.warn_on_miss {
            warn!(driver = DRIVER_NAME, backend = self.backend.name(), key, "no value for key");
        } else {
            debug!(driver = DRIVER_NAME, backend = self.backend.name(), key, "no value for key");
        }
    }

    /// Read a value and deserialize it into `T`. A value of the wrong shape
    /// reads as absent.
    pub async fn get_item_as<T: DeserializeOwned>(
        &self,
        key: &str,
        opts: &TransactionOptions,
    ) -> Result<Option<T>> {
        let Some(payload) = self.get_item(key, opts).await? else {
            return Ok(None);
        };
        match serde_json::from_value(payload) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                warn!(driver = DRIVER_NAME, key, %error, "stored value has an unexpected shape");
                Ok(None)
            }
        }
    }

    /// Serialize `value` and store it. A value that cannot be represented as
    /// JSON is not written.
    pub async fn set_item_as<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        opts: &TransactionOptions,
    ) -> Result<()> {
        match serde_json::to_value(value) {
            Ok(payload) => self.set_item(key, payload, opts).await,
            Err(error) => {
                warn!(driver = DRIVER_NAME, key, %error, "unable to serialize value");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Driver for CompressionDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    async fn has_item(&self, key: &str, opts: &TransactionOptions) -> Result<bool> {
        self.backend.has_item(key, opts).await
    }

    async fn get_item(&self, key: &str, opts: &TransactionOptions) -> Result<Option<Payload>> {
        let stored = match self.backend.get_item(key, opts).await? {
            Some(stored) if !is_missing(Some(&stored)) => stored,
            _ => {
                self.report_miss(key);
                return Ok(None);
            }
        };

        let encoding = self.encoding();
        match stored {
            Payload::String(text) => {
                Ok(sc_codec::decompress_async(text, encoding, self.trace()).await.ok())
            }
            other if encoding.is_passthrough() => Ok(Some(other)),
            _ => {
                let error = CodecError::NotText;
                warn!(operation = "decompress", %encoding, %error, key, "unable to decompress data");
                Ok(None)
            }
        }
    }

    async fn get_keys(&self, base: &str, opts: &TransactionOptions) -> Result<Vec<String>> {
        self.backend.get_keys(base, opts).await
    }

    // Capabilities mirror the backend. Calling a missing one directly on the
    // decorator is still a no-op.
    fn writer(&self) -> Option<&dyn ItemWriter> {
        self.backend.writer().map(|_| self as &dyn ItemWriter)
    }

    fn remover(&self) -> Option<&dyn ItemRemover> {
        self.backend.remover().map(|_| self as &dyn ItemRemover)
    }

    fn clearer(&self) -> Option<&dyn Clearer> {
        self.backend.clearer().map(|_| self as &dyn Clearer)
    }

    fn disposer(&self) -> Option<&dyn Disposer> {
        self.backend.disposer().map(|_| self as &dyn Disposer)
    }

    fn watcher(&self) -> Option<&dyn Watcher> {
        self.backend.watcher().map(|_| self as &dyn Watcher)
    }
}

#[async_trait]
impl ItemWriter for CompressionDriver {
    async fn set_item(&self, key: &str, value: Payload, opts: &TransactionOptions) -> Result<()> {
        let encoding = self.encoding();
        let text = match sc_codec::compress_async(value, encoding, self.trace()).await {
            Ok(Payload::String(text)) => text,
            Ok(_) => {
                warn!(driver = DRIVER_NAME, %encoding, key, "unable to pass non-string value");
                return Ok(());
            }
            // Already reported by the codec pipeline.
            Err(_) => return Ok(()),
        };

        match self.backend.writer() {
            Some(writer) => writer.set_item(key, Payload::String(text), opts).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ItemRemover for CompressionDriver {
    async fn remove_item(&self, key: &str, opts: &TransactionOptions) -> Result<()> {
        match self.backend.remover() {
            Some(remover) => remover.remove_item(key, opts).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Clearer for CompressionDriver {
    async fn clear(&self, base: &str, opts: &TransactionOptions) -> Result<()> {
        match self.backend.clearer() {
            Some(clearer) => clearer.clear(base, opts).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Disposer for CompressionDriver {
    async fn dispose(&self) -> Result<()> {
        match self.backend.disposer() {
            Some(disposer) => disposer.dispose().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Watcher for CompressionDriver {
    async fn watch(&self, callback: WatchCallback) -> Result<Unwatch> {
        match self.backend.watcher() {
            Some(watcher) => watcher.watch(callback).await,
            None => Ok(Unwatch::noop()),
        }
    }
}
