//! Shared vocabulary for the storage compression layer: encodings, payloads,
//! errors and configuration.

pub mod config;
pub mod encoding;
pub mod error;
pub mod payload;

pub use config::CompressionConfig;
pub use encoding::Encoding;
pub use error::{CodecError, CodecResult, Result, StorageError};
pub use payload::{Payload, TransactionOptions};
