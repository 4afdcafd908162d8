//! Storage drivers and the compression decorator.
//!
//! [`CompressionDriver`] wraps any [`Driver`] and compresses values on the way
//! in, decompresses them on the way out, and forwards everything else.

pub mod compression;
pub mod driver;
pub mod fs;
pub mod memory;

pub use compression::{CompressionDriver, CompressionDriverOptions, DRIVER_NAME};
pub use driver::{
    Capabilities, Clearer, Disposer, Driver, ItemRemover, ItemWriter, Unwatch, WatchCallback,
    WatchEvent, Watcher,
};
pub use fs::FsDriver;
pub use memory::MemoryDriver;
