//! Optional codec tracing.
//!
//! When enabled, every compress/decompress runs inside a `tracing` span that
//! records payload sizes, and a debug event reports the elapsed time. When
//! disabled no span is created at all.

use sc_core::{CompressionConfig, Encoding};
use std::sync::LazyLock;
use std::time::Instant;
use tracing::field::Empty;
use tracing::Span;

static TRACE_ENABLED: LazyLock<bool> = LazyLock::new(|| CompressionConfig::from_env().trace);

/// Whether `STORAGE_COMPRESSION_TRACE` switched tracing on for this process.
pub fn enabled() -> bool {
    *TRACE_ENABLED
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::Decompress => "decompress",
        }
    }
}

/// Span guard for a single codec call. Inert when tracing is off.
pub struct CodecSpan {
    span: Option<Span>,
    start: Instant,
}

impl CodecSpan {
    pub fn new(op: Operation, encoding: Encoding, enabled: bool) -> Self {
        let span = enabled.then(|| match op {
            Operation::Compress => tracing::info_span!(
                target: "sc_codec",
                "compress",
                encoding = %encoding,
                serialized_size = Empty,
                compressed_size = Empty,
                encoded_size = Empty,
            ),
            Operation::Decompress => tracing::info_span!(
                target: "sc_codec",
                "decompress",
                encoding = %encoding,
                serialized_size = Empty,
                compressed_size = Empty,
                encoded_size = Empty,
            ),
        });
        Self { span, start: Instant::now() }
    }

    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.span {
            Some(span) => span.in_scope(f),
            None => f(),
        }
    }

    /// Size of the JSON text.
    pub fn record_serialized(&self, len: usize) {
        self.record("serialized_size", len);
    }

    /// Size of the codec output.
    pub fn record_compressed(&self, len: usize) {
        self.record("compressed_size", len);
    }

    /// Size of the base64 text.
    pub fn record_encoded(&self, len: usize) {
        self.record("encoded_size", len);
    }

    fn record(&self, field: &str, len: usize) {
        if let Some(span) = &self.span {
            span.record(field, len as u64);
        }
    }

    pub fn finish(self, ok: bool) {
        if let Some(span) = self.span {
            let elapsed_us = self.start.elapsed().as_micros() as u64;
            span.in_scope(|| tracing::debug!(target: "sc_codec", elapsed_us, ok, "codec call finished"));
        }
    }
}
