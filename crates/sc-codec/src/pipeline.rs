//! Compress/decompress entry points.
//!
//! Failures are returned as `Err(CodecError)` after a warning is logged;
//! callers treat them exactly like an absent value.

use crate::table::{self, CodecPair};
use crate::text;
use crate::trace::{self, CodecSpan, Operation};
use sc_core::{CodecError, CodecResult, Encoding, Payload};
use serde::Serialize;

/// Compress a payload into base64 text. `Encoding::None` returns `value`
/// as given.
pub fn compress(value: Payload, encoding: Encoding) -> CodecResult<Payload> {
    compress_traced(value, encoding, trace::enabled())
}

/// Reverse [`compress`]. `Encoding::None` returns the text as a string
/// payload without parsing it.
pub fn decompress(text: &str, encoding: Encoding) -> CodecResult<Payload> {
    decompress_traced(text, encoding, trace::enabled())
}

/// [`compress`] with an explicit trace switch.
pub fn compress_traced(value: Payload, encoding: Encoding, trace: bool) -> CodecResult<Payload> {
    let Some(codec) = table::codec_for(encoding) else {
        return Ok(value);
    };

    let span = CodecSpan::new(Operation::Compress, encoding, trace);
    let result = span.in_scope(|| encode(&value, codec, &span));
    span.finish(result.is_ok());
    result.inspect_err(|e| warn_failure(Operation::Compress, encoding, e))
}

/// [`decompress`] with an explicit trace switch.
pub fn decompress_traced(text: &str, encoding: Encoding, trace: bool) -> CodecResult<Payload> {
    let Some(codec) = table::codec_for(encoding) else {
        return Ok(Payload::String(text.to_string()));
    };

    let span = CodecSpan::new(Operation::Decompress, encoding, trace);
    let result = span.in_scope(|| decode(text, codec, &span));
    span.finish(result.is_ok());
    result.inspect_err(|e| warn_failure(Operation::Decompress, encoding, e))
}

/// Convert any serializable value into a payload, then [`compress`] it.
pub fn compress_serializable<T: Serialize + ?Sized>(value: &T, encoding: Encoding) -> CodecResult<Payload> {
    let payload = serde_json::to_value(value)
        .map_err(CodecError::Serialize)
        .inspect_err(|e| warn_failure(Operation::Compress, encoding, e))?;
    compress(payload, encoding)
}

/// [`compress_traced`] on the blocking pool.
pub async fn compress_async(value: Payload, encoding: Encoding, trace: bool) -> CodecResult<Payload> {
    if encoding.is_passthrough() {
        return Ok(value);
    }
    let parent = tracing::Span::current();
    tokio::task::spawn_blocking(move || parent.in_scope(|| compress_traced(value, encoding, trace)))
        .await
        .map_err(|e| CodecError::Task(e.to_string()))
        .inspect_err(|e| warn_failure(Operation::Compress, encoding, e))?
}

/// [`decompress_traced`] on the blocking pool.
pub async fn decompress_async(text: String, encoding: Encoding, trace: bool) -> CodecResult<Payload> {
    if encoding.is_passthrough() {
        return Ok(Payload::String(text));
    }
    let parent = tracing::Span::current();
    tokio::task::spawn_blocking(move || parent.in_scope(|| decompress_traced(&text, encoding, trace)))
        .await
        .map_err(|e| CodecError::Task(e.to_string()))
        .inspect_err(|e| warn_failure(Operation::Decompress, encoding, e))?
}

fn encode(value: &Payload, codec: &CodecPair, span: &CodecSpan) -> CodecResult<Payload> {
    let json = serde_json::to_vec(value).map_err(CodecError::Serialize)?;
    span.record_serialized(json.len());

    let bytes = (codec.compress)(&json).map_err(|source| CodecError::Codec { codec: codec.name, source })?;
    span.record_compressed(bytes.len());

    let encoded = text::encode(&bytes);
    span.record_encoded(encoded.len());
    Ok(Payload::String(encoded))
}

fn decode(encoded: &str, codec: &CodecPair, span: &CodecSpan) -> CodecResult<Payload> {
    span.record_encoded(encoded.len());
    let bytes = text::decode(encoded)?;
    span.record_compressed(bytes.len());

    let raw = (codec.decompress)(&bytes).map_err(|source| CodecError::Codec { codec: codec.name, source })?;
    span.record_serialized(raw.len());

    let json = String::from_utf8(raw)?;
    serde_json::from_str(&json).map_err(CodecError::Parse)
}

fn warn_failure(op: Operation, encoding: Encoding, error: &CodecError) {
    match op {
        Operation::Compress => {
            tracing::warn!(operation = op.as_str(), %encoding, %error, "unable to compress data")
        }
        Operation::Decompress => {
            tracing::warn!(operation = op.as_str(), %encoding, %error, "unable to decompress data")
        }
    }
}
