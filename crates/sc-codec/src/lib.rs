//! Codec pipeline: turns payloads into compact base64 text and back.
//!
//! Stages, applied in order on compress (reversed on decompress):
//! 1. JSON serialization of the payload
//! 2. Codec selected by [`Encoding`](sc_core::Encoding) (deflate, gzip, brotli)
//! 3. Base64 text encoding
//!
//! `Encoding::None` skips every stage and hands the value back untouched.

pub mod brotli;
pub mod pipeline;
pub mod table;
pub mod text;
pub mod trace;
pub mod zlib;

pub use pipeline::{
    compress, compress_async, compress_serializable, compress_traced, decompress,
    decompress_async, decompress_traced,
};
pub use table::{codec_for, CodecPair};
