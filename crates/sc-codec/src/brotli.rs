//! Brotli codec.

use ::brotli::enc::BrotliEncoderParams;
use std::io;

/// Maximum quality, matching the common platform default.
pub const QUALITY: i32 = 11;
/// Window size (log2).
pub const LG_WINDOW: i32 = 22;

pub fn compress(input: &[u8]) -> io::Result<Vec<u8>> {
    let params = BrotliEncoderParams {
        quality: QUALITY,
        lgwin: LG_WINDOW,
        ..Default::default()
    };
    let mut out = Vec::new();
    ::brotli::BrotliCompress(&mut &input[..], &mut out, &params)?;
    Ok(out)
}

pub fn decompress(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    ::brotli::BrotliDecompress(&mut &input[..], &mut out)?;
    Ok(out)
}
