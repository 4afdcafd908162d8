//! zlib-family codecs via flate2.
//!
//! `deflate` and `gzip` differ only in framing, so both decode through
//! [`inflate`], which picks the decoder from the stream header.

use flate2::read::{MultiGzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::io::{self, Read, Write};

/// First two bytes of every gzip member.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compress into a zlib-wrapped deflate stream.
pub fn deflate(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(input)?;
    enc.finish()
}

/// Compress into a single gzip member.
pub fn gzip(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(input)?;
    enc.finish()
}

/// Decompress either a zlib stream or gzip members.
pub fn inflate(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    if input.starts_with(&GZIP_MAGIC) {
        MultiGzDecoder::new(input).read_to_end(&mut out)?;
    } else {
        ZlibDecoder::new(input).read_to_end(&mut out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_has_zlib_header() {
        let out = deflate(b"hello hello hello").unwrap();
        assert_eq!(out[0], 0x78);
        assert_eq!(inflate(&out).unwrap(), b"hello hello hello");
    }

    #[test]
    fn test_gzip_has_magic() {
        let out = gzip(b"hello").unwrap();
        assert!(out.starts_with(&GZIP_MAGIC));
        assert_eq!(inflate(&out).unwrap(), b"hello");
    }

    #[test]
    fn test_inflate_garbage() {
        assert!(inflate(b"definitely not zlib").is_err());
    }
}
