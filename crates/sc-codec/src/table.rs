//! Encoding → codec lookup.

use sc_core::Encoding;
use std::io;

pub type CodecFn = fn(&[u8]) -> io::Result<Vec<u8>>;

/// A compress/decompress pair for one encoding.
#[derive(Clone, Copy)]
pub struct CodecPair {
    pub name: &'static str,
    pub compress: CodecFn,
    pub decompress: CodecFn,
}

impl std::fmt::Debug for CodecPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecPair").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Every compressing encoding. `deflate` and `gzip` share one inverse.
pub static CODEC_TABLE: [(Encoding, CodecPair); 3] = [
    (
        Encoding::Deflate,
        CodecPair { name: "deflate", compress: crate::zlib::deflate, decompress: crate::zlib::inflate },
    ),
    (
        Encoding::Gzip,
        CodecPair { name: "gzip", compress: crate::zlib::gzip, decompress: crate::zlib::inflate },
    ),
    (
        Encoding::Brotli,
        CodecPair { name: "brotli", compress: crate::brotli::compress, decompress: crate::brotli::decompress },
    ),
];

/// Codec for an encoding; `None` for the pass-through encoding.
pub fn codec_for(encoding: Encoding) -> Option<&'static CodecPair> {
    CODEC_TABLE
        .iter()
        .find(|(enc, _)| *enc == encoding)
        .map(|(_, pair)| pair)
}
