use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compression encoding applied to stored values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Values are stored exactly as given.
    #[default]
    None,
    /// zlib-wrapped deflate stream.
    Deflate,
    /// gzip member.
    Gzip,
    Brotli,
}

impl Encoding {
    /// Every available encoding, in declaration order.
    pub const ALL: [Encoding; 4] = [Self::None, Self::Deflate, Self::Gzip, Self::Brotli];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Deflate => "deflate",
            Self::Gzip => "gzip",
            Self::Brotli => "brotli",
        }
    }

    /// True when values pass through untouched.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an encoding name is not one of the supported selectors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding: {0}")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "deflate" => Ok(Self::Deflate),
            "gzip" => Ok(Self::Gzip),
            "brotli" => Ok(Self::Brotli),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}
