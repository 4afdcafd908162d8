use crate::encoding::Encoding;
use serde::{Deserialize, Serialize};

/// Selects the encoding used by a compression driver.
pub const ENV_ENCODING: &str = "STORAGE_COMPRESSION_ENCODING";
/// Enables codec trace spans.
pub const ENV_TRACE: &str = "STORAGE_COMPRESSION_TRACE";
/// Controls whether a backend miss is logged as a warning.
pub const ENV_WARN_ON_MISS: &str = "STORAGE_COMPRESSION_WARN_ON_MISS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub encoding: Encoding,
    /// Report compress/decompress spans to the tracing collector.
    pub trace: bool,
    /// Log a warning when the backend has no value for a key.
    pub warn_on_miss: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::None,
            trace: false,
            warn_on_miss: true,
        }
    }
}

impl CompressionConfig {
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding, ..Self::default() }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_warn_on_miss(mut self, warn: bool) -> Self {
        self.warn_on_miss = warn;
        self
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unparseable values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_ENCODING) {
            match raw.parse::<Encoding>() {
                Ok(encoding) => config.encoding = encoding,
                Err(e) => tracing::warn!(variable = ENV_ENCODING, error = %e, "ignoring invalid encoding"),
            }
        }
        if let Some(raw) = lookup(ENV_TRACE) {
            config.trace = parse_toggle(&raw).unwrap_or(config.trace);
        }
        if let Some(raw) = lookup(ENV_WARN_ON_MISS) {
            config.warn_on_miss = parse_toggle(&raw).unwrap_or(config.warn_on_miss);
        }
        config
    }
}

/// Parse a boolean environment toggle.
pub fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        other => {
            tracing::warn!(value = other, "ignoring invalid toggle");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CompressionConfig::default();
        assert_eq!(config.encoding, Encoding::None);
        assert!(!config.trace);
        assert!(config.warn_on_miss);
    }

    #[test]
    fn test_from_lookup() {
        let config = CompressionConfig::from_lookup(lookup(&[
            (ENV_ENCODING, "brotli"),
            (ENV_TRACE, "on"),
            (ENV_WARN_ON_MISS, "0"),
        ]));
        assert_eq!(config.encoding, Encoding::Brotli);
        assert!(config.trace);
        assert!(!config.warn_on_miss);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = CompressionConfig::from_lookup(lookup(&[
            (ENV_ENCODING, "lzma"),
            (ENV_TRACE, "maybe"),
        ]));
        assert_eq!(config, CompressionConfig::default());
    }

    #[test]
    fn test_parse_toggle() {
        assert_eq!(parse_toggle("TRUE"), Some(true));
        assert_eq!(parse_toggle("yes"), Some(true));
        assert_eq!(parse_toggle("off"), Some(false));
        assert_eq!(parse_toggle("2"), None);
    }

    #[test]
    fn test_serde_partial() {
        let config: CompressionConfig = serde_json::from_str(r#"{"encoding":"gzip"}"#).unwrap();
        assert_eq!(config.encoding, Encoding::Gzip);
        assert!(config.warn_on_miss);
        let builder = CompressionConfig::new(Encoding::Deflate).with_trace(true).with_warn_on_miss(false);
        assert_eq!(builder.encoding, Encoding::Deflate);
        assert!(builder.trace);
        assert!(!builder.warn_on_miss);
    }
}
