//! Values exchanged with storage drivers.

/// The logical value a caller stores and retrieves: a string, number or
/// structured JSON value.
pub type Payload = serde_json::Value;

/// Driver-specific options, forwarded verbatim to the wrapped backend.
pub type TransactionOptions = serde_json::Map<String, serde_json::Value>;

/// A stored value counts as missing when it is absent or JSON `null`.
pub fn is_missing(value: Option<&Payload>) -> bool {
    matches!(value, None | Some(Payload::Null))
}
