//! Unified error type for parameter fetching and caching.

use thiserror::Error;

/// Errors raised while constructing clients, fetching parameters, or
/// validating fetched results.
///
/// The type is `Clone` so a single reload failure can be handed to every
/// refresh-error listener and still be returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    // ============ Construction Errors ============
    /// The key list passed to a client was empty.
    #[error("you need to provide a non-empty array of config keys")]
    InvalidKeys,

    /// The cache lifetime was zero.
    #[error("you need to specify an expiry (ms) greater than 0, or leave it undefined")]
    InvalidCacheLifetime,

    // ============ Lookup Errors ============
    /// The store did not return every requested key.
    #[error("missing keys: {}", .0.join(","))]
    MissingKeys(Vec<String>),

    /// A lookup named a key outside the client's key set.
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    // ============ Infrastructure Errors ============
    /// Remote parameter store failure.
    #[error("Parameter store error: {message}")]
    Store { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ParamError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidKeys => "INVALID_KEYS",
            Self::InvalidCacheLifetime => "INVALID_CACHE_LIFETIME",
            Self::MissingKeys(_) => "MISSING_KEYS",
            Self::UnknownKey(_) => "UNKNOWN_KEY",
            Self::Store { .. } => "PARAMETER_STORE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Creates a parameter store error.
    #[must_use]
    pub fn store<T: ToString>(message: T) -> Self {
        Self::Store {
            message: message.to_string(),
        }
    }

    /// Creates a missing keys error.
    #[must_use]
    pub fn missing_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingKeys(keys.into_iter().map(Into::into).collect())
    }

    /// Checks if this error came from the remote store rather than from
    /// argument or completeness checks.
    ///
    /// Stale fallback applies to every reload error; this only classifies the
    /// failure for logs and callers.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Store { .. })
    }

    /// Returns the missing key names for a [`ParamError::MissingKeys`] error.
    #[must_use]
    pub fn missing(&self) -> &[String] {
        match self {
            Self::MissingKeys(keys) => keys,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_message_is_comma_joined() {
        let err = ParamError::missing_keys(["B", "D"]);
        assert_eq!(err.to_string(), "missing keys: B,D");
        assert_eq!(err.missing(), ["B".to_string(), "D".to_string()]);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ParamError::InvalidKeys.error_code(), "INVALID_KEYS");
        assert_eq!(ParamError::InvalidCacheLifetime.error_code(), "INVALID_CACHE_LIFETIME");
        assert_eq!(ParamError::missing_keys(["A"]).error_code(), "MISSING_KEYS");
        assert_eq!(ParamError::UnknownKey("x".into()).error_code(), "UNKNOWN_KEY");
        assert_eq!(ParamError::store("boom").error_code(), "PARAMETER_STORE_ERROR");
    }

    #[test]
    fn test_retriable_errors() {
        assert!(ParamError::store("throttled").is_retriable());
        assert!(!ParamError::missing_keys(["A"]).is_retriable());
        assert!(!ParamError::InvalidKeys.is_retriable());
    }

    #[test]
    fn test_store_error_display() {
        let err = ParamError::store("connection reset");
        assert!(err.to_string().contains("connection reset"));
        assert!(err.missing().is_empty());
    }
}
