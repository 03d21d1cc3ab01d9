//! Parameter model returned by the remote store.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A name/value pair retrieved from the parameter store.
///
/// Values are opaque strings and may hold decrypted secrets, so the `Debug`
/// output redacts them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Fully qualified name as known to the store.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl Parameter {
    /// Creates a new parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Mapping from (unprefixed) key to value.
pub type ParameterMap = HashMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_value() {
        let param = Parameter::new("db-password", "hunter2");
        let debug = format!("{param:?}");
        assert!(debug.contains("db-password"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_serde_round_trip_field_names() {
        let json = serde_json::to_string(&Parameter::new("a", "b")).unwrap();
        assert_eq!(json, r#"{"name":"a","value":"b"}"#);
    }
}
