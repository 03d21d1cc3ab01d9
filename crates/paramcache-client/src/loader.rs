//! One-shot parameter loading.

use crate::{fetch_parameters, validate};
use paramcache_config::Settings;
use paramcache_core::{ParamResult, ParameterMap, ParameterStore};
use tracing::info;

/// Fetches and validates `keys` once.
///
/// No caching, no events, no fallback: any fetch or validation error is
/// returned directly. An empty key list yields an empty map without touching
/// the store.
///
/// # Errors
///
/// Store errors, or [`paramcache_core::ParamError::MissingKeys`] if the store
/// did not know every key.
pub async fn load(store: &dyn ParameterStore, keys: &[String], prefix: Option<&str>) -> ParamResult<ParameterMap> {
    let result = fetch_parameters(store, keys, prefix).await?;
    validate(keys, &result)?;

    info!(count = result.len(), prefix = prefix.unwrap_or_default(), "Loaded parameters");
    Ok(result)
}

/// [`load`] using the key list and prefix from `settings`.
///
/// # Errors
///
/// Same as [`load`].
pub async fn load_with_settings(store: &dyn ParameterStore, settings: &Settings) -> ParamResult<ParameterMap> {
    load(store, &settings.cache.keys, settings.store.prefix.as_deref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramcache_core::{InMemoryParameterStore, ParamError};

    #[tokio::test]
    async fn test_prefix_is_added_and_stripped() {
        let store = InMemoryParameterStore::with_values([("/app/X", "42")]);

        let result = load(&store, &["X".to_string()], Some("/app/")).await.unwrap();

        assert_eq!(store.requests(), vec![vec!["/app/X".to_string()]]);
        assert_eq!(result.get("X").map(String::as_str), Some("42"));
        assert!(!result.contains_key("/app/X"));
    }

    #[tokio::test]
    async fn test_missing_keys_propagate() {
        let store = InMemoryParameterStore::with_values([("/app/X", "42")]);

        let result = load(&store, &["X".to_string(), "Y".to_string()], Some("/app/")).await;

        assert_eq!(result, Err(ParamError::missing_keys(["Y"])));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let store = InMemoryParameterStore::new();
        store.fail_with(Some(ParamError::store("ThrottlingException")));

        let result = load(&store, &["X".to_string()], None).await;

        assert_eq!(result, Err(ParamError::store("ThrottlingException")));
    }

    #[tokio::test]
    async fn test_empty_keys_make_no_request() {
        let store = InMemoryParameterStore::new();

        let result = load(&store, &[], None).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(store.request_count(), 0);
    }

    #[tokio::test]
    async fn test_no_state_between_calls() {
        let store = InMemoryParameterStore::with_values([("X", "1")]);
        let keys = vec!["X".to_string()];

        load(&store, &keys, None).await.unwrap();
        store.put("X", "2");
        let second = load(&store, &keys, None).await.unwrap();

        assert_eq!(second.get("X").map(String::as_str), Some("2"));
        assert_eq!(store.request_count(), 2);
    }
}
