//! Chunked parameter fetching.

use paramcache_core::{ParamResult, ParameterMap, ParameterStore, MAX_BATCH_SIZE};
use tracing::debug;

/// Fetches `keys` from `store` in chunks of at most [`MAX_BATCH_SIZE`] names.
///
/// Each key is requested as `prefix + key`, and the prefix is stripped again
/// from the returned names. Chunks are requested one after another. The
/// returned map only holds keys the store actually knew; use
/// [`crate::validate`] to check completeness. The first store error aborts
/// the fetch and is returned unchanged.
pub async fn fetch_parameters(
    store: &dyn ParameterStore,
    keys: &[String],
    prefix: Option<&str>,
) -> ParamResult<ParameterMap> {
    let prefix = prefix.unwrap_or_default();
    let mut result = ParameterMap::with_capacity(keys.len());

    for (index, chunk) in keys.chunks(MAX_BATCH_SIZE).enumerate() {
        let names: Vec<String> = chunk.iter().map(|key| format!("{prefix}{key}")).collect();
        debug!(chunk = index, names = ?names, "Requesting parameters");

        let parameters = store.get_parameters(&names, true).await?;

        for parameter in parameters {
            let key = match parameter.name.strip_prefix(prefix) {
                Some(stripped) => stripped.to_string(),
                None => parameter.name,
            };
            result.insert(key, parameter.value);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use paramcache_core::{InMemoryParameterStore, MockParameterStore, ParamError, Parameter};

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("key-{i}")).collect()
    }

    #[tokio::test]
    async fn test_requests_with_decryption_and_prefix() {
        let mut store = MockParameterStore::new();
        store
            .expect_get_parameters()
            .withf(|names, with_decryption| names == ["/app/X".to_string()] && *with_decryption)
            .times(1)
            .returning(|_, _| Ok(vec![Parameter::new("/app/X", "x-value")]));

        let result = fetch_parameters(&store, &["X".to_string()], Some("/app/")).await.unwrap();

        assert_eq!(result.get("X").map(String::as_str), Some("x-value"));
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_chunks_of_ten() {
        let store = InMemoryParameterStore::with_values(keys(25).into_iter().map(|k| (k.clone(), k)));

        let result = fetch_parameters(&store, &keys(25), None).await.unwrap();

        let sizes: Vec<usize> = store.requests().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(result.len(), 25);
    }

    #[tokio::test]
    async fn test_chunks_preserve_key_order() {
        let store = InMemoryParameterStore::new();

        fetch_parameters(&store, &keys(12), None).await.unwrap();

        let requests = store.requests();
        assert_eq!(requests[0], keys(10));
        assert_eq!(requests[1], vec!["key-10".to_string(), "key-11".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_names_are_absent_not_errors() {
        let store = InMemoryParameterStore::with_values([("A", "1")]);

        let result = fetch_parameters(&store, &["A".to_string(), "B".to_string()], None)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert!(!result.contains_key("B"));
    }

    #[tokio::test]
    async fn test_store_error_stops_fetching() {
        let mut store = MockParameterStore::new();
        store
            .expect_get_parameters()
            .times(1)
            .returning(|_, _| Err(ParamError::store("AccessDenied")));

        let result = fetch_parameters(&store, &keys(15), None).await;

        assert_eq!(result, Err(ParamError::store("AccessDenied")));
    }

    #[tokio::test]
    async fn test_names_without_prefix_are_kept_verbatim() {
        let mut store = MockParameterStore::new();
        store
            .expect_get_parameters()
            .with(always(), eq(true))
            .returning(|_, _| Ok(vec![Parameter::new("other/Y", "y")]));

        let result = fetch_parameters(&store, &["Y".to_string()], Some("/app/")).await.unwrap();

        assert!(result.contains_key("other/Y"));
    }
}
