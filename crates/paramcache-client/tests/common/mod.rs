//! Shared fixtures for client integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use paramcache_client::{ParamResult, Parameter, ParameterStore};
use paramcache_core::{InMemoryParameterStore, TelemetryConfig};
use std::sync::Arc;
use std::time::Duration;

/// Installs a test log subscriber once per process.
pub fn init_tracing() {
    let _ = paramcache_core::init_tracing(&TelemetryConfig::default());
}

/// Store seeded with `key-0 .. key-{n-1}`, each mapped to `value-{i}`.
pub fn seeded_store(n: usize) -> Arc<InMemoryParameterStore> {
    Arc::new(InMemoryParameterStore::with_values(
        (0..n).map(|i| (format!("key-{i}"), format!("value-{i}"))),
    ))
}

/// Key names matching [`seeded_store`].
pub fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key-{i}")).collect()
}

/// Store that waits before answering, to let concurrent lookups overlap.
pub struct SlowStore {
    pub inner: Arc<InMemoryParameterStore>,
    pub delay: Duration,
}

#[async_trait]
impl ParameterStore for SlowStore {
    async fn get_parameters(&self, names: &[String], with_decryption: bool) -> ParamResult<Vec<Parameter>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_parameters(names, with_decryption).await
    }
}
