//! In-memory parameter store for tests and local development.

use crate::{ParamError, ParamResult, Parameter, ParameterStore, MAX_BATCH_SIZE};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Parameter store backed by a `HashMap`.
///
/// Records every request it receives and can be switched into a failing mode,
/// which makes it convenient for exercising cache refresh behaviour.
#[derive(Debug, Default)]
pub struct InMemoryParameterStore {
    values: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<Vec<String>>>,
    failure: Mutex<Option<ParamError>>,
}

impl InMemoryParameterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given name/value pairs.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.values.lock();
            for (name, value) in values {
                map.insert(name.into(), value.into());
            }
        }
        store
    }

    /// Inserts or replaces a parameter.
    pub fn put(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.lock().insert(name.into(), value.into());
    }

    /// Removes a parameter, returning its previous value.
    pub fn remove(&self, name: &str) -> Option<String> {
        self.values.lock().remove(name)
    }

    /// Makes every following request fail with `error`, or succeed again with `None`.
    pub fn fail_with(&self, error: Option<ParamError>) {
        *self.failure.lock() = error;
    }

    /// Returns the name lists of all requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn get_parameters(&self, names: &[String], _with_decryption: bool) -> ParamResult<Vec<Parameter>> {
        self.requests.lock().push(names.to_vec());

        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }

        if names.len() > MAX_BATCH_SIZE {
            return Err(ParamError::store(format!(
                "request carries {} names, the limit is {}",
                names.len(),
                MAX_BATCH_SIZE
            )));
        }

        let values = self.values.lock();
        let found: Vec<Parameter> = names
            .iter()
            .filter_map(|name| values.get(name).map(|value| Parameter::new(name.clone(), value.clone())))
            .collect();

        debug!(requested = names.len(), found = found.len(), "In-memory parameter lookup");
        Ok(found)
    }
}
