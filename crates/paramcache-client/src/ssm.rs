//! AWS Systems Manager Parameter Store adapter.

use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client;
use paramcache_core::{ParamError, ParamResult, Parameter, ParameterStore};
use tracing::debug;

/// [`ParameterStore`] backed by SSM `GetParameters`.
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    /// Wraps an existing SSM client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameters(&self, names: &[String], with_decryption: bool) -> ParamResult<Vec<Parameter>> {
        let output = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|e| ParamError::store(DisplayErrorContext(e)))?;

        if !output.invalid_parameters().is_empty() {
            debug!(invalid = ?output.invalid_parameters(), "SSM reported unknown parameters");
        }

        Ok(output
            .parameters()
            .iter()
            .filter_map(|p| Some(Parameter::new(p.name()?, p.value()?)))
            .collect())
    }
}
