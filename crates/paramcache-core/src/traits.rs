//! Core traits for talking to a remote parameter store.

use crate::{ParamResult, Parameter};
use async_trait::async_trait;

/// Maximum number of names a single `get_parameters` request may carry.
pub const MAX_BATCH_SIZE: usize = 10;

/// Remote key-value parameter store.
///
/// Implementations wrap a provider client (AWS SSM, an in-memory fake, ...).
/// Callers never pass more than [`MAX_BATCH_SIZE`] names per call; chunking is
/// the caller's job.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetches the named parameters.
    ///
    /// Names the store does not know are simply absent from the result; it is
    /// not an error for the response to be shorter than the request.
    async fn get_parameters(&self, names: &[String], with_decryption: bool) -> ParamResult<Vec<Parameter>>;
}
