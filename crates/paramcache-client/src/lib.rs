//! # Paramcache Client
//!
//! Batched, cached access to a remote parameter store.
//!
//! - [`load`] fetches a key set once and returns the values.
//! - [`CachedConfig`] keeps a fixed key set cached for a bounded time,
//!   reloading on demand and falling back to stale values when a reload fails.

mod cache;
mod cached_client;
mod events;
mod fetcher;
mod loader;
#[cfg(feature = "ssm")]
mod ssm;
mod validator;

pub use cached_client::{CachedConfig, DEFAULT_CACHE_LIFETIME};
pub use events::{RefreshEvent, SubscriptionId};
pub use fetcher::fetch_parameters;
pub use loader::{load, load_with_settings};
#[cfg(feature = "ssm")]
pub use ssm::SsmParameterStore;
pub use validator::validate;

pub use paramcache_config::Settings;
pub use paramcache_core::{ParamError, ParamResult, Parameter, ParameterMap, ParameterStore};
