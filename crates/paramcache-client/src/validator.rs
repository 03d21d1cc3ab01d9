//! Completeness check for fetched parameters.

use paramcache_core::{ParamError, ParamResult, ParameterMap};

/// Confirms every requested key is present in `params`.
///
/// Returns [`ParamError::MissingKeys`] naming all absent keys in request
/// order. Values are not inspected; an empty string counts as present.
pub fn validate(keys: &[String], params: &ParameterMap) -> ParamResult<()> {
    let missing: Vec<&String> = keys.iter().filter(|key| !params.contains_key(*key)).collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParamError::missing_keys(missing.into_iter().cloned()))
    }
}
