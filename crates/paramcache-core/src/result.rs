//! Result type aliases for paramcache.

use crate::ParamError;

/// A specialized `Result` type for parameter operations.
pub type ParamResult<T> = Result<T, ParamError>;
