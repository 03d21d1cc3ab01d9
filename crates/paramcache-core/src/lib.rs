//! # Paramcache Core
//!
//! Core types, traits, and error definitions for paramcache.
//! This crate provides the parameter model and the [`ParameterStore`]
//! abstraction that the fetch and cache layers are written against.

pub mod error;
pub mod memory;
pub mod parameter;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use error::*;
pub use memory::*;
pub use parameter::*;
pub use result::*;
pub use telemetry::*;
pub use traits::*;
