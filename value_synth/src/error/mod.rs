//! Error types produced while validating and synthesizing schemas.

mod aggregate;
mod types;

pub use aggregate::SchemaErrors;
pub use types::{SchemaError, SynthesisError};

/// Result alias used by the synthesis entrypoints.
pub type SynthResult<T> = Result<T, SynthesisError>;
