//! Test helpers shared across crates.
//!
//! [`fixtures`] provides canonical declarations and schemas covering every
//! field category. [`figment`] wraps `figment::Jail` for configuration
//! layering tests.

pub mod figment;
pub mod fixtures;
