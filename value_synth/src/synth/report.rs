//! Batch synthesis results.

use serde::Serialize;

use crate::error::SynthesisError;
use crate::plan::EmissionPlan;

/// One structured problem report, suitable for a host toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Value-type name of the failing schema.
    pub schema: String,
    /// Offending field, when the problem concerns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
}

/// Outcome of synthesizing a batch of declarations.
#[derive(Debug, Clone, Default)]
pub struct SynthesisReport {
    /// Plans for every schema that synthesized, in input order.
    pub plans: Vec<EmissionPlan>,
    /// One error per schema that failed, in input order.
    pub failures: Vec<SynthesisError>,
}

impl SynthesisReport {
    /// Whether every schema synthesized.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Flattens failures into one diagnostic per problem.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.failures
            .iter()
            .flat_map(|failure| {
                failure.errors.iter().map(|error| Diagnostic {
                    schema: failure.schema.clone(),
                    field: error.field().map(str::to_owned),
                    message: error.to_string(),
                })
            })
            .collect()
    }
}
