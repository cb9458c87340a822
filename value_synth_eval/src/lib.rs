//! Reference evaluator for value-synth emission plans.
//!
//! An [`EmissionPlan`](value_synth::EmissionPlan) is renderer-agnostic: it
//! names members and describes their bodies as ordered steps. This crate
//! executes those steps against dynamic [`Datum`] values so the observable
//! contract of a plan (null enforcement, defensive copying, structural
//! equality, and rendering) can be checked without a target toolchain.
//!
//! ```
//! use value_synth::{FieldSpec, MethodKind, Schema, TypeDescriptor, TypeNames, synthesize};
//! use value_synth_eval::{Datum, EvalError, Runtime};
//!
//! let schema = Schema::new(
//!     TypeNames::new("com.example", "Tagged", "TaggedBuilder"),
//!     vec![FieldSpec::new("tags", TypeDescriptor::list(TypeDescriptor::string()))],
//! )
//! .expect("valid schema");
//! let plan = synthesize(&schema).expect("synthesized");
//! let runtime = Runtime::new(&plan).expect("plan has both types");
//!
//! let builder = runtime.new_builder().expect("constructed");
//! let err = runtime
//!     .call(&builder, "addTag", MethodKind::Adder, vec![Datum::Null])
//!     .expect_err("null items are rejected");
//! assert!(matches!(err, EvalError::NullArgument { .. }));
//! ```

mod datum;
mod error;
mod runtime;

pub use datum::{Container, Datum, Instance};
pub use error::{EvalError, EvalResult};
pub use runtime::Runtime;
