//! Schema-driven builder and value type synthesis.
//!
//! Given the declared shape of a value type, this crate derives a
//! deterministic [`EmissionPlan`] describing an immutable value type and the
//! mutable builder that constructs, copies, and re-derives it. Every field is
//! classified by structural category, assigned a null-enforcement policy, and
//! given the getter and mutator family appropriate to that category.
//!
//! Source discovery, type resolution, and text rendering belong to the host
//! toolchain; this crate only consumes [`Schema`]s (or [`Declaration`]s) and
//! produces plans.
//!
//! ```
//! use value_synth::{Declaration, Synthesizer};
//!
//! let declaration: Declaration = serde_json::from_str(r#"{
//!     "package": "com.example",
//!     "name": "Person",
//!     "members": [
//!         { "name": "name", "type": { "kind": "declared", "name": "java.lang.String" } },
//!         { "name": "nicknames", "type": { "kind": "collection", "collection": "list",
//!           "element": { "kind": "declared", "name": "java.lang.String" } } }
//!     ]
//! }"#).expect("valid declaration");
//!
//! let plan = Synthesizer::default()
//!     .synthesize_declaration(&declaration)
//!     .expect("synthesized");
//! assert!(plan.builder.overloads("addNickname").next().is_some());
//! ```

pub mod classify;
mod config;
mod error;
pub mod naming;
pub mod plan;
pub mod policy;
mod schema;
mod synth;

pub use config::SynthesisConfig;
pub use error::{SchemaError, SchemaErrors, SynthResult, SynthesisError};
pub use plan::{EmissionPlan, MethodKind, MethodRef};
pub use schema::{
    CollectionKind, Declaration, DeclarationKind, FieldSpec, MemberDecl, OptionalFlavor,
    PrimitiveKind, Schema, TypeDescriptor, TypeNames,
};
pub use synth::{Diagnostic, SynthesisReport, Synthesizer, synthesize, synthesize_all};
