//! Primary error enums for schema intake and synthesis.

use thiserror::Error;

use super::aggregate::SchemaErrors;

/// Problems with a single declaration that make it impossible to synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// Two members share a name.
    #[error("duplicate field '{field}'")]
    DuplicateField {
        /// The repeated name.
        field: String,
    },

    /// A field name collides with a reserved word of the target syntax.
    #[error("field name '{field}' is a reserved word")]
    ReservedFieldName {
        /// The offending name.
        field: String,
    },

    /// A field or declaration name is empty.
    #[error("{what} name must not be empty")]
    EmptyName {
        /// Which element carried the empty name.
        what: String,
    },

    /// The declaration is not interface-shaped.
    #[error("'{declaration}' must be an interface, found {found}")]
    NotAnInterface {
        /// Declared value-type name.
        declaration: String,
        /// The kind that was found instead.
        found: String,
    },

    /// The declared back-conversion method returns the wrong type.
    #[error("'{declaration}': builder() return type must be {expected}, found {found}")]
    MalformedBackConversion {
        /// Declared value-type name.
        declaration: String,
        /// Builder simple name the method must return.
        expected: String,
        /// Type that was declared.
        found: String,
    },

    /// A field's type could not be resolved by the host.
    #[error("cannot resolve type of field '{field}', might be missing import: {type_text}")]
    UnresolvedType {
        /// Field whose type failed to resolve.
        field: String,
        /// Raw text of the erroneous type.
        type_text: String,
    },
}

impl SchemaError {
    /// Name of the field this error refers to, when it refers to one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::DuplicateField { field }
            | Self::ReservedFieldName { field }
            | Self::UnresolvedType { field, .. } => Some(field),
            Self::EmptyName { .. }
            | Self::NotAnInterface { .. }
            | Self::MalformedBackConversion { .. } => None,
        }
    }
}

/// Failure to synthesize one schema.
///
/// Carries every problem found for that schema, not only the first.
#[derive(Debug, Clone, Error)]
#[error("cannot synthesize '{schema}':\n{errors}")]
pub struct SynthesisError {
    /// Value-type name of the schema that failed.
    pub schema: String,
    /// The collected problems.
    pub errors: SchemaErrors,
}

impl SynthesisError {
    /// Wraps collected errors for `schema`.
    #[must_use]
    pub fn new(schema: impl Into<String>, errors: SchemaErrors) -> Self {
        Self {
            schema: schema.into(),
            errors,
        }
    }

    /// Wraps a single error for `schema`.
    #[must_use]
    pub fn single(schema: impl Into<String>, error: SchemaError) -> Self {
        Self::new(schema, SchemaErrors::from(vec![error]))
    }
}
