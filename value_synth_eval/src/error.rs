//! Errors raised while executing a plan.

use thiserror::Error;

/// Failure of one evaluated call.
///
/// [`EvalError::NullArgument`] and [`EvalError::UnsupportedOperation`] are the
/// failures generated code itself raises. The remaining variants mean the plan
/// or the caller asked for something the plan does not describe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A null-rejecting check failed.
    #[error("null argument: {message}")]
    NullArgument {
        /// Message naming the field, and the key, value, or item when relevant.
        message: String,
    },

    /// Mutation of an unmodifiable container.
    #[error("unsupported operation: {what}")]
    UnsupportedOperation {
        /// The attempted mutation.
        what: String,
    },

    /// The receiver's type has no such overload.
    #[error("no method '{method}' on {type_name}")]
    NoSuchMethod {
        /// Type searched.
        type_name: String,
        /// Method requested, with its kind.
        method: String,
    },

    /// A value had the wrong shape for the operation.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the operation needed.
        expected: String,
        /// What it was given.
        found: String,
    },

    /// The instance has no such field.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// Requested field.
        field: String,
    },

    /// A body referred to a parameter or local that is not bound.
    #[error("unbound name '{name}'")]
    UnboundName {
        /// The name.
        name: String,
    },

    /// The plan has no type of this name or role.
    #[error("plan has no type '{name}'")]
    MissingType {
        /// Requested type.
        name: String,
    },
}

impl EvalError {
    /// Builds a [`EvalError::NullArgument`].
    pub(crate) fn null_argument(message: impl Into<String>) -> Self {
        Self::NullArgument {
            message: message.into(),
        }
    }

    /// Builds a [`EvalError::TypeMismatch`].
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result alias for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
