//! Null-enforcement policy.
//!
//! One predicate drives every downstream choice: a field is enforced unless it
//! is scalar or explicitly nullable. What enforcement *means* depends on the
//! category, and [`NullPolicy`] spells that out.

use crate::classify::Category;
use crate::schema::FieldSpec;

/// Whether absence must be rejected or defaulted for `field`.
#[must_use]
pub const fn should_enforce(field: &FieldSpec, category: &Category<'_>) -> bool {
    !matches!(category, Category::Scalar(_)) && !field.nullable
}

/// Per-field handling of absent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Scalars cannot be absent.
    Exempt,
    /// Absent values are stored and passed through.
    Tolerated,
    /// Enforced non-container fields: null arguments are rejected.
    Reject,
    /// Enforced optionals: storage is seeded with the absent representation.
    SeedAbsent,
    /// Enforced collections and maps: absence is coerced to empty.
    CoerceEmpty,
}

impl NullPolicy {
    /// Derives the policy for a classified field.
    #[must_use]
    pub const fn for_field(field: &FieldSpec, category: &Category<'_>) -> Self {
        if matches!(category, Category::Scalar(_)) {
            return Self::Exempt;
        }
        if !should_enforce(field, category) {
            return Self::Tolerated;
        }
        match category {
            Category::Optional { .. } => Self::SeedAbsent,
            Category::Collection { .. } | Category::Map { .. } => Self::CoerceEmpty,
            Category::Scalar(_) | Category::Reference { .. } => Self::Reject,
        }
    }

    /// Whether the field is enforced at all.
    #[must_use]
    pub const fn is_enforced(self) -> bool {
        matches!(self, Self::Reject | Self::SeedAbsent | Self::CoerceEmpty)
    }

    /// Whether the value constructor rejects a null argument.
    ///
    /// Optionals count as enforced non-containers here; they are exempt only
    /// on the builder's optional-typed setter.
    #[must_use]
    pub const fn rejects_at_construction(self) -> bool {
        matches!(self, Self::Reject | Self::SeedAbsent)
    }

    /// Label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exempt => "exempt",
            Self::Tolerated => "tolerated",
            Self::Reject => "reject",
            Self::SeedAbsent => "seed-absent",
            Self::CoerceEmpty => "coerce-empty",
        }
    }
}
