//! Field type classification.
//!
//! Maps a [`TypeDescriptor`] onto one of the five structural categories the
//! synthesizers dispatch on. The inspection is shallow: type arguments are
//! extracted one level deep and treated as opaque leaves.

use crate::error::SchemaError;
use crate::schema::{CollectionKind, FieldSpec, OptionalFlavor, PrimitiveKind, TypeDescriptor};

/// The structural category of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category<'a> {
    /// Primitive-like; never null, never copied.
    Scalar(PrimitiveKind),
    /// Any other nullable object; gets a plain setter only.
    Reference {
        /// Array-shaped references compare, hash, and render element-wise.
        array: bool,
    },
    /// An explicit optional wrapper.
    Optional {
        /// Declared optional flavour.
        flavor: OptionalFlavor,
        /// Wrapped leaf type.
        inner: &'a TypeDescriptor,
    },
    /// A list or set.
    Collection {
        /// Ordered or unordered.
        kind: CollectionKind,
        /// Element leaf type.
        element: &'a TypeDescriptor,
    },
    /// A key-value map.
    Map {
        /// Key leaf type.
        key: &'a TypeDescriptor,
        /// Value leaf type.
        value: &'a TypeDescriptor,
    },
}

impl Category<'_> {
    /// Short label used in logs and diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Reference { array: false } => "reference",
            Self::Reference { array: true } => "array",
            Self::Optional { .. } => "optional",
            Self::Collection {
                kind: CollectionKind::List,
                ..
            } => "list",
            Self::Collection {
                kind: CollectionKind::Set,
                ..
            } => "set",
            Self::Map { .. } => "map",
        }
    }

    /// Whether the field stores a collection or map.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Collection { .. } | Self::Map { .. })
    }
}

/// Classifies `field`'s type.
///
/// # Errors
///
/// Returns [`SchemaError::UnresolvedType`] naming the field when its type, or
/// any type argument of it, is unresolved.
///
/// # Examples
///
/// ```
/// use value_synth::classify::{Category, classify};
/// use value_synth::{FieldSpec, TypeDescriptor};
///
/// let field = FieldSpec::new("tags", TypeDescriptor::list(TypeDescriptor::string()));
/// let category = classify(&field).expect("resolved");
/// assert!(matches!(category, Category::Collection { .. }));
/// ```
pub fn classify(field: &FieldSpec) -> Result<Category<'_>, SchemaError> {
    if let Some(text) = field.ty.first_unresolved() {
        return Err(SchemaError::UnresolvedType {
            field: field.name.clone(),
            type_text: text.to_owned(),
        });
    }
    Ok(match &field.ty {
        TypeDescriptor::Primitive { of } => Category::Scalar(*of),
        TypeDescriptor::Array { .. } => Category::Reference { array: true },
        TypeDescriptor::Optional { flavor, inner } => Category::Optional {
            flavor: *flavor,
            inner,
        },
        TypeDescriptor::Collection {
            collection,
            element,
        } => Category::Collection {
            kind: *collection,
            element,
        },
        TypeDescriptor::Map { key, value } => Category::Map { key, value },
        TypeDescriptor::Declared { .. } | TypeDescriptor::Unresolved { .. } => {
            Category::Reference { array: false }
        }
    })
}
