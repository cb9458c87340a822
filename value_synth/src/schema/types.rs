//! Resolved type descriptors consumed by the classifier.
//!
//! A [`TypeDescriptor`] is the normalised handle the host toolchain hands over
//! for each declared member. The variant set is closed: every shape the engine
//! understands has exactly one case, and anything the host could not resolve
//! arrives as [`TypeDescriptor::Unresolved`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive-like kinds that can never be null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Two-valued truth type.
    Boolean,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// UTF-16 code unit.
    Char,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// IEEE 754 single precision.
    Float,
    /// IEEE 754 double precision.
    Double,
}

impl PrimitiveKind {
    /// Keyword used when rendering the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// The two optional flavours a field may declare.
///
/// They differ only in the names of their "absent" and "maybe" factories, and
/// the generator mirrors whichever one the field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalFlavor {
    /// `java.util.Optional`.
    Standard,
    /// `com.google.common.base.Optional`.
    Guava,
}

impl OptionalFlavor {
    /// Fully-qualified name of the optional type.
    #[must_use]
    pub const fn qualified_name(self) -> &'static str {
        match self {
            Self::Standard => "java.util.Optional",
            Self::Guava => "com.google.common.base.Optional",
        }
    }

    /// Factory producing the absent representation.
    #[must_use]
    pub const fn empty_factory(self) -> &'static str {
        match self {
            Self::Standard => "empty",
            Self::Guava => "absent",
        }
    }

    /// Factory wrapping a possibly-null value.
    #[must_use]
    pub const fn maybe_factory(self) -> &'static str {
        match self {
            Self::Standard => "ofNullable",
            Self::Guava => "fromNullable",
        }
    }
}

/// Ordered versus unordered element containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// List-like, insertion ordered, duplicates allowed.
    List,
    /// Set-like, unordered, duplicates collapsed.
    Set,
}

impl CollectionKind {
    /// Simple name of the declared interface type.
    #[must_use]
    pub const fn interface_name(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Set => "Set",
        }
    }
}

/// A resolved field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// A primitive kind.
    Primitive {
        /// Which primitive.
        of: PrimitiveKind,
    },
    /// An array of some component type.
    Array {
        /// Component type.
        component: Box<TypeDescriptor>,
    },
    /// Any other declared (object) type, by qualified name.
    Declared {
        /// Qualified type name, for example `java.lang.String`.
        name: String,
    },
    /// An optional wrapper.
    Optional {
        /// Which optional type the field declares.
        flavor: OptionalFlavor,
        /// Wrapped type.
        inner: Box<TypeDescriptor>,
    },
    /// A list or set.
    Collection {
        /// Ordered or unordered.
        collection: CollectionKind,
        /// Element type.
        element: Box<TypeDescriptor>,
    },
    /// A key-value map.
    Map {
        /// Key type.
        key: Box<TypeDescriptor>,
        /// Value type.
        value: Box<TypeDescriptor>,
    },
    /// A type the host could not resolve (for example a missing import).
    Unresolved {
        /// The raw text of the erroneous type.
        text: String,
    },
}

impl TypeDescriptor {
    /// Builds a primitive descriptor.
    #[must_use]
    pub const fn primitive(of: PrimitiveKind) -> Self {
        Self::Primitive { of }
    }

    /// Builds a declared descriptor.
    #[must_use]
    pub fn declared(name: impl Into<String>) -> Self {
        Self::Declared { name: name.into() }
    }

    /// Shorthand for `java.lang.String`.
    #[must_use]
    pub fn string() -> Self {
        Self::declared("java.lang.String")
    }

    /// Builds an array descriptor.
    #[must_use]
    pub fn array(component: Self) -> Self {
        Self::Array {
            component: Box::new(component),
        }
    }

    /// Builds an optional descriptor.
    #[must_use]
    pub fn optional(flavor: OptionalFlavor, inner: Self) -> Self {
        Self::Optional {
            flavor,
            inner: Box::new(inner),
        }
    }

    /// Builds a list descriptor.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::Collection {
            collection: CollectionKind::List,
            element: Box::new(element),
        }
    }

    /// Builds a set descriptor.
    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::Collection {
            collection: CollectionKind::Set,
            element: Box::new(element),
        }
    }

    /// Builds a map descriptor.
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Builds an unresolved descriptor.
    #[must_use]
    pub fn unresolved(text: impl Into<String>) -> Self {
        Self::Unresolved { text: text.into() }
    }

    /// Returns the raw text of the first unresolved descriptor reachable from
    /// this one, searching type arguments as well.
    #[must_use]
    pub fn first_unresolved(&self) -> Option<&str> {
        match self {
            Self::Unresolved { text } => Some(text),
            Self::Primitive { .. } | Self::Declared { .. } => None,
            Self::Array { component } => component.first_unresolved(),
            Self::Optional { inner, .. } => inner.first_unresolved(),
            Self::Collection { element, .. } => element.first_unresolved(),
            Self::Map { key, value } => key.first_unresolved().or_else(|| value.first_unresolved()),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { of } => f.write_str(of.as_str()),
            Self::Array { component } => write!(f, "{component}[]"),
            Self::Declared { name } => f.write_str(name),
            Self::Optional { flavor, inner } => write!(f, "{}<{inner}>", flavor.qualified_name()),
            Self::Collection {
                collection,
                element,
            } => write!(f, "java.util.{}<{element}>", collection.interface_name()),
            Self::Map { key, value } => write!(f, "java.util.Map<{key}, {value}>"),
            Self::Unresolved { text } => f.write_str(text),
        }
    }
}
