//! Emission plan: the renderer-agnostic description of synthesized types.
//!
//! An [`EmissionPlan`] names every generated field, constructor, and method
//! together with a structured body. The plan serialises to JSON so an external
//! renderer can turn it into source text for any target syntax.

mod body;

use serde::{Deserialize, Serialize};

use crate::schema::{OptionalFlavor, TypeDescriptor};

pub use body::{
    Comparison, ContainerKind, HashContribution, Operand, RenderStyle, RenderedField, Step,
    WhenAbsent,
};

/// Version of the plan layout.
pub const IR_VERSION: &str = "1";

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible everywhere.
    Public,
    /// Visible within the package.
    Package,
    /// Visible within the enclosing type.
    Private,
}

/// What a synthesized type is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRole {
    /// The mutable builder.
    Builder,
    /// The nested immutable value.
    Value,
}

/// Structured metadata attached to a type, method, or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "marker", rename_all = "snake_case")]
pub enum Metadata {
    /// The type was produced by `generator`.
    Generated {
        /// Generator identifier.
        generator: String,
    },
    /// The parameter initializes the named field.
    FieldName {
        /// Field name.
        name: String,
    },
    /// The method reads a declared field.
    FieldAccessor,
    /// The method implements a declared method.
    Overrides,
}

/// Where the elements of a bulk collection parameter come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementSource {
    /// The field's declared list type.
    List,
    /// The field's declared set type.
    Set,
    /// Any collection.
    Collection,
    /// Any iterable.
    Iterable,
    /// A one-shot iterator.
    Iterator,
    /// Variadic arguments.
    Varargs,
}

/// The shape of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// No value.
    Void,
    /// Primitive boolean.
    Boolean,
    /// Primitive int.
    Int,
    /// Text.
    Text,
    /// Any object.
    Object,
    /// The builder type.
    Builder,
    /// The declared value type.
    Value,
    /// Exactly the given type.
    Exact {
        /// The type.
        ty: TypeDescriptor,
    },
    /// Elements of (a subtype of) `element`.
    Elements {
        /// Container the elements arrive in.
        source: ElementSource,
        /// Element type.
        element: TypeDescriptor,
    },
    /// A map with keys and values of (subtypes of) the given types.
    Entries {
        /// Key type.
        key: TypeDescriptor,
        /// Value type.
        value: TypeDescriptor,
    },
    /// An optional of (a subtype of) `inner`.
    Maybe {
        /// Optional flavour.
        flavor: OptionalFlavor,
        /// Wrapped type.
        inner: TypeDescriptor,
    },
}

impl Shape {
    /// Exactly `ty`.
    #[must_use]
    pub const fn exact(ty: TypeDescriptor) -> Self {
        Self::Exact { ty }
    }
}

/// What a method does. Together with the name this identifies an overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Builder constructor producing the empty state.
    DefaultConstructor,
    /// Builder constructor seeded from a value.
    CopyFromValue,
    /// Builder constructor seeded from another builder.
    CopyFromBuilder,
    /// Value constructor taking every field positionally.
    ValueConstructor,
    /// Builder field getter.
    Getter,
    /// Plain single-value setter.
    Setter,
    /// Optional setter taking the raw wrapped value.
    OptionalValueSetter,
    /// Optional setter taking an optional.
    OptionalSetter,
    /// Collection setter taking the field's declared container type.
    DeclaredCollectionSetter,
    /// Collection setter taking any collection.
    CollectionSetter,
    /// Collection setter taking any iterable.
    IterableSetter,
    /// Collection setter draining an iterator.
    IteratorSetter,
    /// Collection setter taking variadic elements.
    VarargsSetter,
    /// Per-item collection adder.
    Adder,
    /// Map setter taking a whole map.
    MapSetter,
    /// Map setter taking `arity` positional key/value pairs.
    MapPairsSetter {
        /// Number of pairs.
        arity: u8,
    },
    /// Per-item map putter.
    Putter,
    /// Builder-side copy: a fresh builder seeded from this one.
    BuilderCopy,
    /// Produces an immutable value from the builder state.
    Build,
    /// Static factory: a builder seeded from a value.
    FromValue,
    /// Static factory: a builder seeded from another builder.
    FromBuilder,
    /// Value field accessor.
    ValueGetter,
    /// Value-side back-conversion to a fresh builder.
    ToBuilder,
    /// Structural equality.
    Equals,
    /// Structural hash.
    HashCode,
    /// Textual rendering.
    ToString,
}

impl MethodKind {
    /// Whether this kind is a constructor.
    #[must_use]
    pub const fn is_constructor(self) -> bool {
        matches!(
            self,
            Self::DefaultConstructor
                | Self::CopyFromValue
                | Self::CopyFromBuilder
                | Self::ValueConstructor
        )
    }

    /// Whether this kind changes builder state and returns the builder.
    #[must_use]
    pub const fn is_mutator(self) -> bool {
        matches!(
            self,
            Self::Setter
                | Self::OptionalValueSetter
                | Self::OptionalSetter
                | Self::DeclaredCollectionSetter
                | Self::CollectionSetter
                | Self::IterableSetter
                | Self::IteratorSetter
                | Self::VarargsSetter
                | Self::Adder
                | Self::MapSetter
                | Self::MapPairsSetter { .. }
                | Self::Putter
        )
    }
}

/// A reference to one method overload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// Method name.
    pub name: String,
    /// Overload kind.
    pub kind: MethodKind,
}

impl MethodRef {
    /// References `name` with `kind`.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// One parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamPlan {
    /// Parameter name.
    pub name: String,
    /// Parameter shape.
    pub shape: Shape,
    /// Parameter metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Metadata>,
}

impl ParamPlan {
    /// A parameter without metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            metadata: Vec::new(),
        }
    }
}

/// One storage field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPlan {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Whether the field is assigned only during construction.
    pub is_final: bool,
}

/// One constructor or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodPlan {
    /// Method name; constructors carry their type's name.
    pub name: String,
    /// What the method does.
    pub kind: MethodKind,
    /// Field the method serves, for per-field members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Visibility.
    pub visibility: Visibility,
    /// Whether the method is static.
    #[serde(default)]
    pub is_static: bool,
    /// Parameters in order.
    pub params: Vec<ParamPlan>,
    /// Return shape.
    pub returns: Shape,
    /// Method metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Metadata>,
    /// Body steps in order.
    pub body: Vec<Step>,
}

impl MethodPlan {
    /// A reference to this method.
    #[must_use]
    pub fn reference(&self) -> MethodRef {
        MethodRef::new(&self.name, self.kind)
    }

    /// Whether the method carries `marker`.
    #[must_use]
    pub fn has_metadata(&self, marker: &Metadata) -> bool {
        self.metadata.contains(marker)
    }
}

/// One synthesized type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePlan {
    /// Simple name.
    pub name: String,
    /// Builder or value.
    pub role: TypeRole,
    /// Visibility.
    pub visibility: Visibility,
    /// Whether the type is a static nested type.
    #[serde(default)]
    pub is_static: bool,
    /// Whether the type is final.
    pub is_final: bool,
    /// Implemented interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    /// Type metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Metadata>,
    /// Storage fields in schema order.
    pub fields: Vec<FieldPlan>,
    /// Constructors and methods in emission order.
    pub methods: Vec<MethodPlan>,
    /// Nested types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<TypePlan>,
}

impl TypePlan {
    /// Finds the overload `method`.
    #[must_use]
    pub fn method(&self, method: &MethodRef) -> Option<&MethodPlan> {
        self.methods
            .iter()
            .find(|m| m.kind == method.kind && m.name == method.name)
    }

    /// The constructor of `kind`.
    #[must_use]
    pub fn constructor(&self, kind: MethodKind) -> Option<&MethodPlan> {
        self.methods
            .iter()
            .find(|m| m.kind == kind && m.kind.is_constructor())
    }

    /// All overloads named `name`.
    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodPlan> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Members declared for `field`.
    pub fn members_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a MethodPlan> + 'a {
        self.methods
            .iter()
            .filter(move |m| m.field.as_deref() == Some(field))
    }

    /// Counts fields, methods, and nested members recursively.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.fields.len()
            + self.methods.len()
            + self.nested.iter().map(Self::member_count).sum::<usize>()
    }
}

/// Everything synthesized for one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionPlan {
    /// Plan layout version.
    pub ir_version: String,
    /// Package of the builder and value types.
    pub package: String,
    /// Declared value-type name, dotted when nested.
    pub value_type: String,
    /// The builder, with the value type nested inside.
    pub builder: TypePlan,
}

impl EmissionPlan {
    /// The nested value type.
    #[must_use]
    pub fn value(&self) -> Option<&TypePlan> {
        self.builder
            .nested
            .iter()
            .find(|t| t.role == TypeRole::Value)
    }

    /// File stem a renderer would use for this plan.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}.plan", self.builder.name)
    }

    /// Serialises the plan.
    ///
    /// # Errors
    ///
    /// Propagates serialisation failures from `serde_json`.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};

    #[test]
    fn method_kinds_serialise_in_snake_case() -> Result<()> {
        let pairs = serde_json::to_string(&MethodKind::MapPairsSetter { arity: 3 })?;
        ensure!(pairs == r#"{"map_pairs_setter":{"arity":3}}"#, "got {pairs}");
        let declared = serde_json::to_string(&MethodKind::DeclaredCollectionSetter)?;
        ensure!(declared == r#""declared_collection_setter""#, "got {declared}");
        Ok(())
    }

    #[test]
    fn steps_are_tagged() -> Result<()> {
        let step = Step::RejectNull {
            value: Operand::param("name"),
            message: "name".into(),
        };
        let json = serde_json::to_value(&step)?;
        ensure!(json["step"] == "reject_null", "got {json}");
        ensure!(json["value"]["op"] == "param", "got {json}");
        let back: Step = serde_json::from_value(json)?;
        ensure!(back == step, "step changed in transit");
        Ok(())
    }

    #[test]
    fn constructors_are_not_mutators() {
        assert!(MethodKind::CopyFromValue.is_constructor());
        assert!(!MethodKind::CopyFromValue.is_mutator());
        assert!(MethodKind::MapPairsSetter { arity: 1 }.is_mutator());
        assert!(!MethodKind::Build.is_mutator());
    }
}
