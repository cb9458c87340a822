//! Schema model: the ordered field list for one value type.
//!
//! A [`Schema`] is an immutable snapshot. It is built once per declaration,
//! consumed by one synthesis run, and dropped. Field order is significant and
//! is preserved through every generated member.

mod declaration;
mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaErrors};

pub use declaration::{Declaration, DeclarationKind, MemberDecl};
pub use types::{CollectionKind, OptionalFlavor, PrimitiveKind, TypeDescriptor};

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, unique within its schema.
    pub name: String,
    /// Resolved type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Explicit opt-out of null enforcement.
    #[serde(default)]
    pub nullable: bool,
}

impl FieldSpec {
    /// A field that takes part in null enforcement.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }

    /// A field exempt from null enforcement.
    #[must_use]
    pub fn nullable(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, ty)
        }
    }
}

/// The qualified name pair of a value type and its builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNames {
    /// Package both types live in. Empty for the default package.
    pub package: String,
    /// Value-type name, dotted when nested (`Outer.Inner`).
    pub value: String,
    /// Builder simple name.
    pub builder: String,
}

impl TypeNames {
    /// Names a value type and its builder.
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        value: impl Into<String>,
        builder: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            value: value.into(),
            builder: builder.into(),
        }
    }

    /// Package-qualified value-type name.
    #[must_use]
    pub fn qualified_value(&self) -> String {
        qualify(&self.package, &self.value)
    }

    /// Package-qualified builder name.
    #[must_use]
    pub fn qualified_builder(&self) -> String {
        qualify(&self.package, &self.builder)
    }
}

fn qualify(package: &str, simple: &str) -> String {
    if package.is_empty() {
        simple.to_owned()
    } else {
        format!("{package}.{simple}")
    }
}

/// Ordered field declarations for one value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: TypeNames,
    fields: Vec<FieldSpec>,
    has_explicit_to_builder: bool,
    is_public: bool,
}

impl Schema {
    /// Validates field names and builds a schema.
    ///
    /// The schema starts public and without a declared back-conversion.
    ///
    /// # Errors
    ///
    /// Returns every empty or duplicated field name found.
    pub fn new(names: TypeNames, fields: Vec<FieldSpec>) -> Result<Self, SchemaErrors> {
        let mut errors = SchemaErrors::default();
        if names.value.is_empty() {
            errors.push(SchemaError::EmptyName {
                what: "value type".to_owned(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            if field.name.is_empty() {
                errors.push(SchemaError::EmptyName {
                    what: "field".to_owned(),
                });
            } else if !seen.insert(field.name.as_str()) {
                errors.push(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        errors.into_result(Self {
            names,
            fields,
            has_explicit_to_builder: false,
            is_public: true,
        })
    }

    /// Records whether the source declares its own back-conversion method.
    #[must_use]
    pub const fn with_explicit_to_builder(mut self, declared: bool) -> Self {
        self.has_explicit_to_builder = declared;
        self
    }

    /// Records whether the generated builder is publicly visible.
    #[must_use]
    pub const fn with_public_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// The value/builder name pair.
    #[must_use]
    pub const fn names(&self) -> &TypeNames {
        &self.names
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Whether the source declares a back-conversion method.
    #[must_use]
    pub const fn has_explicit_to_builder(&self) -> bool {
        self.has_explicit_to_builder
    }

    /// Whether the builder is publicly visible.
    #[must_use]
    pub const fn is_public_visibility(&self) -> bool {
        self.is_public
    }
}
