//! Intake of host declarations.
//!
//! The host toolchain describes an annotated interface as a [`Declaration`]:
//! its names, its kind, and its abstract accessor members in source order.
//! [`Declaration::to_schema`] turns that into a validated [`Schema`].

use serde::{Deserialize, Serialize};

use super::{FieldSpec, Schema, TypeDescriptor, TypeNames};
use crate::config::SynthesisConfig;
use crate::error::{SchemaError, SynthesisError};

/// Name of the member that declares a back-conversion to the builder.
const BACK_CONVERSION: &str = "builder";

/// Kind of the annotated declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// An interface: the only supported kind.
    #[default]
    Interface,
    /// A concrete or abstract class.
    Class,
    /// An enumeration.
    Enum,
    /// An annotation type.
    Annotation,
}

impl DeclarationKind {
    /// Lower-case label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Class => "class",
            Self::Enum => "enum",
            Self::Annotation => "annotation",
        }
    }
}

/// One member method of the declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDecl {
    /// Method name.
    pub name: String,
    /// Resolved return type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Whether the member carries a nullable marker.
    #[serde(default)]
    pub nullable: bool,
    /// Static members are not fields and are skipped.
    #[serde(default)]
    pub is_static: bool,
}

/// An annotated value-type declaration as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Package name, empty for the default package.
    #[serde(default)]
    pub package: String,
    /// Value-type name, dotted when nested (`Outer.Inner`).
    pub name: String,
    /// Declaration kind.
    #[serde(default)]
    pub kind: DeclarationKind,
    /// Whether the declaration is public.
    #[serde(default = "default_public")]
    pub public: bool,
    /// Members in source order.
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

const fn default_public() -> bool {
    true
}

impl Declaration {
    /// Builder simple name: the innermost simple name plus the configured
    /// suffix.
    #[must_use]
    pub fn builder_name(&self, config: &SynthesisConfig) -> String {
        let simple = self.name.rsplit('.').next().unwrap_or(&self.name);
        format!("{simple}{}", config.builder_suffix)
    }

    /// Validates the declaration and produces its schema.
    ///
    /// Static members are skipped and a `builder` member is consumed as the
    /// back-conversion declaration.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] naming this declaration when it is not an
    /// interface, when the back-conversion returns the wrong type, or when the
    /// field list is invalid.
    pub fn to_schema(&self, config: &SynthesisConfig) -> Result<Schema, SynthesisError> {
        if self.kind != DeclarationKind::Interface {
            return Err(SynthesisError::single(
                &self.name,
                SchemaError::NotAnInterface {
                    declaration: self.name.clone(),
                    found: self.kind.as_str().to_owned(),
                },
            ));
        }

        let names = TypeNames::new(&self.package, &self.name, self.builder_name(config));
        let mut has_to_builder = false;
        let mut fields = Vec::with_capacity(self.members.len());
        for member in self.members.iter().filter(|m| !m.is_static) {
            if member.name == BACK_CONVERSION {
                self.check_back_conversion(member, &names)?;
                has_to_builder = true;
                continue;
            }
            fields.push(FieldSpec {
                name: member.name.clone(),
                ty: member.ty.clone(),
                nullable: member.nullable,
            });
        }

        Schema::new(names, fields)
            .map(|schema| {
                schema
                    .with_explicit_to_builder(has_to_builder)
                    .with_public_visibility(self.public)
            })
            .map_err(|errors| SynthesisError::new(&self.name, errors))
    }

    fn check_back_conversion(
        &self,
        member: &MemberDecl,
        names: &TypeNames,
    ) -> Result<(), SynthesisError> {
        let found = member.ty.to_string();
        if found == names.builder || found == names.qualified_builder() {
            return Ok(());
        }
        Err(SynthesisError::single(
            &self.name,
            SchemaError::MalformedBackConversion {
                declaration: self.name.clone(),
                expected: names.builder.clone(),
                found,
            },
        ))
    }
}
