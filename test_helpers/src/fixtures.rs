//! Canonical declarations and schemas.
//!
//! `person` is the small everyday shape. `catalog` carries one field of every
//! category, enforced and nullable, so plan and runtime suites can walk the
//! whole mutator surface from a single schema.

use anyhow::{Result, anyhow};
use value_synth::{
    Declaration, FieldSpec, OptionalFlavor, PrimitiveKind, Schema, TypeDescriptor, TypeNames,
};

/// Package shared by every fixture.
pub const PACKAGE: &str = "com.example";

/// JSON text of the `Person` declaration, as a host would report it.
pub const PERSON_JSON: &str = r#"{
  "package": "com.example",
  "name": "Person",
  "members": [
    { "name": "name", "type": { "kind": "declared", "name": "java.lang.String" } },
    { "name": "age", "type": { "kind": "primitive", "of": "int" } },
    { "name": "nicknames", "type": { "kind": "collection", "collection": "list",
      "element": { "kind": "declared", "name": "java.lang.String" } } },
    { "name": "builder", "type": { "kind": "declared", "name": "PersonBuilder" } }
  ]
}"#;

/// TOML text of a two-declaration batch where the second one fails.
pub const BATCH_TOML: &str = r#"
[[declarations]]
package = "com.example"
name = "Point"

[[declarations.members]]
name = "x"
type = { kind = "primitive", of = "double" }

[[declarations.members]]
name = "y"
type = { kind = "primitive", of = "double" }

[[declarations]]
package = "com.example"
name = "Broken"
kind = "class"
"#;

/// The parsed `Person` declaration.
///
/// # Errors
///
/// Returns an error if [`PERSON_JSON`] does not deserialize.
pub fn person_declaration() -> Result<Declaration> {
    Ok(serde_json::from_str(PERSON_JSON)?)
}

fn schema(value: &str, fields: Vec<FieldSpec>) -> Result<Schema> {
    Schema::new(
        TypeNames::new(PACKAGE, value, format!("{value}Builder")),
        fields,
    )
    .map_err(|errors| anyhow!("fixture schema {value} is invalid: {errors}"))
}

/// `Person { name, age, nicknames }` with a declared back-conversion.
///
/// # Errors
///
/// Returns an error if the schema fails validation.
pub fn person_schema() -> Result<Schema> {
    Ok(schema(
        "Person",
        vec![
            FieldSpec::new("name", TypeDescriptor::string()),
            FieldSpec::new("age", TypeDescriptor::primitive(PrimitiveKind::Int)),
            FieldSpec::new("nicknames", TypeDescriptor::list(TypeDescriptor::string())),
        ],
    )?
    .with_explicit_to_builder(true))
}

fn integer() -> TypeDescriptor {
    TypeDescriptor::declared("java.lang.Integer")
}

/// One field of every category.
///
/// | field | category | enforced |
/// |---|---|---|
/// | `title` | reference | yes |
/// | `subtitle` | reference | no |
/// | `count` | int | no |
/// | `weight` | double | no |
/// | `checksum` | byte array | yes |
/// | `owner` | standard optional | yes |
/// | `alias` | guava optional | no |
/// | `tags` | list | yes |
/// | `labels` | set | yes |
/// | `notes` | list | no |
/// | `scores` | map | yes |
/// | `extras` | map | no |
///
/// # Errors
///
/// Returns an error if the schema fails validation.
pub fn catalog_schema() -> Result<Schema> {
    schema(
        "Catalog",
        vec![
            FieldSpec::new("title", TypeDescriptor::string()),
            FieldSpec::nullable("subtitle", TypeDescriptor::string()),
            FieldSpec::new("count", TypeDescriptor::primitive(PrimitiveKind::Int)),
            FieldSpec::new("weight", TypeDescriptor::primitive(PrimitiveKind::Double)),
            FieldSpec::new(
                "checksum",
                TypeDescriptor::array(TypeDescriptor::primitive(PrimitiveKind::Byte)),
            ),
            FieldSpec::new(
                "owner",
                TypeDescriptor::optional(OptionalFlavor::Standard, TypeDescriptor::string()),
            ),
            FieldSpec::nullable(
                "alias",
                TypeDescriptor::optional(OptionalFlavor::Guava, TypeDescriptor::string()),
            ),
            FieldSpec::new("tags", TypeDescriptor::list(TypeDescriptor::string())),
            FieldSpec::new("labels", TypeDescriptor::set(TypeDescriptor::string())),
            FieldSpec::nullable("notes", TypeDescriptor::list(TypeDescriptor::string())),
            FieldSpec::new("scores", TypeDescriptor::map(TypeDescriptor::string(), integer())),
            FieldSpec::nullable("extras", TypeDescriptor::map(TypeDescriptor::string(), integer())),
        ],
    )
}
