//! Tests for schema construction and declaration intake.

use super::*;
use crate::config::SynthesisConfig;
use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

#[fixture]
fn config() -> SynthesisConfig {
    SynthesisConfig::default()
}

fn member(name: &str, ty: TypeDescriptor) -> MemberDecl {
    MemberDecl {
        name: name.to_owned(),
        ty,
        nullable: false,
        is_static: false,
    }
}

fn declaration(name: &str, members: Vec<MemberDecl>) -> Declaration {
    Declaration {
        package: "com.example".to_owned(),
        name: name.to_owned(),
        kind: DeclarationKind::Interface,
        public: true,
        members,
    }
}

#[test]
fn schema_collects_every_duplicate_and_empty_name() -> Result<()> {
    let names = TypeNames::new("", "Foo", "FooBuilder");
    let fields = vec![
        FieldSpec::new("a", TypeDescriptor::string()),
        FieldSpec::new("", TypeDescriptor::string()),
        FieldSpec::new("a", TypeDescriptor::string()),
    ];
    let errors = Schema::new(names, fields)
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
    let collected: Vec<_> = errors.into_iter().collect();
    ensure!(
        collected
            == vec![
                SchemaError::EmptyName {
                    what: "field".into()
                },
                SchemaError::DuplicateField { field: "a".into() },
            ],
        "unexpected errors: {collected:?}"
    );
    Ok(())
}

#[test]
fn schema_preserves_field_order() -> Result<()> {
    let names = TypeNames::new("", "Foo", "FooBuilder");
    let fields = vec![
        FieldSpec::new("zeta", TypeDescriptor::string()),
        FieldSpec::new("alpha", TypeDescriptor::string()),
    ];
    let schema = Schema::new(names, fields).map_err(|e| anyhow!(e))?;
    let order: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
    ensure!(order == ["zeta", "alpha"], "order changed: {order:?}");
    ensure!(schema.is_public_visibility(), "schemas start public");
    ensure!(!schema.has_explicit_to_builder(), "no back-conversion by default");
    Ok(())
}

#[rstest]
#[case::default_package("", "FooBuilder")]
#[case::packaged("com.example", "com.example.FooBuilder")]
fn qualified_builder_name_includes_package(#[case] package: &str, #[case] expected: &str) {
    let names = TypeNames::new(package, "Foo", "FooBuilder");
    assert_eq!(names.qualified_builder(), expected);
}

#[rstest]
#[case::top_level("Foo", "FooBuilder")]
#[case::nested("Outer.Inner", "InnerBuilder")]
fn builder_name_uses_innermost_simple_name(
    config: SynthesisConfig,
    #[case] name: &str,
    #[case] expected: &str,
) {
    assert_eq!(declaration(name, vec![]).builder_name(&config), expected);
}

#[rstest]
#[case::class(DeclarationKind::Class)]
#[case::enumeration(DeclarationKind::Enum)]
#[case::annotation(DeclarationKind::Annotation)]
fn only_interfaces_are_accepted(config: SynthesisConfig, #[case] kind: DeclarationKind) -> Result<()> {
    let mut decl = declaration("Foo", vec![]);
    decl.kind = kind;
    let error = decl
        .to_schema(&config)
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
    ensure!(error.schema == "Foo", "error should name the declaration");
    let first = error.errors.iter().next().cloned();
    ensure!(
        first
            == Some(SchemaError::NotAnInterface {
                declaration: "Foo".into(),
                found: kind.as_str().into(),
            }),
        "unexpected error {first:?}"
    );
    Ok(())
}

#[rstest]
fn static_members_are_not_fields(config: SynthesisConfig) -> Result<()> {
    let mut helper = member("helper", TypeDescriptor::string());
    helper.is_static = true;
    let decl = declaration(
        "Foo",
        vec![member("name", TypeDescriptor::string()), helper],
    );
    let schema = decl.to_schema(&config).map_err(|e| anyhow!(e))?;
    ensure!(schema.fields().len() == 1, "static member leaked into fields");
    Ok(())
}

#[rstest]
#[case::simple("FooBuilder")]
#[case::qualified("com.example.FooBuilder")]
fn builder_member_marks_back_conversion(
    config: SynthesisConfig,
    #[case] returns: &str,
) -> Result<()> {
    let decl = declaration(
        "Foo",
        vec![
            member("name", TypeDescriptor::string()),
            member("builder", TypeDescriptor::declared(returns)),
        ],
    );
    let schema = decl.to_schema(&config).map_err(|e| anyhow!(e))?;
    ensure!(schema.has_explicit_to_builder(), "back-conversion not recorded");
    ensure!(
        schema.fields().iter().all(|f| f.name != "builder"),
        "builder() must not become a field"
    );
    Ok(())
}

#[rstest]
fn wrong_back_conversion_type_is_rejected(config: SynthesisConfig) -> Result<()> {
    let decl = declaration(
        "Foo",
        vec![member("builder", TypeDescriptor::string())],
    );
    let error = decl
        .to_schema(&config)
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
    let first = error.errors.iter().next().cloned();
    ensure!(
        first
            == Some(SchemaError::MalformedBackConversion {
                declaration: "Foo".into(),
                expected: "FooBuilder".into(),
                found: "java.lang.String".into(),
            }),
        "unexpected error {first:?}"
    );
    Ok(())
}

#[test]
fn declarations_deserialize_with_defaults() -> Result<()> {
    let decl: Declaration = serde_json::from_str(
        r#"{
            "name": "Foo",
            "members": [
                { "name": "tags", "type": { "kind": "collection", "collection": "list",
                  "element": { "kind": "declared", "name": "java.lang.String" } } }
            ]
        }"#,
    )?;
    ensure!(decl.kind == DeclarationKind::Interface, "kind should default");
    ensure!(decl.public, "declarations default to public");
    ensure!(decl.package.is_empty(), "package should default to empty");
    let tags = decl.members.first().ok_or_else(|| anyhow!("missing member"))?;
    ensure!(
        tags.ty == TypeDescriptor::list(TypeDescriptor::string()),
        "unexpected type {}",
        tags.ty
    );
    Ok(())
}
