//! Tests for plan assembly.

use super::*;
use crate::plan::{
    Comparison, ContainerKind, HashContribution, Metadata, MethodPlan, Operand, Step, TypePlan,
    Visibility, WhenAbsent,
};
use crate::schema::{OptionalFlavor, PrimitiveKind, TypeDescriptor};
use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

fn schema(fields: Vec<FieldSpec>) -> Result<Schema> {
    Schema::new(TypeNames::new("com.example", "Sample", "SampleBuilder"), fields)
        .map_err(|e| anyhow!(e))
}

fn plan_for(fields: Vec<FieldSpec>) -> Result<EmissionPlan> {
    Ok(Synthesizer::default().synthesize(&schema(fields)?)?)
}

fn method<'a>(ty: &'a TypePlan, name: &str, kind: MethodKind) -> Result<&'a MethodPlan> {
    ty.method(&MethodRef::new(name, kind))
        .ok_or_else(|| anyhow!("missing {name} ({kind:?})"))
}

fn kinds_for(ty: &TypePlan, field: &str) -> Vec<MethodKind> {
    ty.members_for(field).map(|m| m.kind).collect()
}

#[fixture]
fn tags() -> FieldSpec {
    FieldSpec::new("tags", TypeDescriptor::list(TypeDescriptor::string()))
}

#[fixture]
fn scores() -> FieldSpec {
    FieldSpec::new(
        "scores",
        TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::declared("java.lang.Integer")),
    )
}

#[rstest]
fn builder_members_follow_emission_order(tags: FieldSpec) -> Result<()> {
    let decl_schema = schema(vec![FieldSpec::new("name", TypeDescriptor::string()), tags])?
        .with_explicit_to_builder(true);
    let plan = Synthesizer::default().synthesize(&decl_schema)?;
    let kinds: Vec<_> = plan.builder.methods.iter().map(|m| m.kind).collect();
    let expected = vec![
        MethodKind::DefaultConstructor,
        MethodKind::CopyFromValue,
        MethodKind::CopyFromBuilder,
        MethodKind::Getter,
        MethodKind::Setter,
        MethodKind::Getter,
        MethodKind::DeclaredCollectionSetter,
        MethodKind::CollectionSetter,
        MethodKind::IterableSetter,
        MethodKind::IteratorSetter,
        MethodKind::VarargsSetter,
        MethodKind::Adder,
        MethodKind::BuilderCopy,
        MethodKind::Build,
        MethodKind::FromValue,
        MethodKind::FromBuilder,
    ];
    ensure!(kinds == expected, "unexpected order: {kinds:?}");
    ensure!(plan.value().is_some(), "value type must be nested");
    Ok(())
}

#[rstest]
fn collection_family_is_complete(tags: FieldSpec) -> Result<()> {
    let plan = plan_for(vec![tags])?;
    let adder = method(&plan.builder, "addTag", MethodKind::Adder)?;
    ensure!(
        adder.body.first()
            == Some(&Step::RejectNull {
                value: Operand::param("tag"),
                message: "tag".into(),
            }),
        "adder must reject a null item first"
    );
    let collection = method(&plan.builder, "tags", MethodKind::CollectionSetter)?;
    ensure!(
        collection.body.contains(&Step::RejectNullItems {
            param: "tags".into(),
            item: "item".into(),
            message: "tags: null item".into(),
        }),
        "enforced collection setter must check items"
    );
    Ok(())
}

#[rstest]
#[case::list(TypeDescriptor::list(TypeDescriptor::string()), MethodKind::DeclaredCollectionSetter)]
#[case::set(TypeDescriptor::set(TypeDescriptor::string()), MethodKind::CollectionSetter)]
fn varargs_delegate_by_collection_kind(
    #[case] ty: TypeDescriptor,
    #[case] target: MethodKind,
) -> Result<()> {
    let plan = plan_for(vec![FieldSpec::new("names", ty)])?;
    let varargs = method(&plan.builder, "names", MethodKind::VarargsSetter)?;
    let Some(Step::Return {
        value: Operand::Invoke { method: called, .. },
    }) = varargs.body.last()
    else {
        return Err(anyhow!("varargs must end by delegating"));
    };
    ensure!(called.kind == target, "delegated to {:?}", called.kind);
    Ok(())
}

#[test]
fn nullable_collections_reset_instead_of_rejecting() -> Result<()> {
    let plan = plan_for(vec![FieldSpec::nullable(
        "tags",
        TypeDescriptor::list(TypeDescriptor::string()),
    )])?;
    for kind in [
        MethodKind::CollectionSetter,
        MethodKind::IterableSetter,
        MethodKind::IteratorSetter,
        MethodKind::VarargsSetter,
    ] {
        let setter = method(&plan.builder, "tags", kind)?;
        ensure!(
            setter.body.first()
                == Some(&Step::ResetIfNull {
                    param: "tags".into(),
                    field: "tags".into(),
                }),
            "{kind:?} must reset on null"
        );
        ensure!(
            !setter
                .body
                .iter()
                .any(|s| matches!(s, Step::RejectNull { .. } | Step::RejectNullItems { .. })),
            "{kind:?} must not reject"
        );
    }
    let getter = method(&plan.builder, "tags", MethodKind::Getter)?;
    ensure!(getter.body.len() == 1, "nullable getter must not allocate");
    Ok(())
}

#[rstest]
#[case::singular("tag", None)]
#[case::keyword("classes", None)]
#[case::core_type("Strings", None)]
#[case::plural("labels", Some("addLabel"))]
fn adder_presence_follows_singular(
    #[case] field: &str,
    #[case] adder: Option<&str>,
) -> Result<()> {
    let plan = plan_for(vec![FieldSpec::new(
        field,
        TypeDescriptor::set(TypeDescriptor::string()),
    )])?;
    let kinds = kinds_for(&plan.builder, field);
    let found = plan
        .builder
        .members_for(field)
        .find(|m| m.kind == MethodKind::Adder)
        .map(|m| m.name.as_str());
    ensure!(found == adder, "adder was {found:?}");
    ensure!(
        kinds.iter().filter(|k| k.is_mutator()).count() == 5 + usize::from(adder.is_some()),
        "bulk setters must always be present: {kinds:?}"
    );
    Ok(())
}

#[rstest]
fn map_pairs_chain_through_lower_arities(scores: FieldSpec) -> Result<()> {
    let plan = plan_for(vec![scores])?;
    let kinds = kinds_for(&plan.builder, "scores");
    for arity in 1..=5 {
        ensure!(
            kinds.contains(&MethodKind::MapPairsSetter { arity }),
            "missing arity {arity}"
        );
    }
    let one = method(&plan.builder, "scores", MethodKind::MapPairsSetter { arity: 1 })?;
    ensure!(
        one.body.contains(&Step::Allocate {
            field: "scores".into(),
            container: ContainerKind::Map,
        }),
        "arity 1 must allocate storage"
    );
    let three = method(&plan.builder, "scores", MethodKind::MapPairsSetter { arity: 3 })?;
    let Some(Step::Invoke { method: called, args }) = three.body.first() else {
        return Err(anyhow!("arity 3 must delegate first"));
    };
    ensure!(
        called.kind == MethodKind::MapPairsSetter { arity: 2 } && args.len() == 4,
        "arity 3 must pass two pairs to arity 2"
    );
    ensure!(
        three.body.contains(&Step::RejectNull {
            value: Operand::param("k3"),
            message: "scores: k3".into(),
        }),
        "arity 3 must check its own key"
    );
    ensure!(
        !three.body.iter().any(|s| matches!(s, Step::Allocate { .. })),
        "only arity 1 allocates"
    );
    Ok(())
}

#[rstest]
fn map_pair_arity_is_configurable(scores: FieldSpec) -> Result<()> {
    let config = SynthesisConfig {
        max_map_pairs: 2,
        ..SynthesisConfig::default()
    };
    let plan = Synthesizer::new(config).synthesize(&schema(vec![scores])?)?;
    let arities: Vec<_> = kinds_for(&plan.builder, "scores")
        .into_iter()
        .filter_map(|k| match k {
            MethodKind::MapPairsSetter { arity } => Some(arity),
            _ => None,
        })
        .collect();
    ensure!(arities == [1, 2], "got {arities:?}");
    Ok(())
}

#[rstest]
fn putter_messages_use_singular(scores: FieldSpec) -> Result<()> {
    let plan = plan_for(vec![scores])?;
    let putter = method(&plan.builder, "putScore", MethodKind::Putter)?;
    ensure!(
        putter.body.iter().take(2).cloned().collect::<Vec<_>>()
            == vec![
                Step::RejectNull {
                    value: Operand::param("key"),
                    message: "score: key".into(),
                },
                Step::RejectNull {
                    value: Operand::param("value"),
                    message: "score: value".into(),
                },
            ],
        "unexpected putter checks"
    );
    let setter = method(&plan.builder, "scores", MethodKind::MapSetter)?;
    ensure!(
        setter.body.contains(&Step::RejectNullEntries {
            param: "scores".into(),
            entry: "entry".into(),
            key_message: "scores: null key".into(),
            value_message: "scores: null value".into(),
        }),
        "enforced map setter must walk entries"
    );
    Ok(())
}

#[test]
fn optional_setters_never_reject_and_defaults_seed_absent() -> Result<()> {
    let plan = plan_for(vec![FieldSpec::new(
        "nickname",
        TypeDescriptor::optional(OptionalFlavor::Guava, TypeDescriptor::string()),
    )])?;
    let ctor = method(&plan.builder, "SampleBuilder", MethodKind::DefaultConstructor)?;
    ensure!(
        ctor.body
            == vec![Step::Assign {
                field: "nickname".into(),
                value: Operand::Absent {
                    flavor: OptionalFlavor::Guava,
                },
            }],
        "default constructor must seed the absent optional"
    );
    for kind in [MethodKind::OptionalSetter, MethodKind::OptionalValueSetter] {
        let setter = method(&plan.builder, "nickname", kind)?;
        ensure!(
            !setter.body.iter().any(|s| matches!(s, Step::RejectNull { .. })),
            "{kind:?} must not reject null"
        );
    }
    let value = plan.value().ok_or_else(|| anyhow!("no value type"))?;
    let value_ctor = method(value, "Value", MethodKind::ValueConstructor)?;
    ensure!(
        value_ctor.body.first()
            == Some(&Step::RejectNull {
                value: Operand::param("nickname"),
                message: "nickname".into(),
            }),
        "value constructor still rejects an absent optional"
    );
    Ok(())
}

#[rstest]
fn value_constructor_checks_before_assigning(tags: FieldSpec) -> Result<()> {
    let plan = plan_for(vec![
        tags,
        FieldSpec::new("name", TypeDescriptor::string()),
        FieldSpec::new("age", TypeDescriptor::primitive(PrimitiveKind::Int)),
    ])?;
    let value = plan.value().ok_or_else(|| anyhow!("no value type"))?;
    let ctor = method(value, "Value", MethodKind::ValueConstructor)?;
    let expected = vec![
        Step::RejectNull {
            value: Operand::param("name"),
            message: "name".into(),
        },
        Step::DefaultIfNull {
            field: "tags".into(),
            param: "tags".into(),
            container: ContainerKind::List,
        },
        Step::Assign {
            field: "name".into(),
            value: Operand::param("name"),
        },
        Step::Assign {
            field: "age".into(),
            value: Operand::param("age"),
        },
    ];
    ensure!(ctor.body == expected, "unexpected body {:?}", ctor.body);
    ensure!(
        ctor.params.iter().all(|p| p.metadata.len() == 1),
        "every parameter carries its field name"
    );
    Ok(())
}

#[test]
fn build_finalizes_containers_by_policy() -> Result<()> {
    let plan = plan_for(vec![
        FieldSpec::new("tags", TypeDescriptor::set(TypeDescriptor::string())),
        FieldSpec::nullable("notes", TypeDescriptor::list(TypeDescriptor::string())),
    ])?;
    let build = method(&plan.builder, "build", MethodKind::Build)?;
    let absent: Vec<_> = build
        .body
        .iter()
        .filter_map(|s| match s {
            Step::Finalize { when_absent, .. } => Some(*when_absent),
            _ => None,
        })
        .collect();
    ensure!(absent == [WhenAbsent::Empty, WhenAbsent::Null], "got {absent:?}");
    Ok(())
}

#[rstest]
#[case::int(PrimitiveKind::Int, HashContribution::Integral, Comparison::Primitive)]
#[case::char(PrimitiveKind::Char, HashContribution::Integral, Comparison::Primitive)]
#[case::long(PrimitiveKind::Long, HashContribution::LongFold, Comparison::Primitive)]
#[case::boolean(
    PrimitiveKind::Boolean,
    HashContribution::Boolean { when_true: 1231, when_false: 1237 },
    Comparison::Primitive
)]
#[case::float(PrimitiveKind::Float, HashContribution::FloatBits, Comparison::FloatingCompare)]
#[case::double(
    PrimitiveKind::Double,
    HashContribution::DoubleFold { temp: "temp".into() },
    Comparison::FloatingCompare
)]
fn primitives_hash_and_compare_by_kind(
    #[case] kind: PrimitiveKind,
    #[case] hash: HashContribution,
    #[case] comparison: Comparison,
) -> Result<()> {
    let plan = plan_for(vec![FieldSpec::new("n", TypeDescriptor::primitive(kind))])?;
    let value = plan.value().ok_or_else(|| anyhow!("no value type"))?;
    let hash_code = method(value, "hashCode", MethodKind::HashCode)?;
    ensure!(
        hash_code.body.iter().any(|s| matches!(
            s,
            Step::HashMix { contribution, .. } if *contribution == hash
        )),
        "missing {hash:?}"
    );
    let equals = method(value, "equals", MethodKind::Equals)?;
    ensure!(
        equals.body.iter().any(|s| matches!(
            s,
            Step::CompareField { comparison: c, .. } if *c == comparison
        )),
        "missing {comparison:?}"
    );
    Ok(())
}

#[test]
fn equals_without_fields_skips_the_cast() -> Result<()> {
    let plan = plan_for(Vec::new())?;
    let value = plan.value().ok_or_else(|| anyhow!("no value type"))?;
    let equals = method(value, "equals", MethodKind::Equals)?;
    ensure!(equals.body.len() == 3, "got {:?}", equals.body);
    Ok(())
}

#[test]
fn locals_avoid_field_names() -> Result<()> {
    let plan = plan_for(vec![
        FieldSpec::new("that", TypeDescriptor::string()),
        FieldSpec::new("result", TypeDescriptor::primitive(PrimitiveKind::Int)),
        FieldSpec::new("tags", TypeDescriptor::list(TypeDescriptor::string())),
        FieldSpec::new("_tags", TypeDescriptor::string()),
    ])?;
    let value = plan.value().ok_or_else(|| anyhow!("no value type"))?;
    let equals = method(value, "equals", MethodKind::Equals)?;
    ensure!(
        equals
            .body
            .iter()
            .any(|s| matches!(s, Step::Bind { local, .. } if local == "_that")),
        "equals must rename its cast local"
    );
    let hash_code = method(value, "hashCode", MethodKind::HashCode)?;
    ensure!(
        hash_code.body.first()
            == Some(&Step::HashSeed {
                local: "_result".into()
            }),
        "hashCode must rename its accumulator"
    );
    let build = method(&plan.builder, "build", MethodKind::Build)?;
    ensure!(
        build
            .body
            .iter()
            .any(|s| matches!(s, Step::Finalize { local, .. } if local == "__tags")),
        "build scratch must avoid the _tags field"
    );
    Ok(())
}

#[rstest]
#[case::declared(true, true)]
#[case::implicit(false, false)]
fn back_conversion_overrides_only_when_declared(
    #[case] declared: bool,
    #[case] overrides: bool,
) -> Result<()> {
    let decl_schema = schema(vec![])?.with_explicit_to_builder(declared);
    let plan = Synthesizer::default().synthesize(&decl_schema)?;
    let value = plan.value().ok_or_else(|| anyhow!("no value type"))?;
    let to_builder = method(value, "builder", MethodKind::ToBuilder)?;
    ensure!(
        to_builder.has_metadata(&Metadata::Overrides) == overrides,
        "override marker mismatch"
    );
    ensure!(
        plan.builder.method(&MethodRef::new("builder", MethodKind::BuilderCopy)).is_some()
            == declared,
        "builder-side copy mismatch"
    );
    Ok(())
}

#[rstest]
#[case::public(true, Visibility::Public)]
#[case::package(false, Visibility::Package)]
fn builder_visibility_follows_schema(
    #[case] public: bool,
    #[case] expected: Visibility,
) -> Result<()> {
    let decl_schema = schema(vec![])?.with_public_visibility(public);
    let plan = Synthesizer::default().synthesize(&decl_schema)?;
    ensure!(plan.builder.visibility == expected, "visibility mismatch");
    ensure!(
        plan.builder.metadata.iter().any(|m| matches!(m, Metadata::Generated { .. })),
        "builder must carry the generated-by marker"
    );
    Ok(())
}

#[test]
fn schema_errors_are_collected_per_schema() -> Result<()> {
    let bad = schema(vec![
        FieldSpec::new("class", TypeDescriptor::string()),
        FieldSpec::new("when", TypeDescriptor::unresolved("Instant")),
        FieldSpec::new("fine", TypeDescriptor::string()),
    ])?;
    let error = Synthesizer::default()
        .synthesize(&bad)
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
    let fields: Vec<_> = error.errors.iter().filter_map(SchemaError::field).collect();
    ensure!(fields == ["class", "when"], "got {fields:?}");
    ensure!(error.schema == "Sample", "error must name the schema");
    Ok(())
}

#[test]
fn batch_continues_past_failures() -> Result<()> {
    let good: Declaration = serde_json::from_str(r#"{ "name": "Good", "members": [] }"#)?;
    let bad: Declaration =
        serde_json::from_str(r#"{ "name": "Bad", "kind": "class", "members": [] }"#)?;
    let report = synthesize_all([&bad, &good], SynthesisConfig::default());
    ensure!(!report.is_success(), "the class declaration must fail");
    ensure!(report.plans.len() == 1, "the interface must still synthesize");
    let diagnostics = report.diagnostics();
    ensure!(
        diagnostics.len() == 1 && diagnostics.iter().all(|d| d.schema == "Bad"),
        "got {diagnostics:?}"
    );
    Ok(())
}
