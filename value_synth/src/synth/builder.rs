//! The mutable builder type.

use super::{Context, FieldInfo, accessors};
use crate::plan::{
    FieldPlan, Metadata, MethodKind, MethodPlan, Operand, ParamPlan, Shape, Step, TypePlan,
    TypeRole, Visibility, WhenAbsent,
};
use crate::policy::NullPolicy;

/// Builds the builder with `value_type` nested inside it.
pub(super) fn build_builder_type(ctx: &Context<'_>, value_type: TypePlan) -> TypePlan {
    let mut methods = vec![
        build_default_constructor(ctx),
        build_copy_from_value(ctx),
        build_copy_from_builder(ctx),
    ];
    for field in &ctx.fields {
        methods.extend(accessors::build_accessors(ctx, field));
    }
    if ctx.has_explicit_to_builder {
        methods.push(build_builder_copy(ctx));
    }
    methods.push(build_build(ctx));
    methods.push(build_factory(ctx, MethodKind::FromValue, Shape::Value));
    methods.push(build_factory(ctx, MethodKind::FromBuilder, Shape::Builder));

    TypePlan {
        name: ctx.builder_name().to_owned(),
        role: TypeRole::Builder,
        visibility: if ctx.is_public {
            Visibility::Public
        } else {
            Visibility::Package
        },
        is_static: false,
        is_final: true,
        implements: Vec::new(),
        metadata: vec![Metadata::Generated {
            generator: ctx.config.generator.clone(),
        }],
        fields: ctx
            .fields
            .iter()
            .map(|f| FieldPlan {
                name: f.name().to_owned(),
                ty: f.spec.ty.clone(),
                is_final: false,
            })
            .collect(),
        methods,
        nested: vec![value_type],
    }
}

fn constructor(
    ctx: &Context<'_>,
    kind: MethodKind,
    visibility: Visibility,
    params: Vec<ParamPlan>,
    body: Vec<Step>,
) -> MethodPlan {
    MethodPlan {
        name: ctx.builder_name().to_owned(),
        kind,
        field: None,
        visibility,
        is_static: false,
        params,
        returns: Shape::Void,
        metadata: Vec::new(),
        body,
    }
}

/// Enforced optionals start out absent; everything else keeps its zero value.
fn build_default_constructor(ctx: &Context<'_>) -> MethodPlan {
    let body = ctx
        .fields
        .iter()
        .filter(|f| f.policy == NullPolicy::SeedAbsent)
        .filter_map(|f| {
            f.optional_flavor().map(|flavor| Step::Assign {
                field: f.name().to_owned(),
                value: Operand::Absent { flavor },
            })
        })
        .collect();
    constructor(
        ctx,
        MethodKind::DefaultConstructor,
        Visibility::Public,
        Vec::new(),
        body,
    )
}

fn source_param(shape: Shape) -> Vec<ParamPlan> {
    vec![ParamPlan::new(Context::SOURCE, shape)]
}

fn build_copy_from_value(ctx: &Context<'_>) -> MethodPlan {
    let mut body = Vec::with_capacity(ctx.fields.len() * 2);
    for field in &ctx.fields {
        let read = Operand::Invoke {
            target: Box::new(Operand::param(Context::SOURCE)),
            method: field.value_getter(),
            args: Vec::new(),
        };
        match field.container() {
            Some(container) => {
                body.push(Step::Bind {
                    local: field.scratch.clone(),
                    value: read,
                });
                body.push(Step::CopyInto {
                    field: field.name().to_owned(),
                    container,
                    source: Operand::local(&field.scratch),
                    preserve_null: true,
                });
            }
            None => body.push(Step::Assign {
                field: field.name().to_owned(),
                value: read,
            }),
        }
    }
    constructor(
        ctx,
        MethodKind::CopyFromValue,
        Visibility::Private,
        source_param(Shape::Value),
        body,
    )
}

fn build_copy_from_builder(ctx: &Context<'_>) -> MethodPlan {
    let body = ctx
        .fields
        .iter()
        .map(|field| {
            let read = Operand::FieldOf {
                target: Box::new(Operand::param(Context::SOURCE)),
                field: field.name().to_owned(),
            };
            match field.container() {
                Some(container) => Step::CopyInto {
                    field: field.name().to_owned(),
                    container,
                    source: read,
                    preserve_null: true,
                },
                None => Step::Assign {
                    field: field.name().to_owned(),
                    value: read,
                },
            }
        })
        .collect();
    constructor(
        ctx,
        MethodKind::CopyFromBuilder,
        Visibility::Private,
        source_param(Shape::Builder),
        body,
    )
}

fn new_builder(ctx: &Context<'_>, via: MethodKind, source: Operand) -> Operand {
    Operand::New {
        type_name: ctx.builder_name().to_owned(),
        constructor: via,
        args: vec![source],
    }
}

fn build_builder_copy(ctx: &Context<'_>) -> MethodPlan {
    MethodPlan {
        name: "builder".to_owned(),
        kind: MethodKind::BuilderCopy,
        field: None,
        visibility: Visibility::Public,
        is_static: false,
        params: Vec::new(),
        returns: Shape::Builder,
        metadata: Vec::new(),
        body: vec![Step::Return {
            value: new_builder(ctx, MethodKind::CopyFromBuilder, Operand::This),
        }],
    }
}

fn finalize(field: &FieldInfo<'_>) -> Option<Step> {
    let container = field.container()?;
    Some(Step::Finalize {
        local: field.scratch.clone(),
        field: field.name().to_owned(),
        container,
        when_absent: if field.is_enforced() {
            WhenAbsent::Empty
        } else {
            WhenAbsent::Null
        },
    })
}

/// Containers are copied fresh and sealed; everything else passes through.
fn build_build(ctx: &Context<'_>) -> MethodPlan {
    let mut body: Vec<Step> = ctx.fields.iter().filter_map(finalize).collect();
    let args = ctx
        .fields
        .iter()
        .map(|f| match f.container() {
            Some(_) => Operand::local(&f.scratch),
            None => Operand::field(f.name()),
        })
        .collect();
    body.push(Step::Return {
        value: Operand::New {
            type_name: ctx.value_name().to_owned(),
            constructor: MethodKind::ValueConstructor,
            args,
        },
    });
    MethodPlan {
        name: "build".to_owned(),
        kind: MethodKind::Build,
        field: None,
        visibility: Visibility::Public,
        is_static: false,
        params: Vec::new(),
        returns: Shape::Value,
        metadata: Vec::new(),
        body,
    }
}

fn build_factory(ctx: &Context<'_>, kind: MethodKind, source: Shape) -> MethodPlan {
    let via = match kind {
        MethodKind::FromBuilder => MethodKind::CopyFromBuilder,
        _ => MethodKind::CopyFromValue,
    };
    MethodPlan {
        name: "from".to_owned(),
        kind,
        field: None,
        visibility: Visibility::Public,
        is_static: true,
        params: source_param(source),
        returns: Shape::Builder,
        metadata: Vec::new(),
        body: vec![Step::Return {
            value: new_builder(ctx, via, Operand::param(Context::SOURCE)),
        }],
    }
}
