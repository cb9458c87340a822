//! The nested immutable value type.

use super::{Context, FieldInfo};
use crate::classify::Category;
use crate::plan::{
    Comparison, FieldPlan, HashContribution, Metadata, MethodKind, MethodPlan,
    Operand, ParamPlan, RenderStyle, RenderedField, Shape, Step, TypePlan, TypeRole,
    Visibility,
};
use crate::policy::NullPolicy;
use crate::schema::{PrimitiveKind, TypeDescriptor};

/// Builds the value type: storage, constructor, getters, back-conversion,
/// `equals`, `hashCode`, and `toString`.
pub(super) fn build_value_type(ctx: &Context<'_>) -> TypePlan {
    let mut methods = Vec::with_capacity(ctx.fields.len() + 5);
    methods.push(build_constructor(ctx));
    methods.extend(ctx.fields.iter().map(build_getter));
    methods.push(build_to_builder(ctx));
    methods.push(build_equals(ctx));
    methods.push(build_hash_code(ctx));
    methods.push(build_to_string(ctx));

    TypePlan {
        name: ctx.value_name().to_owned(),
        role: TypeRole::Value,
        visibility: Visibility::Private,
        is_static: true,
        is_final: true,
        implements: vec![ctx.names.qualified_value()],
        metadata: Vec::new(),
        fields: ctx
            .fields
            .iter()
            .map(|f| FieldPlan {
                name: f.name().to_owned(),
                ty: f.spec.ty.clone(),
                is_final: true,
            })
            .collect(),
        methods,
        nested: Vec::new(),
    }
}

fn method(name: &str, kind: MethodKind, returns: Shape, body: Vec<Step>) -> MethodPlan {
    MethodPlan {
        name: name.to_owned(),
        kind,
        field: None,
        visibility: Visibility::Public,
        is_static: false,
        params: Vec::new(),
        returns,
        metadata: vec![Metadata::Overrides],
        body,
    }
}

/// Enforced non-containers are all checked before anything is assigned.
fn build_constructor(ctx: &Context<'_>) -> MethodPlan {
    let mut body: Vec<Step> = ctx
        .fields
        .iter()
        .filter(|f| f.policy.rejects_at_construction())
        .map(|f| Step::RejectNull {
            value: Operand::param(f.name()),
            message: f.name().to_owned(),
        })
        .collect();
    body.extend(ctx.fields.iter().map(|f| match (f.policy, f.container()) {
        (NullPolicy::CoerceEmpty, Some(container)) => Step::DefaultIfNull {
            field: f.name().to_owned(),
            param: f.name().to_owned(),
            container,
        },
        _ => Step::Assign {
            field: f.name().to_owned(),
            value: Operand::param(f.name()),
        },
    }));

    let params = ctx
        .fields
        .iter()
        .map(|f| ParamPlan {
            metadata: vec![Metadata::FieldName {
                name: f.name().to_owned(),
            }],
            ..ParamPlan::new(f.name(), f.exact_shape())
        })
        .collect();

    MethodPlan {
        visibility: Visibility::Private,
        params,
        metadata: Vec::new(),
        ..method(ctx.value_name(), MethodKind::ValueConstructor, Shape::Void, body)
    }
}

fn build_getter(field: &FieldInfo<'_>) -> MethodPlan {
    let body = vec![Step::Return {
        value: Operand::field(field.name()),
    }];
    MethodPlan {
        field: Some(field.name().to_owned()),
        metadata: vec![Metadata::FieldAccessor, Metadata::Overrides],
        ..method(field.name(), MethodKind::ValueGetter, field.exact_shape(), body)
    }
}

fn build_to_builder(ctx: &Context<'_>) -> MethodPlan {
    let body = vec![Step::Return {
        value: Operand::New {
            type_name: ctx.builder_name().to_owned(),
            constructor: MethodKind::CopyFromValue,
            args: vec![Operand::This],
        },
    }];
    let metadata = if ctx.has_explicit_to_builder {
        vec![Metadata::Overrides]
    } else {
        Vec::new()
    };
    MethodPlan {
        metadata,
        ..method("builder", MethodKind::ToBuilder, Shape::Builder, body)
    }
}

fn comparison(ty: &TypeDescriptor) -> Comparison {
    match ty {
        TypeDescriptor::Primitive {
            of: PrimitiveKind::Float | PrimitiveKind::Double,
        } => Comparison::FloatingCompare,
        TypeDescriptor::Primitive { .. } => Comparison::Primitive,
        TypeDescriptor::Array { .. } => Comparison::ArrayElements,
        _ => Comparison::NullSafeEquals,
    }
}

fn build_equals(ctx: &Context<'_>) -> MethodPlan {
    let locals = &ctx.locals;
    let value_type = ctx.names.qualified_value();
    let mut body = vec![
        Step::ReturnIfSame {
            other: locals.other.clone(),
        },
        Step::ReturnUnlessInstance {
            other: locals.other.clone(),
            type_name: value_type,
        },
    ];
    if !ctx.fields.is_empty() {
        body.push(Step::Bind {
            local: locals.that.clone(),
            value: Operand::Cast {
                to: Shape::Value,
                value: Box::new(Operand::param(&locals.other)),
            },
        });
        body.extend(ctx.fields.iter().map(|f| Step::CompareField {
            field: f.name().to_owned(),
            other: locals.that.clone(),
            accessor: f.value_getter(),
            comparison: comparison(&f.spec.ty),
        }));
    }
    body.push(Step::ReturnBool { value: true });
    MethodPlan {
        params: vec![ParamPlan::new(&locals.other, Shape::Object)],
        ..method("equals", MethodKind::Equals, Shape::Boolean, body)
    }
}

fn contribution(ty: &TypeDescriptor, temp: &str) -> HashContribution {
    match ty {
        TypeDescriptor::Primitive { of } => match of {
            PrimitiveKind::Int | PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Char => {
                HashContribution::Integral
            }
            PrimitiveKind::Long => HashContribution::LongFold,
            PrimitiveKind::Boolean => HashContribution::Boolean {
                when_true: 1231,
                when_false: 1237,
            },
            PrimitiveKind::Float => HashContribution::FloatBits,
            PrimitiveKind::Double => HashContribution::DoubleFold {
                temp: temp.to_owned(),
            },
        },
        TypeDescriptor::Array { .. } => HashContribution::ArrayElements,
        _ => HashContribution::NullSafeDelegate,
    }
}

fn build_hash_code(ctx: &Context<'_>) -> MethodPlan {
    let locals = &ctx.locals;
    let mut body = vec![Step::HashSeed {
        local: locals.result.clone(),
    }];
    body.extend(ctx.fields.iter().map(|f| Step::HashMix {
        local: locals.result.clone(),
        field: f.name().to_owned(),
        contribution: contribution(&f.spec.ty, &locals.temp),
    }));
    body.push(Step::Return {
        value: Operand::local(&locals.result),
    });
    method("hashCode", MethodKind::HashCode, Shape::Int, body)
}

fn build_to_string(ctx: &Context<'_>) -> MethodPlan {
    let fields = ctx
        .fields
        .iter()
        .map(|f| RenderedField {
            name: f.name().to_owned(),
            style: match f.category {
                Category::Reference { array: true } => RenderStyle::Elements,
                _ => RenderStyle::Plain,
            },
        })
        .collect();
    let body = vec![Step::Render {
        type_name: ctx.names.value.clone(),
        fields,
    }];
    method("toString", MethodKind::ToString, Shape::Text, body)
}
