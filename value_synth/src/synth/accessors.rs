//! Builder getters and mutators, one family per field category.

use super::{Context, FieldInfo};
use crate::classify::Category;
use crate::naming::{adder_name, putter_name};
use crate::plan::{
    ContainerKind, ElementSource, MethodKind, MethodPlan, MethodRef, Operand, ParamPlan, Shape,
    Step, Visibility,
};
use crate::schema::{CollectionKind, OptionalFlavor, TypeDescriptor};

/// Getter followed by every mutator for `field`, in emission order.
pub(super) fn build_accessors(ctx: &Context<'_>, field: &FieldInfo<'_>) -> Vec<MethodPlan> {
    let mut methods = vec![build_getter(field)];
    match field.category {
        Category::Scalar(_) | Category::Reference { .. } => methods.push(build_setter(field)),
        Category::Optional { flavor, inner } => {
            methods.push(build_optional_value_setter(field, flavor, inner));
            methods.push(build_optional_setter(field, flavor, inner));
        }
        Category::Collection { kind, element } => {
            methods.extend(build_collection_setters(field, kind, element));
            methods.extend(build_adder(field, kind, element));
        }
        Category::Map { key, value } => {
            methods.push(build_map_setter(field, key, value));
            methods.extend(
                (1..=ctx.config.max_map_pairs).map(|arity| build_pairs_setter(field, key, value, arity)),
            );
            methods.extend(build_putter(field, key, value));
        }
    }
    methods
}

fn mutator(
    field: &FieldInfo<'_>,
    name: impl Into<String>,
    kind: MethodKind,
    params: Vec<ParamPlan>,
    body: Vec<Step>,
) -> MethodPlan {
    MethodPlan {
        name: name.into(),
        kind,
        field: Some(field.name().to_owned()),
        visibility: Visibility::Public,
        is_static: false,
        params,
        returns: Shape::Builder,
        metadata: Vec::new(),
        body,
    }
}

fn build_getter(field: &FieldInfo<'_>) -> MethodPlan {
    let mut body = Vec::with_capacity(2);
    if let Some(container) = field.container().filter(|_| field.is_enforced()) {
        body.push(Step::EnsureStorage {
            field: field.name().to_owned(),
            container,
        });
    }
    body.push(Step::Return {
        value: Operand::field(field.name()),
    });
    MethodPlan {
        returns: field.exact_shape(),
        ..mutator(field, field.name(), MethodKind::Getter, Vec::new(), body)
    }
}

fn reject_param(param: &str, message: impl Into<String>) -> Step {
    Step::RejectNull {
        value: Operand::param(param),
        message: message.into(),
    }
}

fn build_setter(field: &FieldInfo<'_>) -> MethodPlan {
    let name = field.name();
    let mut body = Vec::with_capacity(3);
    if field.is_enforced() {
        body.push(reject_param(name, name));
    }
    body.push(Step::Assign {
        field: name.to_owned(),
        value: Operand::param(name),
    });
    body.push(Step::return_this());
    let params = vec![ParamPlan::new(name, field.exact_shape())];
    mutator(field, name, MethodKind::Setter, params, body)
}

fn build_optional_value_setter(
    field: &FieldInfo<'_>,
    flavor: OptionalFlavor,
    inner: &TypeDescriptor,
) -> MethodPlan {
    let name = field.name();
    let wrapped = Operand::Maybe {
        flavor,
        value: Box::new(Operand::param(name)),
    };
    let body = vec![Step::Return {
        value: Operand::call(
            Context::mutator_ref(field, MethodKind::OptionalSetter),
            vec![wrapped],
        ),
    }];
    let params = vec![ParamPlan::new(name, Shape::exact(inner.clone()))];
    mutator(field, name, MethodKind::OptionalValueSetter, params, body)
}

/// The optional itself is never null-checked; absence is the empty optional.
fn build_optional_setter(
    field: &FieldInfo<'_>,
    flavor: OptionalFlavor,
    inner: &TypeDescriptor,
) -> MethodPlan {
    let name = field.name();
    let body = vec![
        Step::Assign {
            field: name.to_owned(),
            value: Operand::Cast {
                to: field.exact_shape(),
                value: Box::new(Operand::param(name)),
            },
        },
        Step::return_this(),
    ];
    let params = vec![ParamPlan::new(
        name,
        Shape::Maybe {
            flavor,
            inner: inner.clone(),
        },
    )];
    mutator(field, name, MethodKind::OptionalSetter, params, body)
}

/// Rejects a null argument when enforced, otherwise resets the field and
/// returns early.
fn null_guard(field: &FieldInfo<'_>) -> Step {
    let name = field.name();
    if field.is_enforced() {
        reject_param(name, name)
    } else {
        Step::ResetIfNull {
            param: name.to_owned(),
            field: name.to_owned(),
        }
    }
}

fn null_item_message(field: &FieldInfo<'_>) -> String {
    format!("{}: null item", field.name())
}

fn elements(source: ElementSource, element: &TypeDescriptor) -> Shape {
    Shape::Elements {
        source,
        element: element.clone(),
    }
}

fn build_collection_setters(
    field: &FieldInfo<'_>,
    kind: CollectionKind,
    element: &TypeDescriptor,
) -> [MethodPlan; 5] {
    let name = field.name();
    let container = ContainerKind::from(kind);
    let declared_source = match kind {
        CollectionKind::List => ElementSource::List,
        CollectionKind::Set => ElementSource::Set,
    };
    let collection_ref = Context::mutator_ref(field, MethodKind::CollectionSetter);

    let declared = mutator(
        field,
        name,
        MethodKind::DeclaredCollectionSetter,
        vec![ParamPlan::new(name, elements(declared_source, element))],
        vec![Step::Return {
            value: Operand::call(
                collection_ref.clone(),
                vec![Operand::Cast {
                    to: elements(ElementSource::Collection, element),
                    value: Box::new(Operand::param(name)),
                }],
            ),
        }],
    );

    let mut body = vec![null_guard(field)];
    if field.is_enforced() {
        body.push(Step::RejectNullItems {
            param: name.to_owned(),
            item: field.item.clone(),
            message: null_item_message(field),
        });
    }
    body.push(Step::CopyInto {
        field: name.to_owned(),
        container,
        source: Operand::param(name),
        preserve_null: false,
    });
    body.push(Step::return_this());
    let collection = mutator(
        field,
        name,
        MethodKind::CollectionSetter,
        vec![ParamPlan::new(name, elements(ElementSource::Collection, element))],
        body,
    );

    let iterable = mutator(
        field,
        name,
        MethodKind::IterableSetter,
        vec![ParamPlan::new(name, elements(ElementSource::Iterable, element))],
        vec![
            null_guard(field),
            Step::DispatchIfCollection {
                param: name.to_owned(),
                method: collection_ref,
            },
            Step::Return {
                value: Operand::call(
                    Context::mutator_ref(field, MethodKind::IteratorSetter),
                    vec![Operand::IteratorOf {
                        value: Box::new(Operand::param(name)),
                    }],
                ),
            },
        ],
    );

    let iterator = mutator(
        field,
        name,
        MethodKind::IteratorSetter,
        vec![ParamPlan::new(name, elements(ElementSource::Iterator, element))],
        vec![
            null_guard(field),
            Step::Allocate {
                field: name.to_owned(),
                container,
            },
            Step::Drain {
                field: name.to_owned(),
                param: name.to_owned(),
                item: field.item.clone(),
                null_item_message: field.is_enforced().then(|| null_item_message(field)),
            },
            Step::return_this(),
        ],
    );

    let varargs_target = match kind {
        CollectionKind::List => MethodKind::DeclaredCollectionSetter,
        CollectionKind::Set => MethodKind::CollectionSetter,
    };
    let varargs = mutator(
        field,
        name,
        MethodKind::VarargsSetter,
        vec![ParamPlan::new(name, elements(ElementSource::Varargs, element))],
        vec![
            null_guard(field),
            Step::Return {
                value: Operand::call(
                    Context::mutator_ref(field, varargs_target),
                    vec![Operand::ListOf {
                        param: name.to_owned(),
                    }],
                ),
            },
        ],
    );

    [declared, collection, iterable, iterator, varargs]
}

fn build_adder(
    field: &FieldInfo<'_>,
    kind: CollectionKind,
    element: &TypeDescriptor,
) -> Option<MethodPlan> {
    let singular = field.singular.as_deref()?;
    let mut body = Vec::with_capacity(4);
    if field.is_enforced() {
        body.push(reject_param(singular, singular));
    }
    body.push(Step::EnsureStorage {
        field: field.name().to_owned(),
        container: kind.into(),
    });
    body.push(Step::Append {
        field: field.name().to_owned(),
        value: Operand::param(singular),
    });
    body.push(Step::return_this());
    let params = vec![ParamPlan::new(singular, Shape::exact(element.clone()))];
    Some(mutator(field, adder_name(singular), MethodKind::Adder, params, body))
}

fn build_map_setter(
    field: &FieldInfo<'_>,
    key: &TypeDescriptor,
    value: &TypeDescriptor,
) -> MethodPlan {
    let name = field.name();
    let mut body = vec![null_guard(field)];
    if field.is_enforced() {
        body.push(Step::RejectNullEntries {
            param: name.to_owned(),
            entry: field.entry.clone(),
            key_message: format!("{name}: null key"),
            value_message: format!("{name}: null value"),
        });
    }
    body.push(Step::CopyInto {
        field: name.to_owned(),
        container: ContainerKind::Map,
        source: Operand::param(name),
        preserve_null: false,
    });
    body.push(Step::return_this());
    let params = vec![ParamPlan::new(
        name,
        Shape::Entries {
            key: key.clone(),
            value: value.clone(),
        },
    )];
    mutator(field, name, MethodKind::MapSetter, params, body)
}

fn pair_names(index: u8) -> (String, String) {
    (format!("k{index}"), format!("v{index}"))
}

/// Arity `k` delegates the first `k - 1` pairs to arity `k - 1`, then puts
/// its last pair. Arity 1 starts from fresh storage.
fn build_pairs_setter(
    field: &FieldInfo<'_>,
    key: &TypeDescriptor,
    value: &TypeDescriptor,
    arity: u8,
) -> MethodPlan {
    let name = field.name();
    let mut params = Vec::with_capacity(usize::from(arity) * 2);
    for index in 1..=arity {
        let (k, v) = pair_names(index);
        params.push(ParamPlan::new(k, Shape::exact(key.clone())));
        params.push(ParamPlan::new(v, Shape::exact(value.clone())));
    }

    let mut body = Vec::with_capacity(5);
    if let Some(previous) = arity.checked_sub(1).filter(|p| *p > 0) {
        let args = params
            .iter()
            .take(usize::from(previous) * 2)
            .map(|p| Operand::param(&p.name))
            .collect();
        body.push(Step::Invoke {
            method: MethodRef::new(name, MethodKind::MapPairsSetter { arity: previous }),
            args,
        });
    }
    let (k, v) = pair_names(arity);
    if field.is_enforced() {
        body.push(reject_param(&k, format!("{name}: {k}")));
        body.push(reject_param(&v, format!("{name}: {v}")));
    }
    if arity == 1 {
        body.push(Step::Allocate {
            field: name.to_owned(),
            container: ContainerKind::Map,
        });
    }
    body.push(Step::Put {
        field: name.to_owned(),
        key: Operand::param(&k),
        value: Operand::param(&v),
    });
    body.push(Step::return_this());
    mutator(
        field,
        name,
        MethodKind::MapPairsSetter { arity },
        params,
        body,
    )
}

fn build_putter(
    field: &FieldInfo<'_>,
    key: &TypeDescriptor,
    value: &TypeDescriptor,
) -> Option<MethodPlan> {
    const KEY: &str = "key";
    const VALUE: &str = "value";
    let singular = field.singular.as_deref()?;
    let mut body = Vec::with_capacity(5);
    if field.is_enforced() {
        body.push(reject_param(KEY, format!("{singular}: key")));
        body.push(reject_param(VALUE, format!("{singular}: value")));
    }
    body.push(Step::EnsureStorage {
        field: field.name().to_owned(),
        container: ContainerKind::Map,
    });
    body.push(Step::Put {
        field: field.name().to_owned(),
        key: Operand::param(KEY),
        value: Operand::param(VALUE),
    });
    body.push(Step::return_this());
    let params = vec![
        ParamPlan::new(KEY, Shape::exact(key.clone())),
        ParamPlan::new(VALUE, Shape::exact(value.clone())),
    ];
    Some(mutator(field, putter_name(singular), MethodKind::Putter, params, body))
}
