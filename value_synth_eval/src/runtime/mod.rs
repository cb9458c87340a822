//! Plan execution.
//!
//! A [`Runtime`] interprets the bodies of one [`EmissionPlan`]: constructors
//! allocate instances with zero-valued fields, methods run their steps in
//! order, and the first `return` ends the call.

mod steps;


use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;
use value_synth::plan::{
    ContainerKind, EmissionPlan, MethodKind, MethodPlan, MethodRef, Operand, TypePlan, TypeRole,
};
use value_synth::{PrimitiveKind, TypeDescriptor};

use crate::datum::{Datum, Instance};
use crate::error::{EvalError, EvalResult};

/// What a step hands back to the body loop.
enum Flow {
    Next,
    Return(Datum),
}

/// Bindings visible to one running body.
struct Frame {
    this: Option<Datum>,
    params: HashMap<String, Datum>,
    locals: HashMap<String, Datum>,
}

impl Frame {
    fn receiver(&self) -> EvalResult<Datum> {
        self.this.clone().ok_or_else(|| EvalError::UnboundName {
            name: "this".to_owned(),
        })
    }

    fn param(&self, name: &str) -> EvalResult<Datum> {
        self.params
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundName {
                name: name.to_owned(),
            })
    }

    fn local(&self, name: &str) -> EvalResult<Datum> {
        self.locals
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundName {
                name: name.to_owned(),
            })
    }

    fn bind(&mut self, name: &str, value: Datum) {
        self.locals.insert(name.to_owned(), value);
    }

    fn field(&self, name: &str) -> EvalResult<Datum> {
        read_field(&self.receiver()?, name)
    }

    fn set_field(&self, name: &str, value: Datum) -> EvalResult<()> {
        let Datum::Object(instance) = self.receiver()? else {
            return Err(EvalError::mismatch("object", "non-object receiver"));
        };
        let mut inner = instance.borrow_mut();
        let slot = inner
            .fields
            .get_mut(name)
            .ok_or_else(|| EvalError::UnknownField {
                field: name.to_owned(),
            })?;
        *slot = value;
        Ok(())
    }
}

fn read_field(target: &Datum, name: &str) -> EvalResult<Datum> {
    let Datum::Object(instance) = target else {
        return Err(EvalError::mismatch("object", target.kind_name()));
    };
    instance
        .borrow()
        .fields
        .get(name)
        .cloned()
        .ok_or_else(|| EvalError::UnknownField {
            field: name.to_owned(),
        })
}

/// The zero value a freshly allocated field holds.
const fn zero_value(ty: &TypeDescriptor) -> Datum {
    match ty {
        TypeDescriptor::Primitive { of } => match of {
            PrimitiveKind::Boolean => Datum::Boolean(false),
            PrimitiveKind::Byte => Datum::Byte(0),
            PrimitiveKind::Short => Datum::Short(0),
            PrimitiveKind::Char => Datum::Char(0),
            PrimitiveKind::Int => Datum::Int(0),
            PrimitiveKind::Long => Datum::Long(0),
            PrimitiveKind::Float => Datum::Float(0.0),
            PrimitiveKind::Double => Datum::Double(0.0),
        },
        _ => Datum::Null,
    }
}

fn describe(method: &MethodRef) -> String {
    format!("{} ({:?})", method.name, method.kind)
}

/// Executes the builder and value types of one plan.
///
/// # Examples
///
/// ```
/// use value_synth::{FieldSpec, MethodKind, Schema, TypeDescriptor, TypeNames, synthesize};
/// use value_synth_eval::{Datum, Runtime};
///
/// let schema = Schema::new(
///     TypeNames::new("com.example", "Person", "PersonBuilder"),
///     vec![FieldSpec::new("name", TypeDescriptor::string())],
/// )
/// .expect("valid schema");
/// let plan = synthesize(&schema).expect("synthesized");
/// let runtime = Runtime::new(&plan).expect("plan has both types");
///
/// let builder = runtime.new_builder().expect("constructed");
/// runtime
///     .call(&builder, "name", MethodKind::Setter, vec![Datum::text("Ada")])
///     .expect("set");
/// let value = runtime.build(&builder).expect("built");
/// assert_eq!(runtime.render(&value).expect("rendered"), "Person{name=Ada}");
/// ```
#[derive(Debug)]
pub struct Runtime<'p> {
    builder: &'p TypePlan,
    value: &'p TypePlan,
    next_id: Cell<u32>,
}

impl<'p> Runtime<'p> {
    /// Indexes the plan's builder and value types.
    ///
    /// # Errors
    ///
    /// Fails with [`EvalError::MissingType`] when the plan has no nested value
    /// type.
    pub fn new(plan: &'p EmissionPlan) -> EvalResult<Self> {
        let value = plan.value().ok_or_else(|| EvalError::MissingType {
            name: "value".to_owned(),
        })?;
        Ok(Self {
            builder: &plan.builder,
            value,
            next_id: Cell::new(1),
        })
    }

    /// Runs the builder's default constructor.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the constructor body.
    pub fn new_builder(&self) -> EvalResult<Datum> {
        self.construct(self.builder, MethodKind::DefaultConstructor, Vec::new())
    }

    /// Calls an instance method on `receiver`.
    ///
    /// # Errors
    ///
    /// Fails with [`EvalError::NoSuchMethod`] when the receiver's type has no
    /// such instance method, and propagates any failure of the body.
    pub fn invoke(&self, receiver: &Datum, method: &MethodRef, args: Vec<Datum>) -> EvalResult<Datum> {
        let role = receiver
            .role()
            .ok_or_else(|| EvalError::mismatch("object", receiver.kind_name()))?;
        let ty = self.type_of(role);
        let plan = Self::find(ty, method).filter(|m| !m.is_static && !m.kind.is_constructor());
        let found = plan.ok_or_else(|| EvalError::NoSuchMethod {
            type_name: ty.name.clone(),
            method: describe(method),
        })?;
        self.run(found, Some(receiver.clone()), args)
    }

    /// Calls a static method of the builder.
    ///
    /// # Errors
    ///
    /// Fails with [`EvalError::NoSuchMethod`] when the builder has no such
    /// static method, and propagates any failure of the body.
    pub fn invoke_static(&self, method: &MethodRef, args: Vec<Datum>) -> EvalResult<Datum> {
        let found = Self::find(self.builder, method)
            .filter(|m| m.is_static)
            .ok_or_else(|| EvalError::NoSuchMethod {
                type_name: self.builder.name.clone(),
                method: describe(method),
            })?;
        self.run(found, None, args)
    }

    /// Calls the instance method `name` of `kind`.
    ///
    /// # Errors
    ///
    /// See [`Runtime::invoke`].
    pub fn call(
        &self,
        receiver: &Datum,
        name: &str,
        kind: MethodKind,
        args: Vec<Datum>,
    ) -> EvalResult<Datum> {
        self.invoke(receiver, &MethodRef::new(name, kind), args)
    }

    /// Runs `build()` on a builder.
    ///
    /// # Errors
    ///
    /// See [`Runtime::invoke`].
    pub fn build(&self, builder: &Datum) -> EvalResult<Datum> {
        self.call(builder, "build", MethodKind::Build, Vec::new())
    }

    /// Reads a value's field through its accessor.
    ///
    /// # Errors
    ///
    /// See [`Runtime::invoke`].
    pub fn get(&self, value: &Datum, field: &str) -> EvalResult<Datum> {
        self.call(value, field, MethodKind::ValueGetter, Vec::new())
    }

    /// Equality as the target platform's `equals` would decide it.
    ///
    /// Value instances use their generated `equals`; everything else uses
    /// [`Datum`] equality.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the generated `equals`.
    pub fn values_equal(&self, left: &Datum, right: &Datum) -> EvalResult<bool> {
        if left.role() != Some(TypeRole::Value) {
            return Ok(left == right);
        }
        match self.call(left, "equals", MethodKind::Equals, vec![right.clone()])? {
            Datum::Boolean(equal) => Ok(equal),
            other => Err(EvalError::mismatch("boolean", other.kind_name())),
        }
    }

    /// Hash code as the generated `hashCode` would compute it.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the generated `hashCode`.
    pub fn hash_code(&self, value: &Datum) -> EvalResult<i32> {
        if value.role() != Some(TypeRole::Value) {
            return Ok(value.java_hash());
        }
        match self.call(value, "hashCode", MethodKind::HashCode, Vec::new())? {
            Datum::Int(hash) => Ok(hash),
            other => Err(EvalError::mismatch("int", other.kind_name())),
        }
    }

    /// String form as the generated `toString` would produce it.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the generated `toString`.
    pub fn render(&self, value: &Datum) -> EvalResult<String> {
        if value.role() != Some(TypeRole::Value) {
            return Ok(value.to_string());
        }
        match self.call(value, "toString", MethodKind::ToString, Vec::new())? {
            Datum::Text(text) => Ok(text),
            other => Err(EvalError::mismatch("text", other.kind_name())),
        }
    }

    const fn type_of(&self, role: TypeRole) -> &'p TypePlan {
        match role {
            TypeRole::Builder => self.builder,
            TypeRole::Value => self.value,
        }
    }

    fn type_named(&self, name: &str) -> EvalResult<&'p TypePlan> {
        [self.builder, self.value]
            .into_iter()
            .find(|ty| ty.name == name)
            .ok_or_else(|| EvalError::MissingType {
                name: name.to_owned(),
            })
    }

    fn find(ty: &'p TypePlan, method: &MethodRef) -> Option<&'p MethodPlan> {
        ty.method(method)
    }

    fn allocate(&self, ty: &TypePlan) -> Datum {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        let fields = ty
            .fields
            .iter()
            .map(|f| (f.name.clone(), zero_value(&f.ty)))
            .collect();
        Datum::Object(Rc::new(RefCell::new(Instance {
            id,
            type_name: ty.name.clone(),
            role: ty.role,
            implements: ty.implements.clone(),
            fields,
        })))
    }

    fn construct(&self, ty: &'p TypePlan, kind: MethodKind, args: Vec<Datum>) -> EvalResult<Datum> {
        let ctor = ty.constructor(kind).ok_or_else(|| EvalError::NoSuchMethod {
            type_name: ty.name.clone(),
            method: format!("{kind:?}"),
        })?;
        let instance = self.allocate(ty);
        self.run(ctor, Some(instance.clone()), args)?;
        Ok(instance)
    }

    fn run(&self, method: &MethodPlan, this: Option<Datum>, args: Vec<Datum>) -> EvalResult<Datum> {
        if args.len() != method.params.len() {
            return Err(EvalError::mismatch(
                format!("{} argument(s) for {}", method.params.len(), method.name),
                format!("{}", args.len()),
            ));
        }
        trace!(method = %method.name, kind = ?method.kind, "evaluating");
        let mut frame = Frame {
            this,
            params: method
                .params
                .iter()
                .map(|p| p.name.clone())
                .zip(args)
                .collect(),
            locals: HashMap::new(),
        };
        for step in &method.body {
            if let Flow::Return(value) = self.step(&mut frame, step)? {
                return Ok(value);
            }
        }
        Ok(Datum::Null)
    }

    fn eval_all(&self, frame: &Frame, operands: &[Operand]) -> EvalResult<Vec<Datum>> {
        operands.iter().map(|op| self.eval(frame, op)).collect()
    }

    fn eval(&self, frame: &Frame, operand: &Operand) -> EvalResult<Datum> {
        match operand {
            Operand::This => frame.receiver(),
            Operand::Null => Ok(Datum::Null),
            Operand::Param { name } => frame.param(name),
            Operand::Local { name } => frame.local(name),
            Operand::Field { name } => frame.field(name),
            Operand::FieldOf { target, field } => read_field(&self.eval(frame, target)?, field),
            Operand::Invoke {
                target,
                method,
                args,
            } => {
                let receiver = self.eval(frame, target)?;
                let values = self.eval_all(frame, args)?;
                self.invoke(&receiver, method, values)
            }
            Operand::Maybe { flavor, value } => {
                let inner = self.eval(frame, value)?;
                Ok(Datum::Optional {
                    flavor: *flavor,
                    value: (!inner.is_null()).then(|| Box::new(inner)),
                })
            }
            Operand::Absent { flavor } => Ok(Datum::absent(*flavor)),
            Operand::ListOf { param } => {
                let array = frame.param(param)?;
                Datum::copied_container(&array, ContainerKind::List, false)
            }
            Operand::IteratorOf { value } => {
                let source = self.eval(frame, value)?;
                let items = source
                    .elements()
                    .ok_or_else(|| EvalError::mismatch("iterable", source.kind_name()))?;
                Ok(Datum::iterator(items))
            }
            Operand::Cast { value, .. } => self.eval(frame, value),
            Operand::New {
                type_name,
                constructor,
                args,
            } => {
                let ty = self.type_named(type_name)?;
                let values = self.eval_all(frame, args)?;
                self.construct(ty, *constructor, values)
            }
        }
    }
}
