//! Semantics of individual body steps.

use value_synth::plan::{
    Comparison, ContainerKind, HashContribution, MethodRef, RenderStyle, RenderedField, Step,
    WhenAbsent,
};

use super::{Flow, Frame, Runtime};
use crate::datum::{Datum, canonical_f32_bits, canonical_f64_bits, fold_long, ordered_hash, render_elements};
use crate::error::{EvalError, EvalResult};

fn null_check(value: &Datum, message: &str) -> EvalResult<()> {
    if value.is_null() {
        Err(EvalError::null_argument(message))
    } else {
        Ok(())
    }
}

fn int_of(value: &Datum) -> EvalResult<i32> {
    match value {
        Datum::Int(v) => Ok(*v),
        Datum::Short(v) => Ok(i32::from(*v)),
        Datum::Byte(v) => Ok(i32::from(*v)),
        Datum::Char(v) => Ok(i32::from(*v)),
        other => Err(EvalError::mismatch("integral", other.kind_name())),
    }
}

/// Element-wise array equality; two nulls are equal.
fn arrays_equal(left: &Datum, right: &Datum) -> bool {
    match (left, right) {
        (Datum::Null, Datum::Null) => true,
        (Datum::Array(a), Datum::Array(b)) => a == b,
        _ => false,
    }
}

fn is_instance(candidate: &Datum, type_name: &str) -> bool {
    matches!(candidate, Datum::Object(instance) if instance.borrow().is_instance_of(type_name))
}

impl Runtime<'_> {
    pub(super) fn step(&self, frame: &mut Frame, step: &Step) -> EvalResult<Flow> {
        match step {
            Step::RejectNull { value, message } => {
                null_check(&self.eval(frame, value)?, message)?;
            }
            Step::ResetIfNull { param, field } => {
                if frame.param(param)?.is_null() {
                    frame.set_field(field, Datum::Null)?;
                    return Ok(Flow::Return(frame.receiver()?));
                }
            }
            Step::RejectNullItems { param, message, .. } => {
                Self::reject_null_items(frame, param, message)?;
            }
            Step::RejectNullEntries {
                param,
                key_message,
                value_message,
                ..
            } => Self::reject_null_entries(frame, param, key_message, value_message)?,
            Step::EnsureStorage { field, container } => {
                if frame.field(field)?.is_null() {
                    frame.set_field(field, Datum::empty_container(*container, true))?;
                }
            }
            Step::Allocate { field, container } => {
                frame.set_field(field, Datum::empty_container(*container, true))?;
            }
            Step::Assign { field, value } => {
                let stored = self.eval(frame, value)?;
                frame.set_field(field, stored)?;
            }
            Step::CopyInto {
                field,
                container,
                source,
                preserve_null,
            } => {
                let copied = self.eval(frame, source)?;
                Self::copy_into(frame, field, *container, &copied, *preserve_null)?;
            }
            Step::Drain {
                field,
                param,
                null_item_message,
                ..
            } => Self::drain(frame, field, param, null_item_message.as_deref())?,
            Step::Append { field, value } => {
                let item = self.eval(frame, value)?;
                frame.field(field)?.push(item)?;
            }
            Step::Put { field, key, value } => {
                let k = self.eval(frame, key)?;
                let v = self.eval(frame, value)?;
                frame.field(field)?.insert(k, v)?;
            }
            Step::Invoke { method, args } => {
                let values = self.eval_all(frame, args)?;
                self.invoke(&frame.receiver()?, method, values)?;
            }
            Step::DispatchIfCollection { param, method } => {
                let source = frame.param(param)?;
                if source.is_collection() {
                    let result = self.invoke(&frame.receiver()?, method, vec![source])?;
                    return Ok(Flow::Return(result));
                }
            }
            Step::DefaultIfNull {
                field,
                param,
                container,
            } => {
                let source = frame.param(param)?;
                let stored = if source.is_null() {
                    Datum::empty_container(*container, false)
                } else {
                    source
                };
                frame.set_field(field, stored)?;
            }
            Step::Finalize {
                local,
                field,
                container,
                when_absent,
            } => {
                let finalized = Self::finalize(&frame.field(field)?, *container, *when_absent)?;
                frame.bind(local, finalized);
            }
            Step::Bind { local, value } => {
                let bound = self.eval(frame, value)?;
                frame.bind(local, bound);
            }
            Step::ReturnIfSame { other } => {
                if frame.receiver()?.same_instance(&frame.param(other)?) {
                    return Ok(Flow::Return(Datum::Boolean(true)));
                }
            }
            Step::ReturnUnlessInstance { other, type_name } => {
                if !is_instance(&frame.param(other)?, type_name) {
                    return Ok(Flow::Return(Datum::Boolean(false)));
                }
            }
            Step::CompareField {
                field,
                other,
                accessor,
                comparison,
            } => {
                if !self.compare_field(frame, field, other, accessor, *comparison)? {
                    return Ok(Flow::Return(Datum::Boolean(false)));
                }
            }
            Step::HashSeed { local } => frame.bind(local, Datum::Int(1)),
            Step::HashMix {
                local,
                field,
                contribution,
            } => self.hash_mix(frame, local, field, contribution)?,
            Step::Render { type_name, fields } => {
                return Ok(Flow::Return(self.render_fields(frame, type_name, fields)?));
            }
            Step::Return { value } => return Ok(Flow::Return(self.eval(frame, value)?)),
            Step::ReturnBool { value } => return Ok(Flow::Return(Datum::Boolean(*value))),
        }
        Ok(Flow::Next)
    }

    fn reject_null_items(frame: &Frame, param: &str, message: &str) -> EvalResult<()> {
        let source = frame.param(param)?;
        let items = source
            .elements()
            .ok_or_else(|| EvalError::mismatch("collection", source.kind_name()))?;
        items.iter().try_for_each(|item| null_check(item, message))
    }

    fn reject_null_entries(
        frame: &Frame,
        param: &str,
        key_message: &str,
        value_message: &str,
    ) -> EvalResult<()> {
        let source = frame.param(param)?;
        let entries = source
            .entries()
            .ok_or_else(|| EvalError::mismatch("map", source.kind_name()))?;
        entries.iter().try_for_each(|(key, value)| {
            null_check(key, key_message)?;
            null_check(value, value_message)
        })
    }

    fn copy_into(
        frame: &Frame,
        field: &str,
        container: ContainerKind,
        source: &Datum,
        preserve_null: bool,
    ) -> EvalResult<()> {
        let stored = match (source.is_null(), preserve_null) {
            (true, true) => Datum::Null,
            (true, false) => return Err(EvalError::null_argument(field)),
            (false, _) => Datum::copied_container(source, container, true)?,
        };
        frame.set_field(field, stored)
    }

    /// Empties the iterator one element at a time; elements taken before a
    /// failing one stay appended.
    fn drain(frame: &Frame, field: &str, param: &str, null_item: Option<&str>) -> EvalResult<()> {
        let source = frame.param(param)?;
        let Datum::Iterator(queue) = &source else {
            return Err(EvalError::mismatch("iterator", source.kind_name()));
        };
        let target = frame.field(field)?;
        loop {
            let next = queue.borrow_mut().pop_front();
            let Some(item) = next else {
                return Ok(());
            };
            if let Some(message) = null_item {
                null_check(&item, message)?;
            }
            target.push(item)?;
        }
    }

    fn finalize(stored: &Datum, container: ContainerKind, when_absent: WhenAbsent) -> EvalResult<Datum> {
        if !stored.is_null() {
            return Datum::copied_container(stored, container, false);
        }
        Ok(match when_absent {
            WhenAbsent::Empty => Datum::empty_container(container, false),
            WhenAbsent::Null => Datum::Null,
        })
    }

    fn compare_field(
        &self,
        frame: &Frame,
        field: &str,
        other: &str,
        accessor: &MethodRef,
        comparison: Comparison,
    ) -> EvalResult<bool> {
        let mine = frame.field(field)?;
        let theirs = self.invoke(&frame.local(other)?, accessor, Vec::new())?;
        match comparison {
            Comparison::Primitive | Comparison::FloatingCompare => Ok(mine == theirs),
            Comparison::ArrayElements => Ok(arrays_equal(&mine, &theirs)),
            Comparison::NullSafeEquals => match (mine.is_null(), theirs.is_null()) {
                (true, true) => Ok(true),
                (false, false) => self.values_equal(&mine, &theirs),
                _ => Ok(false),
            },
        }
    }

    fn hash_mix(
        &self,
        frame: &mut Frame,
        local: &str,
        field: &str,
        contribution: &HashContribution,
    ) -> EvalResult<()> {
        let acc = int_of(&frame.local(local)?)?;
        let value = frame.field(field)?;
        let part = match contribution {
            HashContribution::Integral => int_of(&value)?,
            HashContribution::LongFold => match value {
                Datum::Long(v) => fold_long(v),
                other => return Err(EvalError::mismatch("long", other.kind_name())),
            },
            HashContribution::Boolean {
                when_true,
                when_false,
            } => match value {
                Datum::Boolean(true) => *when_true,
                Datum::Boolean(false) => *when_false,
                other => return Err(EvalError::mismatch("boolean", other.kind_name())),
            },
            HashContribution::FloatBits => match value {
                Datum::Float(v) if v.to_bits() << 1 == 0 => 0,
                Datum::Float(v) => canonical_f32_bits(v).cast_signed(),
                other => return Err(EvalError::mismatch("float", other.kind_name())),
            },
            HashContribution::DoubleFold { temp } => {
                let Datum::Double(v) = value else {
                    return Err(EvalError::mismatch("double", value.kind_name()));
                };
                let bits = canonical_f64_bits(v).cast_signed();
                frame.bind(temp, Datum::Long(bits));
                fold_long(bits)
            }
            HashContribution::ArrayElements => match &value {
                Datum::Null => 0,
                Datum::Array(items) => ordered_hash(items.iter()),
                other => return Err(EvalError::mismatch("array", other.kind_name())),
            },
            HashContribution::NullSafeDelegate => {
                if value.is_null() {
                    0
                } else {
                    self.hash_code(&value)?
                }
            }
        };
        frame.bind(local, Datum::Int(acc.wrapping_mul(31).wrapping_add(part)));
        Ok(())
    }

    fn render_fields(&self, frame: &Frame, type_name: &str, fields: &[RenderedField]) -> EvalResult<Datum> {
        let parts = fields
            .iter()
            .map(|rendered| {
                let value = frame.field(&rendered.name)?;
                let text = match (rendered.style, value.elements()) {
                    (RenderStyle::Elements, Some(items)) => render_elements(&items),
                    (RenderStyle::Elements, None) => "null".to_owned(),
                    (RenderStyle::Plain, _) => self.render(&value)?,
                };
                Ok(format!("{}={text}", rendered.name))
            })
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Datum::text(format!("{type_name}{{{}}}", parts.join(", "))))
    }
}
