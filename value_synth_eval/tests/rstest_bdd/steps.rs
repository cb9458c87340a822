//! Step definitions for the builder lifecycle scenarios.

use super::fixtures::LifecycleContext;
use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use test_helpers::fixtures::person_schema;
use value_synth::{MethodKind, synthesize};
use value_synth_eval::{Datum, EvalError, Runtime};

/// Stores the outcome of a call: a new builder or value on success, the
/// error otherwise.
fn record(slot: &rstest_bdd::Slot<Datum>, context: &LifecycleContext, outcome: Result<Datum, EvalError>) {
    match outcome {
        Ok(datum) => slot.set(datum),
        Err(err) => context.failure.set(err),
    }
}

fn add_nickname(context: &LifecycleContext, nickname: Datum) -> Result<()> {
    let builder = context.current_builder()?;
    let outcome = context.with_runtime(|runtime| {
        Ok(runtime.call(&builder, "addNickname", MethodKind::Adder, vec![nickname]))
    })?;
    record(&context.builder, context, outcome.map(|_| builder));
    Ok(())
}

fn nickname_count(runtime: &Runtime<'_>, value: &Datum) -> Result<usize> {
    runtime
        .get(value, "nicknames")?
        .size()
        .ok_or_else(|| anyhow!("nicknames is not a collection"))
}

#[given("the person plan")]
fn person_plan(lifecycle_context: &LifecycleContext) -> Result<()> {
    ensure!(lifecycle_context.plan.is_empty(), "plan already synthesized");
    lifecycle_context.plan.set(synthesize(&person_schema()?)?);
    Ok(())
}

#[given("a fresh builder")]
fn fresh_builder(lifecycle_context: &LifecycleContext) -> Result<()> {
    let builder = lifecycle_context.with_runtime(|runtime| Ok(runtime.new_builder()?))?;
    lifecycle_context.builder.set(builder);
    Ok(())
}

#[when("the text field {field} is set to {value}")]
fn set_text(lifecycle_context: &LifecycleContext, field: String, value: String) -> Result<()> {
    let builder = lifecycle_context.current_builder()?;
    lifecycle_context.with_runtime(|runtime| {
        runtime.call(&builder, &field, MethodKind::Setter, vec![Datum::text(value)])?;
        Ok(())
    })
}

#[when("the nickname {nickname} is added")]
fn add_named(lifecycle_context: &LifecycleContext, nickname: String) -> Result<()> {
    add_nickname(lifecycle_context, Datum::text(nickname))
}

#[when("a null nickname is added")]
fn add_null(lifecycle_context: &LifecycleContext) -> Result<()> {
    add_nickname(lifecycle_context, Datum::Null)
}

#[when("the builder is built")]
fn build(lifecycle_context: &LifecycleContext) -> Result<()> {
    let builder = lifecycle_context.current_builder()?;
    let outcome = lifecycle_context.with_runtime(|runtime| Ok(runtime.build(&builder)))?;
    record(&lifecycle_context.value, lifecycle_context, outcome);
    Ok(())
}

#[when("the built value is kept")]
fn keep_value(lifecycle_context: &LifecycleContext) -> Result<()> {
    lifecycle_context.kept.set(lifecycle_context.current_value()?);
    Ok(())
}

#[when("the value is converted back to a builder")]
fn to_builder(lifecycle_context: &LifecycleContext) -> Result<()> {
    let value = lifecycle_context.current_value()?;
    let builder = lifecycle_context.with_runtime(|runtime| {
        Ok(runtime.call(&value, "builder", MethodKind::ToBuilder, Vec::new())?)
    })?;
    lifecycle_context.builder.set(builder);
    Ok(())
}

#[then("the text field {field} of the value is {expected}")]
fn text_field_is(lifecycle_context: &LifecycleContext, field: String, expected: String) -> Result<()> {
    let value = lifecycle_context.current_value()?;
    let actual = lifecycle_context.with_runtime(|runtime| Ok(runtime.get(&value, &field)?))?;
    ensure!(actual == Datum::text(expected), "{field} was {actual}");
    Ok(())
}

#[then("the value has {count:usize} nicknames")]
fn value_nicknames(lifecycle_context: &LifecycleContext, count: usize) -> Result<()> {
    let value = lifecycle_context.current_value()?;
    let actual = lifecycle_context.with_runtime(|runtime| nickname_count(runtime, &value))?;
    ensure!(actual == count, "value has {actual} nicknames");
    Ok(())
}

#[then("the kept value has {count:usize} nicknames")]
fn kept_nicknames(lifecycle_context: &LifecycleContext, count: usize) -> Result<()> {
    let kept = lifecycle_context
        .kept
        .get()
        .ok_or_else(|| anyhow!("no value was kept"))?;
    let actual = lifecycle_context.with_runtime(|runtime| nickname_count(runtime, &kept))?;
    ensure!(actual == count, "kept value has {actual} nicknames");
    Ok(())
}

fn kept_equals_value(context: &LifecycleContext) -> Result<bool> {
    let kept = context.kept.get().ok_or_else(|| anyhow!("no value was kept"))?;
    let value = context.current_value()?;
    ensure!(!kept.same_instance(&value), "a second build produced the same instance");
    context.with_runtime(|runtime| Ok(runtime.values_equal(&kept, &value)?))
}

#[then("the kept value equals the value")]
fn kept_equal(lifecycle_context: &LifecycleContext) -> Result<()> {
    ensure!(kept_equals_value(lifecycle_context)?, "values differ");
    Ok(())
}

#[then("the kept value differs from the value")]
fn kept_differs(lifecycle_context: &LifecycleContext) -> Result<()> {
    ensure!(!kept_equals_value(lifecycle_context)?, "values are equal");
    Ok(())
}

#[then("the last call fails naming {field}")]
fn fails_naming(lifecycle_context: &LifecycleContext, field: String) -> Result<()> {
    let failure = lifecycle_context
        .failure
        .take()
        .ok_or_else(|| anyhow!("no call has failed"))?;
    ensure!(
        failure == EvalError::NullArgument { message: field },
        "unexpected failure: {failure}"
    );
    Ok(())
}
