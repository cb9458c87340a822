//! Scenario state shared between lifecycle steps.

use anyhow::{Result, anyhow};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use value_synth::EmissionPlan;
use value_synth_eval::{Datum, EvalError, Runtime};

/// State carried through one lifecycle scenario.
#[derive(Default, ScenarioState)]
pub struct LifecycleContext {
    /// Plan under test.
    pub plan: Slot<EmissionPlan>,
    /// Builder the scenario mutates.
    pub builder: Slot<Datum>,
    /// Most recently built value.
    pub value: Slot<Datum>,
    /// A value set aside for later comparison.
    pub kept: Slot<Datum>,
    /// Failure of the most recent call, if it failed.
    pub failure: Slot<EvalError>,
}

impl LifecycleContext {
    /// Runs `f` with a runtime over the stored plan.
    pub fn with_runtime<T>(&self, f: impl FnOnce(&Runtime<'_>) -> Result<T>) -> Result<T> {
        self.plan
            .with_ref(|plan| Runtime::new(plan).map_err(anyhow::Error::from).and_then(|rt| f(&rt)))
            .ok_or_else(|| anyhow!("no plan has been synthesized"))?
    }

    /// The current builder.
    pub fn current_builder(&self) -> Result<Datum> {
        self.builder.get().ok_or_else(|| anyhow!("no builder has been created"))
    }

    /// The most recently built value.
    pub fn current_value(&self) -> Result<Datum> {
        self.value.get().ok_or_else(|| anyhow!("nothing has been built"))
    }
}

/// Creates empty scenario state.
#[fixture]
pub fn lifecycle_context() -> LifecycleContext {
    LifecycleContext::default()
}
