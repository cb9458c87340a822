//! Binds the lifecycle feature file to its fixtures.

use super::fixtures::{LifecycleContext, lifecycle_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/builder_lifecycle.feature",
    fixtures = [lifecycle_context: LifecycleContext]
);
