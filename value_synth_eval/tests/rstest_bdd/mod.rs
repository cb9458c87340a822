//! `rstest-bdd` harness for the builder lifecycle.
//!
//! Fixtures hold the synthesized plan and the builder and value instances a
//! scenario works with; steps drive them through the reference evaluator.

mod fixtures;
mod scenarios;
mod steps;
