//! Library integration tests for buildplan-lib.

mod common;
mod properties_tests;
mod scenario_tests;
