mod common;
mod plan_tests;
mod preset_tests;
mod targets_tests;
