//! Integration test modules.

mod geocode_test;
mod pipeline_test;
