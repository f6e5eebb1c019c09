//! Unit test modules.

mod aggregation_test;
mod milestone_test;
mod streak_test;
