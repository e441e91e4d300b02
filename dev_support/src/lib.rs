//! Code to support development of tests and benchmarks.

pub mod log_builder;
pub mod test_support;
