//! Per-adapter integration tests

mod certstore_test;
mod est_test;
mod rest_test;
mod trace_test;
