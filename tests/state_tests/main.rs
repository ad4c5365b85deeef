//! State adapter integration tests

mod adapter_tests;
