//! Persistent container integration tests

mod map_tests;
