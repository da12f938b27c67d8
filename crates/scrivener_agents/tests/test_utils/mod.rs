//! Test utilities for agent tests.

pub mod mock_generator;

#[allow(unused_imports)]
pub use mock_generator::{MockBehavior, MockGenerator, MockResponse};
