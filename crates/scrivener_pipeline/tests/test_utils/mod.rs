//! Test utilities for orchestrator tests.

pub mod mock_generator;
pub mod mock_retriever;
pub mod mock_store;

#[allow(unused_imports)]
pub use mock_generator::{Reply, ScriptedGenerator};
#[allow(unused_imports)]
pub use mock_retriever::{MockRetriever, RetrieverBehavior};
#[allow(unused_imports)]
pub use mock_store::FailingStore;
