//! Mock content retriever.

use async_trait::async_trait;
use scrivener_core::RetrievedContent;
use scrivener_error::{RetrievalError, RetrievalErrorKind, ScrivenerResult};
use scrivener_interface::{ContentRetriever, HealthStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum RetrieverBehavior {
    /// Answer with `"{prefix}: {query}"` as the passage
    Echo(String),
    /// Answer with a service fallback only
    Fallback(String),
    /// Answer with blank content
    Blank,
    /// Fail with a status error
    Fail,
    /// Answer only after the delay
    Stall(Duration),
}

#[derive(Clone)]
pub struct MockRetriever {
    name: String,
    behavior: RetrieverBehavior,
    healthy: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockRetriever {
    pub fn new(name: &str, behavior: RetrieverBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            healthy: true,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[allow(dead_code)]
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Queries received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentRetriever for MockRetriever {
    async fn fetch(&self, query: &str) -> ScrivenerResult<RetrievedContent> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.behavior {
            RetrieverBehavior::Echo(prefix) => Ok(RetrievedContent::from_content(format!(
                "{}: {}",
                prefix, query
            ))
            .with_source(self.name.clone())),
            RetrieverBehavior::Fallback(text) => Ok(RetrievedContent::from_fallback(text.clone())),
            RetrieverBehavior::Blank => Ok(RetrievedContent::from_content("   ")),
            RetrieverBehavior::Fail => Err(RetrievalError::new(RetrievalErrorKind::Status {
                service: self.name.clone(),
                status: 503,
            })
            .into()),
            RetrieverBehavior::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(RetrievedContent::from_content("arrived too late"))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn health(&self) -> HealthStatus {
        if self.healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unreachable {
                message: "connection refused".to_string(),
            }
        }
    }
}
