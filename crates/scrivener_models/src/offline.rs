//! Generator used when no model is reachable.

use async_trait::async_trait;
use scrivener_core::GenerateRequest;
use scrivener_error::{GenerationError, GenerationErrorKind, ScrivenerResult};
use scrivener_interface::TextGenerator;

/// Fails every call, so every agent takes its deterministic fallback.
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    /// Create with the reason reported in every error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableGenerator {
    fn default() -> Self {
        Self::new("offline mode")
    }
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _request: &GenerateRequest) -> ScrivenerResult<String> {
        Err(GenerationError::new(GenerationErrorKind::Unavailable(self.reason.clone())).into())
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrivener_error::ScrivenerErrorKind;

    #[tokio::test]
    async fn test_always_unavailable() {
        let generator = UnavailableGenerator::new("no key");
        let request = GenerateRequest::builder().prompt("anything").build().unwrap();
        let err = generator.generate(&request).await.unwrap_err();
        match err.kind() {
            ScrivenerErrorKind::Generation(e) => {
                assert_eq!(e.kind, GenerationErrorKind::Unavailable("no key".to_string()))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
