use crate::{EmbedResponse, EmbeddingProvider, ProviderError};

/// Inert provider used when no credentials are configured.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for NoopProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(ProviderError::EmptyInput);
        }
        Ok(EmbedResponse {
            vectors: vec![vec![]; texts.len()],
        })
    }

    fn model_id(&self) -> &str {
        "noop"
    }
}
