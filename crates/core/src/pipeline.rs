//! Retrieval orchestration: embed the query, fan out over the corpus with a
//! bounded number of in-flight provider calls, then rank.

use crate::cache::VectorCache;
use crate::config::AppConfig;
use crate::models::{Document, Query, RankedResult, SkippedDocument};
use crate::ranker;
use crate::similarity;
use chrono::Utc;
use providers::noop::NoopProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::retry::RetryPolicy;
use providers::{EmbeddingProvider, ProviderError, ProviderRegistry};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to embed query")]
    QueryEmbeddingFailed(#[source] ProviderError),
    #[error("retrieval cancelled before completion")]
    Cancelled,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    pub top_k: usize,
    pub concurrency: usize,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl RetrievalOptions {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            top_k: cfg.retrieval.top_k,
            concurrency: cfg.retrieval.concurrency,
            timeout: Duration::from_secs(cfg.retrieval.timeout_secs),
            retry: RetryPolicy {
                max_attempts: cfg.retry.max_attempts,
                base_delay: Duration::from_millis(cfg.retry.base_delay_ms),
            },
        }
    }

    fn validate(&self) -> Result<(), RetrievalError> {
        if self.top_k == 0 {
            return Err(RetrievalError::InvalidConfiguration(
                "top_k must be at least 1".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(RetrievalError::InvalidConfiguration(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(RetrievalError::InvalidConfiguration(
                "timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    cache: Arc<VectorCache>,
    options: RetrievalOptions,
}

impl Retriever {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        cache: Arc<VectorCache>,
        options: RetrievalOptions,
    ) -> Self {
        Self {
            provider,
            cache,
            options,
        }
    }

    /// Rank `documents` against `query` and return the top matches.
    ///
    /// Per-document embedding failures land in the skipped list rather than
    /// failing the call; a query embedding failure is fatal. The whole call
    /// runs under the configured deadline, after which pending provider
    /// calls are abandoned and `Cancelled` is returned.
    pub async fn retrieve(
        &self,
        documents: Vec<Document>,
        query: &Query,
    ) -> Result<RankedResult, RetrievalError> {
        self.options.validate()?;
        match tokio::time::timeout(self.options.timeout, self.run(documents, query)).await {
            Ok(result) => result,
            Err(_) => Err(RetrievalError::Cancelled),
        }
    }

    async fn run(
        &self,
        documents: Vec<Document>,
        query: &Query,
    ) -> Result<RankedResult, RetrievalError> {
        if documents.is_empty() {
            debug!("empty corpus, nothing to rank");
            return Ok(RankedResult::empty());
        }

        let query_embedding = self
            .cache
            .get_or_embed(&self.provider, &self.options.retry, &query.text)
            .await
            .map_err(RetrievalError::QueryEmbeddingFailed)?;
        if similarity::is_degenerate(&query_embedding) {
            return Err(RetrievalError::QueryEmbeddingFailed(
                ProviderError::RequestFailed("provider returned a zero vector for the query".into()),
            ));
        }

        info!(
            documents = documents.len(),
            concurrency = self.options.concurrency,
            "embedding corpus"
        );

        let semaphore = Arc::new(Semaphore::new(self.options.concurrency));
        let mut join_set = JoinSet::new();
        for document in documents {
            let provider = self.provider.clone();
            let cache = self.cache.clone();
            let retry = self.options.retry;
            let semaphore = semaphore.clone();
            join_set.spawn(async move {
                let permit = semaphore.acquire_owned().await;
                if permit.is_err() {
                    let reason = ProviderError::RequestFailed("admission queue closed".into());
                    return (document, Err(reason));
                }
                let embedding = cache.get_or_embed(&provider, &retry, &document.text).await;
                (document, embedding)
            });
        }

        let mut embedded = Vec::new();
        let mut skipped: Vec<SkippedDocument> = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((document, Ok(embedding))) => embedded.push((document, embedding)),
                Ok((document, Err(e))) => {
                    warn!(index = document.index, error = %e, "document skipped");
                    skipped.push(SkippedDocument {
                        document,
                        reason: e.to_string(),
                    });
                }
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => return Err(RetrievalError::Cancelled),
            }
        }

        // Join order is arbitrary; restore corpus order before ranking so
        // tie-breaks stay deterministic.
        embedded.sort_by_key(|(d, _)| d.index);

        let ranking = ranker::rank(&query_embedding, embedded, self.options.top_k);
        skipped.extend(ranking.unscored);
        skipped.sort_by_key(|s| s.document.index);

        if !skipped.is_empty() {
            warn!(skipped = skipped.len(), "some documents were not ranked");
        }

        Ok(RankedResult {
            results: ranking.top,
            skipped,
            generated_at: Utc::now(),
        })
    }
}

/// Register the providers available in this environment, mirroring the
/// configuration surface: `noop` is always present, `openai` when
/// `OPENAI_API_KEY` is set (`OPENAI_BASE_URL` optional).
pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new().with_embedding("noop", Arc::new(NoopProvider));

    if let Some(key) = std::env::var_os("OPENAI_API_KEY") {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: key.to_string_lossy().into_owned(),
            base_url,
            embedding_model: config.embeddings.model.clone(),
        });
        reg = reg.with_embedding("openai", Arc::new(provider));
    }

    reg.set_preferred_embedding(&config.embeddings.provider)
}
