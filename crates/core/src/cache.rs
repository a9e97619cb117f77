//! Per-run embedding cache with request coalescing.
//!
//! Keyed by (model id, whitespace-normalized text) so re-embedding an
//! unchanged corpus, or a query equal to a corpus entry, never costs a second
//! provider call. Each key holds a `OnceCell`: concurrent requesters for the
//! same key wait on the first in-flight call instead of duplicating it. A
//! failed fill leaves the cell empty, so a later call may try again.

use crate::models::Embedding;
use providers::retry::RetryPolicy;
use providers::{EmbeddingProvider, ProviderError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    model: String,
    text: String,
}

/// Trim and collapse internal whitespace so texts differing only in
/// surrounding whitespace share a cache entry.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
pub struct VectorCache {
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<Embedding>>>>,
}

impl VectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the embedding for `text`, calling the provider at most once
    /// per key across all concurrent callers.
    pub async fn get_or_embed(
        &self,
        provider: &Arc<dyn EmbeddingProvider>,
        retry: &RetryPolicy,
        text: &str,
    ) -> Result<Embedding, ProviderError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        let key = CacheKey {
            model: provider.model_id().to_string(),
            text: normalized.clone(),
        };

        let cell = {
            let mut map = self.entries.lock().expect("cache mutex poisoned");
            map.entry(key)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_try_init(|| async {
            let texts = [normalized.clone()];
            let resp = retry.run(|| provider.embed(&texts)).await?;
            let vector = resp.vectors.into_iter().next().ok_or_else(|| {
                ProviderError::RequestFailed("provider returned no vectors".into())
            })?;
            Ok(Embedding::new(provider.model_id(), vector))
        })
        .await
        .cloned()
    }

    /// Number of keys with a resolved embedding.
    pub fn resolved_len(&self) -> usize {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}
