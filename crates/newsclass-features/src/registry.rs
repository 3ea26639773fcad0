//! One-time artifact loading

use crate::model_loader::{load_classifier, load_embedding_table, load_tokenizer};
use crate::{Classifier, FeaturePipeline, NewsClassConfig, NewsClassifier};
use newsclass_core::{Error, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Load every artifact named by the configuration.
///
/// Blocking: reads the embedding table, classifier weights and language
/// resources from disk (or the Hugging Face cache).
pub fn load_artifacts(config: &NewsClassConfig) -> Result<NewsClassifier> {
    config.validate()?;

    info!(
        "Loading embedding table from {}",
        config.embeddings.source.describe()
    );
    let table = load_embedding_table(&config.embeddings, config.dimension)?;

    info!(
        "Loading classifier from {}",
        config.classifier.source.describe()
    );
    let classifier: Arc<dyn Classifier> =
        Arc::new(load_classifier(&config.classifier, config.dimension)?);

    let tokenizer = load_tokenizer(&config.preprocessing, &table)?;
    let pipeline = FeaturePipeline::new(tokenizer, Arc::new(table));

    let service = NewsClassifier::new(pipeline, classifier)?;
    info!(
        "Artifacts ready: {} words, dim {}, classifier {}",
        service.pipeline().table().len(),
        service.dim(),
        service.classifier_name()
    );

    Ok(service)
}

/// Process-wide latch around [`load_artifacts`]
///
/// Concurrent callers wait on the same load; once it succeeds every caller
/// gets the same shared classifier. A failed load leaves the latch empty.
#[derive(Debug, Default)]
pub struct SharedArtifacts {
    cell: OnceCell<Arc<NewsClassifier>>,
}

impl SharedArtifacts {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Load the artifacts on first use, off the async runtime
    pub async fn get_or_load(&self, config: &NewsClassConfig) -> Result<Arc<NewsClassifier>> {
        self.get_or_try_init(|| {
            let config = config.clone();
            async move {
                tokio::task::spawn_blocking(move || load_artifacts(&config))
                    .await
                    .map_err(|e| Error::internal(format!("Artifact loading task failed: {}", e)))?
            }
        })
        .await
    }

    /// Initialize with a custom loader
    pub async fn get_or_try_init<F, Fut>(&self, load: F) -> Result<Arc<NewsClassifier>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<NewsClassifier>>,
    {
        self.cell
            .get_or_try_init(move || async move { load().await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Already loaded artifacts, if any
    pub fn get(&self) -> Option<Arc<NewsClassifier>> {
        self.cell.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_artifacts_fail() {
        let config = NewsClassConfig::from_yaml(
            "embeddings:\n  path: /nonexistent/word2vec.txt\n",
        )
        .unwrap();

        let artifacts = SharedArtifacts::new();
        let err = artifacts.get_or_load(&config).await.unwrap_err();

        assert!(err.is_fatal());
        assert!(!artifacts.is_loaded());
        assert!(artifacts.get().is_none());
    }
}
