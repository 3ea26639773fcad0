//! End-to-end news classification

use crate::{Classifier, FeaturePipeline, Features};
use newsclass_core::{Category, Error, Prediction, Result, TokenSequence};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Message shown when there is nothing to classify
pub const EMPTY_INPUT_WARNING: &str = "Please enter some text.";

/// Outcome of one classification request
#[derive(Debug, Clone)]
pub enum ClassifyOutcome {
    /// Blank input; nothing was vectorized or classified
    EmptyInput,

    /// The classifier ran
    Predicted {
        prediction: Prediction,
        tokens: TokenSequence,
    },
}

impl ClassifyOutcome {
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            ClassifyOutcome::EmptyInput => None,
            ClassifyOutcome::Predicted { prediction, .. } => Some(prediction),
        }
    }

    /// User-facing warning, if any
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            ClassifyOutcome::EmptyInput => Some(EMPTY_INPUT_WARNING),
            ClassifyOutcome::Predicted { .. } => None,
        }
    }
}

/// Feature pipeline wired to a classifier of the same dimension
pub struct NewsClassifier {
    pipeline: FeaturePipeline,
    classifier: Arc<dyn Classifier>,
}

impl NewsClassifier {
    /// Pair a pipeline with a classifier.
    ///
    /// Fails with a configuration error when the classifier was trained on
    /// vectors of a different width than the embedding table produces.
    pub fn new(pipeline: FeaturePipeline, classifier: Arc<dyn Classifier>) -> Result<Self> {
        if pipeline.dim() != classifier.input_dim() {
            return Err(Error::config(format!(
                "Embedding dimension {} does not match classifier {} input dimension {}",
                pipeline.dim(),
                classifier.name(),
                classifier.input_dim()
            )));
        }

        Ok(Self {
            pipeline,
            classifier,
        })
    }

    /// Classify raw article text
    pub async fn classify(&self, text: &str) -> Result<ClassifyOutcome> {
        if text.trim().is_empty() {
            debug!("Empty input, skipping classification");
            return Ok(ClassifyOutcome::EmptyInput);
        }

        let start = Instant::now();
        let Features {
            vector,
            tokens,
            matched,
        } = self.pipeline.vectorize(text)?;

        let mut prediction = self.classifier.predict(&vector).await?;
        prediction.token_count = tokens.len();
        prediction.matched_count = matched;
        prediction.latency_us = start.elapsed().as_micros() as u64;

        debug!(
            label = %prediction.label,
            score = prediction.score,
            tokens = prediction.token_count,
            matched = prediction.matched_count,
            "Classified article"
        );

        Ok(ClassifyOutcome::Predicted { prediction, tokens })
    }

    /// Token sequence the classifier would see
    pub fn tokenize(&self, text: &str) -> Result<TokenSequence> {
        self.pipeline.tokenize(text)
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn labels(&self) -> &[Category] {
        self.classifier.labels()
    }

    pub fn dim(&self) -> usize {
        self.pipeline.dim()
    }
}

impl std::fmt::Debug for NewsClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClassifier")
            .field("classifier", &self.classifier.name())
            .field("dim", &self.dim())
            .field("vocabulary", &self.pipeline.table().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EmbeddingTable, LinearClassifier, Lemmatizer, StopwordSet, TextTokenizer};

    fn pipeline(dim: usize) -> FeaturePipeline {
        let table = EmbeddingTable::from_entries(
            dim,
            vec![("goal", vec![1.0; dim]), ("vote", vec![-1.0; dim])],
        )
        .unwrap();
        let tokenizer =
            TextTokenizer::new(StopwordSet::english(), Lemmatizer::from_lemmas(table.words()))
                .unwrap();
        FeaturePipeline::new(tokenizer, Arc::new(table))
    }

    fn classifier(dim: usize) -> Arc<dyn Classifier> {
        // Sport grows with the first feature, Politics shrinks
        let mut weight = vec![0.0; 5 * dim];
        weight[3 * dim] = 3.0;
        weight[2 * dim] = -3.0;
        Arc::new(
            LinearClassifier::from_weights("test", weight, vec![0.0; 5], Category::ALL.to_vec())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_classify() {
        let service = NewsClassifier::new(pipeline(3), classifier(3)).unwrap();

        let outcome = service.classify("Late goals win it").await.unwrap();
        let prediction = outcome.prediction().unwrap();
        assert_eq!(prediction.label, Category::Sport);
        assert_eq!(prediction.matched_count, 1);
        assert!(outcome.warning().is_none());

        let outcome = service.classify("The votes are in").await.unwrap();
        assert_eq!(outcome.prediction().unwrap().label, Category::Politics);
    }

    #[tokio::test]
    async fn test_blank_input_warns() {
        let service = NewsClassifier::new(pipeline(3), classifier(3)).unwrap();

        for text in ["", "   ", "\n\t"] {
            let outcome = service.classify(text).await.unwrap();
            assert!(outcome.prediction().is_none());
            assert_eq!(outcome.warning(), Some(EMPTY_INPUT_WARNING));
        }
    }

    #[tokio::test]
    async fn test_stopwords_only_still_classified() {
        let service = NewsClassifier::new(pipeline(3), classifier(3)).unwrap();

        // Not blank, so the zero vector reaches the classifier
        let outcome = service.classify("the and of").await.unwrap();
        let prediction = outcome.prediction().unwrap();
        assert_eq!(prediction.token_count, 0);
        assert_eq!(prediction.matched_count, 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = NewsClassifier::new(pipeline(3), classifier(4)).unwrap_err();
        assert!(err.is_fatal());
    }
}
