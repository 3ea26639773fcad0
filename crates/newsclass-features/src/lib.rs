//! newsclass Features
//!
//! Turns raw news-article text into a fixed-length vector and classifies it.
//!
//! The pipeline has two halves:
//! - Tokenization: lowercase, strip non-word characters, split, drop
//!   stopwords and punctuation, lemmatize
//! - Embedding: average the word vectors of every token found in a
//!   pre-trained word2vec table
//!
//! The resulting vector feeds a pre-trained linear classifier. Both
//! artifacts are loaded once and shared read-only afterwards.

pub mod classifier;
pub mod config;
pub mod embedding;
pub mod lemmatizer;
pub mod model_loader;
pub mod pipeline;
pub mod registry;
pub mod service;
pub mod stopwords;
pub mod tokenizer;

pub use classifier::{Classifier, LinearClassifier};
pub use config::{
    AssetConfigSpec, ClassifierConfigSpec, DeviceSpec, EmbeddingConfigSpec, ModelSourceSpec,
    NewsClassConfig, PreprocessingConfigSpec,
};
pub use embedding::{EmbeddingFormat, EmbeddingTable};
pub use lemmatizer::Lemmatizer;
pub use model_loader::{load_classifier, load_embedding_table, load_tokenizer};
pub use pipeline::{FeaturePipeline, Features};
pub use registry::{load_artifacts, SharedArtifacts};
pub use service::{ClassifyOutcome, NewsClassifier, EMPTY_INPUT_WARNING};
pub use stopwords::StopwordSet;
pub use tokenizer::{TextTokenizer, PUNCTUATION};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, LinearClassifier};
    pub use crate::config::NewsClassConfig;
    pub use crate::embedding::{EmbeddingFormat, EmbeddingTable};
    pub use crate::pipeline::{FeaturePipeline, Features};
    pub use crate::registry::{load_artifacts, SharedArtifacts};
    pub use crate::service::{ClassifyOutcome, NewsClassifier, EMPTY_INPUT_WARNING};
    pub use crate::tokenizer::TextTokenizer;
}
