//! Artifact resolution and loading

use crate::config::{ClassifierConfigSpec, EmbeddingConfigSpec, ModelSourceSpec, PreprocessingConfigSpec};
use crate::{EmbeddingTable, LinearClassifier, Lemmatizer, StopwordSet, TextTokenizer};
use hf_hub::{api::sync::Api, Repo, RepoType};
use newsclass_core::{Error, Result};
use std::path::PathBuf;
use tracing::{info, warn};

impl ModelSourceSpec {
    /// Local path of the artifact, downloading it first if it lives on the Hub
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            ModelSourceSpec::Local { path } => {
                if !path.exists() {
                    return Err(Error::config(format!(
                        "Artifact not found: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            ModelSourceSpec::HuggingFace {
                repo_id,
                filename,
                revision,
            } => {
                info!("Fetching {} from Hugging Face repo {}", filename, repo_id);

                let api = Api::new()
                    .map_err(|e| Error::config(format!("Failed to initialize HF API: {}", e)))?;

                let repo = api.repo(Repo::with_revision(
                    repo_id.clone(),
                    RepoType::Model,
                    revision.clone().unwrap_or_else(|| "main".to_string()),
                ));

                repo.get(filename).map_err(|e| {
                    Error::config(format!(
                        "Failed to download {} from {}: {}",
                        filename, repo_id, e
                    ))
                })
            }
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            ModelSourceSpec::Local { path } => path.display().to_string(),
            ModelSourceSpec::HuggingFace {
                repo_id, filename, ..
            } => format!("hf://{}/{}", repo_id, filename),
        }
    }
}

/// Load the embedding table and check its dimension
pub fn load_embedding_table(spec: &EmbeddingConfigSpec, dimension: usize) -> Result<EmbeddingTable> {
    let path = spec.source.resolve()?;
    let table = EmbeddingTable::load(&path, spec.format)?;

    if table.dim() != dimension {
        return Err(Error::config(format!(
            "Embedding table {} has dimension {}, configured dimension is {}",
            path.display(),
            table.dim(),
            dimension
        )));
    }
    if table.is_empty() {
        return Err(Error::config(format!(
            "Embedding table {} has no words",
            path.display()
        )));
    }

    Ok(table)
}

/// Load the classifier and check its input width
pub fn load_classifier(spec: &ClassifierConfigSpec, dimension: usize) -> Result<LinearClassifier> {
    use crate::Classifier;

    let path = spec.source.resolve()?;
    let device = spec.device.to_device()?;
    let classifier = LinearClassifier::load(&path, spec.labels.clone(), &device)?;

    if classifier.input_dim() != dimension {
        return Err(Error::config(format!(
            "Classifier {} expects {} features, configured dimension is {}",
            path.display(),
            classifier.input_dim(),
            dimension
        )));
    }

    Ok(classifier)
}

/// Build the tokenizer from its language resources.
///
/// The embedding table doubles as the lemma index when no WordNet
/// dictionary is configured.
pub fn load_tokenizer(spec: &PreprocessingConfigSpec, table: &EmbeddingTable) -> Result<TextTokenizer> {
    let stopwords = match &spec.stopwords {
        Some(path) => {
            let stopwords = StopwordSet::from_file(path)?;
            info!("Loaded {} stopwords from {}", stopwords.len(), path.display());
            stopwords
        }
        None => StopwordSet::english(),
    };

    let lemmatizer = match &spec.wordnet_dir {
        Some(dir) => Lemmatizer::from_wordnet_dir(dir)?,
        None => {
            warn!(
                "No WordNet dictionary configured; using the {} embedding words as lemma index",
                table.len()
            );
            Lemmatizer::from_lemmas(table.words())
        }
    };

    TextTokenizer::new(stopwords, lemmatizer)
}
