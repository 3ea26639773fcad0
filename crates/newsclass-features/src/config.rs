//! Configuration for artifacts and preprocessing resources

use crate::EmbeddingFormat;
use candle_core::Device;
use newsclass_core::{Category, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Top-level newsclass configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsClassConfig {
    /// Dimension both artifacts must agree on
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Word embedding table
    #[serde(default)]
    pub embeddings: EmbeddingConfigSpec,

    /// Pre-trained classifier
    #[serde(default)]
    pub classifier: ClassifierConfigSpec,

    /// Tokenizer resources
    #[serde(default)]
    pub preprocessing: PreprocessingConfigSpec,

    /// Decorative UI assets
    #[serde(default)]
    pub assets: AssetConfigSpec,
}

/// Embedding table specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfigSpec {
    /// Where to find the table
    #[serde(flatten)]
    pub source: ModelSourceSpec,

    /// word2vec text or binary
    #[serde(default)]
    pub format: EmbeddingFormat,
}

/// Classifier specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfigSpec {
    /// Where to find the safetensors weights
    #[serde(flatten)]
    pub source: ModelSourceSpec,

    /// Category of each output row, in training order
    #[serde(default = "default_labels")]
    pub labels: Vec<Category>,

    /// Device override
    #[serde(default)]
    pub device: DeviceSpec,
}

/// Model source specification (for config files)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSourceSpec {
    /// Local file path
    Local { path: PathBuf },

    /// Hugging Face Hub
    HuggingFace {
        repo_id: String,
        filename: String,
        revision: Option<String>,
    },
}

/// Preprocessing resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessingConfigSpec {
    /// Newline-separated stopword list; the built-in English list when unset
    pub stopwords: Option<PathBuf>,

    /// WordNet dictionary directory holding `index.noun` and `noun.exc`.
    /// When unset the embedding vocabulary serves as the lemma index.
    pub wordnet_dir: Option<PathBuf>,
}

/// UI asset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfigSpec {
    /// Sidebar logo, relative to the working directory unless absolute
    #[serde(default = "default_logo")]
    pub logo: PathBuf,
}

/// Device specification (for config files)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda {
        index: Option<usize>,
    },
    Metal {
        index: Option<usize>,
    },
}

impl Default for NewsClassConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            embeddings: EmbeddingConfigSpec::default(),
            classifier: ClassifierConfigSpec::default(),
            preprocessing: PreprocessingConfigSpec::default(),
            assets: AssetConfigSpec::default(),
        }
    }
}

impl Default for EmbeddingConfigSpec {
    fn default() -> Self {
        Self {
            source: ModelSourceSpec::Local {
                path: PathBuf::from("./models/word2vec.txt"),
            },
            format: EmbeddingFormat::Text,
        }
    }
}

impl Default for ClassifierConfigSpec {
    fn default() -> Self {
        Self {
            source: ModelSourceSpec::Local {
                path: PathBuf::from("./models/news_classifier.safetensors"),
            },
            labels: default_labels(),
            device: DeviceSpec::Cpu,
        }
    }
}

impl Default for AssetConfigSpec {
    fn default() -> Self {
        Self {
            logo: default_logo(),
        }
    }
}

impl NewsClassConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Load from file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Check settings that can be verified without touching the artifacts
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(Error::config("dimension must be positive"));
        }

        let labels = &self.classifier.labels;
        if labels.is_empty() {
            return Err(Error::config("classifier.labels must not be empty"));
        }
        let unique: HashSet<_> = labels.iter().collect();
        if unique.len() != labels.len() {
            return Err(Error::config("classifier.labels contains duplicates"));
        }

        Ok(())
    }
}

impl DeviceSpec {
    /// Create the Candle device
    pub fn to_device(&self) -> Result<Device> {
        match self {
            DeviceSpec::Cpu => Ok(Device::Cpu),
            DeviceSpec::Cuda { index } => Device::new_cuda(index.unwrap_or(0))
                .map_err(|e| Error::config(format!("Failed to create CUDA device: {}", e))),
            DeviceSpec::Metal { index } => Device::new_metal(index.unwrap_or(0))
                .map_err(|e| Error::config(format!("Failed to create Metal device: {}", e))),
        }
    }
}

fn default_dimension() -> usize {
    100
}

fn default_labels() -> Vec<Category> {
    Category::ALL.to_vec()
}

fn default_logo() -> PathBuf {
    PathBuf::from("./assets/logo.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_yaml() {
        let yaml = r#"
dimension: 100
embeddings:
  path: ./models/bbc-word2vec.bin
  format: binary
classifier:
  path: ./models/bbc-logreg.safetensors
  labels: [business, entertainment, politics, sport, tech]
preprocessing:
  wordnet_dir: ./nltk_data/corpora/wordnet
assets:
  logo: ./assets/bbc.png
"#;

        let config = NewsClassConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.dimension, 100);
        assert_eq!(config.embeddings.format, EmbeddingFormat::Binary);
        assert!(matches!(
            config.embeddings.source,
            ModelSourceSpec::Local { ref path } if path == Path::new("./models/bbc-word2vec.bin")
        ));
        assert_eq!(config.classifier.labels, Category::ALL.to_vec());
        assert!(config.preprocessing.stopwords.is_none());
        assert_eq!(
            config.preprocessing.wordnet_dir,
            Some(PathBuf::from("./nltk_data/corpora/wordnet"))
        );
        assert_eq!(config.assets.logo, PathBuf::from("./assets/bbc.png"));
    }

    #[test]
    fn test_huggingface_source() {
        let yaml = r#"
embeddings:
  repo_id: newsclass/bbc-word2vec-300
  filename: word2vec.bin
  revision: main
  format: binary
dimension: 300
"#;

        let config = NewsClassConfig::from_yaml(yaml).unwrap();
        match config.embeddings.source {
            ModelSourceSpec::HuggingFace {
                repo_id, revision, ..
            } => {
                assert_eq!(repo_id, "newsclass/bbc-word2vec-300");
                assert_eq!(revision.as_deref(), Some("main"));
            }
            other => panic!("Expected HuggingFace source, got {:?}", other),
        }
        assert_eq!(config.dimension, 300);
    }

    #[test]
    fn test_defaults() {
        let config = NewsClassConfig::from_yaml("{}").unwrap();
        assert_eq!(config.dimension, 100);
        assert_eq!(config.classifier.labels.len(), 5);
        assert!(matches!(config.classifier.device, DeviceSpec::Cpu));
        assert_eq!(config.assets.logo, PathBuf::from("./assets/logo.png"));
    }

    #[test]
    fn test_validation() {
        assert!(NewsClassConfig::from_yaml("dimension: 0").is_err());
        assert!(NewsClassConfig::from_yaml(
            "classifier:\n  path: m.safetensors\n  labels: [sport, sport]"
        )
        .is_err());
        assert!(NewsClassConfig::from_yaml(
            "classifier:\n  path: m.safetensors\n  labels: [weather]"
        )
        .is_err());
    }

    #[test]
    fn test_device_spec() {
        let spec: DeviceSpec = serde_yaml::from_str("cpu").unwrap();
        assert!(matches!(spec, DeviceSpec::Cpu));
        assert!(matches!(spec.to_device().unwrap(), Device::Cpu));
    }

    #[test]
    fn test_shipped_config_parses() {
        let config =
            NewsClassConfig::from_yaml(include_str!("../../../newsclass.yaml")).unwrap();
        assert_eq!(config.dimension, 100);
        assert_eq!(config.embeddings.format, EmbeddingFormat::Text);
        assert!(config.preprocessing.wordnet_dir.is_none());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = NewsClassConfig::load_or_default("/nonexistent/newsclass.yaml").unwrap();
        assert_eq!(config.dimension, 100);
    }
}
