//! Classifier trait and the linear news classifier

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use newsclass_core::{Category, EmbeddingVector, Error, Prediction, Result};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Trait for all document classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Map a document vector to a category
    async fn predict(&self, features: &EmbeddingVector) -> Result<Prediction>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Number of features the classifier was trained on
    fn input_dim(&self) -> usize;

    /// Output categories, in score order
    fn labels(&self) -> &[Category];
}

/// Tensor names accepted for the weight matrix and bias vector
const WEIGHT_NAMES: [&str; 2] = ["weight", "coef"];
const BIAS_NAMES: [&str; 2] = ["bias", "intercept"];

/// Multinomial linear model: `softmax(W x + b)`
///
/// This is the shape scikit-learn's logistic regression and linear SVM
/// export to: `W` is `[classes, features]`, `b` is `[classes]`.
pub struct LinearClassifier {
    name: String,
    weight: Tensor,
    bias: Tensor,
    labels: Vec<Category>,
    input_dim: usize,
}

impl LinearClassifier {
    /// Create a classifier from weight and bias tensors
    pub fn new(
        name: impl Into<String>,
        weight: Tensor,
        bias: Tensor,
        labels: Vec<Category>,
    ) -> Result<Self> {
        let weight = weight
            .to_dtype(DType::F32)
            .map_err(candle_err("convert weight"))?;
        let bias = bias.to_dtype(DType::F32).map_err(candle_err("convert bias"))?;

        let (classes, input_dim) = weight
            .dims2()
            .map_err(candle_err("weight must be a [classes, features] matrix"))?;
        let bias_len = bias
            .dims1()
            .map_err(candle_err("bias must be a [classes] vector"))?;

        if bias_len != classes {
            return Err(Error::config(format!(
                "Bias has {} entries but weight has {} classes",
                bias_len, classes
            )));
        }
        if labels.len() != classes {
            return Err(Error::config(format!(
                "Classifier has {} classes but {} labels are configured",
                classes,
                labels.len()
            )));
        }
        if input_dim == 0 {
            return Err(Error::config("Classifier has no input features"));
        }

        Ok(Self {
            name: name.into(),
            weight,
            bias,
            labels,
            input_dim,
        })
    }

    /// Create a classifier from row-major weights on the CPU
    pub fn from_weights(
        name: impl Into<String>,
        weight: Vec<f32>,
        bias: Vec<f32>,
        labels: Vec<Category>,
    ) -> Result<Self> {
        let classes = bias.len();
        if classes == 0 || weight.len() % classes != 0 {
            return Err(Error::config(format!(
                "{} weights cannot be split into {} classes",
                weight.len(),
                classes
            )));
        }
        let input_dim = weight.len() / classes;

        let weight = Tensor::from_vec(weight, (classes, input_dim), &Device::Cpu)
            .map_err(candle_err("build weight tensor"))?;
        let bias =
            Tensor::from_vec(bias, classes, &Device::Cpu).map_err(candle_err("build bias tensor"))?;

        Self::new(name, weight, bias, labels)
    }

    /// Load weights from a safetensors file
    pub fn load(path: impl AsRef<Path>, labels: Vec<Category>, device: &Device) -> Result<Self> {
        let path = path.as_ref();
        let mut tensors = candle_core::safetensors::load(path, device).map_err(|e| {
            Error::config(format!(
                "Failed to load classifier {}: {}",
                path.display(),
                e
            ))
        })?;

        let weight = take_tensor(&mut tensors, &WEIGHT_NAMES, path)?;
        let bias = take_tensor(&mut tensors, &BIAS_NAMES, path)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("linear")
            .to_string();

        let classifier = Self::new(name, weight, bias, labels)?;
        info!(
            "Loaded classifier {} ({} classes, {} features)",
            path.display(),
            classifier.labels.len(),
            classifier.input_dim
        );

        Ok(classifier)
    }

    /// Class probabilities for one document vector
    fn probabilities(&self, features: &[f32]) -> Result<Vec<f32>> {
        let x = Tensor::from_slice(features, (self.input_dim, 1), self.weight.device())
            .map_err(candle_err("build feature tensor"))?;

        let logits = self
            .weight
            .matmul(&x)
            .and_then(|t| t.squeeze(1))
            .and_then(|t| t.add(&self.bias))
            .map_err(candle_err("compute logits"))?;

        candle_nn::ops::softmax(&logits, 0)
            .and_then(|p| p.to_vec1::<f32>())
            .map_err(candle_err("compute probabilities"))
    }
}

#[async_trait]
impl Classifier for LinearClassifier {
    async fn predict(&self, features: &EmbeddingVector) -> Result<Prediction> {
        let start = Instant::now();

        if features.dim() != self.input_dim {
            return Err(Error::classifier(format!(
                "Expected {} features, got {}",
                self.input_dim,
                features.dim()
            )));
        }

        let probabilities = self.probabilities(features.as_slice())?;

        // First maximum wins, matching argmax
        let (best, score) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |(best, max), (i, p)| {
                if p > max {
                    (i, p)
                } else {
                    (best, max)
                }
            });

        let mut prediction = Prediction::new(
            self.labels[best],
            score,
            self.labels.iter().copied().zip(probabilities).collect(),
        );
        prediction.latency_us = start.elapsed().as_micros() as u64;

        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn labels(&self) -> &[Category] {
        &self.labels
    }
}

fn take_tensor(
    tensors: &mut std::collections::HashMap<String, Tensor>,
    names: &[&str],
    path: &Path,
) -> Result<Tensor> {
    names
        .iter()
        .find_map(|name| tensors.remove(*name))
        .ok_or_else(|| {
            Error::config(format!(
                "Classifier {} has no tensor named {}",
                path.display(),
                names.join(" or ")
            ))
        })
}

fn candle_err(context: &'static str) -> impl Fn(candle_core::Error) -> Error {
    move |e| Error::classifier(format!("Failed to {}: {}", context, e))
}
