//! DistilBERT sequence classifier loaded from a local HuggingFace export.
//!
//! Uses `candle_transformers::models::distilbert` for the encoder and adds
//! the `pre_classifier` / `classifier` head of `DistilBertForSequenceClassification`.

use super::SentimentClassifier;
use crate::{Error, Result};
use candle_core::{DType, Device, IndexOp, Module, Tensor};
use candle_nn::{Linear, VarBuilder, linear};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE: &str = "pytorch_model.bin";
const NUM_CLASSES: usize = 2;

/// The bits of `config.json` the classification head needs.
#[derive(Debug, Deserialize)]
struct HeadConfig {
    dim: usize,
    #[serde(default = "default_max_position_embeddings")]
    max_position_embeddings: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

fn default_max_position_embeddings() -> usize {
    512
}

pub struct DistilBertClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
}

impl DistilBertClassifier {
    /// Loads tokenizer, encoder and head from `dir`. Blocking.
    pub fn load(dir: impl AsRef<Path>, max_length: Option<usize>, device: Device) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::model(format!(
                "model directory not found: {}",
                dir.display()
            )));
        }

        let raw_config = std::fs::read_to_string(require_file(dir, CONFIG_FILE)?)?;
        let head: HeadConfig = serde_json::from_str(&raw_config)
            .map_err(|e| Error::model(format!("invalid {CONFIG_FILE}: {e}")))?;
        let config: DistilBertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| Error::model(format!("invalid {CONFIG_FILE}: {e}")))?;

        if !head.id2label.is_empty() && head.id2label.len() != NUM_CLASSES {
            return Err(Error::model(format!(
                "expected {NUM_CLASSES} output classes, config declares {}",
                head.id2label.len()
            )));
        }

        info!("Loading tokenizer from {}", dir.display());
        let max_length = clamp_max_length(max_length, head.max_position_embeddings);
        let tokenizer = load_tokenizer(&require_file(dir, TOKENIZER_FILE)?, max_length)?;

        info!("Loading model weights from {}", dir.display());
        let vb = load_weights(dir, &device)?;
        let model = DistilBertModel::load(vb.pp("distilbert"), &config)?;
        let pre_classifier = linear(head.dim, head.dim, vb.pp("pre_classifier"))?;
        // Fails on a weight shape mismatch, which rejects heads with != 2 classes.
        let classifier = linear(head.dim, NUM_CLASSES, vb.pp("classifier"))?;

        info!("Model and tokenizer loaded (max_length = {})", max_length);

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            tokenizer,
            device,
        })
    }
}

impl SentimentClassifier for DistilBertClassifier {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::tokenizer(format!("Tokenization error: {e}")))?;
        let seq_len = encoding.len();
        debug!("Encoded input into {} tokens", seq_len);

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        // The encoder masks every position where this tensor is non-zero.
        let mask = Tensor::new(encoding.get_attention_mask(), &self.device)?
            .eq(0u32)?
            .reshape((1, 1, 1, seq_len))?;

        let hidden = self.model.forward(&input_ids, &mask)?;
        let pooled = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&pooled)?.relu()?;
        let logits = self.classifier.forward(&pooled)?;

        Ok(logits.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()?)
    }
}

/// Longer sequences would index past the position embeddings, so the
/// configured limit never exceeds what the model supports.
fn clamp_max_length(configured: Option<usize>, max_position_embeddings: usize) -> usize {
    match configured {
        Some(requested) if requested > max_position_embeddings => {
            warn!(
                "max_length {} exceeds the model's {} positions, clamping",
                requested, max_position_embeddings
            );
            max_position_embeddings
        }
        Some(requested) => requested,
        None => max_position_embeddings,
    }
}

fn require_file(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::model(format!("missing {}", path.display())))
    }
}

fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| Error::tokenizer(format!("Failed to load tokenizer: {e}")))?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| Error::tokenizer(format!("Invalid truncation: {e}")))?
        .with_padding(Some(PaddingParams::default()));
    Ok(tokenizer)
}

fn load_weights(dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = dir.join(SAFETENSORS_FILE);
    if safetensors.is_file() {
        // SAFETY: the weights file is not modified while the service runs.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)? };
        return Ok(vb);
    }

    let pytorch = dir.join(PYTORCH_FILE);
    if pytorch.is_file() {
        return Ok(VarBuilder::from_pth(pytorch, DType::F32, device)?);
    }

    Err(Error::model(format!(
        "no {SAFETENSORS_FILE} or {PYTORCH_FILE} in {}",
        dir.display()
    )))
}
