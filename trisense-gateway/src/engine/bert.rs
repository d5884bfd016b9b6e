//! BERT sequence classifier on candle.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::Deserialize;

use super::{EncodedInput, InferenceError, SequenceClassifier};
use crate::lifecycle::LoadError;

/// Labels assumed when `config.json` declares none.
const DEFAULT_NUM_LABELS: usize = 2;

/// Fields of `config.json` the classification head needs.
#[derive(Debug, Deserialize)]
struct HeadConfig {
    hidden_size: usize,
    #[serde(default)]
    num_labels: Option<usize>,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl HeadConfig {
    fn num_labels(&self) -> usize {
        self.num_labels
            .or_else(|| (!self.id2label.is_empty()).then_some(self.id2label.len()))
            .unwrap_or(DEFAULT_NUM_LABELS)
    }
}

/// BERT encoder, pooler and linear head, laid out like a HuggingFace
/// `BertForSequenceClassification` checkpoint.
pub struct BertSequenceClassifier {
    bert: BertModel,
    pooler: Linear,
    classifier: Linear,
    device: Device,
}

impl BertSequenceClassifier {
    /// Load `config.json` and `model.safetensors` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let config_path = dir.join("config.json");
        let weights_path = dir.join("model.safetensors");
        for path in [&config_path, &weights_path] {
            if !path.is_file() {
                return Err(LoadError::MissingArtifact(path.clone()));
            }
        }

        let raw = std::fs::read_to_string(&config_path)?;
        let bert_config: BertConfig =
            serde_json::from_str(&raw).map_err(|e| LoadError::Config(e.to_string()))?;
        let head: HeadConfig =
            serde_json::from_str(&raw).map_err(|e| LoadError::Config(e.to_string()))?;

        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(&weights_path, &device)?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);

        let bert = BertModel::load(vb.pp("bert"), &bert_config)?;
        let pooler = candle_nn::linear(head.hidden_size, head.hidden_size, vb.pp("bert.pooler.dense"))?;
        let classifier = candle_nn::linear(head.hidden_size, head.num_labels(), vb.pp("classifier"))?;

        Ok(Self {
            bert,
            pooler,
            classifier,
            device,
        })
    }

    fn row(&self, values: &[u32]) -> Result<Tensor, InferenceError> {
        Ok(Tensor::new(values, &self.device)?.unsqueeze(0)?)
    }
}

impl SequenceClassifier for BertSequenceClassifier {
    fn forward(&self, input: &EncodedInput) -> Result<Vec<f32>, InferenceError> {
        let ids = self.row(input.ids())?;
        let type_ids = self.row(input.type_ids())?;
        let mask = self.row(input.attention_mask())?;

        // [1, seq, hidden] -> first token -> pooled -> [1, labels]
        let hidden = self.bert.forward(&ids, &type_ids, Some(&mask))?;
        let pooled = self.pooler.forward(&hidden.i((.., 0))?)?.tanh()?;
        let logits = self.classifier.forward(&pooled)?;

        Ok(logits.squeeze(0)?.to_vec1::<f32>()?)
    }
}
