//! Model backends.
//!
//! The text slot holds a tokenizer + classifier pair; the face, voice and meta
//! slots hold raw weight bundles.

mod bert;
mod tokenizer;
mod weights;

pub use bert::BertSequenceClassifier;
pub use tokenizer::{EncodedInput, TextTokenizer, MAX_SEQUENCE_LENGTH};
pub use weights::WeightBundle;

use std::path::Path;

use crate::lifecycle::LoadError;

/// Errors raised while running a loaded model.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("tokenization failed: {0}")]
    Tokenize(String),

    #[error("forward pass failed: {0}")]
    Forward(#[from] candle_core::Error),

    #[error("classifier produced no logits")]
    EmptyLogits,

    #[error("logits do not have a finite mean")]
    NonFiniteScore,
}

/// A classification head over fixed-length encoded text.
pub trait SequenceClassifier: Send + Sync {
    /// One raw logit per label for a single input.
    fn forward(&self, input: &EncodedInput) -> Result<Vec<f32>, InferenceError>;
}

/// Handle of the text slot.
///
/// Only constructed once both halves are loaded, so the slot never holds a
/// tokenizer without its classifier.
pub struct TextModel {
    tokenizer: TextTokenizer,
    classifier: Box<dyn SequenceClassifier>,
}

impl TextModel {
    pub fn new(tokenizer: TextTokenizer, classifier: Box<dyn SequenceClassifier>) -> Self {
        Self {
            tokenizer,
            classifier,
        }
    }

    /// Load `tokenizer.json`, `config.json` and `model.safetensors` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::MissingArtifact(dir.to_path_buf()));
        }
        let tokenizer = TextTokenizer::load(dir)?;
        let classifier = BertSequenceClassifier::load(dir)?;
        Ok(Self::new(tokenizer, Box::new(classifier)))
    }

    /// Tokenize `text` and return the classifier logits.
    pub fn classify(&self, text: &str) -> Result<Vec<f32>, InferenceError> {
        let input = self.tokenizer.encode(text)?;
        self.classifier.forward(&input)
    }
}

/// Mean of the raw logits, clipped to `[0.0, 1.0]`.
///
/// Not a calibrated probability; kept as is for compatibility with existing
/// clients.
pub fn anxiety_score(logits: &[f32]) -> Result<f32, InferenceError> {
    if logits.is_empty() {
        return Err(InferenceError::EmptyLogits);
    }

    let mean = logits.iter().map(|&l| f64::from(l)).sum::<f64>() / logits.len() as f64;
    if mean.is_nan() {
        return Err(InferenceError::NonFiniteScore);
    }

    Ok(mean.clamp(0.0, 1.0) as f32)
}
