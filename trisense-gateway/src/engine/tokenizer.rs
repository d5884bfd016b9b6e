//! Fixed-length text encoding.

use std::path::Path;

use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use super::InferenceError;
use crate::lifecycle::LoadError;

/// Every encoded input is exactly this many tokens long. The classifier head
/// was trained on this length.
pub const MAX_SEQUENCE_LENGTH: usize = 128;

/// Token ids, segment ids and attention mask for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    ids: Vec<u32>,
    type_ids: Vec<u32>,
    attention_mask: Vec<u32>,
}

impl EncodedInput {
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn type_ids(&self) -> &[u32] {
        &self.type_ids
    }

    pub fn attention_mask(&self) -> &[u32] {
        &self.attention_mask
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// HuggingFace tokenizer that truncates and pads to [`MAX_SEQUENCE_LENGTH`].
pub struct TextTokenizer {
    inner: Tokenizer,
}

impl TextTokenizer {
    /// Load `tokenizer.json` from a model directory.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let path = dir.join("tokenizer.json");
        if !path.is_file() {
            return Err(LoadError::MissingArtifact(path));
        }

        let tokenizer =
            Tokenizer::from_file(&path).map_err(|e| LoadError::Tokenizer(e.to_string()))?;
        Self::from_tokenizer(tokenizer)
    }

    /// Wrap an already built tokenizer, overriding its truncation and padding.
    pub fn from_tokenizer(mut tokenizer: Tokenizer) -> Result<Self, LoadError> {
        // Keep the pad token the tokenizer was trained with, if it declares one.
        let (pad_id, pad_token) = match tokenizer.get_padding() {
            Some(params) => (params.pad_id, params.pad_token.clone()),
            None => (tokenizer.token_to_id("[PAD]").unwrap_or(0), "[PAD]".to_string()),
        };

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| LoadError::Tokenizer(e.to_string()))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(MAX_SEQUENCE_LENGTH),
            pad_id,
            pad_token,
            ..Default::default()
        }));

        Ok(Self { inner: tokenizer })
    }

    pub fn encode(&self, text: &str) -> Result<EncodedInput, InferenceError> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| InferenceError::Tokenize(e.to_string()))?;

        Ok(EncodedInput {
            ids: encoding.get_ids().to_vec(),
            type_ids: encoding.get_type_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
        })
    }
}

/// Whitespace word-level tokenizer used by unit tests.
#[cfg(test)]
pub(crate) const WORD_LEVEL_JSON: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": null,
    "pre_tokenizer": { "type": "Whitespace" },
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": { "[PAD]": 0, "[UNK]": 1, "i": 2, "feel": 3, "calm": 4 },
        "unk_token": "[UNK]"
    }
}"#;
