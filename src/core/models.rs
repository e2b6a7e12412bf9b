//! Core data models and collaborator interfaces
//!
//! The tokenizer, the seq2seq model and the pre/post processor are supplied
//! capabilities: the driver never branches on which backend is present.
//! A stub backend (see [`crate::stub`]) satisfies the same traits for
//! testing and demo runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::lang::LanguageTag;

/// Weight quantization mode for model loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantization {
    /// Full precision
    #[default]
    #[serde(rename = "none")]
    None,
    /// 4-bit quantized weights
    #[serde(rename = "4-bit")]
    FourBit,
    /// 8-bit quantized weights
    #[serde(rename = "8-bit")]
    EightBit,
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantization::None => write!(f, "none"),
            Quantization::FourBit => write!(f, "4-bit"),
            Quantization::EightBit => write!(f, "8-bit"),
        }
    }
}

impl FromStr for Quantization {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Quantization::None),
            "4-bit" => Ok(Quantization::FourBit),
            "8-bit" => Ok(Quantization::EightBit),
            other => Err(format!("unknown quantization mode: {other}")),
        }
    }
}

/// Decoding parameters for one generate call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Beam search width
    pub beam_width: usize,
    /// Maximum output length in tokens
    pub max_length: usize,
    /// Output sequences per input (always 1 for translation)
    pub num_return_sequences: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            beam_width: 5,
            max_length: 256,
            num_return_sequences: 1,
        }
    }
}

/// Tokenized batch: id rows padded to the longest row, plus attention mask
///
/// Rows are index-aligned with the input sentences of the batch. Dropping an
/// `EncodedBatch` releases its host-side buffers; device-side buffers are
/// released by [`Seq2SeqModel::release_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    /// Token ids, one row per sentence
    pub input_ids: Vec<Vec<u32>>,
    /// 1 for real tokens, 0 for padding; same shape as `input_ids`
    pub attention_mask: Vec<Vec<u8>>,
}

impl EncodedBatch {
    /// Number of sentences in the batch
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Whether the batch holds no sentences
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}

/// Tokenizer side of a loaded checkpoint
pub trait TranslationTokenizer {
    /// Encode a batch with longest-padding, truncation at `max_length`, and
    /// an attention mask
    fn encode(&self, batch: &[String], max_length: usize) -> anyhow::Result<EncodedBatch>;

    /// Decode generated token rows back to text, stripping special tokens
    /// and normalizing whitespace
    fn decode(&self, token_ids: &[Vec<u32>]) -> anyhow::Result<Vec<String>>;
}

/// Generation side of a loaded checkpoint
pub trait Seq2SeqModel {
    /// Beam-search generation under no-gradient execution; returns one token
    /// row per input row
    fn generate(
        &self,
        encoded: &EncodedBatch,
        params: &GenerationParams,
    ) -> anyhow::Result<Vec<Vec<u32>>>;

    /// Reclaim batch-scoped device resources; invoked after every batch,
    /// on success and on error
    fn release_batch(&self) {}
}

/// Language-pair normalization around the model call
///
/// Mirrors the IndicProcessor contract: preprocessing normalizes and tags
/// each sentence for the model (masking entities such as numbers, emails and
/// dates); postprocessing restores them in the target text.
pub trait SentenceProcessor {
    /// Normalize and tag a source batch for the model
    fn preprocess_batch(
        &self,
        batch: &[String],
        src_lang: &LanguageTag,
        tgt_lang: &LanguageTag,
    ) -> anyhow::Result<Vec<String>>;

    /// Reverse preprocessing-time normalization on decoded output
    fn postprocess_batch(
        &self,
        batch: Vec<String>,
        tgt_lang: &LanguageTag,
    ) -> anyhow::Result<Vec<String>>;
}

/// A loaded (tokenizer, model) pair
pub struct ModelHandle {
    /// Tokenizer for the checkpoint
    pub tokenizer: Box<dyn TranslationTokenizer>,
    /// Generation model for the checkpoint
    pub model: Box<dyn Seq2SeqModel>,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle").finish_non_exhaustive()
    }
}

/// Checkpoint loader
///
/// The loader owns the attention-implementation fallback: when the requested
/// kernel is unavailable on the current hardware it must substitute the
/// default kernel rather than fail.
pub trait ModelLoader {
    /// Load a checkpoint under the given quantization and attention kernel
    fn load(
        &self,
        checkpoint: &str,
        quantization: Quantization,
        attn_implementation: &str,
    ) -> Result<ModelHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantization_parse() {
        assert_eq!("".parse::<Quantization>().unwrap(), Quantization::None);
        assert_eq!("none".parse::<Quantization>().unwrap(), Quantization::None);
        assert_eq!("4-bit".parse::<Quantization>().unwrap(), Quantization::FourBit);
        assert_eq!("8-bit".parse::<Quantization>().unwrap(), Quantization::EightBit);
        assert!("16-bit".parse::<Quantization>().is_err());
    }

    #[test]
    fn test_quantization_display_roundtrip() {
        for q in [Quantization::None, Quantization::FourBit, Quantization::EightBit] {
            assert_eq!(q.to_string().parse::<Quantization>().unwrap(), q);
        }
    }

    #[test]
    fn test_generation_params_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.beam_width, 5);
        assert_eq!(params.max_length, 256);
        assert_eq!(params.num_return_sequences, 1);
    }
}
