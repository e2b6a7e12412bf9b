//! Stub translation backend
//!
//! Implements the collaborator traits without any model runtime: a
//! reversible whitespace word codec, an echo (or uppercasing) "model" with
//! atomic call counters, and a passthrough processor. Serves the test suite
//! and the CLI demo; real deployments supply their own [`ModelLoader`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::core::errors::Result;
use crate::core::models::{
    EncodedBatch, GenerationParams, ModelHandle, ModelLoader, Quantization, SentenceProcessor,
    Seq2SeqModel, TranslationTokenizer,
};
use crate::lang::LanguageTag;

/// Padding token id
const PAD_ID: u32 = 0;
/// End-of-sequence token id
const EOS_ID: u32 = 1;
/// First id available for real words
const VOCAB_BASE: u32 = 2;

/// What the stub model does to its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    /// Echo the input tokens unchanged
    Identity,
    /// Replace every word with its uppercased form
    Uppercase,
}

/// State shared between the stub tokenizer and model
struct StubState {
    vocab: Mutex<Vec<String>>,
    generate_calls: AtomicUsize,
    release_calls: AtomicUsize,
    mode: StubMode,
    /// Fail generation from this zero-based call index onward
    fail_from: Option<usize>,
}

impl StubState {
    fn new(mode: StubMode, fail_from: Option<usize>) -> Self {
        Self {
            vocab: Mutex::new(Vec::new()),
            generate_calls: AtomicUsize::new(0),
            release_calls: AtomicUsize::new(0),
            mode,
            fail_from,
        }
    }

    fn intern(&self, word: &str) -> u32 {
        let mut vocab = self.vocab.lock().expect("stub vocab poisoned");
        if let Some(pos) = vocab.iter().position(|w| w == word) {
            return VOCAB_BASE + pos as u32;
        }
        vocab.push(word.to_string());
        VOCAB_BASE + (vocab.len() - 1) as u32
    }

    fn word(&self, id: u32) -> Option<String> {
        let idx = id.checked_sub(VOCAB_BASE)? as usize;
        let vocab = self.vocab.lock().expect("stub vocab poisoned");
        vocab.get(idx).cloned()
    }
}

/// Word-level codec over a shared interned vocabulary
struct StubTokenizer {
    state: Arc<StubState>,
}

impl TranslationTokenizer for StubTokenizer {
    fn encode(&self, batch: &[String], max_length: usize) -> anyhow::Result<EncodedBatch> {
        let mut rows: Vec<Vec<u32>> = batch
            .iter()
            .map(|sentence| {
                let mut ids: Vec<u32> = sentence
                    .split_whitespace()
                    .map(|w| self.state.intern(w))
                    .collect();
                ids.truncate(max_length.saturating_sub(1));
                ids.push(EOS_ID);
                ids
            })
            .collect();

        // Pad to the longest row, mask marks real tokens
        let longest = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut attention_mask = Vec::with_capacity(rows.len());
        for row in &mut rows {
            let mut mask = vec![1u8; row.len()];
            mask.resize(longest, 0);
            row.resize(longest, PAD_ID);
            attention_mask.push(mask);
        }

        Ok(EncodedBatch {
            input_ids: rows,
            attention_mask,
        })
    }

    fn decode(&self, token_ids: &[Vec<u32>]) -> anyhow::Result<Vec<String>> {
        token_ids
            .iter()
            .map(|row| {
                let words: Vec<String> = row
                    .iter()
                    .filter(|&&id| id != PAD_ID && id != EOS_ID)
                    .map(|&id| {
                        self.state
                            .word(id)
                            .ok_or_else(|| anyhow::anyhow!("unknown token id {id}"))
                    })
                    .collect::<anyhow::Result<_>>()?;
                Ok(words.join(" "))
            })
            .collect()
    }
}

/// Echo model with call counting and scripted failure
struct StubModel {
    state: Arc<StubState>,
}

impl Seq2SeqModel for StubModel {
    fn generate(
        &self,
        encoded: &EncodedBatch,
        _params: &GenerationParams,
    ) -> anyhow::Result<Vec<Vec<u32>>> {
        let call = self.state.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fail_from) = self.state.fail_from {
            if call >= fail_from {
                anyhow::bail!("scripted generation failure at call {call}");
            }
        }

        let rows = encoded
            .input_ids
            .iter()
            .map(|row| match self.state.mode {
                StubMode::Identity => row.clone(),
                StubMode::Uppercase => row
                    .iter()
                    .map(|&id| {
                        if id == PAD_ID || id == EOS_ID {
                            id
                        } else {
                            match self.state.word(id) {
                                Some(w) => self.state.intern(&w.to_uppercase()),
                                None => id,
                            }
                        }
                    })
                    .collect(),
            })
            .collect();
        Ok(rows)
    }

    fn release_batch(&self) {
        self.state.release_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A stub (tokenizer, model) pair with inspectable counters
pub struct StubEngine {
    handle: ModelHandle,
    state: Arc<StubState>,
}

impl StubEngine {
    fn build(mode: StubMode, fail_from: Option<usize>) -> Self {
        let state = Arc::new(StubState::new(mode, fail_from));
        let handle = ModelHandle {
            tokenizer: Box::new(StubTokenizer {
                state: Arc::clone(&state),
            }),
            model: Box::new(StubModel {
                state: Arc::clone(&state),
            }),
        };
        Self { handle, state }
    }

    /// Engine that echoes its input
    pub fn identity() -> Self {
        Self::build(StubMode::Identity, None)
    }

    /// Engine that uppercases every word
    pub fn uppercase() -> Self {
        Self::build(StubMode::Uppercase, None)
    }

    /// Engine whose generation fails from the given zero-based call index
    pub fn failing_after(successful_calls: usize) -> Self {
        Self::build(StubMode::Identity, Some(successful_calls))
    }

    /// The loaded (tokenizer, model) pair
    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// Number of generate invocations so far (including failed ones)
    pub fn generate_calls(&self) -> usize {
        self.state.generate_calls.load(Ordering::SeqCst)
    }

    /// Number of batch-resource releases so far
    pub fn release_calls(&self) -> usize {
        self.state.release_calls.load(Ordering::SeqCst)
    }
}

/// Pre/post processor that forwards batches untouched
pub struct PassthroughProcessor;

impl SentenceProcessor for PassthroughProcessor {
    fn preprocess_batch(
        &self,
        batch: &[String],
        _src_lang: &LanguageTag,
        _tgt_lang: &LanguageTag,
    ) -> anyhow::Result<Vec<String>> {
        Ok(batch.to_vec())
    }

    fn postprocess_batch(
        &self,
        batch: Vec<String>,
        _tgt_lang: &LanguageTag,
    ) -> anyhow::Result<Vec<String>> {
        Ok(batch)
    }
}

/// Loader producing stub engines; stands in for a real checkpoint loader
pub struct StubLoader {
    mode: StubMode,
}

impl StubLoader {
    /// Loader for echo engines
    pub fn new(mode: StubMode) -> Self {
        Self { mode }
    }
}

impl ModelLoader for StubLoader {
    fn load(
        &self,
        _checkpoint: &str,
        _quantization: Quantization,
        attn_implementation: &str,
    ) -> Result<ModelHandle> {
        // Unknown kernels downgrade to the default, never fail
        if attn_implementation != "eager" {
            warn!(
                "Attention implementation '{}' unavailable in stub backend, falling back to eager",
                attn_implementation
            );
        }
        Ok(StubEngine::build(self.mode, None).handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_roundtrip() {
        let engine = StubEngine::identity();
        let batch = vec!["Hello world.".to_string(), "Short.".to_string()];
        let encoded = engine.handle().tokenizer.encode(&batch, 256).unwrap();

        assert_eq!(encoded.len(), 2);
        // Longest padding: both rows share one width
        assert_eq!(encoded.input_ids[0].len(), encoded.input_ids[1].len());
        assert_eq!(encoded.attention_mask[1].last(), Some(&0));

        let decoded = engine.handle().tokenizer.decode(&encoded.input_ids).unwrap();
        assert_eq!(decoded, vec!["Hello world.", "Short."]);
    }

    #[test]
    fn test_truncation_caps_row_length() {
        let engine = StubEngine::identity();
        let batch = vec!["a b c d e f g h".to_string()];
        let encoded = engine.handle().tokenizer.encode(&batch, 4).unwrap();
        assert_eq!(encoded.input_ids[0].len(), 4);
    }

    #[test]
    fn test_uppercase_generation() {
        let engine = StubEngine::uppercase();
        let batch = vec!["hello there".to_string()];
        let encoded = engine.handle().tokenizer.encode(&batch, 256).unwrap();
        let generated = engine
            .handle()
            .model
            .generate(&encoded, &GenerationParams::default())
            .unwrap();
        let decoded = engine.handle().tokenizer.decode(&generated).unwrap();
        assert_eq!(decoded, vec!["HELLO THERE"]);
    }

    #[test]
    fn test_scripted_failure() {
        let engine = StubEngine::failing_after(1);
        let encoded = engine
            .handle()
            .tokenizer
            .encode(&["x".to_string()], 256)
            .unwrap();
        let params = GenerationParams::default();
        assert!(engine.handle().model.generate(&encoded, &params).is_ok());
        assert!(engine.handle().model.generate(&encoded, &params).is_err());
        assert_eq!(engine.generate_calls(), 2);
    }

    #[test]
    fn test_loader_falls_back_on_unknown_kernel() {
        let loader = StubLoader::new(StubMode::Identity);
        let handle = loader
            .load("ai4bharat/indictrans2-en-indic-dist-200M", Quantization::None, "flash_attention_2")
            .unwrap();
        let encoded = handle.tokenizer.encode(&["ok".to_string()], 256).unwrap();
        assert_eq!(encoded.len(), 1);
    }
}
