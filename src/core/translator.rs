//! Batched sequence-translation driver
//!
//! Partitions the input into fixed-size batches and drives each one through
//! preprocess -> encode -> generate -> decode -> postprocess, strictly in
//! order. Batch boundaries are invisible to the caller: the output is
//! index-aligned with the input or the whole call fails.

use tracing::{debug, info};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{EncodedBatch, ModelHandle, SentenceProcessor, Seq2SeqModel};
use crate::lang::{route, LanguageTag};
use crate::splitter::split_sentences;

/// Batch translation driver
///
/// Owns a validated configuration; the model, tokenizer and pre/post
/// processor are supplied per call.
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    config: TranslatorConfig,
}

/// Scope guard for batch-scoped resources
///
/// Holds the encoded tensors for one batch and asks the model to reclaim
/// device memory when dropped, on success and on every error path, before
/// the next batch starts.
struct BatchScope<'a> {
    encoded: EncodedBatch,
    model: &'a dyn Seq2SeqModel,
}

impl<'a> BatchScope<'a> {
    fn new(encoded: EncodedBatch, model: &'a dyn Seq2SeqModel) -> Self {
        Self { encoded, model }
    }

    fn encoded(&self) -> &EncodedBatch {
        &self.encoded
    }
}

impl Drop for BatchScope<'_> {
    fn drop(&mut self) {
        self.model.release_batch();
    }
}

impl BatchTranslator {
    /// Create a driver from a validated configuration
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a driver from environment variables
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env().map_err(|e| TranslationError::Configuration {
            message: e.to_string(),
        })?;
        Self::new(config)
    }

    /// The active configuration
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate an ordered sequence of sentences
    ///
    /// Output is positionally aligned with the input. A failed batch aborts
    /// the whole call with `ModelInvocation { batch_index, .. }`; no partial
    /// result is ever returned. Unregistered language tags fail before any
    /// model call.
    pub fn translate(
        &self,
        sentences: &[String],
        src_lang: &LanguageTag,
        tgt_lang: &LanguageTag,
        handle: &ModelHandle,
        processor: &dyn SentenceProcessor,
    ) -> Result<Vec<String>> {
        // Routing must resolve before the model is touched
        let family = route(src_lang, tgt_lang)?;

        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Translating {} sentences {} -> {} via {} (batch_size={})",
            sentences.len(),
            src_lang,
            tgt_lang,
            family,
            self.config.batch_size
        );

        let params = self.config.generation_params();
        let mut translations = Vec::with_capacity(sentences.len());

        for (batch_index, chunk) in sentences.chunks(self.config.batch_size).enumerate() {
            debug!("Processing batch {}, size = {}", batch_index + 1, chunk.len());

            let batch = processor
                .preprocess_batch(chunk, src_lang, tgt_lang)
                .map_err(|e| TranslationError::model_invocation(batch_index, e))?;

            let encoded = handle
                .tokenizer
                .encode(&batch, self.config.max_length)
                .map_err(|e| TranslationError::model_invocation(batch_index, e))?;
            let scope = BatchScope::new(encoded, handle.model.as_ref());

            let generated = handle
                .model
                .generate(scope.encoded(), &params)
                .map_err(|e| TranslationError::model_invocation(batch_index, e))?;

            let decoded = handle
                .tokenizer
                .decode(&generated)
                .map_err(|e| TranslationError::model_invocation(batch_index, e))?;

            let batch_out = processor
                .postprocess_batch(decoded, tgt_lang)
                .map_err(|e| TranslationError::model_invocation(batch_index, e))?;

            // Positional correspondence is the core invariant
            if batch_out.len() != chunk.len() {
                return Err(TranslationError::model_invocation(
                    batch_index,
                    anyhow::anyhow!(
                        "batch produced {} outputs for {} inputs",
                        batch_out.len(),
                        chunk.len()
                    ),
                ));
            }

            translations.extend(batch_out);
            drop(scope);
            debug!("Batch {} translated", batch_index + 1);
        }

        debug_assert_eq!(translations.len(), sentences.len());
        Ok(translations)
    }

    /// Split a paragraph, translate its sentences, and join with spaces
    pub fn translate_paragraph(
        &self,
        text: &str,
        src_lang: &LanguageTag,
        tgt_lang: &LanguageTag,
        handle: &ModelHandle,
        processor: &dyn SentenceProcessor,
    ) -> Result<String> {
        let sentences = split_sentences(text, src_lang)?;
        debug!("Paragraph split into {} sentences", sentences.len());
        let translated = self.translate(&sentences, src_lang, tgt_lang, handle, processor)?;
        Ok(translated.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{PassthroughProcessor, StubEngine};

    fn en() -> LanguageTag {
        LanguageTag::new("eng_Latn")
    }

    fn hi() -> LanguageTag {
        LanguageTag::new("hin_Deva")
    }

    fn translator(batch_size: usize) -> BatchTranslator {
        BatchTranslator::new(TranslatorConfig {
            batch_size,
            ..Default::default()
        })
        .unwrap()
    }

    fn sentences(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Sentence number {i}.")).collect()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TranslatorConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            BatchTranslator::new(config),
            Err(TranslationError::Configuration { .. })
        ));
    }

    #[test]
    fn test_identity_preserves_length_and_order() {
        let engine = StubEngine::identity();
        let input = sentences(10);
        let out = translator(4)
            .translate(&input, &en(), &hi(), engine.handle(), &PassthroughProcessor)
            .unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_batch_size_is_transparent() {
        let input = sentences(10);
        let mut results = Vec::new();
        for batch_size in [1, 2, 4, 100] {
            let engine = StubEngine::identity();
            let out = translator(batch_size)
                .translate(&input, &en(), &hi(), engine.handle(), &PassthroughProcessor)
                .unwrap();
            results.push(out);
        }
        for out in &results[1..] {
            assert_eq!(out, &results[0]);
        }
    }

    #[test]
    fn test_unregistered_language_fails_before_model_call() {
        let engine = StubEngine::identity();
        let err = translator(4)
            .translate(
                &sentences(3),
                &LanguageTag::new("xx_Latn"),
                &hi(),
                engine.handle(),
                &PassthroughProcessor,
            )
            .unwrap_err();
        assert!(matches!(err, TranslationError::UnsupportedLanguage { .. }));
        assert_eq!(engine.generate_calls(), 0);
    }

    #[test]
    fn test_uppercase_stub_one_batch_per_sentence() {
        let engine = StubEngine::uppercase();
        let input = vec!["Hello.".to_string(), "How are you?".to_string()];
        let out = translator(1)
            .translate(&input, &en(), &hi(), engine.handle(), &PassthroughProcessor)
            .unwrap();
        assert_eq!(out, vec!["HELLO.", "HOW ARE YOU?"]);
        assert_eq!(engine.generate_calls(), 2);
    }

    #[test]
    fn test_failing_batch_aborts_whole_call() {
        // Fail on the second batch: no partial result may leak out
        let engine = StubEngine::failing_after(1);
        let err = translator(2)
            .translate(&sentences(6), &en(), &hi(), engine.handle(), &PassthroughProcessor)
            .unwrap_err();
        match err {
            TranslationError::ModelInvocation { batch_index, .. } => assert_eq!(batch_index, 1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(engine.generate_calls(), 2);
    }

    #[test]
    fn test_release_batch_called_on_error_path() {
        let engine = StubEngine::failing_after(0);
        let _ = translator(2).translate(
            &sentences(4),
            &en(),
            &hi(),
            engine.handle(),
            &PassthroughProcessor,
        );
        // One batch attempted, one release despite the failure
        assert_eq!(engine.release_calls(), 1);
    }

    #[test]
    fn test_release_batch_called_per_batch() {
        let engine = StubEngine::identity();
        translator(2)
            .translate(&sentences(6), &en(), &hi(), engine.handle(), &PassthroughProcessor)
            .unwrap();
        assert_eq!(engine.release_calls(), 3);
    }

    #[test]
    fn test_empty_input_returns_empty_output() {
        let engine = StubEngine::identity();
        let out = translator(4)
            .translate(&[], &en(), &hi(), engine.handle(), &PassthroughProcessor)
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(engine.generate_calls(), 0);
    }

    #[test]
    fn test_translate_paragraph_joins_with_spaces() {
        let engine = StubEngine::uppercase();
        let out = translator(4)
            .translate_paragraph(
                "Hello world. How are you?",
                &en(),
                &hi(),
                engine.handle(),
                &PassthroughProcessor,
            )
            .unwrap();
        assert_eq!(out, "HELLO WORLD. HOW ARE YOU?");
    }

    #[test]
    fn test_english_to_english_is_unsupported() {
        let engine = StubEngine::identity();
        let err = translator(4)
            .translate(&sentences(2), &en(), &en(), engine.handle(), &PassthroughProcessor)
            .unwrap_err();
        assert!(matches!(err, TranslationError::UnsupportedLanguage { .. }));
        assert_eq!(engine.generate_calls(), 0);
    }
}
