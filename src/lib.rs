//! Indic Batch Translator - batched sentence translation driver
//!
//! This library drives pretrained IndicTrans2-style sequence-to-sequence
//! models: it splits paragraphs into sentences with language-aware rules,
//! partitions them into fixed-size batches, and runs each batch through a
//! supplied tokenizer/model/processor while preserving input order end to
//! end. The model backend is a capability injected through traits; a stub
//! backend ships for tests and demos.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod lang;
pub mod splitter;
pub mod stub;

// Re-export key types for convenience
pub use crate::core::{
    config::TranslatorConfig,
    errors::{Result, TranslationError},
    models::{
        EncodedBatch, GenerationParams, ModelHandle, ModelLoader, Quantization, SentenceProcessor,
        Seq2SeqModel, TranslationTokenizer,
    },
    translator::BatchTranslator,
};

pub use crate::lang::{route, LanguageTag, ModelFamily};
pub use crate::splitter::split_sentences;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
