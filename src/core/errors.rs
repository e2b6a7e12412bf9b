//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Language tag has no registered segmentation strategy or model routing
    #[error("Unsupported language: {lang}")]
    UnsupportedLanguage {
        lang: String,
    },

    /// The generation step failed for one batch; the whole call aborts
    #[error("Model invocation failed at batch {batch_index}: {source}")]
    ModelInvocation {
        batch_index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid configuration (non-positive batch size, beam width, max length)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TranslationError {
    /// Wrap a backend fault raised while generating the given batch
    pub fn model_invocation(batch_index: usize, source: anyhow::Error) -> Self {
        TranslationError::ModelInvocation {
            batch_index,
            source: source.into(),
        }
    }

    /// Build an unsupported-language error from any tag-like value
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        TranslationError::UnsupportedLanguage { lang: lang.into() }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
