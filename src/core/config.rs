//! Configuration management

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{GenerationParams, Quantization};

/// Configuration for the batch translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Sentences per model invocation
    pub batch_size: usize,
    /// Token cap for encoding truncation and generation
    pub max_length: usize,
    /// Beam search width
    pub beam_width: usize,
    /// Weight quantization mode passed to the model loader
    pub quantization: Quantization,
    /// Attention kernel requested from the loader (loader falls back to its
    /// default kernel when unavailable)
    pub attn_implementation: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            max_length: 256,
            beam_width: 5,
            quantization: Quantization::None,
            attn_implementation: "eager".to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let batch_size = std::env::var("BATCH_SIZE")
            .unwrap_or_else(|_| "4".to_string())
            .parse::<usize>()?;

        let max_length = std::env::var("MAX_LENGTH")
            .unwrap_or_else(|_| "256".to_string())
            .parse::<usize>()?;

        let beam_width = std::env::var("BEAM_WIDTH")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()?;

        let quantization = std::env::var("QUANTIZATION")
            .unwrap_or_default()
            .parse::<Quantization>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let attn_implementation =
            std::env::var("ATTENTION_IMPL").unwrap_or_else(|_| "eager".to_string());

        Ok(Self {
            batch_size,
            max_length,
            beam_width,
            quantization,
            attn_implementation,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration; fails fast before any model call
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(TranslationError::Configuration {
                message: "batch_size must be greater than 0".to_string(),
            });
        }

        if self.beam_width == 0 {
            return Err(TranslationError::Configuration {
                message: "beam_width must be greater than 0".to_string(),
            });
        }

        if self.max_length == 0 {
            return Err(TranslationError::Configuration {
                message: "max_length must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Decoding parameters derived from this configuration
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            beam_width: self.beam_width,
            max_length: self.max_length,
            num_return_sequences: 1,
        }
    }

    /// Log the effective configuration at startup
    pub fn log_summary(&self) {
        info!(
            "Translator config: batch_size={} max_length={} beam_width={} quantization={} attn={}",
            self.batch_size, self.max_length, self.beam_width, self.quantization,
            self.attn_implementation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TranslatorConfig::default();
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.max_length, 256);
        assert_eq!(config.beam_width, 5);
        assert_eq!(config.quantization, Quantization::None);
        assert_eq!(config.attn_implementation, "eager");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_batch_size() {
        let config = TranslatorConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TranslationError::Configuration { .. })
        ));
    }

    #[test]
    fn test_config_validation_zero_beam_width() {
        let config = TranslatorConfig {
            beam_width: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_max_length() {
        let config = TranslatorConfig {
            max_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = TranslatorConfig {
            batch_size: 8,
            quantization: Quantization::FourBit,
            ..Default::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translator.json");
        config.to_file(&path).unwrap();

        let loaded = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch_size, 8);
        assert_eq!(loaded.quantization, Quantization::FourBit);
        assert_eq!(loaded.beam_width, config.beam_width);
    }

    #[test]
    fn test_generation_params_from_config() {
        let config = TranslatorConfig {
            beam_width: 3,
            max_length: 128,
            ..Default::default()
        };
        let params = config.generation_params();
        assert_eq!(params.beam_width, 3);
        assert_eq!(params.max_length, 128);
        assert_eq!(params.num_return_sequences, 1);
    }
}
