//! Configuration module for the Luhn guard filter
//!
//! Configuration is a small JSON document. Every field has a default, so an
//! empty object (or no file at all) yields the standard 14..=16 digit filter
//! with a 32 KiB working buffer.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{DEFAULT_BUFFER_CAPACITY, MASK_BYTE, MAX_DIGITS, MIN_DIGITS};

/// Filter configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    /// Shortest digit run (separators excluded) eligible for masking
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,

    /// Longest digit run considered; the backward walk stops here
    #[serde(default = "default_max_digits")]
    pub max_digits: usize,

    /// Fixed working buffer size in bytes (no growth)
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Character substituted for each masked digit
    #[serde(default = "default_mask")]
    pub mask: char,

    /// Whether to emit an audit event when a stream completes
    #[serde(default = "default_log_redactions")]
    pub log_redactions: bool,
}

fn default_min_digits() -> usize {
    MIN_DIGITS
}

fn default_max_digits() -> usize {
    MAX_DIGITS
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_mask() -> char {
    MASK_BYTE as char
}

fn default_log_redactions() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_digits: default_min_digits(),
            max_digits: default_max_digits(),
            buffer_capacity: default_buffer_capacity(),
            mask: default_mask(),
            log_redactions: default_log_redactions(),
        }
    }
}

impl FilterConfig {
    /// Parse and validate configuration from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config_str =
            std::str::from_utf8(bytes).map_err(|e| ConfigError::InvalidUtf8(e.to_string()))?;

        let config: FilterConfig = serde_json::from_str(config_str)
            .map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Reject settings the scanner cannot honour.
    ///
    /// The mask must not itself be a digit or a separator, otherwise a
    /// second pass over filtered output could mask more.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_digits == 0 {
            return Err(ConfigError::Invalid("min_digits must be at least 1".into()));
        }
        if self.min_digits > self.max_digits {
            return Err(ConfigError::Invalid(format!(
                "min_digits ({}) exceeds max_digits ({})",
                self.min_digits, self.max_digits
            )));
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::Invalid("buffer_capacity must be non-zero".into()));
        }
        if !self.mask.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "mask {:?} is not a single ASCII character",
                self.mask
            )));
        }
        if self.mask.is_ascii_digit() || self.mask == ' ' || self.mask == '-' {
            return Err(ConfigError::Invalid(format!(
                "mask {:?} must not be a digit or separator",
                self.mask
            )));
        }
        Ok(())
    }

    /// Mask as the byte written into the output
    pub fn mask_byte(&self) -> u8 {
        // validate() guarantees ASCII; fall back to the default otherwise
        u8::try_from(self.mask).unwrap_or(MASK_BYTE)
    }
}

/// Configuration parsing errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.min_digits, 14);
        assert_eq!(config.max_digits, 16);
        assert_eq!(config.buffer_capacity, 32 * 1024);
        assert_eq!(config.mask_byte(), b'X');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r##"{"buffer_capacity": 1024, "mask": "#"}"##;
        let config = FilterConfig::from_bytes(json.as_bytes()).unwrap();
        assert_eq!(config.buffer_capacity, 1024);
        assert_eq!(config.mask_byte(), b'#');
        assert_eq!(config.min_digits, 14);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = FilterConfig::from_bytes(b"{}").unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = FilterConfig::from_bytes(b"{not json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = FilterConfig::from_bytes(&[0xFF, 0xFE]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUtf8(_)));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let json = r#"{"min_digits": 17, "max_digits": 16}"#;
        let err = FilterConfig::from_bytes(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_digit_mask() {
        let config = FilterConfig {
            mask: '7',
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FilterConfig {
            mask: '-',
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = FilterConfig {
            buffer_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = FilterConfig::from_file(Path::new("/nonexistent/luhn-guard.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
