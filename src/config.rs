//! # Configuration
//!
//! The codec itself is stateless; its only tunables are the frame-size
//! ceiling enforced by the dispatcher and the protocol byte used when a
//! message does not specify one. Both can be loaded from a TOML file so
//! that embedding applications configure the codec alongside the rest of
//! their stack.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::header::{PROTO_EDONKEY, PROTO_EMULE, PROTO_PACKED};
use crate::error::{Result, WireError};

/// Default ceiling on the payload size announced by a frame header (16 MiB).
/// The size field is read before any allocation happens, so a hostile peer
/// can cause at most this much buffering per frame.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum accepted frame payload size in bytes.
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: u32,

    /// Protocol byte used when a message leaves it unspecified.
    #[serde(default = "default_protocol")]
    pub default_protocol: u8,
}

fn default_max_frame_size() -> u32 {
    DEFAULT_MAX_FRAME_SIZE
}

fn default_protocol() -> u8 {
    PROTO_EDONKEY
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            default_protocol: PROTO_EDONKEY,
        }
    }
}

impl CodecConfig {
    /// Loads configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| WireError::Config(format!("failed to parse TOML: {e}")))
    }

    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WireError::Config(format!("failed to read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Validates the configuration for common misconfigurations. Returns a
    /// list of problems; an empty list means the configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_frame_size == 0 {
            errors.push("max_frame_size must be greater than zero".to_string());
        }
        if !matches!(
            self.default_protocol,
            PROTO_EDONKEY | PROTO_EMULE | PROTO_PACKED
        ) {
            errors.push(format!(
                "default_protocol {:#04x} is not a known protocol byte",
                self.default_protocol
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CodecConfig::default();
        assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
        assert_eq!(config.default_protocol, PROTO_EDONKEY);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn loads_partial_toml() {
        let config = CodecConfig::from_toml("max_frame_size = 1024").unwrap();
        assert_eq!(config.max_frame_size, 1024);
        assert_eq!(config.default_protocol, PROTO_EDONKEY);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            CodecConfig::from_toml("max_frame_size = \"huge\""),
            Err(WireError::Config(_))
        ));
    }

    #[test]
    fn validate_flags_bad_values() {
        let config = CodecConfig {
            max_frame_size: 0,
            default_protocol: 0x42,
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
    }
}
