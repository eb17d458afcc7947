//! Compact, URL-safe encoding of an [`AppConfig`].
//!
//! `encode`: JSON → zlib → base64url (no padding). The output only uses
//! `A-Z a-z 0-9 - _`, so it can travel as a single query parameter.
//! `decode` reverses the transform and hands the parsed document to the
//! validator. Blobs written by older versions as plain JSON are still accepted.

use crate::models::AppConfig;
use crate::services::validator::ConfigValidator;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;
use std::io::{Read, Write};
use thiserror::Error;

/// Upper bound on the inflated document size.
pub const MAX_DECODED_BYTES: u64 = 4 * 1024 * 1024;

/// Why a persisted blob could not be turned back into a document.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("configuration blob is empty")]
    Empty,

    #[error("configuration blob is not valid base64url: {0}")]
    Transport(#[from] base64::DecodeError),

    #[error("configuration blob failed to decompress: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("configuration blob inflates past {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("configuration blob is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to compress configuration: {0}")]
    Compress(#[from] std::io::Error),
}

/// Stateless encoder/decoder for configuration blobs.
pub struct ConfigCodec;

impl ConfigCodec {
    pub fn encode(config: &AppConfig) -> Result<String, EncodeError> {
        let json = serde_json::to_vec(config)?;

        let mut encoder = ZlibEncoder::new(Vec::with_capacity(json.len() / 4), Compression::best());
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;

        let blob = URL_SAFE_NO_PAD.encode(compressed);
        tracing::debug!(
            "Encoded configuration: {} bytes JSON -> {} chars",
            json.len(),
            blob.len()
        );
        Ok(blob)
    }

    /// Decodes a blob to its raw JSON document without validating its shape.
    pub fn decode_value(blob: &str) -> Result<Value, DecodeError> {
        let blob = blob.trim();
        if blob.is_empty() {
            return Err(DecodeError::Empty);
        }

        if blob.starts_with('{') {
            tracing::debug!("Decoding legacy plain JSON configuration");
            return Ok(serde_json::from_str(blob)?);
        }

        let compressed = URL_SAFE_NO_PAD.decode(blob)?;

        let mut json = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .take(MAX_DECODED_BYTES + 1)
            .read_to_end(&mut json)
            .map_err(DecodeError::Decompress)?;

        if json.len() as u64 > MAX_DECODED_BYTES {
            return Err(DecodeError::TooLarge {
                limit: MAX_DECODED_BYTES,
            });
        }

        Ok(serde_json::from_slice(&json)?)
    }

    /// Decodes and validates a blob.
    pub fn decode(blob: &str) -> Result<AppConfig, DecodeError> {
        let value = Self::decode_value(blob)?;
        Ok(ConfigValidator::validate(value))
    }

    /// Decodes `blob`, substituting the generated default on any failure.
    ///
    /// Returns the configuration and whether it was regenerated, in which
    /// case the caller should persist a fresh encoding.
    pub fn decode_or_generate(blob: Option<&str>) -> (AppConfig, bool) {
        let Some(blob) = blob else {
            tracing::info!("No stored configuration, generating defaults");
            return (AppConfig::generated(), true);
        };

        match Self::decode(blob) {
            Ok(config) => (config, false),
            Err(e) => {
                tracing::warn!("Discarding stored configuration: {}", e);
                (AppConfig::generated(), true)
            }
        }
    }
}
