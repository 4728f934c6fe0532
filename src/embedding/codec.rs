//! Canonical vector encodings
//!
//! - Persisted: fixed-width little-endian `f32`, `4 * dimension` bytes.
//! - Provider wire: JSON array of numbers, flat or nested one level.
//! - Human: bracketed comma-separated decimals, `[0.25,-1,3.5]`.

use crate::error::{FaqError, Result};
use serde::Deserialize;

const F32_WIDTH: usize = std::mem::size_of::<f32>();

/// Encode a vector into its persisted blob form
pub fn encode_blob(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * F32_WIDTH);
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode a persisted blob, checking it holds exactly `dimension` floats
pub fn decode_blob(bytes: &[u8], dimension: usize) -> Result<Vec<f32>> {
    if bytes.len() % F32_WIDTH != 0 {
        return Err(FaqError::InvalidEmbedding(format!(
            "blob length {} is not a multiple of {}",
            bytes.len(),
            F32_WIDTH
        )));
    }

    let actual = bytes.len() / F32_WIDTH;
    if actual != dimension {
        return Err(FaqError::DimensionMismatch {
            expected: dimension,
            actual,
        });
    }

    Ok(bytes
        .chunks_exact(F32_WIDTH)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Format a vector as `[a,b,c]`
pub fn to_literal(vector: &[f32]) -> String {
    let parts: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

/// Parse a `[a,b,c]` literal (brackets optional, whitespace ignored)
pub fn parse_literal(text: &str) -> Result<Vec<f32>> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|part| {
            part.trim().parse::<f32>().map_err(|_| {
                FaqError::InvalidInput(format!("'{}' is not a number", part.trim()))
            })
        })
        .collect()
}

/// Response body shapes accepted from the embedding provider
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProviderPayload {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

impl ProviderPayload {
    /// Flatten the payload into a single embedding
    pub fn into_vector(self) -> Result<Vec<f32>> {
        match self {
            ProviderPayload::Flat(vector) => Ok(vector),
            ProviderPayload::Nested(mut rows) => {
                if rows.len() != 1 {
                    return Err(FaqError::ProviderUnavailable(format!(
                        "expected one embedding in response, got {}",
                        rows.len()
                    )));
                }
                Ok(rows.remove(0))
            }
        }
    }
}

/// Reject vectors with the wrong length or non-finite components
pub fn validate(vector: &[f32], dimension: usize) -> Result<()> {
    if vector.len() != dimension {
        return Err(FaqError::DimensionMismatch {
            expected: dimension,
            actual: vector.len(),
        });
    }

    if let Some(position) = vector.iter().position(|v| !v.is_finite()) {
        return Err(FaqError::InvalidEmbedding(format!(
            "non-finite value at position {}",
            position
        )));
    }

    Ok(())
}

/// Euclidean distance, accumulated in f64
pub fn l2_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_roundtrip() {
        let vector = vec![0.5, -1.25, 3.0, f32::MIN_POSITIVE];
        let bytes = encode_blob(&vector);
        assert_eq!(bytes.len(), 16);
        assert_eq!(decode_blob(&bytes, 4).unwrap(), vector);
    }

    #[test]
    fn test_blob_wrong_dimension() {
        let bytes = encode_blob(&[1.0; 300]);
        match decode_blob(&bytes, 384) {
            Err(FaqError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 384);
                assert_eq!(actual, 300);
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_blob_truncated() {
        assert!(matches!(
            decode_blob(&[0, 0, 0], 1),
            Err(FaqError::InvalidEmbedding(_))
        ));
    }

    #[test]
    fn test_literal_parsing() {
        assert_eq!(
            parse_literal("[0.5, -1, 2.25]").unwrap(),
            vec![0.5, -1.0, 2.25]
        );
        assert_eq!(parse_literal("1,2").unwrap(), vec![1.0, 2.0]);
        assert!(parse_literal("[]").unwrap().is_empty());
        assert!(parse_literal("[1, two]").is_err());
        assert_eq!(to_literal(&[0.5, -1.0]), "[0.5,-1]");
    }

    #[test]
    fn test_provider_payload_shapes() {
        let flat: ProviderPayload = serde_json::from_str("[0.1, 0.2]").unwrap();
        assert_eq!(flat.into_vector().unwrap(), vec![0.1, 0.2]);

        let nested: ProviderPayload = serde_json::from_str("[[0.1, 0.2]]").unwrap();
        assert_eq!(nested.into_vector().unwrap(), vec![0.1, 0.2]);

        let many: ProviderPayload = serde_json::from_str("[[0.1], [0.2]]").unwrap();
        assert!(many.into_vector().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(validate(&[0.0; 4], 4).is_ok());
        assert!(matches!(
            validate(&[0.0; 3], 4),
            Err(FaqError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            validate(&[0.0, f32::NAN], 2),
            Err(FaqError::InvalidEmbedding(_))
        ));
    }

    #[test]
    fn test_l2_distance() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.5, -2.0], &[1.5, -2.0]), 0.0);
    }
}
