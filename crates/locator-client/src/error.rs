//! Error types for the locator-client crate.
//!
//! Structural failures ([`DecodeError`]) abort the decode of a single call.
//! Domain failures ([`DomainError`]) are in-band results carried by a decoded
//! envelope and only become an error when the caller asks for one.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors raised while turning a raw RPC value into typed objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A textual payload could not be parsed as JSON.
    #[error("invalid JSON payload: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// A raw value could not be treated as the expected variant.
    #[error("unexpected payload shape: expected {expected}, found {found}")]
    Shape {
        /// What the decoder required at this point.
        expected: String,
        /// What the raw value actually was.
        found: String,
    },
}

impl DecodeError {
    /// Builds a [`DecodeError::Parse`] from any displayable parser error.
    #[must_use]
    pub fn parse(error: impl ToString) -> Self {
        Self::Parse {
            message: error.to_string(),
        }
    }

    /// Builds a [`DecodeError::Shape`].
    #[must_use]
    pub fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Shape {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// An in-band failure reported by the backend through a non-success `code`.
///
/// # Example
///
/// ```
/// use locator_client::{NoData, decode_envelope};
/// use serde_json::json;
///
/// let envelope = decode_envelope::<NoData>(&json!({"code": -1, "message": "duplicate key"}))
///     .expect("envelope decodes");
/// let err = envelope.into_result().expect_err("domain failure");
/// assert_eq!(err.code, -1);
/// assert_eq!(err.message, "duplicate key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend returned code {code}: {message}")]
pub struct DomainError {
    /// Status code reported by the backend.
    pub code: i64,
    /// Human-readable message reported by the backend.
    pub message: String,
}

/// Errors surfaced by [`crate::CarrierClient`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The underlying call could not be completed.
    #[error("transport failure: {source}")]
    Transport {
        /// Underlying transport error.
        #[from]
        #[source]
        source: TransportError,
    },

    /// The call completed but its result could not be decoded.
    #[error("decode failure: {source}")]
    Decode {
        /// Underlying decode error.
        #[from]
        #[source]
        source: DecodeError,
    },

    /// A request payload could not be serialized for the call.
    #[error("failed to encode request payload: {message}")]
    Encode {
        /// Description of the serialization failure.
        message: String,
    },
}
