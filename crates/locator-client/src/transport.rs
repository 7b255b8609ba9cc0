//! Port abstraction for the RPC call primitive.
//!
//! The native backend exposes bound methods that are invoked by name with a
//! list of JSON arguments and answer with one raw JSON value. How the call is
//! carried (IPC bridge, HTTP, an in-process stub) is an adapter concern; this
//! crate only needs `invoke(operation, args) -> raw`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failures of the underlying call itself, surfaced to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The backend process or bridge could not be reached.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
    /// The call was dispatched but did not complete.
    #[error("call to {operation} failed: {message}")]
    Failed {
        /// Bound method name that was invoked.
        operation: String,
        /// Description of the failure.
        message: String,
    },
}

impl TransportError {
    /// Builds a [`TransportError::Unavailable`].
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Builds a [`TransportError::Failed`] for `operation`.
    #[must_use]
    pub fn failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Bound method names exposed by the backend.
pub mod operation {
    /// Look up a single carrier record by mobile number.
    pub const CARRIER_GET: &str = "CarrierGet";
    /// Insert a new carrier record.
    pub const CARRIER_CREATE: &str = "CarrierCreate";
    /// Update the carrier record stored under a key.
    pub const CARRIER_UPDATE: &str = "CarrierUpdate";
    /// Delete the carrier record stored under a key.
    pub const CARRIER_DELETE: &str = "CarrierDelete";
    /// Page through carrier records, optionally filtered by key.
    pub const CARRIER_LIST: &str = "CarrierList";
    /// Fill carrier columns into a base64-encoded CSV upload.
    pub const CARRIER_PROCESS_CSV: &str = "CarrierProcessCSV";
}

/// Port for invoking one backend operation and receiving its raw result.
///
/// Implementations must deliver exactly one raw value per call, or a
/// [`TransportError`] when the call could not complete. They must not retry
/// on behalf of the decoding layer and must not interpret the envelope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `operation` with positional JSON `args`.
    async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Value, TransportError>;
}
