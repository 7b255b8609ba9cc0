//! Typed accessors over the carrier operations.
//!
//! Each accessor invokes one backend operation through a [`Transport`] and
//! decodes the result with the data shape that operation is known to return.
//! Transport and decode failures come back as [`ClientError`]; a non-success
//! `code` comes back as an ordinary [`Envelope`].

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientSettings;
use crate::envelope::{
    DataShape, Envelope, MapOf, NoData, Opaque, Paged, RawBytes, Single, decode_envelope_with,
};
use crate::error::ClientError;
use crate::page::{Page, PageRequest};
use crate::records::{CarrierCreateReq, CarrierData, CarrierUpdateReq};
use crate::transport::{Transport, operation};

/// Typed client for the carrier operations.
///
/// The client holds no state beyond its transport and settings, so it can be
/// shared across concurrent calls whenever the transport can.
#[derive(Debug, Clone)]
pub struct CarrierClient<T> {
    transport: T,
    settings: ClientSettings,
}

impl<T: Transport> CarrierClient<T> {
    /// Creates a client over `transport`.
    #[must_use]
    pub const fn new(transport: T, settings: ClientSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Returns the settings used to interpret envelopes.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Looks up the carrier record for a mobile number.
    ///
    /// The backend matches on the number's seven-digit prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call or its decoding fails.
    pub async fn get(&self, number: &str) -> Result<Envelope<Option<CarrierData>>, ClientError> {
        self.call::<Single<CarrierData>>(operation::CARRIER_GET, vec![Value::from(number)])
            .await
    }

    /// Inserts a new carrier record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request cannot be encoded or the call
    /// or its decoding fails.
    pub async fn create(&self, request: &CarrierCreateReq) -> Result<Envelope<()>, ClientError> {
        let payload = encode(request)?;
        self.call::<NoData>(operation::CARRIER_CREATE, vec![payload])
            .await
    }

    /// Updates the carrier record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request cannot be encoded or the call
    /// or its decoding fails.
    pub async fn update(
        &self,
        key: &str,
        request: &CarrierUpdateReq,
    ) -> Result<Envelope<()>, ClientError> {
        let payload = encode(request)?;
        self.call::<NoData>(operation::CARRIER_UPDATE, vec![Value::from(key), payload])
            .await
    }

    /// Deletes the carrier record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call or its decoding fails.
    pub async fn delete(&self, key: &str) -> Result<Envelope<()>, ClientError> {
        self.call::<NoData>(operation::CARRIER_DELETE, vec![Value::from(key)])
            .await
    }

    /// Fetches one page of carrier records.
    ///
    /// The request is normalized before it is sent; see
    /// [`PageRequest::normalized`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call or its decoding fails.
    pub async fn list(
        &self,
        request: &PageRequest,
    ) -> Result<Envelope<Option<Page<CarrierData>>>, ClientError> {
        let normalized = request
            .clone()
            .normalized(self.settings.default_page_size());
        let args = vec![
            Value::from(normalized.key()),
            Value::from(normalized.page()),
            Value::from(normalized.size()),
        ];
        self.call::<Paged<CarrierData>>(operation::CARRIER_LIST, args)
            .await
    }

    /// Sends a CSV file whose first column holds mobile numbers and returns
    /// the file with province, city and operator columns filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call or its decoding fails.
    pub async fn process_csv(
        &self,
        csv: &[u8],
    ) -> Result<Envelope<Option<Vec<u8>>>, ClientError> {
        let encoded = STANDARD.encode(csv);
        self.call::<RawBytes>(operation::CARRIER_PROCESS_CSV, vec![Value::from(encoded)])
            .await
    }

    /// Invokes an operation whose keyed result is not known statically.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call or its decoding fails.
    pub async fn call_keyed(
        &self,
        operation: &str,
        args: Vec<Value>,
    ) -> Result<Envelope<Option<BTreeMap<String, CarrierData>>>, ClientError> {
        self.call::<MapOf<CarrierData>>(operation, args).await
    }

    /// Invokes any operation and leaves its payload untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails or its envelope is
    /// malformed.
    pub async fn call_opaque(
        &self,
        operation: &str,
        args: Vec<Value>,
    ) -> Result<Envelope<Value>, ClientError> {
        self.call::<Opaque>(operation, args).await
    }

    async fn call<S: DataShape>(
        &self,
        operation: &str,
        args: Vec<Value>,
    ) -> Result<Envelope<S::Output>, ClientError> {
        let raw = self
            .transport
            .invoke(operation, args)
            .await
            .inspect_err(|err| debug!(operation, error = %err, "transport call failed"))?;
        let envelope = decode_envelope_with::<S>(&raw, self.settings.success_code())
            .inspect_err(|err| debug!(operation, error = %err, "undecodable result"))?;
        if !envelope.is_success_with(self.settings.success_code()) {
            debug!(
                operation,
                code = envelope.code,
                message = %envelope.message,
                "backend reported failure"
            );
        }
        Ok(envelope)
    }
}

fn encode(payload: &impl Serialize) -> Result<Value, ClientError> {
    serde_json::to_value(payload).map_err(|err| ClientError::Encode {
        message: err.to_string(),
    })
}
