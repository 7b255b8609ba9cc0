//! The `{code, message, data}` envelope wrapped around every RPC result.
//!
//! A call site declares the shape of `data` with a [`DataShape`] marker type
//! and [`decode_envelope`] produces an [`Envelope`] whose `data` field has the
//! matching Rust type. A non-success `code` is a valid decode result; callers
//! branch on [`Envelope::is_success`] or [`Envelope::into_result`].

use std::collections::BTreeMap;
use std::marker::PhantomData;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{DecodeError, DomainError};
use crate::hydrate::{Hydrate, HydrateMode, hydrate};
use crate::page::Page;
use crate::raw::{self, kind_of};

/// Code the backend reports for a successful call.
pub const SUCCESS_CODE: i64 = 0;

/// Code the backend reports for a failed call.
pub const FAILURE_CODE: i64 = -1;

/// Message the backend attaches to successful calls.
pub const SUCCESS_MESSAGE: &str = "ok";

/// A decoded RPC result.
///
/// # Example
///
/// ```
/// use locator_client::{CarrierData, Single, decode_envelope};
/// use serde_json::json;
///
/// let raw = json!({"code": 1, "message": "not found"});
/// let envelope = decode_envelope::<Single<CarrierData>>(&raw).expect("decodes");
///
/// assert!(!envelope.is_success());
/// assert_eq!(envelope.message, "not found");
/// assert!(envelope.data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<D> {
    /// Status code; [`SUCCESS_CODE`] unless the backend is configured
    /// otherwise.
    pub code: i64,
    /// Human-readable status message.
    pub message: String,
    /// Payload in the shape declared by the call site.
    pub data: D,
}

impl<D> Envelope<D> {
    /// Builds a success envelope carrying `data`.
    #[must_use]
    pub fn ok(data: D) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: SUCCESS_MESSAGE.to_owned(),
            data,
        }
    }

    /// Builds a failure envelope with an empty payload.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self
    where
        D: Default,
    {
        Self {
            code: FAILURE_CODE,
            message: message.into(),
            data: D::default(),
        }
    }

    /// Returns `true` when `code` equals [`SUCCESS_CODE`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_success_with(SUCCESS_CODE)
    }

    /// Returns `true` when `code` equals `success_code`.
    #[must_use]
    pub const fn is_success_with(&self, success_code: i64) -> bool {
        self.code == success_code
    }

    /// Splits the envelope into its payload or a [`DomainError`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when `code` is not [`SUCCESS_CODE`].
    pub fn into_result(self) -> Result<D, DomainError> {
        self.into_result_with(SUCCESS_CODE)
    }

    /// Splits the envelope using a custom success sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when `code` is not `success_code`.
    pub fn into_result_with(self, success_code: i64) -> Result<D, DomainError> {
        if self.is_success_with(success_code) {
            Ok(self.data)
        } else {
            Err(DomainError {
                code: self.code,
                message: self.message,
            })
        }
    }
}

/// Declares how the `data` member of an envelope is decoded.
pub trait DataShape {
    /// Rust type produced for `data`. Its default stands for "no payload".
    type Output: Default;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Decodes `data`; `None` means the member was absent or `null`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when `data` does not fit the shape.
    fn decode_data(data: Option<&Value>) -> Result<Self::Output, DecodeError>;
}

/// The call returns no payload; `data` is ignored.
#[derive(Debug, Clone, Copy)]
pub struct NoData;

/// `data` is at most one record.
#[derive(Debug, Clone, Copy)]
pub struct Single<T>(PhantomData<fn() -> T>);

/// `data` is an ordered list of records.
#[derive(Debug, Clone, Copy)]
pub struct ListOf<T>(PhantomData<fn() -> T>);

/// `data` is a mapping of records indexed by key.
#[derive(Debug, Clone, Copy)]
pub struct MapOf<T>(PhantomData<fn() -> T>);

/// `data` is a `{total, list}` page of records.
#[derive(Debug, Clone, Copy)]
pub struct Paged<T>(PhantomData<fn() -> T>);

/// `data` is a binary payload that must not be hydrated.
#[derive(Debug, Clone, Copy)]
pub struct RawBytes;

/// `data` is kept untouched.
#[derive(Debug, Clone, Copy)]
pub struct Opaque;

impl DataShape for NoData {
    type Output = ();
    const NAME: &'static str = "no-data";

    fn decode_data(_data: Option<&Value>) -> Result<Self::Output, DecodeError> {
        Ok(())
    }
}

impl<T: Hydrate> DataShape for Single<T> {
    type Output = Option<T>;
    const NAME: &'static str = "single";

    fn decode_data(data: Option<&Value>) -> Result<Self::Output, DecodeError> {
        hydrate::<T>(data, HydrateMode::Record)?.into_record()
    }
}

impl<T: Hydrate> DataShape for ListOf<T> {
    type Output = Option<Vec<T>>;
    const NAME: &'static str = "list";

    fn decode_data(data: Option<&Value>) -> Result<Self::Output, DecodeError> {
        hydrate::<T>(data, HydrateMode::Record)?.into_records()
    }
}

impl<T: Hydrate> DataShape for MapOf<T> {
    type Output = Option<BTreeMap<String, T>>;
    const NAME: &'static str = "map";

    fn decode_data(data: Option<&Value>) -> Result<Self::Output, DecodeError> {
        hydrate::<T>(data, HydrateMode::Map)?.into_keyed()
    }
}

impl<T: Hydrate> DataShape for Paged<T> {
    type Output = Option<Page<T>>;
    const NAME: &'static str = "paged";

    fn decode_data(data: Option<&Value>) -> Result<Self::Output, DecodeError> {
        data.map(Page::<T>::from_raw).transpose()
    }
}

impl DataShape for RawBytes {
    type Output = Option<Vec<u8>>;
    const NAME: &'static str = "raw-bytes";

    fn decode_data(data: Option<&Value>) -> Result<Self::Output, DecodeError> {
        data.map(decode_bytes).transpose()
    }
}

impl DataShape for Opaque {
    type Output = Value;
    const NAME: &'static str = "opaque";

    fn decode_data(data: Option<&Value>) -> Result<Self::Output, DecodeError> {
        Ok(data.cloned().unwrap_or(Value::Null))
    }
}

/// Accepts both encodings a native backend emits for a byte slice: an array
/// of integers, or a standard base64 string.
fn decode_bytes(data: &Value) -> Result<Vec<u8>, DecodeError> {
    match data {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_u64()
                    .and_then(|byte| u8::try_from(byte).ok())
                    .ok_or_else(|| {
                        DecodeError::shape(format!("byte at index {index}"), item.to_string())
                    })
            })
            .collect(),
        Value::String(encoded) => STANDARD
            .decode(encoded)
            .map_err(|err| {
                DecodeError::shape("base64 byte string", format!("malformed base64 ({err})"))
            }),
        other => Err(DecodeError::shape("byte array", kind_of(other))),
    }
}

/// Decodes a raw envelope using [`SUCCESS_CODE`] as the success sentinel.
///
/// # Errors
///
/// See [`decode_envelope_with`].
pub fn decode_envelope<S: DataShape>(
    raw: &Value,
) -> Result<Envelope<S::Output>, DecodeError> {
    decode_envelope_with::<S>(raw, SUCCESS_CODE)
}

/// Decodes a raw envelope whose backend reports success as `success_code`.
///
/// Missing `code` and `message` read as `0` and `""`. The payload must fit
/// the shape whatever the code; a domain failure normally carries an absent
/// or empty payload, which every shape accepts.
///
/// # Errors
///
/// Returns [`DecodeError::Parse`] when the envelope or a textual payload is
/// malformed and [`DecodeError::Shape`] when the envelope is not a mapping,
/// `code` is not an integer, `message` is not a string, or the payload does
/// not fit `S`.
pub fn decode_envelope_with<S: DataShape>(
    raw: &Value,
    success_code: i64,
) -> Result<Envelope<S::Output>, DecodeError> {
    let map = raw::structured(raw, "envelope object")?;
    let code = match raw::field(&map, "code") {
        None => 0,
        Some(value) => value
            .as_i64()
            .ok_or_else(|| DecodeError::shape("integer `code`", kind_of(value)))?,
    };
    let message = raw::string_field(&map, "message")?.unwrap_or_default();
    let data = S::decode_data(raw::field(&map, "data"))?;

    debug!(
        shape = S::NAME,
        code,
        success = code == success_code,
        "decoded envelope"
    );
    Ok(Envelope {
        code,
        message,
        data,
    })
}

/// Decodes an envelope delivered in serialized form.
///
/// # Errors
///
/// Returns [`DecodeError::Parse`] for malformed text; otherwise as
/// [`decode_envelope`].
pub fn decode_envelope_text<S: DataShape>(
    text: &str,
) -> Result<Envelope<S::Output>, DecodeError> {
    decode_envelope::<S>(&raw::parse_text(text)?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::records::CarrierData;

    fn carrier(key: &str, isp: &str) -> Value {
        json!({"key": key, "province": "Sichuan", "city": "Chengdu", "isp": isp})
    }

    #[test]
    fn single_hydrates_the_record() {
        let raw = json!({"code": 0, "message": "ok", "data": carrier("1390280", "China Telecom")});
        let envelope = decode_envelope::<Single<CarrierData>>(&raw).expect("envelope");

        assert!(envelope.is_success());
        assert_eq!(envelope.message, "ok");
        let record = envelope.data.expect("record present");
        assert_eq!(record.key(), Some("1390280"));
        assert_eq!(record.province(), Some("Sichuan"));
        assert_eq!(record.city(), Some("Chengdu"));
        assert_eq!(record.isp(), Some("China Telecom"));
    }

    #[rstest]
    #[case::absent(json!({"code": 0, "message": "ok"}))]
    #[case::null(json!({"code": 0, "message": "ok", "data": null}))]
    fn absent_data_is_success_without_payload(#[case] raw: Value) {
        let envelope = decode_envelope::<Single<CarrierData>>(&raw).expect("envelope");
        assert!(envelope.is_success());
        assert_eq!(envelope.data, None);
    }

    #[test]
    fn domain_failure_decodes_without_payload() {
        let raw = json!({"code": 1, "message": "not found"});
        let envelope = decode_envelope::<Single<CarrierData>>(&raw).expect("envelope");

        assert!(!envelope.is_success());
        assert_eq!(envelope.code, 1);
        assert_eq!(envelope.message, "not found");
        assert_eq!(envelope.data, None);
    }

    #[test]
    fn domain_failure_with_scalar_page_is_a_shape_error() {
        let raw = json!({"code": -1, "message": "query failed", "data": 7});
        let err = decode_envelope::<Paged<CarrierData>>(&raw).expect_err("scalar page");
        assert_eq!(err, DecodeError::shape("page object", "number"));
    }

    #[test]
    fn domain_failure_with_sequence_for_record_is_a_shape_error() {
        let raw = json!({"code": 1, "message": "not found", "data": [1, 2]});
        let err = decode_envelope::<Single<CarrierData>>(&raw).expect_err("sequence");
        assert_eq!(err, DecodeError::shape("record", "sequence"));
    }

    #[test]
    fn domain_failure_with_malformed_textual_page_is_a_parse_error() {
        let raw = json!({"code": -1, "message": "query failed", "data": "{not json"});
        let err = decode_envelope::<Paged<CarrierData>>(&raw).expect_err("malformed page");
        assert!(matches!(err, DecodeError::Parse { .. }));
    }

    #[test]
    fn domain_failure_with_zero_page_decodes() {
        let raw = json!({"code": -1, "message": "query failed", "data": {"total": 0, "list": null}});
        let envelope = decode_envelope::<Paged<CarrierData>>(&raw).expect("envelope");

        assert_eq!(envelope.code, -1);
        assert_eq!(envelope.data, Some(Page::new(0, Vec::new())));
    }

    #[test]
    fn success_with_undecodable_payload_is_a_shape_error() {
        let raw = json!({"code": 0, "message": "ok", "data": 7});
        let err = decode_envelope::<Paged<CarrierData>>(&raw).expect_err("scalar page");
        assert_eq!(err, DecodeError::shape("page object", "number"));
    }

    #[test]
    fn list_preserves_order() {
        let raw = json!({
            "code": 0,
            "message": "ok",
            "data": [carrier("1300000", "China Unicom"), carrier("1330000", "China Telecom")]
        });
        let records = decode_envelope::<ListOf<CarrierData>>(&raw)
            .expect("envelope")
            .data
            .expect("list present");

        let keys: Vec<_> = records.iter().map(CarrierData::key).collect();
        assert_eq!(keys, vec![Some("1300000"), Some("1330000")]);
    }

    #[test]
    fn map_keeps_keys() {
        let raw = json!({
            "code": 0,
            "message": "ok",
            "data": {"first": carrier("1300000", "China Unicom")}
        });
        let records = decode_envelope::<MapOf<CarrierData>>(&raw)
            .expect("envelope")
            .data
            .expect("map present");

        assert_eq!(
            records.get("first").and_then(CarrierData::isp),
            Some("China Unicom")
        );
    }

    #[test]
    fn paged_keeps_the_reported_total() {
        let raw = json!({
            "code": 0,
            "message": "ok",
            "data": {"total": 57, "list": [carrier("1300000", "a"), carrier("1300001", "b"), carrier("1300002", "c")]}
        });
        let page = decode_envelope::<Paged<CarrierData>>(&raw)
            .expect("envelope")
            .data
            .expect("page present");

        assert_eq!(page.total(), Some(57));
        assert_eq!(page.list().len(), 3);
    }

    #[rstest]
    #[case::integers(json!([104, 105, 0, 255]))]
    #[case::base64(json!("aGkA/w=="))]
    fn raw_bytes_accept_both_encodings(#[case] data: Value) {
        let raw = json!({"code": 0, "message": "ok", "data": data});
        let bytes = decode_envelope::<RawBytes>(&raw).expect("envelope").data;
        assert_eq!(bytes, Some(vec![104, 105, 0, 255]));
    }

    #[rstest]
    #[case::out_of_range(json!([1, 256]), DecodeError::shape("byte at index 1", "256"))]
    #[case::negative(json!([-1]), DecodeError::shape("byte at index 0", "-1"))]
    #[case::object(json!({"bytes": []}), DecodeError::shape("byte array", "object"))]
    fn raw_bytes_reject_non_byte_payloads(#[case] data: Value, #[case] expected: DecodeError) {
        let raw = json!({"code": 0, "message": "ok", "data": data});
        let err = decode_envelope::<RawBytes>(&raw).expect_err("not bytes");
        assert_eq!(err, expected);
    }

    #[test]
    fn opaque_leaves_data_untouched() {
        let data = json!({"anything": [1, "two", null]});
        let raw = json!({"code": 0, "message": "ok", "data": data.clone()});
        let envelope = decode_envelope::<Opaque>(&raw).expect("envelope");
        assert_eq!(envelope.data, data);
    }

    #[test]
    fn no_data_ignores_the_payload() {
        let raw = json!({"code": 0, "message": "ok", "data": "ignored"});
        let envelope = decode_envelope::<NoData>(&raw).expect("envelope");
        assert_eq!(envelope, Envelope::ok(()));
    }

    #[test]
    fn missing_code_and_message_are_tolerated() {
        let envelope = decode_envelope::<Opaque>(&json!({})).expect("envelope");
        assert_eq!(envelope.code, 0);
        assert_eq!(envelope.message, "");
        assert_eq!(envelope.data, Value::Null);
    }

    #[rstest]
    #[case::fractional_code(json!({"code": 0.5}), DecodeError::shape("integer `code`", "number"))]
    #[case::textual_code(json!({"code": "0"}), DecodeError::shape("integer `code`", "string"))]
    #[case::numeric_message(json!({"message": 404}), DecodeError::shape("string field `message`", "number"))]
    #[case::scalar_envelope(json!(true), DecodeError::shape("envelope object", "boolean"))]
    fn malformed_envelopes_are_shape_errors(#[case] raw: Value, #[case] expected: DecodeError) {
        let err = decode_envelope::<NoData>(&raw).expect_err("malformed");
        assert_eq!(err, expected);
    }

    #[test]
    fn textual_envelope_must_parse() {
        let result = decode_envelope_text::<NoData>("{not json");
        assert!(matches!(result, Err(DecodeError::Parse { .. })));
    }

    #[test]
    fn custom_success_sentinel_is_honoured() {
        let raw = json!({"code": 200, "message": "fine", "data": carrier("1300000", "a")});
        let envelope = decode_envelope_with::<Single<CarrierData>>(&raw, 200).expect("envelope");

        assert!(envelope.is_success_with(200));
        assert!(!envelope.is_success());
        assert!(envelope.into_result_with(200).expect("success").is_some());
    }

    #[test]
    fn envelopes_serialize_to_the_wire_shape() {
        let ok = serde_json::to_value(Envelope::<()>::ok(())).expect("serialize");
        assert_eq!(ok, json!({"code": 0, "message": "ok", "data": null}));

        let failure =
            serde_json::to_value(Envelope::<Option<CarrierData>>::failure("该号段无数据"))
                .expect("serialize");
        assert_eq!(
            failure,
            json!({"code": -1, "message": "该号段无数据", "data": null})
        );
    }

    #[test]
    fn into_result_surfaces_domain_errors() {
        let envelope = Envelope::<Option<CarrierData>>::failure("duplicate key");
        assert_eq!(
            envelope.into_result(),
            Err(DomainError {
                code: FAILURE_CODE,
                message: "duplicate key".to_owned()
            })
        );
    }
}
