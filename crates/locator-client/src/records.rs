//! Carrier value records.
//!
//! These are flat hydration targets mirroring the backend's wire shape. Every
//! field is optional: a field missing from the raw mapping hydrates to `None`
//! rather than failing, so a partial backend response still produces a
//! record. Callers that need every field present must check for themselves.

use serde::{Deserialize, Serialize};

use crate::hydrate::Hydrate;

/// A stored carrier record returned by lookups and listings.
///
/// # Example
///
/// ```
/// use locator_client::{CarrierData, Hydrate};
///
/// let record = CarrierData::from_text(
///     r#"{"key": "1380013", "province": "Beijing", "city": "Beijing", "isp": "China Mobile"}"#,
/// )
/// .expect("valid record");
///
/// assert_eq!(record.isp(), Some("China Mobile"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarrierData {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    isp: Option<String>,
}

impl CarrierData {
    /// Returns the mobile-number prefix.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the province.
    #[must_use]
    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Returns the network operator name.
    #[must_use]
    pub fn isp(&self) -> Option<&str> {
        self.isp.as_deref()
    }
}

impl Hydrate for CarrierData {
    const RECORD: &'static str = "carrier record";
}

/// Payload for inserting a new carrier record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarrierCreateReq {
    /// Mobile-number prefix to insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Province served by the prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// City served by the prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Network operator name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
}

impl CarrierCreateReq {
    /// Builds a fully populated create request.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        province: impl Into<String>,
        city: impl Into<String>,
        isp: impl Into<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            province: Some(province.into()),
            city: Some(city.into()),
            isp: Some(isp.into()),
        }
    }
}

impl Hydrate for CarrierCreateReq {
    const RECORD: &'static str = "carrier create request";
}

/// Payload for updating a carrier record.
///
/// The key is not part of the payload; it travels as a separate call
/// argument. The backend only overwrites fields that are non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarrierUpdateReq {
    /// Replacement province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// Replacement city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Replacement network operator name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
}

impl Hydrate for CarrierUpdateReq {
    const RECORD: &'static str = "carrier update request";
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn copies_every_field_verbatim() {
        let raw = json!({
            "key": "1380013",
            "province": "Guangdong",
            "city": "Shenzhen",
            "isp": "China Mobile"
        });
        let record = CarrierData::from_raw(&raw).expect("record");

        assert_eq!(record.key(), Some("1380013"));
        assert_eq!(record.province(), Some("Guangdong"));
        assert_eq!(record.city(), Some("Shenzhen"));
        assert_eq!(record.isp(), Some("China Mobile"));
    }

    #[test]
    fn missing_fields_become_none() {
        let record = CarrierData::from_raw(&json!({"key": "1380013"})).expect("record");

        assert_eq!(record.key(), Some("1380013"));
        assert_eq!(record.province(), None);
        assert_eq!(record.city(), None);
        assert_eq!(record.isp(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = json!({"key": "1380013", "createdAt": "2024-01-01T00:00:00Z"});
        let record = CarrierData::from_raw(&raw).expect("record");
        assert_eq!(
            serde_json::to_value(&record).expect("serialize"),
            json!({"key": "1380013"})
        );
    }

    #[test]
    fn textual_input_is_parsed_first() {
        let raw = json!(r#"{"province": "Zhejiang", "city": "Hangzhou"}"#);
        let request = CarrierUpdateReq::from_raw(&raw).expect("request");

        assert_eq!(request.province.as_deref(), Some("Zhejiang"));
        assert_eq!(request.city.as_deref(), Some("Hangzhou"));
        assert_eq!(request.isp, None);
    }

    #[rstest]
    #[case::unterminated("{not json")]
    #[case::trailing_garbage(r#"{"key": "138"} extra"#)]
    #[case::empty("")]
    fn malformed_text_fails_with_parse_error(#[case] text: &str) {
        let result = CarrierCreateReq::from_text(text);
        assert!(matches!(result, Err(DecodeError::Parse { .. })));
    }

    #[rstest]
    #[case::number(json!(138), "number")]
    #[case::sequence(json!([{"key": "138"}]), "array")]
    #[case::textual_sequence(json!("[1, 2]"), "array")]
    fn non_mappings_fail_with_shape_error(#[case] raw: Value, #[case] found: &str) {
        let err = CarrierData::from_raw(&raw).expect_err("not a mapping");
        assert_eq!(err, DecodeError::shape("carrier record", found));
    }

    #[test]
    fn non_string_fields_are_not_coerced() {
        let err = CarrierData::from_raw(&json!({"key": 1_380_013})).expect_err("numeric key");
        match err {
            DecodeError::Shape { expected, found } => {
                assert_eq!(expected, "carrier record");
                assert!(found.contains("expected a string"), "found: {found}");
            }
            other => panic!("Expected Shape, got: {other:?}"),
        }
    }

    #[test]
    fn create_request_reads_back_unchanged() {
        let raw = json!({
            "key": "138",
            "province": "Beijing",
            "city": "Beijing",
            "isp": "ChinaMobile"
        });
        let request = CarrierCreateReq::from_raw(&raw).expect("request");

        assert_eq!(
            request,
            CarrierCreateReq::new("138", "Beijing", "Beijing", "ChinaMobile")
        );
        assert_eq!(serde_json::to_value(&request).expect("serialize"), raw);
    }

    #[test]
    fn update_request_omits_unset_fields_on_the_wire() {
        let request = CarrierUpdateReq {
            isp: Some("China Unicom".to_owned()),
            ..CarrierUpdateReq::default()
        };
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({"isp": "China Unicom"})
        );
    }
}
