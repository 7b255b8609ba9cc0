//! Recursive model hydration.
//!
//! [`hydrate`] turns one raw value into a [`Hydrated`] tree without the caller
//! knowing up front whether the value is a single record, a sequence, or a
//! keyed collection. Call sites then narrow the tree to the arity they
//! declared with [`Hydrated::into_record`], [`Hydrated::into_records`] or
//! [`Hydrated::into_keyed`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;
use crate::raw::{self, kind_of};

/// A flat record that can be reconstructed from an untyped mapping.
///
/// Records derive `Deserialize` with `Option` fields, so missing and `null`
/// fields become `None` and unknown fields are ignored. A raw JSON string is
/// parsed before fields are read.
pub trait Hydrate: DeserializeOwned {
    /// Names the record in shape errors.
    const RECORD: &'static str;

    /// Reconstructs one record from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Parse`] when a textual value is not valid JSON
    /// and [`DecodeError::Shape`] when the value is not a mapping or a field
    /// holds a value of the wrong kind.
    fn from_raw(raw: &Value) -> Result<Self, DecodeError> {
        raw::record(raw, Self::RECORD)
    }

    /// Reconstructs one record from its serialized form.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Parse`] for malformed text; otherwise as
    /// [`Hydrate::from_raw`].
    fn from_text(text: &str) -> Result<Self, DecodeError> {
        Self::from_raw(&raw::parse_text(text)?)
    }
}

/// How keyed collections should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HydrateMode {
    /// A mapping is one record.
    #[default]
    Record,
    /// A mapping is a collection of records indexed by key.
    Map,
}

/// The result of hydrating one raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydrated<T> {
    /// The raw value was absent or `null`; nothing was constructed.
    Absent,
    /// A single record.
    Record(T),
    /// An ordered sequence, each element hydrated independently.
    Sequence(Vec<Hydrated<T>>),
    /// Records indexed by their original keys.
    Keyed(BTreeMap<String, T>),
    /// A scalar passed through untouched.
    Scalar(Value),
}

/// Hydrates `raw` into `T`, dispatching on `mode` and the value's own shape.
///
/// Sequence elements are always hydrated in [`HydrateMode::Record`] mode, so
/// nested arrays recurse while nested mappings become records.
///
/// # Errors
///
/// Propagates the first [`DecodeError`] raised by [`Hydrate::from_raw`].
///
/// # Example
///
/// ```
/// use locator_client::{CarrierData, HydrateMode, hydrate};
/// use serde_json::json;
///
/// let raw = json!([{"key": "1380013"}, {"key": "1390013"}]);
/// let records = hydrate::<CarrierData>(Some(&raw), HydrateMode::Record)
///     .and_then(|tree| tree.into_records())
///     .expect("sequence of records")
///     .expect("present");
/// assert_eq!(records[1].key(), Some("1390013"));
/// ```
pub fn hydrate<T: Hydrate>(
    raw: Option<&Value>,
    mode: HydrateMode,
) -> Result<Hydrated<T>, DecodeError> {
    match raw {
        None | Some(Value::Null) => Ok(Hydrated::Absent),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| hydrate::<T>(Some(item), HydrateMode::Record))
            .collect::<Result<Vec<_>, _>>()
            .map(Hydrated::Sequence),
        Some(Value::Object(map)) if mode == HydrateMode::Map => map
            .iter()
            .map(|(key, value)| T::from_raw(value).map(|record| (key.clone(), record)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Hydrated::Keyed),
        Some(record @ Value::Object(_)) => T::from_raw(record).map(Hydrated::Record),
        Some(scalar) => Ok(Hydrated::Scalar(scalar.clone())),
    }
}

impl<T> Hydrated<T> {
    /// Returns `true` when nothing was constructed.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Narrows the tree to at most one record.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Shape`] for sequences, keyed maps and scalars.
    pub fn into_record(self) -> Result<Option<T>, DecodeError> {
        match self {
            Self::Absent => Ok(None),
            Self::Record(record) => Ok(Some(record)),
            other => Err(DecodeError::shape("record", other.kind())),
        }
    }

    /// Narrows the tree to a flat, ordered list of records.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Shape`] when the tree is not a sequence or an
    /// element is not a record.
    pub fn into_records(self) -> Result<Option<Vec<T>>, DecodeError> {
        match self {
            Self::Absent => Ok(None),
            Self::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Self::Record(record) => Ok(record),
                    other => Err(DecodeError::shape(
                        format!("record at index {index}"),
                        other.kind(),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            other => Err(DecodeError::shape("sequence", other.kind())),
        }
    }

    /// Narrows the tree to records indexed by key.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Shape`] unless the tree is keyed or absent.
    pub fn into_keyed(self) -> Result<Option<BTreeMap<String, T>>, DecodeError> {
        match self {
            Self::Absent => Ok(None),
            Self::Keyed(records) => Ok(Some(records)),
            other => Err(DecodeError::shape("keyed map", other.kind())),
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent value",
            Self::Record(_) => "record",
            Self::Sequence(_) => "sequence",
            Self::Keyed(_) => "keyed map",
            Self::Scalar(value) => kind_of(value),
        }
    }
}
