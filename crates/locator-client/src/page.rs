//! Paginated result sets.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::hydrate::{Hydrate, HydrateMode, hydrate};
use crate::raw;

/// Page size used when a request asks for a non-positive size.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// One page of a larger result set plus the total matching count.
///
/// `total` is copied from the backend as-is. It counts every matching record
/// across all pages and is never recomputed from the list length.
///
/// # Example
///
/// ```
/// use locator_client::{CarrierData, Page};
/// use serde_json::json;
///
/// let page = Page::<CarrierData>::from_raw(&json!({
///     "total": 57,
///     "list": [{"key": "1380013"}, {"key": "1380014"}]
/// }))
/// .expect("page");
///
/// assert_eq!(page.total(), Some(57));
/// assert_eq!(page.list().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    total: Value,
    list: Vec<T>,
}

impl<T> Page<T> {
    /// Builds a page from a known count and its records.
    #[must_use]
    pub fn new(total: i64, list: Vec<T>) -> Self {
        Self {
            total: Value::from(total),
            list,
        }
    }

    /// Returns the total count when the backend sent an integer.
    #[must_use]
    pub fn total(&self) -> Option<i64> {
        self.total.as_i64()
    }

    /// Returns the total exactly as the backend sent it.
    #[must_use]
    pub const fn raw_total(&self) -> &Value {
        &self.total
    }

    /// Returns the records on this page in backend order.
    #[must_use]
    pub fn list(&self) -> &[T] {
        &self.list
    }

    /// Consumes the page, returning its records.
    #[must_use]
    pub fn into_list(self) -> Vec<T> {
        self.list
    }
}

impl<T: Hydrate> Page<T> {
    /// Reconstructs a page from a raw `{total, list}` value.
    ///
    /// A missing or `null` `list` yields an empty page. `total` is not
    /// validated: negative or non-numeric values are kept as they arrived.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Parse`] for malformed text,
    /// [`DecodeError::Shape`] when the value is not a mapping or `list` is not
    /// a flat sequence of records, and any error raised by `T`.
    pub fn from_raw(raw: &Value) -> Result<Self, DecodeError> {
        let map = raw::structured(raw, "page object")?;
        let total = map.get("total").cloned().unwrap_or(Value::Null);
        let list = hydrate::<T>(map.get("list"), HydrateMode::Record)?
            .into_records()?
            .unwrap_or_default();
        Ok(Self { total, list })
    }
}

/// Query parameters for one page of carrier records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    key: String,
    page: i64,
    size: i64,
}

impl PageRequest {
    /// Builds a request for `page` (1-based) of `size` records whose key
    /// matches `key`. An empty key lists everything.
    #[must_use]
    pub fn new(key: impl Into<String>, page: i64, size: i64) -> Self {
        Self {
            key: key.into(),
            page,
            size,
        }
    }

    /// Clamps the request the same way the backend does: pages start at 1
    /// and a non-positive size falls back to `default_size`.
    #[must_use]
    pub fn normalized(self, default_size: i64) -> Self {
        Self {
            page: self.page.max(1),
            size: if self.size < 1 { default_size } else { self.size },
            ..self
        }
    }

    /// Returns the key filter.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(&self) -> i64 {
        self.size
    }
}
