//! Typed envelope decoding and model hydration for the mobile locator RPC
//! boundary.
//!
//! Every backend operation answers with a uniform `{code, message, data}`
//! envelope whose `data` member is untyped. This crate turns those raw values
//! into typed results that callers can branch on without inspecting the
//! payload.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Decoding envelopes with a declared data shape ([`NoData`], [`Single`],
//!   [`ListOf`], [`MapOf`], [`Paged`], [`RawBytes`] or [`Opaque`])
//! - Recursive hydration of flat records from single values, sequences and
//!   keyed collections
//! - Separating transport, structural and domain failures
//! - A typed client over the carrier operations, driven through a
//!   [`Transport`] port
//!
//! # Example
//!
//! ```
//! use locator_client::{CarrierData, Single, decode_envelope};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "code": 0,
//!     "message": "ok",
//!     "data": {"key": "1380013", "province": "Beijing", "isp": "China Mobile"}
//! });
//!
//! let envelope = decode_envelope::<Single<CarrierData>>(&raw).expect("well-formed envelope");
//! let carrier = envelope.into_result().expect("success").expect("present");
//! assert_eq!(carrier.province(), Some("Beijing"));
//! ```

mod client;
mod config;
mod envelope;
mod error;
mod hydrate;
pub mod inspect;
mod page;
mod raw;
mod records;
mod transport;

pub use client::CarrierClient;
pub use config::ClientSettings;
pub use envelope::{
    DataShape, Envelope, FAILURE_CODE, ListOf, MapOf, NoData, Opaque, Paged, RawBytes,
    SUCCESS_CODE, SUCCESS_MESSAGE, Single, decode_envelope, decode_envelope_text,
    decode_envelope_with,
};
pub use error::{ClientError, DecodeError, DomainError};
pub use hydrate::{Hydrate, HydrateMode, Hydrated, hydrate};
pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest};
pub use records::{CarrierCreateReq, CarrierData, CarrierUpdateReq};
pub use transport::{Transport, TransportError, operation};
