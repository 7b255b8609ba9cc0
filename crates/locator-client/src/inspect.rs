//! Support for the `envelope-inspect` binary.
//!
//! The binary reads one raw envelope, decodes it with a chosen data shape
//! over [`CarrierData`], and prints the typed result. The logic lives here so
//! it can be exercised without spawning a process.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use crate::envelope::{
    DataShape, ListOf, MapOf, NoData, Opaque, Paged, RawBytes, Single, decode_envelope_text,
};
use crate::error::DecodeError;
use crate::records::CarrierData;

/// Data shape to decode the envelope's payload as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// Ignore the payload.
    NoData,
    /// One carrier record.
    Single,
    /// A list of carrier records.
    List,
    /// Carrier records indexed by key.
    Map,
    /// A `{total, list}` page of carrier records.
    Paged,
    /// A binary payload.
    RawBytes,
    /// Any value, untouched.
    Opaque,
}

/// Command-line arguments for `envelope-inspect`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "envelope-inspect",
    about = "Decode a raw locator envelope and print the typed result"
)]
pub struct InspectArgs {
    /// Shape of the envelope's `data` member.
    #[arg(long, value_enum, default_value_t = ShapeArg::Opaque)]
    pub shape: ShapeArg,
    /// File holding the raw envelope; reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// Errors surfaced by the inspection flow.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The raw envelope could not be read.
    #[error("failed to read envelope from {source_name}: {source}")]
    Read {
        /// File path or `stdin`.
        source_name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The envelope could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The decoded envelope could not be rendered.
    #[error("failed to render decoded envelope: {0}")]
    Render(#[from] serde_json::Error),
    /// The rendered envelope could not be written out.
    #[error("failed to write rendered envelope: {0}")]
    Write(#[source] io::Error),
}

/// Reads the raw envelope from `path`, or from stdin when `path` is `None`.
///
/// # Errors
///
/// Returns [`InspectError::Read`] when the input cannot be read.
pub fn read_input(path: Option<&Path>) -> Result<String, InspectError> {
    match path {
        Some(file) => fs::read_to_string(file).map_err(|source| InspectError::Read {
            source_name: file.display().to_string(),
            source,
        }),
        None => {
            let mut raw = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut raw)
                .map_err(|source| InspectError::Read {
                    source_name: "stdin".to_owned(),
                    source,
                })?;
            Ok(raw)
        }
    }
}

/// Decodes `raw` with `shape` and renders the typed envelope as pretty JSON.
///
/// # Errors
///
/// Returns [`InspectError::Decode`] for structural failures. Domain failures
/// (non-success codes) are rendered like any other envelope.
///
/// # Example
///
/// ```
/// use locator_client::inspect::{ShapeArg, render};
///
/// let rendered = render(ShapeArg::Single, r#"{"code": 1, "message": "not found"}"#)
///     .expect("renders");
/// assert!(rendered.contains("\"not found\""));
/// ```
pub fn render(shape: ShapeArg, raw: &str) -> Result<String, InspectError> {
    match shape {
        ShapeArg::NoData => render_as::<NoData>(raw),
        ShapeArg::Single => render_as::<Single<CarrierData>>(raw),
        ShapeArg::List => render_as::<ListOf<CarrierData>>(raw),
        ShapeArg::Map => render_as::<MapOf<CarrierData>>(raw),
        ShapeArg::Paged => render_as::<Paged<CarrierData>>(raw),
        ShapeArg::RawBytes => render_as::<RawBytes>(raw),
        ShapeArg::Opaque => render_as::<Opaque>(raw),
    }
}

/// Writes `rendered` followed by a newline to `out`.
///
/// # Errors
///
/// Returns [`InspectError::Write`] when the output cannot be written, for
/// example when stdout is a closed pipe.
pub fn write_rendered(mut out: impl Write, rendered: &str) -> Result<(), InspectError> {
    writeln!(out, "{rendered}").map_err(InspectError::Write)
}

fn render_as<S>(raw: &str) -> Result<String, InspectError>
where
    S: DataShape,
    S::Output: Serialize,
{
    let envelope = decode_envelope_text::<S>(raw)?;
    Ok(serde_json::to_string_pretty(&envelope)?)
}
