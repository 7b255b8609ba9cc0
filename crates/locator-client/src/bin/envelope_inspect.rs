//! Envelope inspector for raw locator backend responses.
//!
//! Reads one envelope from a file or stdin, decodes it with the requested
//! data shape, and prints the typed result as JSON. Decoding is delegated to
//! `locator_client::inspect` so the behaviour stays testable without spawning
//! a process.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use locator_client::inspect::{InspectArgs, InspectError, read_input, render, write_rendered};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run(&InspectArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &InspectArgs) -> Result<(), InspectError> {
    let raw = read_input(args.input.as_deref())?;
    let rendered = render(args.shape, &raw)?;
    write_rendered(io::stdout().lock(), &rendered)
}
