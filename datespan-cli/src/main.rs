mod cli;
mod logging;

use anyhow::{Context, Result};
use cli::Cli;
use datespan_core::{Config, DateRange, TextResolver, extract_with, render::to_json};
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

/// Always exits successfully; failures travel in the `error` field of the payload.
fn main() -> ExitCode {
    logging::init();

    let range = run(std::env::args_os(), Config::load);
    if let Err(e) = write_output(&mut io::stdout().lock(), &range) {
        let error = format!("{e:#}");
        tracing::error!(%error, "could not write the result");
    }
    ExitCode::SUCCESS
}

/// Validates the command line and extracts the date range of its single argument.
///
/// `config` is only consulted once the arguments are known to be valid.
fn run<I, T>(args: I, config: impl FnOnce() -> Config) -> DateRange
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Some(text) = Cli::text_from(args) else {
        tracing::debug!("wrong number of arguments");
        return DateRange::bad_argument_length();
    };

    match TextResolver::from_config(&config()) {
        Ok(resolver) => extract_with(&resolver, &text),
        Err(err) => DateRange::resolver_failure(&err),
    }
}

/// Writes the pretty JSON payload once, without a trailing newline.
fn write_output<W: Write>(out: &mut W, range: &DateRange) -> Result<()> {
    let json = to_json(range).context("serializing the result")?;
    out.write_all(json.as_bytes())
        .context("writing the result")?;
    out.flush().context("flushing the result")?;
    Ok(())
}
