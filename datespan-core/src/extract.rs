//! The date range extractor and the record it produces.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::expression::{ResolveError, Resolver, TemporalExpression};
use crate::render::format_datetime;
use crate::resolver::TextResolver;

/// Reported when no expression in the text resolves. The spelling is part of the output format.
pub const NO_DATE_INFO: &str = "errror: no date info.";
/// Reported when the CLI does not receive exactly one argument.
pub const BAD_ARGUMENT_LENGTH: &str = "error: the argument length is not correct.";

/// Outcome of one extraction: either a `start`/`end` pair or an `error`, never both.
///
/// Serializes with the keys in the order `start`, `end`, `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: String,
    end: String,
    error: String,
}

impl DateRange {
    /// A range from `earliest` to `latest`.
    pub fn between(earliest: NaiveDateTime, latest: NaiveDateTime) -> Self {
        debug_assert!(earliest <= latest);
        Self {
            start: format_datetime(earliest),
            end: format_datetime(latest),
            error: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Self::default()
        }
    }

    pub fn bad_argument_length() -> Self {
        Self::failure(BAD_ARGUMENT_LENGTH)
    }

    pub fn no_date_info() -> Self {
        Self::failure(NO_DATE_INFO)
    }

    pub fn resolver_failure(err: &ResolveError) -> Self {
        Self::failure(format!("error: failed to resolve dates: {err}"))
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Extracts the earliest and latest dates in `text` with the default resolver,
/// anchored at today's date.
pub fn extract(text: &str) -> DateRange {
    match TextResolver::from_config(&Config::default()) {
        Ok(resolver) => extract_with(&resolver, text),
        Err(err) => {
            warn!(error = %err, "could not build the resolver");
            DateRange::resolver_failure(&err)
        }
    }
}

/// Extracts the earliest and latest dates in `text` using `resolver`.
///
/// Expressions that do not resolve to a concrete date/time are skipped.
pub fn extract_with<R: Resolver + ?Sized>(resolver: &R, text: &str) -> DateRange {
    let expressions = match resolver.parse(text) {
        Ok(expressions) => expressions,
        Err(err) => {
            warn!(error = %err, "resolver failed");
            return DateRange::resolver_failure(&err);
        }
    };

    let candidates: Vec<NaiveDateTime> = expressions
        .iter()
        .filter_map(TemporalExpression::to_datetime)
        .collect();
    debug!(
        expressions = expressions.len(),
        candidates = candidates.len(),
        "collected date candidates"
    );

    match bounds(&candidates) {
        Some((earliest, latest)) => DateRange::between(earliest, latest),
        None => DateRange::no_date_info(),
    }
}

fn bounds(candidates: &[NaiveDateTime]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let earliest = candidates.iter().min()?;
    let latest = candidates.iter().max()?;
    Some((*earliest, *latest))
}
