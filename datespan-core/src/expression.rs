//! The resolver seam: temporal expressions and the trait that produces them.

use chrono::NaiveDateTime;
use std::ops::Range;
use thiserror::Error;

/// What a recognized span of text refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    /// A calendar day, possibly with a time of day.
    Date,
    /// A time of day with no day attached.
    Time,
    /// A length of time ("for 3 days", "3日間").
    Duration,
    /// A recurrence ("every day", "毎週").
    Set,
}

/// A span of text that denotes a time reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalExpression {
    pub text: String,
    /// Byte range of `text` in the (digit-normalized) input.
    pub span: Range<usize>,
    pub kind: ExpressionKind,
    value: Option<NaiveDateTime>,
}

impl TemporalExpression {
    pub fn new(
        text: impl Into<String>,
        span: Range<usize>,
        kind: ExpressionKind,
        value: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            text: text.into(),
            span,
            kind,
            value,
        }
    }

    /// The concrete point in time this expression denotes, or `None` when it
    /// cannot be anchored (vague periods, bare clock times, durations...).
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        self.value
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid recognition pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("{0}")]
    Other(String),
}

/// Anything that can turn free text into temporal expressions.
pub trait Resolver {
    /// Returns the expressions found in `text`, in text order.
    fn parse(&self, text: &str) -> Result<Vec<TemporalExpression>, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn parse(&self, text: &str) -> Result<Vec<TemporalExpression>, ResolveError> {
        (**self).parse(text)
    }
}
