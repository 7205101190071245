//! `TextResolver`: finds temporal expressions in free English or Japanese text.
//!
//! Every pattern below is run over the whole input. Overlapping matches are
//! settled by keeping the one that starts first, then the longest one. A day
//! followed by a clock time ("tomorrow at 8pm", "7月18日10時") is merged into a
//! single expression.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;
use tracing::{debug, trace};

use crate::config::Config;
use crate::expression::{ExpressionKind, ResolveError, Resolver, TemporalExpression};
use crate::keywords::{Keyword, KeywordClass, Keywords};
use crate::parse_input::{
    DEFAULT_FORMATS, Direction, OffsetUnit, ParseOptions, date_from_parts, era_year,
    month_from_name, parse_date_token, parse_time_token, relative_weekday, shift_date,
    weekday_in_week,
};

const MONTH_NAMES: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";
const WEEKDAY_NAMES: &str = r"monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const EN_UNITS: &str = r"days?|weeks?|months?|years?";
const JA_UNITS: &str = r"日|週間|週|か月|ヶ月|ヵ月|カ月|ケ月|年";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid built-in pattern")
}

static ISO_DATETIME: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(\d{4}-\d{1,2}-\d{1,2})T(\d{1,2}:\d{2}(?::\d{2})?)\b")
});
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(?:\d{4}[-/.]\d{1,2}[-/.]\d{1,2}|\d{1,2}[-/.]\d{1,2}[-/.]\d{4}|\d{8})\b")
});
static JA_DATE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?:(令和|平成|昭和)?(\d{1,4}|元)年)?(\d{1,2})月(\d{1,2})日")
});
static JA_YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:令和|平成|昭和)?(?:\d{1,4}|元)年\d{1,2}月"));
static EN_DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTH_NAMES})\.?(?:,?\s+(\d{{4}}))?\b"
    ))
});
static EN_MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b({MONTH_NAMES})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?\b"
    ))
});
static EN_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)\b(?:{MONTH_NAMES})\.?\s+\d{{4}}\b")));
static EN_WEEKDAY_MODIFIED: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)\b(last|next|this)\s+({WEEKDAY_NAMES})\b")));
static EN_OFFSET_AGO: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(\d+|an?)\s+({EN_UNITS})\s+(ago|later|from\s+now)\b"
    ))
});
static EN_OFFSET_IN: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)\bin\s+(\d+|an?)\s+({EN_UNITS})\b")));
static JA_OFFSET: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(\d{{1,3}})\s*({JA_UNITS})(前|後)"
    ))
});
static EN_DURATION: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(?:for\s+(?:\d+|an?)\s+(?:days?|weeks?|months?|years?|hours?|minutes?)|\d+\s+(?:hours?|minutes?))\b")
});
static JA_DURATION: Lazy<Regex> = Lazy::new(|| {
    compile(r"\d+\s*(?:時|日|週|か月|ヶ月|ヵ月|カ月|ケ月|年|分)間")
});
static EN_TIME: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b\d{1,2}(?::\d{2}){0,2}\s*[ap]m\b|\b\d{1,2}:\d{2}(?::\d{2})?\b")
});
static EN_TIME_AT_HOUR: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bat\s+(\d{1,2})\b"));
static JA_TIME: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:午前|午後)?\d{1,2}時(?:\d{1,2}分|半)?"));

/// A match before overlap resolution and merging.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Date {
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    },
    Time(Option<NaiveTime>),
    Duration,
    Set,
}

#[derive(Debug, Clone)]
struct Found {
    span: Range<usize>,
    token: Token,
}

/// The bundled [`Resolver`] for English and Japanese text.
#[derive(Debug, Clone)]
pub struct TextResolver {
    reference_date: NaiveDate,
    formats: Vec<String>,
    keywords: Regex,
}

impl TextResolver {
    /// Creates a resolver anchored at `reference_date`.
    ///
    /// The keyword registry is snapshotted here, so synonyms must be
    /// registered before construction.
    pub fn new(reference_date: NaiveDate) -> Result<Self, ResolveError> {
        Ok(Self {
            reference_date,
            formats: DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect(),
            keywords: Keywords::pattern()?,
        })
    }

    /// Resolver anchored at the configured reference date (or today), with the
    /// configured numeric formats taking precedence over the built-in ones.
    pub fn from_config(config: &Config) -> Result<Self, ResolveError> {
        let reference_date = ParseOptions {
            reference_date: config.reference_date,
            formats: None,
        }
        .reference();
        let mut resolver = Self::new(reference_date)?;
        let defaults = std::mem::take(&mut resolver.formats);
        resolver.formats = config
            .input_date_formats
            .iter()
            .cloned()
            .chain(defaults)
            .collect();
        Ok(resolver)
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    fn parse_date(&self, s: &str) -> Option<NaiveDate> {
        let formats: Vec<&str> = self.formats.iter().map(AsRef::as_ref).collect();
        let opts = ParseOptions {
            reference_date: Some(self.reference_date),
            formats: Some(&formats),
        };
        parse_date_token(s, Some(opts))
    }

    fn scan(&self, text: &str) -> Vec<Found> {
        let mut found = Vec::new();

        collect(&mut found, &ISO_DATETIME, 0, text, |c| {
            let date = NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok();
            let time = parse_time_token(&c[2]);
            Token::Date {
                date,
                time: date.and(time),
            }
        });
        collect(&mut found, &NUMERIC_DATE, 0, text, |c| Token::Date {
            date: self.parse_date(&c[0]),
            time: None,
        });
        collect(&mut found, &JA_DATE, 0, text, |c| {
            let year = match (c.get(1), c.get(2)) {
                (Some(era), Some(year)) => era_year(era.as_str(), year.as_str()),
                (None, Some(year)) => year.as_str().parse().ok(),
                _ => Some(self.reference_date.year()),
            };
            let date = year.and_then(|year| {
                date_from_parts(
                    Some(year),
                    c[3].parse().ok()?,
                    c[4].parse().ok()?,
                    self.reference_date,
                )
            });
            Token::Date { date, time: None }
        });
        collect(&mut found, &JA_YEAR_MONTH, 0, text, |_| Token::Date {
            date: None,
            time: None,
        });
        collect_if(&mut found, &EN_DAY_MONTH, 0, text, |c| {
            let year = c.get(3).map(|m| m.as_str());
            (!is_modal_may(&c[2], year)).then(|| self.month_date(&c[2], &c[1], year))
        });
        collect_if(&mut found, &EN_MONTH_DAY, 0, text, |c| {
            let year = c.get(3).map(|m| m.as_str());
            (!is_modal_may(&c[1], year)).then(|| self.month_date(&c[1], &c[2], year))
        });
        collect(&mut found, &EN_MONTH_YEAR, 0, text, |_| Token::Date {
            date: None,
            time: None,
        });
        collect(&mut found, &EN_WEEKDAY_MODIFIED, 0, text, |c| {
            let weekday = c[2].parse::<Weekday>().ok();
            let date = weekday.and_then(|weekday| match c[1].to_ascii_lowercase().as_str() {
                "last" => relative_weekday(self.reference_date, weekday, Direction::Past),
                "next" => relative_weekday(self.reference_date, weekday, Direction::Future),
                _ => weekday_in_week(self.reference_date, weekday),
            });
            Token::Date { date, time: None }
        });
        collect(&mut found, &EN_OFFSET_AGO, 0, text, |c| {
            let direction = if c[3].eq_ignore_ascii_case("ago") {
                Direction::Past
            } else {
                Direction::Future
            };
            self.offset_date(&c[1], &c[2], direction)
        });
        collect(&mut found, &EN_OFFSET_IN, 0, text, |c| {
            self.offset_date(&c[1], &c[2], Direction::Future)
        });
        collect_if(&mut found, &JA_OFFSET, 0, text, |c| {
            // "2021年前半" must not read as "021年前".
            let start = c.get(0)?.start();
            if text[..start].ends_with(|ch: char| ch.is_ascii_digit()) {
                return None;
            }
            let direction = if &c[3] == "前" {
                Direction::Past
            } else {
                Direction::Future
            };
            Some(self.offset_date(&c[1], &c[2], direction))
        });
        collect(&mut found, &EN_DURATION, 0, text, |_| Token::Duration);
        collect(&mut found, &JA_DURATION, 0, text, |_| Token::Duration);
        collect(&mut found, &EN_TIME, 0, text, |c| Token::Time(parse_time_token(&c[0])));
        collect(&mut found, &EN_TIME_AT_HOUR, 1, text, |c| {
            Token::Time(parse_time_token(&c[1]))
        });
        collect(&mut found, &JA_TIME, 0, text, |c| Token::Time(parse_time_token(&c[0])));
        collect(&mut found, &self.keywords, 0, text, |c| self.keyword_token(&c[0]));

        found
    }

    fn month_date(&self, month: &str, day: &str, year: Option<&str>) -> Token {
        let date = (|| {
            let month = month_from_name(month)?;
            let day = day.parse().ok()?;
            let year = match year {
                Some(y) => Some(y.parse().ok()?),
                None => None,
            };
            date_from_parts(year, month, day, self.reference_date)
        })();
        Token::Date { date, time: None }
    }

    fn offset_date(&self, amount: &str, unit: &str, direction: Direction) -> Token {
        let amount = match amount.to_ascii_lowercase().as_str() {
            "a" | "an" => Some(1),
            n => n.parse::<u32>().ok(),
        };
        let date = amount
            .zip(OffsetUnit::from_word(unit))
            .and_then(|(amount, unit)| shift_date(self.reference_date, amount, unit, direction));
        Token::Date { date, time: None }
    }

    fn keyword_token(&self, word: &str) -> Token {
        // Registry words may contain runs of whitespace ("last   week").
        let word = word.split_whitespace().collect::<Vec<_>>().join(" ");
        match Keywords::lookup(&word).map(Keyword::class) {
            Some(KeywordClass::DayOffset(_) | KeywordClass::Weekday(_)) => Token::Date {
                date: self.parse_date(&word),
                time: None,
            },
            Some(KeywordClass::TimeOfDay(..)) => Token::Time(parse_time_token(&word)),
            Some(KeywordClass::Recurrence) => Token::Set,
            Some(KeywordClass::Period | KeywordClass::Connective) | None => Token::Date {
                date: None,
                time: None,
            },
        }
    }
}

fn collect<F>(found: &mut Vec<Found>, re: &Regex, group: usize, text: &str, mut build: F)
where
    F: FnMut(&Captures) -> Token,
{
    collect_if(found, re, group, text, |caps| Some(build(caps)));
}

/// Like [`collect`], but `build` may reject a match by returning `None`.
fn collect_if<F>(found: &mut Vec<Found>, re: &Regex, group: usize, text: &str, mut build: F)
where
    F: FnMut(&Captures) -> Option<Token>,
{
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(group) else { continue };
        if let Some(token) = build(&caps) {
            found.push(Found {
                span: m.range(),
                token,
            });
        }
    }
}

/// Lowercase `may` with no year is read as the verb ("it may 5 times"), not the month.
fn is_modal_may(month: &str, year: Option<&str>) -> bool {
    month == "may" && year.is_none()
}

/// Earliest start wins; on equal starts the longest match wins.
fn select(mut found: Vec<Found>) -> Vec<Found> {
    found.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.len().cmp(&a.span.len()))
    });
    let mut chosen: Vec<Found> = Vec::with_capacity(found.len());
    for f in found {
        if chosen.last().is_some_and(|last| f.span.start < last.span.end) {
            continue;
        }
        chosen.push(f);
    }
    chosen
}

/// Text allowed between a day and a clock time for the two to be merged.
fn is_joiner(gap: &str) -> bool {
    let gap = gap.trim();
    gap.is_empty()
        || matches!(gap, "," | "、" | "の" | "on")
        || Keywords::matches(Keyword::At, gap)
}

/// Folds `Date` + `Time` (either order) into one dated token.
fn merge(text: &str, tokens: Vec<Found>) -> Vec<Found> {
    let mut merged: Vec<Found> = Vec::with_capacity(tokens.len());
    for next in tokens {
        if let Some(prev) = merged.last_mut() {
            let gap = &text[prev.span.end..next.span.start];
            if is_joiner(gap) {
                let combined = match (&prev.token, &next.token) {
                    (Token::Date { date, time: None }, Token::Time(Some(t)))
                    | (Token::Time(Some(t)), Token::Date { date, time: None }) => {
                        Some(Token::Date {
                            date: *date,
                            time: Some(*t),
                        })
                    }
                    _ => None,
                };
                if let Some(token) = combined {
                    prev.span = prev.span.start..next.span.end;
                    prev.token = token;
                    continue;
                }
            }
        }
        merged.push(next);
    }
    merged
}

/// Maps full-width digits and separators to ASCII.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c),
            '：' => ':',
            '／' => '/',
            '－' => '-',
            _ => c,
        })
        .collect()
}

impl Resolver for TextResolver {
    fn parse(&self, text: &str) -> Result<Vec<TemporalExpression>, ResolveError> {
        let text = normalize(text);
        let tokens = merge(&text, select(self.scan(&text)));

        let expressions: Vec<TemporalExpression> = tokens
            .into_iter()
            .map(|Found { span, token }| {
                let (kind, value) = match token {
                    Token::Date { date, time } => (
                        ExpressionKind::Date,
                        date.and_then(|d| match time {
                            Some(t) => Some(d.and_time(t)),
                            None => d.and_hms_opt(0, 0, 0),
                        }),
                    ),
                    Token::Time(_) => (ExpressionKind::Time, None),
                    Token::Duration => (ExpressionKind::Duration, None),
                    Token::Set => (ExpressionKind::Set, None),
                };
                let expression = TemporalExpression::new(&text[span.clone()], span, kind, value);
                trace!(
                    text = %expression.text,
                    kind = ?expression.kind,
                    value = ?expression.to_datetime(),
                    "temporal expression"
                );
                expression
            })
            .collect();

        debug!(
            count = expressions.len(),
            reference_date = %self.reference_date,
            "recognized temporal expressions"
        );
        Ok(expressions)
    }
}
