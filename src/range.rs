//! Threshold ranges in the standard plugin syntax
//!
//! A range looks like `[@][start:][end]`:
//!
//! - `10` alarms if the value is `> 10` (there is no implicit lower bound of 0)
//! - `10:` alarms if the value is `< 10`
//! - `:10` and `10` are the same range
//! - `5:10` alarms if the value is `< 5` or `> 10`
//! - `@5:10` alarms if the value is `> 5` and `< 10`
//!
//! Either side may be left empty to mean "unbounded". Without `@` the range is
//! the *safe* zone and includes its end points, with `@` it is the *danger*
//! zone and excludes them, so a value sitting exactly on a bound never alarms.

use std::convert::TryFrom;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A parsed threshold range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Range {
    inside: bool,
    start: Option<i64>,
    end: Option<i64>,
}

/// The text didn't match `[@][start:][end]`
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "not a valid threshold range: '{}'", input)]
pub struct ParseRangeError {
    input: String,
}

impl ParseRangeError {
    /// The rejected text
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::error::Error for ParseRangeError {}

impl Range {
    /// A range that alarms when the value is outside `start..=end`
    pub fn outside(start: Option<i64>, end: Option<i64>) -> Range {
        Range {
            inside: false,
            start,
            end,
        }
    }

    /// A range that alarms when the value is strictly between `start` and `end`
    pub fn inside(start: Option<i64>, end: Option<i64>) -> Range {
        Range {
            inside: true,
            start,
            end,
        }
    }

    pub fn parse(text: &str) -> Result<Range, ParseRangeError> {
        let err = || ParseRangeError {
            input: text.to_owned(),
        };
        let (inside, rest) = match text.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        // Neither bound may contain ':', so the first one is the separator
        let (start, end) = match rest.find(':') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => ("", rest),
        };

        Ok(Range {
            inside,
            start: parse_bound(start).ok_or_else(err)?,
            end: parse_bound(end).ok_or_else(err)?,
        })
    }

    /// Whether `value` should raise an alarm for this range
    pub fn alarms(&self, value: i64) -> bool {
        let above_start = self.start.map_or(true, |start| value > start);
        let below_end = self.end.map_or(true, |end| value < end);
        if self.inside {
            above_start && below_end
        } else {
            let below_start = self.start.map_or(false, |start| value < start);
            let above_end = self.end.map_or(false, |end| value > end);
            below_start || above_end
        }
    }

    /// True for `@` ranges
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Lower bound, `None` is negative infinity
    pub fn start(&self) -> Option<i64> {
        self.start
    }

    /// Upper bound, `None` is positive infinity
    pub fn end(&self) -> Option<i64> {
        self.end
    }
}

/// Parse one side of a range: `-?[0-9]*`
///
/// The outer `Option` is the parse result, the inner one is `None` for an
/// unbounded (empty) side.
fn parse_bound(text: &str) -> Option<Option<i64>> {
    if text.is_empty() {
        return Some(None);
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.is_empty() {
        // a lone '-' is accepted and counts as zero
        return Some(Some(0));
    }
    match text.parse::<i64>() {
        Ok(n) => Some(Some(n)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(Some(i64::MAX)),
            IntErrorKind::NegOverflow => Some(Some(i64::MIN)),
            _ => None,
        },
    }
}

impl FromStr for Range {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Range, ParseRangeError> {
        Range::parse(s)
    }
}

impl TryFrom<String> for Range {
    type Error = ParseRangeError;

    fn try_from(s: String) -> Result<Range, ParseRangeError> {
        Range::parse(&s)
    }
}

impl From<Range> for String {
    fn from(range: Range) -> String {
        range.to_string()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.inside {
            write!(f, "@")?;
        }
        if let Some(start) = self.start {
            write!(f, "{}:", start)?;
        } else if self.end.is_none() {
            write!(f, ":")?;
        }
        if let Some(end) = self.end {
            write!(f, "{}", end)?;
        }
        Ok(())
    }
}
