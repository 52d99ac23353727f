//! Collect the results of a single plugin run
//!
//! A `Check` lives for exactly one invocation: it remembers the worst status
//! seen so far, every message the plugin wants to report and all the
//! performance data, and renders them in the format the supervisor expects.

use std::fmt;

use derive_more::Display;
use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::perf::PerfData;
use crate::range::{ParseRangeError, Range};
use crate::Status;

/// Order messages are reported in
static REPORT_ORDER: [Status; 4] = [
    Status::Critical,
    Status::Warning,
    Status::Unknown,
    Status::Ok,
];

/// One of the threshold arguments couldn't be parsed
///
/// The warning text is checked first, so if both are bad this is `Warning`.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum ThresholdError {
    #[display(fmt = "invalid warning threshold: {}", _0)]
    Warning(ParseRangeError),
    #[display(fmt = "invalid critical threshold: {}", _0)]
    Critical(ParseRangeError),
}

impl ThresholdError {
    /// The status a sample with unparseable thresholds gets
    pub fn status(&self) -> Status {
        Status::Unknown
    }

    /// The parse failure, whichever threshold it came from
    pub fn range_error(&self) -> &ParseRangeError {
        match self {
            ThresholdError::Warning(e) | ThresholdError::Critical(e) => e,
        }
    }
}

impl std::error::Error for ThresholdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.range_error())
    }
}

/// A reported result: a one-line summary and optional detail
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    short: String,
    long: String,
}

impl Message {
    pub fn short(&self) -> &str {
        &self.short
    }

    /// Empty if there is no detail
    pub fn long(&self) -> &str {
        &self.long
    }
}

/// The accumulated state of a plugin run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    /// First word of the output
    name: String,
    status: Status,
    critical: Vec<Message>,
    warning: Vec<Message>,
    unknown: Vec<Message>,
    ok: Vec<Message>,
    perf: Vec<String>,
}

impl Check {
    /// A check with no results yet, its status is `Unknown`
    pub fn new<S: Into<String>>(name: S) -> Check {
        Check {
            name: name.into(),
            status: Status::Unknown,
            critical: Vec::new(),
            warning: Vec::new(),
            unknown: Vec::new(),
            ok: Vec::new(),
            perf: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The worst status recorded so far
    pub fn status(&self) -> Status {
        self.status
    }

    /// Record a status from outside of `alarm_level`
    ///
    /// Follows the same rules as classification: the first concrete status
    /// replaces `Unknown`, after that the status can only get worse, and
    /// passing `Unknown` does nothing.
    pub fn escalate(&mut self, status: Status) {
        let next = self.status.escalate(status);
        if next != self.status {
            trace!(check = %self.name, from = %self.status, to = %next, "status escalated");
            self.status = next;
        }
    }

    /// Classify `value` against the warning and critical range texts
    ///
    /// Critical wins over warning. The result is also folded into the status
    /// of the check. If either range doesn't parse nothing is recorded and
    /// the error is returned, its `status()` is `Unknown`.
    pub fn alarm_level(
        &mut self,
        value: i64,
        warn: &str,
        crit: &str,
    ) -> Result<Status, ThresholdError> {
        let (warn_range, crit_range) = match parse_thresholds(warn, crit) {
            Ok(ranges) => ranges,
            Err(e) => {
                warn!(check = %self.name, error = %e, "rejected threshold");
                return Err(e);
            }
        };
        let status = self.evaluate(value, &warn_range, &crit_range);
        debug!(check = %self.name, value, warn = warn, crit = crit, %status, "classified sample");
        Ok(status)
    }

    /// Like `alarm_level`, for ranges that have already been parsed
    pub fn evaluate(&mut self, value: i64, warn: &Range, crit: &Range) -> Status {
        let status = if crit.alarms(value) {
            Status::Critical
        } else if warn.alarms(value) {
            Status::Warning
        } else {
            Status::Ok
        };
        self.escalate(status);
        status
    }

    /// Add a message to the output
    ///
    /// This does not change the status of the check.
    pub fn add_msg<S, L>(&mut self, status: Status, short: S, long: L)
    where
        S: Into<String>,
        L: Into<String>,
    {
        self.bucket_mut(status).push(Message {
            short: short.into(),
            long: long.into(),
        });
    }

    /// `add_msg` for numeric alarm levels, anything but 0, 1 or 2 is unknown
    pub fn add_msg_code<S, L>(&mut self, level: i32, short: S, long: L)
    where
        S: Into<String>,
        L: Into<String>,
    {
        self.add_msg(Status::from_code(level), short, long)
    }

    /// Add performance data
    ///
    /// e.g. `add_perf_data("cpu usage", "20", "%", "80", "90", "0", "100")`
    #[allow(clippy::too_many_arguments)]
    pub fn add_perf_data(
        &mut self,
        label: &str,
        value: &str,
        unit: &str,
        warn: &str,
        crit: &str,
        min: &str,
        max: &str,
    ) {
        self.push_perf_data(&PerfData {
            label: label.to_owned(),
            value: value.to_owned(),
            unit: unit.to_owned(),
            warn: warn.to_owned(),
            crit: crit.to_owned(),
            min: min.to_owned(),
            max: max.to_owned(),
        })
    }

    pub fn push_perf_data(&mut self, datum: &PerfData) {
        self.perf.push(datum.to_string());
    }

    /// Messages recorded with `status`, in insertion order
    pub fn messages(&self, status: Status) -> &[Message] {
        match status {
            Status::Critical => &self.critical,
            Status::Warning => &self.warning,
            Status::Unknown => &self.unknown,
            Status::Ok => &self.ok,
        }
    }

    /// Formatted performance data fragments
    pub fn perf_data(&self) -> &[String] {
        &self.perf
    }

    /// The full plugin output
    ///
    /// ```text
    /// <name>: <STATUS> - <short>; <short>... |<perf> <perf>...
    ///
    /// <long>
    /// <long>
    /// ```
    ///
    /// The long lines (and the blank line before them) are only there if any
    /// message has a long text.
    pub fn output(&self) -> String {
        let all = move || {
            REPORT_ORDER
                .iter()
                .flat_map(move |&status| self.messages(status).iter().map(move |m| (status, m)))
        };

        let short = all()
            .map(|(status, m)| tagged(&m.short, status.tag()))
            .join("; ");
        let long = all()
            .filter(|(_, m)| !m.long.is_empty())
            .map(|(status, m)| tagged(&m.long, status.long_tag()))
            .join("\n");
        let perf = if self.perf.is_empty() {
            String::new()
        } else {
            format!("|{}", self.perf.iter().join(" "))
        };

        let mut out = format!("{}: {} - {} {}\n", self.name, self.status, short, perf);
        if !long.is_empty() {
            out.push('\n');
            out.push_str(&long);
        }
        out
    }

    fn bucket_mut(&mut self, status: Status) -> &mut Vec<Message> {
        match status {
            Status::Critical => &mut self.critical,
            Status::Warning => &mut self.warning,
            Status::Unknown => &mut self.unknown,
            Status::Ok => &mut self.ok,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.output())
    }
}

fn parse_thresholds(warn: &str, crit: &str) -> Result<(Range, Range), ThresholdError> {
    let warn = Range::parse(warn).map_err(ThresholdError::Warning)?;
    let crit = Range::parse(crit).map_err(ThresholdError::Critical)?;
    Ok((warn, crit))
}

fn tagged(text: &str, tag: &str) -> String {
    if tag.is_empty() {
        text.to_owned()
    } else {
        format!("{}({})", text, tag)
    }
}
