//! Icinga helper: threshold ranges and result aggregation for monitoring
//! plugins
//!
//! The goal is to make the boring half of a Nagios/Icinga/Sensu check easy to
//! get right: deciding what status a sample deserves given the `-w`/`-c`
//! range arguments an operator typed, and building the single line of output
//! (plus optional long output and performance data) that the supervisor
//! parses.
//!
//! Expected use: build a [`Check`](check/struct.Check.html) at the start of
//! the run, feed it samples and messages, print its output and exit with its
//! status:
//!
//! ```rust
//! use icinga_helper::{Check, Status};
//!
//! let mut check = Check::new("CPU");
//! let status = check.alarm_level(93, "80", "90").unwrap();
//! check.add_msg(status, "cpu at 93%", "");
//! check.add_perf_data("cpu usage", "93", "%", "80", "90", "0", "100");
//!
//! assert_eq!(check.status(), Status::Critical);
//! assert_eq!(
//!     check.output(),
//!     "CPU: CRITICAL - cpu at 93%(c) |cpu usage=93%;80;90;0;100\n"
//! );
//! // in a real plugin:
//! // print!("{}", check);
//! // check.status().exit();
//! ```
//!
//! Threshold ranges use the usual plugin syntax, see the [`range`](range/index.html)
//! module for the details.

use std::fmt;
use std::process;
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

pub mod check;
pub mod perf;
pub mod range;
pub mod scripts;

pub use crate::check::{Check, Message, ThresholdError};
pub use crate::perf::PerfData;
pub use crate::range::{ParseRangeError, Range};

/// Version of this library, as reported by `--version` of the plugins built on it
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// All possible exit statuses for a check
///
/// The numeric values are the plugin exit codes. `Unknown` sorts highest but
/// means "not determined yet" rather than "worst", see
/// [`escalate`](#method.escalate).
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Status {
    #![cfg_attr(test, allow(dead_code))]
    /// Exit the process with the exit code for this status
    pub fn exit(self) -> ! {
        process::exit(self.code())
    }

    /// The plugin exit code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Interpret a numeric alarm level, anything unexpected is `Unknown`
    pub fn from_code(code: i32) -> Status {
        match code {
            0 => Status::Ok,
            1 => Status::Warning,
            2 => Status::Critical,
            _ => Status::Unknown,
        }
    }

    /// Combine the current aggregate status with a newly observed one
    ///
    /// `Unknown` is the unset state: any concrete status replaces it, and an
    /// incoming `Unknown` never replaces anything. Otherwise the status only
    /// ever gets worse.
    pub fn escalate(self, incoming: Status) -> Status {
        match (self, incoming) {
            (current, Status::Unknown) => current,
            (Status::Unknown, incoming) => incoming,
            (current, incoming) => current.max(incoming),
        }
    }

    /// Suffix letter for short messages, empty for `Ok`
    pub fn tag(self) -> &'static str {
        match self {
            Status::Ok => "",
            Status::Warning => "w",
            Status::Critical => "c",
            Status::Unknown => "u",
        }
    }

    /// Suffix for long messages
    pub fn long_tag(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            other => other.tag(),
        }
    }

    /// The status names accepted on the command line, e.g. for clap's
    /// `possible_values`
    pub fn str_values() -> &'static [&'static str] {
        &["ok", "warning", "critical", "unknown"]
    }
}

impl Default for Status {
    fn default() -> Status {
        Status::Unknown
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let word = match *self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{}", word)
    }
}

/// A string that is not one of the status names
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "unexpected status '{}', expected one of: ok, warning, critical, unknown", _0)]
pub struct ParseStatusError(String);

impl std::error::Error for ParseStatusError {}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Status, ParseStatusError> {
        match s.to_ascii_lowercase().as_str() {
            "ok" => Ok(Status::Ok),
            "warning" | "warn" => Ok(Status::Warning),
            "critical" | "crit" => Ok(Status::Critical),
            "unknown" => Ok(Status::Unknown),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Status::{self, *};

    #[test]
    fn codes_are_plugin_exit_codes() {
        assert_eq!(Ok.code(), 0);
        assert_eq!(Warning.code(), 1);
        assert_eq!(Critical.code(), 2);
        assert_eq!(Unknown.code(), 3);
        assert!(Ok < Warning && Warning < Critical && Critical < Unknown);
    }

    #[test]
    fn from_code_treats_everything_else_as_unknown() {
        assert_eq!(Status::from_code(0), Ok);
        assert_eq!(Status::from_code(1), Warning);
        assert_eq!(Status::from_code(2), Critical);
        assert_eq!(Status::from_code(3), Unknown);
        assert_eq!(Status::from_code(-1), Unknown);
        assert_eq!(Status::from_code(42), Unknown);
    }

    #[test]
    fn escalate_leaves_unknown_and_never_goes_back() {
        assert_eq!(Unknown.escalate(Ok), Ok);
        assert_eq!(Unknown.escalate(Critical), Critical);
        assert_eq!(Unknown.escalate(Unknown), Unknown);

        assert_eq!(Ok.escalate(Warning), Warning);
        assert_eq!(Warning.escalate(Ok), Warning);
        assert_eq!(Critical.escalate(Warning), Critical);
        assert_eq!(Ok.escalate(Unknown), Ok);
        assert_eq!(Critical.escalate(Unknown), Critical);
    }

    #[test]
    fn tags() {
        let tags: Vec<_> = [Critical, Warning, Unknown, Ok]
            .iter()
            .map(|s| (s.tag(), s.long_tag()))
            .collect();
        assert_eq!(tags, vec![("c", "c"), ("w", "w"), ("u", "u"), ("", "ok")]);
    }

    #[test]
    fn display_is_the_report_word() {
        assert_eq!(format!("{} {} {} {}", Ok, Warning, Critical, Unknown),
                   "OK WARNING CRITICAL UNKNOWN");
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("ok".parse::<Status>(), std::result::Result::Ok(Ok));
        assert_eq!("WARN".parse::<Status>(), std::result::Result::Ok(Warning));
        assert_eq!("Critical".parse::<Status>(), std::result::Result::Ok(Critical));
        assert_eq!("unknown".parse::<Status>(), std::result::Result::Ok(Unknown));
        for name in Status::str_values().iter() {
            assert!(name.parse::<Status>().is_ok());
        }
        let err = "bad".parse::<Status>().unwrap_err();
        assert!(err.to_string().contains("'bad'"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Critical).unwrap(), "\"critical\"");
        let status: Status = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(status, Warning);
        assert!(serde_json::from_str::<Status>("\"warn\"").is_err());
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(Status::default(), Unknown);
    }
}
