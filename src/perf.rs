//! Performance data fragments
//!
//! Each fragment is `label=valueunit;warn;crit;min;max`. Empty fields stay in
//! place as empty segments, the supervisor counts semicolons.

use std::fmt;

/// One performance datum, pre-formatting
///
/// Every field is free text, nothing is validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerfData {
    pub label: String,
    pub value: String,
    /// One of `us`, `ms`, `s`, `%`, `B`, `KB`, `MB`, `GB`, `TB`, `c` or empty
    pub unit: String,
    pub warn: String,
    pub crit: String,
    pub min: String,
    pub max: String,
}

impl PerfData {
    pub fn new<L: Into<String>, V: ToString>(label: L, value: V) -> PerfData {
        PerfData {
            label: label.into(),
            value: value.to_string(),
            ..PerfData::default()
        }
    }

    pub fn unit<S: Into<String>>(mut self, unit: S) -> PerfData {
        self.unit = unit.into();
        self
    }

    /// Warning and critical thresholds, usually the same text given to
    /// `Check::alarm_level`
    pub fn thresholds<W: ToString, C: ToString>(mut self, warn: W, crit: C) -> PerfData {
        self.warn = warn.to_string();
        self.crit = crit.to_string();
        self
    }

    pub fn bounds<N: ToString, X: ToString>(mut self, min: N, max: X) -> PerfData {
        self.min = min.to_string();
        self.max = max.to_string();
        self
    }
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}={}{};{};{};{};{}",
            self.label, self.value, self.unit, self.warn, self.crit, self.min, self.max
        )
    }
}
