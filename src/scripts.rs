//! Documentation about the plugins contained herein
//!
//! - [check-threshold](#check-threshold)
//!
//! # check-threshold
//!
//! Cross platform, the value to check comes from the command line.
//!
//! ```plain
//! $ check-threshold --help
//! check-threshold (part of icinga-helper) 0.1.0
//! Check a value against threshold ranges.
//!
//! Ranges look like `[@][start:][end]`. Without `@` the check alarms when the value is outside start..end (inclusive),
//! with `@` it alarms when the value is strictly inside. Either side may be empty to leave it unbounded, so `10` alarms
//! above 10 and `10:` alarms below 10.
//!
//! USAGE:
//!     check-threshold [OPTIONS] <value>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! OPTIONS:
//!     -c, --crit <crit>                              Range to go critical outside of
//!         --invalid-threshold <invalid-threshold>
//!             Status to report if --warn or --crit can't be parsed [default: unknown]  [possible values: ok, warning,
//!             critical, unknown]
//!     -l, --label <label>                            Performance data label [default: value]
//!         --max <max>                                Largest possible value, for performance data
//!         --min <min>                                Smallest possible value, for performance data
//!     -n, --name <name>                              First word of the output [default: THRESHOLD]
//!     -u, --unit <unit>                              Unit of the value, e.g. % or MB
//!     -w, --warn <warn>                              Range to warn outside of
//!
//! ARGS:
//!     <value>    The value to check
//!
//! ```
