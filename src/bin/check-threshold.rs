//! Check a single value against warning and critical ranges
//!
//! The value is gathered by whatever calls this (a shell pipeline, another
//! plugin), this only turns it into plugin output and an exit status.

use serde::Deserialize;
use structopt::clap::{App, AppSettings};
use structopt::StructOpt;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use icinga_helper::{Check, PerfData, Status, VERSION};

/// Log filter used when `RUST_LOG` is unset
///
/// Supervisors read stderr together with stdout, anything logged would land in
/// front of the status line.
const DEFAULT_LOG_FILTER: &str = "off";

/// Check a value against threshold ranges.
///
/// Ranges look like `[@][start:][end]`. Without `@` the check alarms when the
/// value is outside start..end (inclusive), with `@` it alarms when the value
/// is strictly inside. Either side may be empty to leave it unbounded, so
/// `10` alarms above 10 and `10:` alarms below 10.
#[derive(Deserialize, Debug, StructOpt)]
#[structopt(
    name = "check-threshold (part of icinga-helper)",
    setting = AppSettings::ColoredHelp,
    setting = AppSettings::AllowNegativeNumbers
)]
struct Args {
    #[structopt(help = "The value to check")]
    value: i64,
    #[structopt(
        short = "w",
        long = "warn",
        allow_hyphen_values = true,
        help = "Range to warn outside of"
    )]
    warn: Option<String>,
    #[structopt(
        short = "c",
        long = "crit",
        allow_hyphen_values = true,
        help = "Range to go critical outside of"
    )]
    crit: Option<String>,
    #[structopt(
        short = "n",
        long = "name",
        help = "First word of the output",
        default_value = "THRESHOLD"
    )]
    name: String,
    #[structopt(
        short = "l",
        long = "label",
        help = "Performance data label",
        default_value = "value"
    )]
    label: String,
    #[structopt(short = "u", long = "unit", help = "Unit of the value, e.g. % or MB")]
    unit: Option<String>,
    #[structopt(
        long = "min",
        allow_hyphen_values = true,
        help = "Smallest possible value, for performance data"
    )]
    min: Option<String>,
    #[structopt(
        long = "max",
        allow_hyphen_values = true,
        help = "Largest possible value, for performance data"
    )]
    max: Option<String>,
    #[structopt(
        long = "invalid-threshold",
        default_value = "unknown",
        possible_values = Status::str_values(),
        help = "Status to report if --warn or --crit can't be parsed"
    )]
    invalid_threshold: Status,
}

fn app() -> App<'static, 'static> {
    Args::clap().version(VERSION)
}

fn parse_args<I>(argv: I) -> Args
where
    I: IntoIterator<Item = String>,
{
    Args::from_clap(&app().get_matches_from(argv))
}

fn do_check(args: &Args) -> Check {
    let warn = args.warn.as_deref().unwrap_or("");
    let crit = args.crit.as_deref().unwrap_or("");
    let unit = args.unit.as_deref().unwrap_or("");

    let mut check = Check::new(args.name.as_str());
    match check.alarm_level(args.value, warn, crit) {
        Ok(status) => check.add_msg(
            status,
            format!("{} is {}{}", args.label, args.value, unit),
            "",
        ),
        Err(e) => {
            check.add_msg(args.invalid_threshold, e.to_string(), "");
            check.escalate(args.invalid_threshold);
        }
    }
    check.push_perf_data(
        &PerfData::new(args.label.as_str(), args.value)
            .unit(unit)
            .thresholds(warn, crit)
            .bounds(
                args.min.as_deref().unwrap_or(""),
                args.max.as_deref().unwrap_or(""),
            ),
    );
    check
}

/// Plain text events, no colour codes
fn subscriber<W>(filter: EnvFilter, make_writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(make_writer)
        .finish()
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber(filter, std::io::stderr));
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    init_logging();
    let args = parse_args(std::env::args());
    let check = do_check(&args);
    print!("{}", check);
    check.status().exit();
}

#[cfg(test)]
mod test {
    use std::io;
    use std::sync::{Arc, Mutex};

    use icinga_helper::{Status, VERSION};
    use tracing_subscriber::EnvFilter;

    use super::{app, do_check, parse_args, subscriber, Args, DEFAULT_LOG_FILTER};

    fn build_args(argv: Vec<&str>) -> Args {
        parse_args(argv.into_iter().map(String::from))
    }

    /// Collects everything a subscriber writes
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_while_checking(filter: &str, argv: Vec<&str>) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let sub = subscriber(EnvFilter::new(filter), move || writer.clone());
        tracing::subscriber::with_default(sub, || {
            do_check(&build_args(argv));
        });
        captured.text()
    }

    #[test]
    fn defaults() {
        let args = build_args(vec!["check-threshold", "5"]);
        assert_eq!(args.value, 5);
        assert_eq!(args.warn, None);
        assert_eq!(args.name, "THRESHOLD");
        assert_eq!(args.label, "value");
        assert_eq!(args.invalid_threshold, Status::Unknown);
    }

    #[test]
    fn version_is_the_library_version() {
        let mut out = Vec::new();
        app().write_version(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.trim_end().ends_with(VERSION), "unexpected version line: {}", out);
    }

    #[test]
    fn negative_values_are_values() {
        let args = build_args(vec!["check-threshold", "-w", "-10:", "-12"]);
        assert_eq!(args.value, -12);
        assert_eq!(args.warn, Some("-10:".to_owned()));
    }

    #[test]
    fn no_thresholds_is_ok() {
        let check = do_check(&build_args(vec!["check-threshold", "5"]));
        assert_eq!(check.status(), Status::Ok);
        assert_eq!(check.output(), "THRESHOLD: OK - value is 5 |value=5;;;;\n");
    }

    #[test]
    fn statuses() {
        let argv = |v| {
            vec![
                "check-threshold", "-n", "CPU", "-l", "cpu", "-u", "%", "-w", "80", "-c", "90", v,
            ]
        };

        let check = do_check(&build_args(argv("50")));
        assert_eq!(check.status(), Status::Ok);

        let check = do_check(&build_args(argv("85")));
        assert_eq!(check.status(), Status::Warning);
        assert_eq!(check.output(), "CPU: WARNING - cpu is 85%(w) |cpu=85%;80;90;;\n");

        let check = do_check(&build_args(argv("95")));
        assert_eq!(check.status(), Status::Critical);
        assert_eq!(check.status().code(), 2);
    }

    #[test]
    fn perf_data_bounds() {
        let check = do_check(&build_args(vec![
            "check-threshold", "--min", "0", "--max", "100", "-c", "@10:20", "15",
        ]));
        assert_eq!(check.status(), Status::Critical);
        assert_eq!(check.perf_data(), &["value=15;;@10:20;0;100"]);
    }

    #[test]
    fn bad_range_is_unknown() {
        let check = do_check(&build_args(vec!["check-threshold", "-w", "1:2:3", "5"]));
        assert_eq!(check.status(), Status::Unknown);
        assert_eq!(
            check.output(),
            "THRESHOLD: UNKNOWN - invalid warning threshold: \
             not a valid threshold range: '1:2:3'(u) |value=5;1:2:3;;;\n"
        );
    }

    #[test]
    fn invalid_threshold_status_is_configurable() {
        let check = do_check(&build_args(vec![
            "check-threshold", "--invalid-threshold", "critical", "-c", "5x", "5",
        ]));
        assert_eq!(check.status(), Status::Critical);
        assert_eq!(check.messages(Status::Critical).len(), 1);
        assert!(check.output().starts_with("THRESHOLD: CRITICAL - invalid critical threshold"));
    }

    #[test]
    fn default_logging_keeps_stderr_quiet_on_bad_thresholds() {
        let argv = vec!["check-threshold", "-w", "1:2:3", "5"];
        let logged = logged_while_checking(DEFAULT_LOG_FILTER, argv);
        assert_eq!(logged, "");
    }

    #[test]
    fn requested_logging_has_no_colour_codes() {
        let logged = logged_while_checking("warn", vec!["check-threshold", "-w", "1:2:3", "5"]);
        assert!(logged.contains("rejected threshold"), "logged: {:?}", logged);
        assert!(!logged.contains('\u{1b}'), "logged: {:?}", logged);
    }
}
