//! Regenerate `src/scripts.rs` from the `--help` output of the plugins
//!
//! Run from the repository root after `cargo build`:
//!
//! ```plain
//! cargo run -p make-docs > src/scripts.rs
//! ```

use std::process::{self, Command};

struct Plugin {
    name: &'static str,
    about: &'static str,
}

static PLUGINS: &[Plugin] = &[Plugin {
    name: "check-threshold",
    about: "Cross platform, the value to check comes from the command line.",
}];

fn main() {
    match render(PLUGINS) {
        Ok(out) => print!("{}", out),
        Err(msg) => {
            eprintln!("make-docs: {}", msg);
            process::exit(1);
        }
    }
}

fn render(plugins: &[Plugin]) -> Result<String, String> {
    let preamble = "Documentation about the plugins contained herein\n";

    let mut out: String = cp(preamble.split('\n'));
    out.push('\n');
    out.push_str(&cp(plugins
        .iter()
        .map(|p| format!("- [{0}](#{0})", p.name))));
    out.push('\n');
    for plugin in plugins {
        out.push_str(&section_header(plugin));
        out.push_str(&cp(help_text(plugin.name)?.split('\n')));
        out.push_str("\n//! ```\n");
    }
    out.push('\n');
    Ok(out)
}

fn section_header(plugin: &Plugin) -> String {
    format!(
        "\
//!
//! # {0}
//!
//! {1}
//!
//! ```plain
//! $ {0} --help
",
        plugin.name, plugin.about
    )
}

fn help_text(name: &str) -> Result<String, String> {
    let output = Command::new(format!("target/debug/{}", name))
        .arg("--help")
        .output()
        .map_err(|e| format!("couldn't execute {}: {}", name, e))?;
    String::from_utf8(output.stdout)
        .map_err(|e| format!("help for {} is not utf8: {}", name, e))
}

/// Comment each line in the iterator
fn cp<S: AsRef<str>, I: Iterator<Item = S>>(s: I) -> String {
    s.map(|s| format!("//! {}", s.as_ref()))
        .map(|s| s.trim().into())
        .collect::<Vec<String>>()
        .join("\n")
}
