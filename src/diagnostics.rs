use std::fmt::Write as _;

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Only errors that escape to the driver are rendered here; per-record
/// problems are handled (logged or silently skipped) during the load.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::Io(e) => format!("\
# Error: I/O

{e}

The catalog engine does not recover from filesystem failures on
referenced source files; fix the path or permissions and re-run.
"),

        Error::Json(e) => render_bad_findings(&e.to_string()),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`.lintack.toml` exists but cannot be parsed:

{e}

## Fix

Correct the file, or delete it to fall back to defaults.
"),

        // Per-record by contract; rendered generically if one ever escapes.
        Error::InvalidEntry { .. } | Error::ObsoleteEntry { .. } => format!("\
# Error

{e}
"),
    }
}

fn render_bad_findings(reason: &str) -> String {
    let mut out = String::from("\
# Error: Invalid Findings Input

A findings line is not a valid finding record:

");
    let _ = writeln!(out, "{reason}");
    out.push_str("\
\n## Expected

One JSON object per line:

    {\"msg_id\": \"W0511\", \"path\": \"src/queue.py\", \"symbol\": \"fixme\", \"msg_text\": \"TODO: ...\", \"lineno\": 6}
");
    out
}
