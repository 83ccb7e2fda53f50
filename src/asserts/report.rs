//! Terminal rendering of failures.

use std::io;

use difference::{Changeset, Difference};
use miette::Diagnostic;
use termcolor::{Color, ColorSpec, WriteColor};

use super::Failure;

/// Writes the full failure report: header, message, diff, cause and stack trace.
pub fn write_failure<W: WriteColor>(out: &mut W, failure: &Failure) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    writeln!(out, "--- {} failed ---", failure.assertion)?;
    out.reset()?;
    writeln!(out, "{}", failure.message)?;

    if failure.has_diff() {
        if let (Some(expected), Some(actual)) = (&failure.expected, &failure.actual) {
            write_diff(out, expected, actual)?;
        }
    }

    if let Some(cause) = &failure.cause {
        write_cause(out, cause)?;
    }

    if let Some(trace) = &failure.trace {
        writeln!(out, "--- Stack trace ---\n{}\n-------------------", trace.render())?;
    }
    Ok(())
}

fn write_diff<W: WriteColor>(out: &mut W, expected: &str, actual: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "--- Diff (-expected +actual) ---")?;
    out.reset()?;

    let changeset = Changeset::new(expected, actual, "\n");
    for diff in &changeset.diffs {
        let (prefix, color, text) = match diff {
            Difference::Same(x) => (' ', None, x),
            Difference::Add(x) => ('+', Some(Color::Green), x),
            Difference::Rem(x) => ('-', Some(Color::Red), x),
        };
        out.set_color(ColorSpec::new().set_fg(color))?;
        for line in text.lines() {
            writeln!(out, "{}{}", prefix, line)?;
        }
    }
    out.reset()
}

fn write_cause<W: WriteColor>(out: &mut W, cause: &dyn Diagnostic) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    match cause.code() {
        Some(code) => writeln!(out, "cause [{}]: {}", code, cause)?,
        None => writeln!(out, "cause: {}", cause)?,
    }
    out.reset()?;
    if let Some(help) = cause.help() {
        writeln!(out, "help: {}", help)?;
    }
    Ok(())
}
