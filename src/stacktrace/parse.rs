//! Parsing of the textual backtrace rendering into `(function, file, line)` frames.
//!
//! The expected shape is the one `std::backtrace::Backtrace` prints:
//!
//! ```text
//!    0: crate::module::function
//!              at ./src/module.rs:42:9
//!    1: <unknown>
//! ```
//!
//! Symbols inlined into the same physical frame appear on unnumbered lines and are
//! returned as frames of their own.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Frame;

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+:\s+(.*?)\s*$").expect("header pattern is valid"));

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+at\s+(.+?):(\d+)(?::\d+)?\s*$").expect("location pattern is valid")
});

const UNKNOWN_SYMBOL: &str = "<unknown>";

/// Every symbol in `text`, innermost first, unfiltered.
///
/// Symbols without a location line get an empty file and line 0.
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut pending: Option<Frame> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = LOCATION.captures(line) {
            if let Some(mut frame) = pending.take() {
                frame.file = caps[1].to_string();
                frame.line = caps[2].parse().unwrap_or(0);
                frames.push(frame);
            }
            continue;
        }
        frames.extend(pending.take());
        let symbol = HEADER
            .captures(line)
            .map_or_else(|| line.trim().to_string(), |caps| caps[1].to_string());
        pending = Some(Frame::new(symbol_name(symbol), String::new(), 0));
    }
    frames.extend(pending);
    frames
}

fn symbol_name(symbol: String) -> String {
    if symbol == UNKNOWN_SYMBOL {
        String::new()
    } else {
        symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:312:9
   1: app::handlers::load
             at ./src/handlers.rs:20:5
      app::handlers::helper
             at ./src/handlers.rs:8:13
   2: <unknown>
   3: core::ops::function::FnOnce::call_once";

    #[test]
    fn parses_numbered_and_inlined_symbols() {
        let frames = parse_backtrace(SAMPLE);
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[1], Frame::new("app::handlers::load", "./src/handlers.rs", 20));
        assert_eq!(frames[2], Frame::new("app::handlers::helper", "./src/handlers.rs", 8));
    }

    #[test]
    fn unknown_and_unlocated_symbols_are_kept_empty() {
        let frames = parse_backtrace(SAMPLE);
        assert_eq!(frames[3], Frame::new("", "", 0));
        assert_eq!(
            frames[4],
            Frame::new("core::ops::function::FnOnce::call_once", "", 0)
        );
    }

    #[test]
    fn location_without_column() {
        let frames = parse_backtrace("  0: f\n        at src/lib.rs:7");
        assert_eq!(frames, vec![Frame::new("f", "src/lib.rs", 7)]);
    }

    #[test]
    fn empty_text() {
        assert!(parse_backtrace("").is_empty());
    }
}
