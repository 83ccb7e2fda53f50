//! # Stack Traces
//!
//! Captures the current call stack as an immutable [`StackTrace`]: filtered,
//! normalized [`Frames`] plus the raw text they were parsed from.
//!
//! Capture never fails. A zero buffer, or a skip count deeper than the stack,
//! yields an empty snapshot.
//!
//! ## Module Structure
//!
//! - **`frame`**: [`Frame`] and [`Frames`]
//! - **`parse`**: backtrace text to unfiltered frames
//! - **`filter`**: source-frame filtering and name normalization

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod filter;
mod frame;
mod parse;

pub use filter::{filter_frames, normalize_function};
pub use frame::{Frame, Frames};
pub use parse::parse_backtrace;

/// Frames the capture machinery itself contributes: the std capture call and
/// [`StackTrace::capture`].
const INTERNAL_SKIP: usize = 2;

const CAPTURE_SYMBOL: &str = "StackTrace::capture";

/// How much of the stack to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Upper bound on both the number of frames read and the bytes of raw text kept.
    pub buffer_size: usize,
    /// Frames to discard above the caller of [`StackTrace::capture`].
    pub skip_frames: usize,
}

impl CaptureConfig {
    pub const DEFAULT: CaptureConfig = CaptureConfig {
        buffer_size: 2048,
        skip_frames: 2,
    };
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An immutable call-stack snapshot.
///
/// # Examples
///
/// ```rust
/// use verity::stacktrace::{CaptureConfig, StackTrace};
///
/// let config = CaptureConfig { skip_frames: 0, ..CaptureConfig::DEFAULT };
/// let trace = StackTrace::capture(Some(&config));
/// let top = trace.limit(1);
/// assert!(top.frames().len() <= 1);
/// assert_eq!(top.raw(), trace.raw());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackTrace {
    frames: Frames,
    raw: Arc<str>,
}

impl StackTrace {
    pub fn empty() -> Self {
        Self {
            frames: Frames::new(),
            raw: Arc::from(""),
        }
    }

    /// Captures the stack of the calling thread.
    ///
    /// The first retained frame is the caller of `capture`, moved outwards by
    /// `skip_frames`. Without a config, [`CaptureConfig::DEFAULT`] applies.
    #[inline(never)]
    pub fn capture(config: Option<&CaptureConfig>) -> StackTrace {
        let config = config.copied().unwrap_or_default();
        if config.buffer_size == 0 {
            return Self::empty();
        }
        let text = Backtrace::force_capture().to_string();
        let entries = parse_backtrace(&text);
        let internal = entries
            .iter()
            .position(|f| f.function.ends_with(CAPTURE_SYMBOL))
            .map_or(INTERNAL_SKIP, |i| i + 1);
        Self::assemble(&text, entries, internal + config.skip_frames, config.buffer_size)
    }

    /// Builds a snapshot from backtrace text captured elsewhere, such as in a
    /// panic hook. `skip_frames` counts from the first symbol in `text`.
    pub fn from_text(text: &str, config: &CaptureConfig) -> StackTrace {
        if config.buffer_size == 0 {
            return Self::empty();
        }
        let entries = parse_backtrace(text);
        Self::assemble(text, entries, config.skip_frames, config.buffer_size)
    }

    fn assemble(text: &str, entries: Vec<Frame>, skip: usize, buffer_size: usize) -> Self {
        if skip >= entries.len() {
            return Self::empty();
        }
        let frames = filter_frames(entries.into_iter().skip(skip).take(buffer_size));
        Self {
            frames,
            raw: Arc::from(truncate_raw(text, buffer_size)),
        }
    }

    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    /// The unfiltered text of the whole capture.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Frames as `file:line function` lines.
    pub fn render(&self) -> String {
        self.frames.to_string()
    }

    /// At most `n` innermost frames.
    ///
    /// Returns `self` untouched when it already has no more than `n` frames. The
    /// raw text is shared, never truncated.
    pub fn limit(&self, n: usize) -> Cow<'_, StackTrace> {
        if n >= self.frames.len() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(StackTrace {
            frames: self.frames.truncated(n),
            raw: Arc::clone(&self.raw),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.raw.is_empty()
    }
}

impl Default for StackTrace {
    fn default() -> Self {
        Self::empty()
    }
}

/// Writes the raw text.
impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn truncate_raw(text: &str, max_bytes: usize) -> &str {
    let text = text.trim();
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "   0: app::outer::inner
             at ./src/outer.rs:10:5
   1: app::outer::middle
             at ./src/outer.rs:20:5
   2: std::rt::lang_start
             at /rustc/abc/library/std/src/rt.rs:100:1
   3: main
";

    fn config(buffer_size: usize, skip_frames: usize) -> CaptureConfig {
        CaptureConfig {
            buffer_size,
            skip_frames,
        }
    }

    #[test]
    fn from_text_skips_and_filters() {
        let trace = StackTrace::from_text(TEXT, &config(2048, 1));
        assert_eq!(
            trace.render(),
            "./src/outer.rs:20 outer::middle\n\
             /rustc/abc/library/std/src/rt.rs:100 rt::lang_start"
        );
        assert_eq!(trace.raw(), TEXT.trim());
    }

    #[test]
    fn buffer_bounds_frames_and_raw() {
        let trace = StackTrace::from_text(TEXT, &config(1, 0));
        assert_eq!(trace.frames().len(), 1);
        assert_eq!(trace.raw().len(), 1);
    }

    #[test]
    fn degenerate_configs_give_empty_snapshots() {
        assert!(StackTrace::from_text(TEXT, &config(0, 0)).is_empty());
        assert!(StackTrace::from_text(TEXT, &config(2048, 4)).is_empty());
        assert!(StackTrace::capture(Some(&config(0, 0))).is_empty());
        assert!(StackTrace::capture(Some(&config(2048, 100_000))).is_empty());
    }

    #[test]
    fn limit_borrows_when_nothing_to_cut() {
        let trace = StackTrace::from_text(TEXT, &config(2048, 0));
        assert_eq!(trace.frames().len(), 3);
        assert!(matches!(trace.limit(3), Cow::Borrowed(_)));
        let cut = trace.limit(1);
        assert!(matches!(cut, Cow::Owned(_)));
        assert_eq!(cut.frames().len(), 1);
        assert_eq!(cut.raw(), trace.raw());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_raw("  héllo  ", 2), "h");
        assert_eq!(truncate_raw("ab cd", 3), "ab");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let parsed: CaptureConfig = serde_json::from_str(r#"{"skip_frames": 0}"#).unwrap();
        assert_eq!(parsed, config(2048, 0));
    }
}
