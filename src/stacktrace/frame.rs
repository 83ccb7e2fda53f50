use std::fmt;

use im::Vector;
use serde::{Deserialize, Serialize};

/// One call-stack entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    pub function: String,
    pub file: String,
    /// 1-based; 0 when the location is unknown.
    pub line: u32,
}

impl Frame {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Non-empty function and file, and a line of at least 1.
    pub fn is_well_formed(&self) -> bool {
        !self.function.is_empty() && !self.file.is_empty() && self.line >= 1
    }
}

/// Renders as `file:line function`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.file, self.line, self.function)
    }
}

/// Ordered frames, innermost first.
///
/// Backed by a persistent vector, so truncated copies share structure with the
/// original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frames(Vector<Frame>);

impl Frames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&Frame> {
        self.0.front()
    }

    pub fn iter(&self) -> im::vector::Iter<'_, Frame> {
        self.0.iter()
    }

    /// The first `n` frames.
    pub fn truncated(&self, n: usize) -> Frames {
        Frames(self.0.take(n.min(self.0.len())))
    }
}

/// One line per frame, joined by `\n` with no trailing newline.
///
/// ```rust
/// use verity::stacktrace::{Frame, Frames};
///
/// let frames: Frames = vec![
///     Frame::new("tests::it_works", "src/lib.rs", 12),
///     Frame::new("runner::run", "src/runner.rs", 40),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(frames.to_string(), "src/lib.rs:12 tests::it_works\nsrc/runner.rs:40 runner::run");
/// assert_eq!(Frames::new().to_string(), "");
/// ```
impl fmt::Display for Frames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}

impl FromIterator<Frame> for Frames {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Frames(iter.into_iter().collect())
    }
}

impl From<Vec<Frame>> for Frames {
    fn from(frames: Vec<Frame>) -> Self {
        frames.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Frames {
    type Item = &'a Frame;
    type IntoIter = im::vector::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
