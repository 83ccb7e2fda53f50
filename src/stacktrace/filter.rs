//! Frame filtering and function-name normalization.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Frame, Frames};

const SOURCE_SUFFIX: &str = ".rs";

/// The `::h0123456789abcdef` suffix the compiler appends to mangled symbols.
static SYMBOL_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"::h[0-9a-f]{16}$").expect("symbol hash pattern is valid"));

/// Drops malformed and non-source frames and normalizes the names of the rest.
///
/// A frame survives when it is well formed and its file ends in `.rs`. Order is
/// preserved.
///
/// ```rust
/// use verity::stacktrace::{filter_frames, Frame};
///
/// let frames = filter_frames(vec![
///     Frame::new("app::main", "/a/main.rs", 10),
///     Frame::new("x", "invalid.txt", 20),
/// ]);
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames.first().map(|f| f.function.as_str()), Some("app::main"));
/// ```
pub fn filter_frames<I>(frames: I) -> Frames
where
    I: IntoIterator<Item = Frame>,
{
    frames
        .into_iter()
        .filter(|f| f.is_well_formed() && f.file.ends_with(SOURCE_SUFFIX))
        .map(|f| Frame {
            function: normalize_function(&f.function),
            ..f
        })
        .collect()
}

/// Shortens a symbol path to its last two segments.
///
/// `app::net::Client::connect` becomes `Client::connect`. Separators inside
/// generic brackets do not count, so trait-impl paths such as
/// `<Vec<T> as core::ops::Drop>::drop` keep their qualified form. Turbofish
/// arguments (`::<T>`) and closure or shim markers (`::{closure#0}`) stay
/// attached to the segment they follow, so
/// `app::Ledger::post::<T>::{closure#0}` becomes `Ledger::post::<T>::{closure#0}`.
/// Names with at most one separator are returned as they are, minus any symbol
/// hash.
pub fn normalize_function(name: &str) -> String {
    let name = SYMBOL_HASH.replace(name, "");
    let separators = path_separators(&name);
    match separators.len() {
        0 | 1 => name.into_owned(),
        n => name[separators[n - 2] + 2..].to_string(),
    }
}

/// Byte offsets of every `::` that starts a new path segment: not nested inside
/// `<>`, `()`, `[]` or `{}`, and not followed by a turbofish or a `{...}` marker.
fn path_separators(name: &str) -> Vec<usize> {
    let bytes = name.as_bytes();
    let mut depth = 0usize;
    let mut offsets = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' | b'{' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                if !matches!(bytes.get(i + 2), Some(b'<' | b'{')) {
                    offsets.push(i);
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_two_segments() {
        assert_eq!(normalize_function("app::net::Client::connect"), "Client::connect");
        assert_eq!(normalize_function("app::main"), "app::main");
        assert_eq!(normalize_function("main"), "main");
    }

    #[test]
    fn strips_symbol_hash() {
        assert_eq!(
            normalize_function("app::net::connect::h0123456789abcdef"),
            "net::connect"
        );
    }

    #[test]
    fn ignores_separators_inside_generics() {
        assert_eq!(
            normalize_function("<alloc::vec::Vec<T> as core::ops::drop::Drop>::drop"),
            "<alloc::vec::Vec<T> as core::ops::drop::Drop>::drop"
        );
        assert_eq!(
            normalize_function("app::run::<fn() -> u8>::{{closure}}"),
            "app::run::<fn() -> u8>::{{closure}}"
        );
    }

    #[test]
    fn turbofish_and_closures_stay_with_their_function() {
        let cases = [
            (
                "billing::ledger::Ledger::post::<alloc::string::String>::{closure#0}",
                "Ledger::post::<alloc::string::String>::{closure#0}",
            ),
            (
                "billing::ledger::tests::posts_entry::{closure#0}::{closure#1}",
                "tests::posts_entry::{closure#0}::{closure#1}",
            ),
            (
                "core::ops::function::FnOnce::call_once::{shim:vtable#0}",
                "FnOnce::call_once::{shim:vtable#0}",
            ),
            (
                "<F as core::ops::function::FnOnce<()>>::call_once::{shim:vtable#0}",
                "<F as core::ops::function::FnOnce<()>>::call_once::{shim:vtable#0}",
            ),
        ];
        for (symbol, expected) in cases {
            assert_eq!(normalize_function(symbol), expected, "{}", symbol);
        }
    }

    #[test]
    fn drops_malformed_frames() {
        let frames = filter_frames(vec![
            Frame::new("", "src/a.rs", 1),
            Frame::new("f", "", 1),
            Frame::new("f", "src/a.rs", 0),
            Frame::new("f", "src/a.rs.bak", 3),
            Frame::new("a::b::f", "src/a.rs", 3),
        ]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.first(), Some(&Frame::new("b::f", "src/a.rs", 3)));
    }
}
