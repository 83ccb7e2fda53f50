//! Checks over text, errors, JSON documents and timestamps.

use std::fmt::Display;
use std::time::{Duration, SystemTime};

use regex::Regex;

use crate::engine;
use crate::value::Reflect;

use super::checks::Outcome;
use super::Failure;

pub(crate) fn matches_regex(text: &str, pattern: &str) -> Outcome {
    let re = Regex::new(pattern).map_err(|err| {
        Failure::new("matches_regex", format!("invalid regex pattern: {}", err))
    })?;
    if re.is_match(text) {
        Ok(())
    } else {
        Err(Failure::new(
            "matches_regex",
            format!(
                "expected string {:?} to match regex {:?}, but it did not",
                text, pattern
            ),
        ))
    }
}

pub(crate) fn has_prefix(text: &str, prefix: &str) -> Outcome {
    if text.starts_with(prefix) {
        return Ok(());
    }
    Err(Failure::new(
        "has_prefix",
        format!(
            "expected string {:?} to have prefix {:?}, but it did not",
            text, prefix
        ),
    ))
}

pub(crate) fn has_suffix(text: &str, suffix: &str) -> Outcome {
    if text.ends_with(suffix) {
        return Ok(());
    }
    Err(Failure::new(
        "has_suffix",
        format!(
            "expected string {:?} to have suffix {:?}, but it did not",
            text, suffix
        ),
    ))
}

pub(crate) fn no_error<T, E: Display>(result: &Result<T, E>) -> Outcome {
    match result {
        Ok(_) => Ok(()),
        Err(err) => Err(Failure::new("no_error", format!("unexpected error: {}", err))),
    }
}

pub(crate) fn error<T, E>(result: &Result<T, E>) -> Outcome {
    match result {
        Ok(_) => Err(Failure::new("error", "expected an error, but got Ok")),
        Err(_) => Ok(()),
    }
}

pub(crate) fn error_contains<T, E: Display>(result: &Result<T, E>, substr: &str) -> Outcome {
    let err = match result {
        Ok(_) => return Err(Failure::new("error_contains", "expected an error, but got Ok")),
        Err(err) => err.to_string(),
    };
    if err.contains(substr) {
        return Ok(());
    }
    Err(Failure::new(
        "error_contains",
        format!(
            "expected error message to contain {:?}, but got {:?}",
            substr, err
        ),
    ))
}

/// Signed difference `expected - actual`, rendered with its sign.
fn signed_difference(expected: SystemTime, actual: SystemTime) -> (Duration, String) {
    match expected.duration_since(actual) {
        Ok(diff) => (diff, format!("{:?}", diff)),
        Err(err) => {
            let diff = err.duration();
            (diff, format!("-{:?}", diff))
        }
    }
}

pub(crate) fn within_duration(
    expected: SystemTime,
    actual: SystemTime,
    delta: Duration,
) -> Outcome {
    let (diff, rendered) = signed_difference(expected, actual);
    if diff <= delta {
        return Ok(());
    }
    Err(Failure::new(
        "within_duration",
        format!(
            "expected time {:?} to be within {:?} of {:?}, but difference was {}",
            actual, delta, expected, rendered
        ),
    ))
}

fn pretty_json(doc: &serde_json::Value) -> String {
    serde_json::to_string_pretty(doc).unwrap_or_else(|_| doc.to_string())
}

/// Documents are equal when they parse to the same structure: whitespace and key
/// order are ignored, and numbers compare by value.
pub(crate) fn json_eq(expected: &str, actual: &str) -> Outcome {
    let parse = |doc: &str, side: &str| {
        serde_json::from_str::<serde_json::Value>(doc).map_err(|err| {
            Failure::new(
                "json_eq",
                format!("failed to unmarshal {} JSON: {}", side, err),
            )
        })
    };
    let expected_doc = parse(expected, "expected")?;
    let actual_doc = parse(actual, "actual")?;

    if engine::deep_equal(&expected_doc.reflect(), &actual_doc.reflect()) {
        return Ok(());
    }
    Err(Failure::new(
        "json_eq",
        format!(
            "JSON not equal: expected: {} actual: {}",
            expected_doc, actual_doc
        ),
    )
    .with_renderings(pretty_json(&expected_doc), pretty_json(&actual_doc)))
}
