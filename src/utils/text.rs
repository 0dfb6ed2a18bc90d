// src/utils/text.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Canonical form used when comparing a submission with a reference answer:
/// trimmed, internal whitespace collapsed to one space, lowercased.
pub fn normalize_for_comparison(input: &str) -> String {
    WHITESPACE_RUN
        .replace_all(input.trim(), " ")
        .to_lowercase()
}

/// Whether two answers are equal once normalized.
pub fn answers_match(submitted: &str, reference: &str) -> bool {
    normalize_for_comparison(submitted) == normalize_for_comparison(reference)
}

/// Trims `value`, rejecting it if nothing is left.
pub fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional value; blank counts as absent.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
