//! Per-field validators.
//!
//! Every validator takes the raw cell (`None` when the column is missing)
//! and the 0-based row index, which is only used to prefix messages with a
//! 1-based `Row N:`. Presence failures, unparseable dates and values outside
//! a closed enumeration are errors. Over-long text, too many tags and
//! implausible dates are warnings and still produce a sanitized value.

use crate::limits::{
    DATE_PLAUSIBILITY_YEARS, MAX_ACTION_TYPE_LEN, MAX_BROWSER_INFO_LEN, MAX_HIDDEN_TYPE_LEN,
    MAX_ORDER_ID_LEN, MAX_TAGS, MAX_TAG_LEN, MAX_USERNAME_LEN, TIMESTAMP_PLAUSIBILITY_YEARS,
};
use ordersheet_types::{split_tags, ActionType, HiddenType, IsoTimestamp};

/// Result of validating one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOutcome<T> {
    /// Present whenever `errors` is empty.
    pub sanitized: Option<T>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl<T> FieldOutcome<T> {
    fn ok(value: T) -> Self {
        Self {
            sanitized: Some(value),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            sanitized: None,
            errors: vec![message],
            warnings: Vec::new(),
        }
    }

    fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.sanitized.is_some()
    }

    /// Converts the sanitized value, keeping diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldOutcome<U> {
        FieldOutcome {
            sanitized: self.sanitized.map(f),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

/// 1-based row label used in every message.
pub(crate) fn row_label(row: usize) -> String {
    format!("Row {}", row + 1)
}

/// Keeps the first `max` characters of `value`.
#[must_use]
pub fn clamp_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn required_text(raw: Option<&str>, row: usize, label: &str, max: usize) -> FieldOutcome<String> {
    let Some(trimmed) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return FieldOutcome::error(format!(
            "{}: {label} must be a non-empty string",
            row_label(row)
        ));
    };

    if char_len(trimmed) > max {
        return FieldOutcome::ok(clamp_chars(trimmed, max)).with_warnings(vec![format!(
            "{}: {label} truncated to {max} characters",
            row_label(row)
        )]);
    }
    FieldOutcome::ok(trimmed.to_string())
}

fn disallowed(row: usize, label: &str, value: &str, allowed: &[&str]) -> String {
    format!(
        "{}: Invalid {} \"{value}\". Allowed values: {}",
        row_label(row),
        label.to_lowercase(),
        allowed.join(", ")
    )
}

/// Order ID: required, at most [`MAX_ORDER_ID_LEN`] characters.
pub fn validate_order_id(raw: Option<&str>, row: usize) -> FieldOutcome<String> {
    required_text(raw, row, "Order ID", MAX_ORDER_ID_LEN)
}

/// Username (hidden-by / performed-by / settings owner): required, at most
/// [`MAX_USERNAME_LEN`] characters.
pub fn validate_username(raw: Option<&str>, row: usize) -> FieldOutcome<String> {
    required_text(raw, row, "Username", MAX_USERNAME_LEN)
}

/// Browser info: required, at most [`MAX_BROWSER_INFO_LEN`] characters.
pub fn validate_browser_info(raw: Option<&str>, row: usize) -> FieldOutcome<String> {
    required_text(raw, row, "Browser info", MAX_BROWSER_INFO_LEN)
}

/// Hidden type: required, lowercased, clamped, then checked against
/// [`HiddenType::ALLOWED`].
pub fn validate_hidden_type(raw: Option<&str>, row: usize) -> FieldOutcome<HiddenType> {
    let text = required_text(raw, row, "Hidden type", MAX_HIDDEN_TYPE_LEN);
    let lowered = text.sanitized.as_ref().map(|v| v.to_lowercase());
    let Some(value) = lowered else {
        return text.map(|_| HiddenType::Details);
    };

    match HiddenType::from_cell(&value) {
        Some(hidden_type) => FieldOutcome::ok(hidden_type).with_warnings(text.warnings),
        None => FieldOutcome::error(disallowed(row, "Hidden type", &value, HiddenType::ALLOWED))
            .with_warnings(text.warnings),
    }
}

/// Action type: required and lowercased, checked against
/// [`ActionType::ALLOWED`] before any length clamp is applied.
pub fn validate_action_type(raw: Option<&str>, row: usize) -> FieldOutcome<ActionType> {
    let Some(trimmed) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return FieldOutcome::error(format!(
            "{}: Action type must be a non-empty string",
            row_label(row)
        ));
    };

    let value = trimmed.to_lowercase();
    let Some(action) = ActionType::from_cell(&value) else {
        return FieldOutcome::error(disallowed(row, "Action type", &value, ActionType::ALLOWED));
    };

    if char_len(&value) > MAX_ACTION_TYPE_LEN {
        let clamped = clamp_chars(&value, MAX_ACTION_TYPE_LEN);
        let warning = format!(
            "{}: Action type truncated to {MAX_ACTION_TYPE_LEN} characters",
            row_label(row)
        );
        return match ActionType::from_cell(&clamped) {
            Some(action) => FieldOutcome::ok(action).with_warnings(vec![warning]),
            None => FieldOutcome::error(disallowed(row, "Action type", &clamped, ActionType::ALLOWED))
                .with_warnings(vec![warning]),
        };
    }
    FieldOutcome::ok(action)
}

/// Tags: optional comma-separated list. At most [`MAX_TAGS`] tags of at
/// most [`MAX_TAG_LEN`] characters each; overflow is dropped with a warning.
pub fn validate_tags(raw: Option<&str>, row: usize) -> FieldOutcome<Vec<String>> {
    let Some(cell) = raw.filter(|v| !v.trim().is_empty()) else {
        return FieldOutcome::ok(Vec::new());
    };

    let mut warnings = Vec::new();
    let mut tags = split_tags(cell);

    if tags.len() > MAX_TAGS {
        warnings.push(format!(
            "{}: Too many tags ({}), keeping the first {MAX_TAGS}",
            row_label(row),
            tags.len()
        ));
        tags.truncate(MAX_TAGS);
    }

    let tags = tags
        .into_iter()
        .map(|tag| {
            if char_len(&tag) > MAX_TAG_LEN {
                warnings.push(format!(
                    "{}: Tag \"{tag}\" truncated to {MAX_TAG_LEN} characters",
                    row_label(row)
                ));
                clamp_chars(&tag, MAX_TAG_LEN)
            } else {
                tag
            }
        })
        .collect();

    FieldOutcome::ok(tags).with_warnings(warnings)
}

fn point_in_time(
    raw: Option<&str>,
    row: usize,
    label: &str,
    horizon_years: u32,
    now: &IsoTimestamp,
) -> FieldOutcome<IsoTimestamp> {
    let Some(trimmed) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return FieldOutcome::error(format!(
            "{}: {label} must be a non-empty string",
            row_label(row)
        ));
    };

    let Some(parsed) = IsoTimestamp::parse(trimmed) else {
        return FieldOutcome::error(format!(
            "{}: Invalid {} \"{trimmed}\"",
            row_label(row),
            label.to_lowercase()
        ));
    };

    if parsed.exceeds_horizon(horizon_years, now) {
        return FieldOutcome::ok(parsed).with_warnings(vec![format!(
            "{}: {label} {parsed} is more than {horizon_years} years from now",
            row_label(row)
        )]);
    }
    FieldOutcome::ok(parsed)
}

/// Calendar date (order date): required, parseable, flagged when more than
/// [`DATE_PLAUSIBILITY_YEARS`] from `now`.
pub fn validate_date(raw: Option<&str>, row: usize, now: &IsoTimestamp) -> FieldOutcome<IsoTimestamp> {
    point_in_time(raw, row, "Order date", DATE_PLAUSIBILITY_YEARS, now)
}

/// Event timestamp: required, parseable, flagged when more than
/// [`TIMESTAMP_PLAUSIBILITY_YEARS`] from `now`.
pub fn validate_timestamp(
    raw: Option<&str>,
    row: usize,
    now: &IsoTimestamp,
) -> FieldOutcome<IsoTimestamp> {
    point_in_time(raw, row, "Timestamp", TIMESTAMP_PLAUSIBILITY_YEARS, now)
}

/// Like [`validate_timestamp`], labelled for the last-modified column.
pub fn validate_last_modified(
    raw: Option<&str>,
    row: usize,
    now: &IsoTimestamp,
) -> FieldOutcome<IsoTimestamp> {
    point_in_time(raw, row, "Last modified", TIMESTAMP_PLAUSIBILITY_YEARS, now)
}
