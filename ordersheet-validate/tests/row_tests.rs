use ordersheet_types::{ActionType, HiddenType, IsoTimestamp, RawRow};
use ordersheet_validate::{RowValidator, ValidationStats};
use pretty_assertions::assert_eq;

fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|c| c.to_string()).collect()
}

fn validator() -> RowValidator {
    RowValidator::with_reference_time(IsoTimestamp::parse("2024-06-01T00:00:00Z").unwrap())
}

// ── Hidden orders ────────────────────────────────────────────────

#[test]
fn minimal_hidden_order_row_validates_cleanly() {
    let rows = vec![row(&[
        "123-4567890-1234567",
        "2024-01-15",
        "john_doe",
        "electronics, gadgets",
        "details",
        "2024-01-15T10:30:00Z",
    ])];

    let result = validator().validate_hidden_orders(&rows);

    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(result.sanitized_data.len(), 1);

    let record = &result.sanitized_data[0];
    assert_eq!(record.order_id, "123-4567890-1234567");
    assert_eq!(
        record.order_date.map(|d| d.to_iso_string()),
        Some("2024-01-15T00:00:00.000Z".to_string())
    );
    assert_eq!(record.hidden_by, "john_doe");
    assert_eq!(record.tags, vec!["electronics", "gadgets"]);
    assert_eq!(record.hidden_type, HiddenType::Details);
    assert_eq!(record.hidden_at.to_iso_string(), "2024-01-15T10:30:00.000Z");
    assert_eq!(record.last_modified, record.hidden_at);
}

#[test]
fn empty_order_id_invalidates_batch_and_drops_row() {
    let rows = vec![row(&[
        "",
        "2024-01-15",
        "john_doe",
        "electronics",
        "details",
        "2024-01-15T10:30:00Z",
    ])];

    let result = validator().validate_hidden_orders(&rows);

    assert!(!result.is_valid);
    assert_eq!(result.errors, vec!["Row 1: Order ID must be a non-empty string"]);
    assert!(result.sanitized_data.is_empty());
}

#[test]
fn one_bad_row_keeps_the_good_ones() {
    let rows = vec![
        row(&["A1", "2024-01-15", "john", "", "details", "2024-01-15T10:30:00Z"]),
        row(&["A2", "2024-01-15", "john", "", "summary", "2024-01-15T10:30:00Z"]),
        row(&["A3", "2024-01-16", "jane", "x", "DETAILS", "2024-01-16T10:30:00Z"]),
    ];

    let result = validator().validate_hidden_orders(&rows);

    assert!(!result.is_valid);
    assert_eq!(result.sanitized_data.len(), 2);
    assert_eq!(result.sanitized_data[0].order_id, "A1");
    assert_eq!(result.sanitized_data[1].order_id, "A3");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Row 2: Invalid hidden type"));
}

#[test]
fn short_row_is_a_structural_error() {
    let rows = vec![row(&["A1", "2024-01-15", "john"])];
    let result = validator().validate_hidden_orders(&rows);
    assert_eq!(result.errors, vec!["Row 1: Expected at least 6 columns, got 3"]);
    assert!(result.sanitized_data.is_empty());
}

#[test]
fn optional_last_modified_column_is_validated() {
    let rows = vec![
        row(&["A1", "2024-01-15", "john", "", "details", "2024-01-15T10:30:00Z", "2024-02-01T00:00:00Z"]),
        row(&["A2", "2024-01-15", "john", "", "details", "2024-01-15T10:30:00Z", "garbage"]),
    ];

    let result = validator().validate_hidden_orders(&rows);

    assert_eq!(result.sanitized_data.len(), 1);
    assert_eq!(
        result.sanitized_data[0].last_modified.to_iso_string(),
        "2024-02-01T00:00:00.000Z"
    );
    assert_eq!(result.errors, vec![r#"Row 2: Invalid last modified "garbage""#]);
}

#[test]
fn multiple_field_errors_on_one_row_are_all_reported() {
    let rows = vec![row(&["", "never", "", "", "nope", "later"])];
    let result = validator().validate_hidden_orders(&rows);
    assert_eq!(result.errors.len(), 5);
    assert!(result.errors.iter().all(|e| e.starts_with("Row 1:")));
}

#[test]
fn warnings_do_not_invalidate() {
    let long_id = "9".repeat(55);
    let rows = vec![row(&[&long_id, "2024-01-15", "john", "", "details", "2024-01-15T10:30:00Z"])];
    let result = validator().validate_hidden_orders(&rows);
    assert!(result.is_valid);
    assert_eq!(result.warnings, vec!["Row 1: Order ID truncated to 50 characters"]);
    assert_eq!(result.sanitized_data[0].order_id.len(), 50);
}

// ── Action log ───────────────────────────────────────────────────

#[test]
fn action_log_row_validates() {
    let rows = vec![row(&[
        "Unhide",
        "123-4567890-1234567",
        "jane",
        "2024-03-01T08:00:00Z",
        "a, b",
        "Mozilla/5.0",
    ])];

    let result = validator().validate_action_log(&rows);

    assert!(result.is_valid);
    let record = &result.sanitized_data[0];
    assert_eq!(record.action, ActionType::Unhide);
    assert_eq!(record.performed_by, "jane");
    assert_eq!(record.tags, vec!["a", "b"]);
    assert_eq!(record.browser_info, "Mozilla/5.0");
}

#[test]
fn action_log_rejects_unknown_action() {
    let rows = vec![row(&["archive", "1", "jane", "2024-03-01T08:00:00Z", "", "ua"])];
    let result = validator().validate_action_log(&rows);
    assert!(!result.is_valid);
    assert_eq!(
        result.errors,
        vec![r#"Row 1: Invalid action type "archive". Allowed values: hide, unhide"#]
    );
}

#[test]
fn action_log_requires_six_columns() {
    let rows = vec![row(&["hide", "1", "jane", "2024-03-01T08:00:00Z"])];
    let result = validator().validate_action_log(&rows);
    assert_eq!(result.errors, vec!["Row 1: Expected at least 6 columns, got 4"]);
}

// ── User settings ────────────────────────────────────────────────

#[test]
fn user_settings_row_validates() {
    let rows = vec![row(&["john_doe", "2024-01-15T10:30:00Z"])];
    let result = validator().validate_user_settings(&rows);
    assert!(result.is_valid);
    assert_eq!(result.sanitized_data[0].username, "john_doe");
}

#[test]
fn user_settings_without_timestamp_column_is_structural_error() {
    let rows = vec![row(&["john_doe"])];
    let result = validator().validate_user_settings(&rows);
    assert_eq!(result.errors, vec!["Row 1: Expected at least 2 columns, got 1"]);
}

#[test]
fn empty_batch_is_valid() {
    let result = validator().validate_user_settings(&[]);
    assert!(result.is_valid);
    assert!(result.sanitized_data.is_empty());
}

// ── Statistics ───────────────────────────────────────────────────

#[test]
fn stats_match_reference_example() {
    let stats = ValidationStats::from_counts(2, 1, 2);
    assert_eq!(
        stats,
        ValidationStats {
            total_rows: 3,
            valid_rows: 2,
            error_rows: 1,
            warning_rows: 2,
            success_rate: 66.7,
        }
    );
}

#[test]
fn stats_count_errors_not_rows() {
    let rows = vec![
        row(&["A1", "2024-01-15", "john", "", "details", "2024-01-15T10:30:00Z"]),
        row(&["", "never", "", "", "details", "2024-01-15T10:30:00Z"]),
    ];
    let stats = validator().validate_hidden_orders(&rows).stats();
    assert_eq!(stats.valid_rows, 1);
    assert_eq!(stats.error_rows, 3);
    assert_eq!(stats.total_rows, 4);
    assert_eq!(stats.success_rate, 25.0);
}

#[test]
fn stats_for_empty_batch() {
    let stats = ValidationStats::from_counts(0, 0, 0);
    assert_eq!(stats.total_rows, 0);
    assert_eq!(stats.success_rate, 0.0);
}

#[test]
fn stats_serialize_camel_case() {
    let json = serde_json::to_value(ValidationStats::from_counts(1, 0, 0)).unwrap();
    assert_eq!(json["successRate"], 100.0);
    assert_eq!(json["totalRows"], 1);
}
