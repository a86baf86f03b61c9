use ordersheet_types::{ActionType, HiddenType, IsoTimestamp};
use ordersheet_validate::field::{
    validate_action_type, validate_browser_info, validate_date, validate_hidden_type,
    validate_order_id, validate_tags, validate_timestamp, validate_username,
};
use ordersheet_validate::{MAX_TAGS, MAX_TAG_LEN};
use pretty_assertions::assert_eq;

fn now() -> IsoTimestamp {
    IsoTimestamp::parse("2024-06-01T00:00:00Z").unwrap()
}

// ── Required text ────────────────────────────────────────────────

#[test]
fn order_id_is_trimmed() {
    let out = validate_order_id(Some("  123-4567890-1234567 "), 0);
    assert!(out.is_valid());
    assert_eq!(out.sanitized.as_deref(), Some("123-4567890-1234567"));
    assert!(out.warnings.is_empty());
}

#[test]
fn missing_or_blank_order_id_is_an_error() {
    for raw in [None, Some(""), Some("   ")] {
        let out = validate_order_id(raw, 0);
        assert!(!out.is_valid());
        assert_eq!(out.errors, vec!["Row 1: Order ID must be a non-empty string"]);
        assert_eq!(out.sanitized, None);
    }
}

#[test]
fn row_index_is_reported_one_based() {
    let out = validate_username(Some(""), 4);
    assert_eq!(out.errors, vec!["Row 5: Username must be a non-empty string"]);
}

#[test]
fn long_browser_info_is_truncated_with_warning() {
    let raw = "x".repeat(250);
    let out = validate_browser_info(Some(&raw), 2);
    assert!(out.is_valid());
    assert_eq!(out.sanitized.unwrap().len(), 200);
    assert_eq!(out.warnings, vec!["Row 3: Browser info truncated to 200 characters"]);
}

#[test]
fn truncation_counts_characters_not_bytes() {
    let raw = "é".repeat(60);
    let out = validate_order_id(Some(&raw), 0);
    assert_eq!(out.sanitized.unwrap().chars().count(), 50);
    assert_eq!(out.warnings.len(), 1);
}

// ── Enumerations ─────────────────────────────────────────────────

#[test]
fn hidden_type_is_case_normalized() {
    let out = validate_hidden_type(Some(" Details "), 0);
    assert_eq!(out.sanitized, Some(HiddenType::Details));
    assert!(out.errors.is_empty());
}

#[test]
fn unknown_hidden_type_names_value_then_allowed_set() {
    let out = validate_hidden_type(Some("Summary"), 0);
    assert!(!out.is_valid());
    assert_eq!(
        out.errors,
        vec![r#"Row 1: Invalid hidden type "summary". Allowed values: details"#]
    );
    assert!(out.warnings.is_empty());
}

#[test]
fn action_type_accepts_both_members() {
    assert_eq!(validate_action_type(Some("HIDE"), 0).sanitized, Some(ActionType::Hide));
    assert_eq!(validate_action_type(Some("unhide"), 0).sanitized, Some(ActionType::Unhide));
}

#[test]
fn action_type_is_checked_before_clamping() {
    let out = validate_action_type(Some("hide-everything-now"), 0);
    assert!(!out.is_valid());
    assert_eq!(
        out.errors,
        vec![r#"Row 1: Invalid action type "hide-everything-now". Allowed values: hide, unhide"#]
    );
    assert!(out.warnings.is_empty());
}

#[test]
fn blank_action_type_is_a_presence_error() {
    let out = validate_action_type(None, 1);
    assert_eq!(out.errors, vec!["Row 2: Action type must be a non-empty string"]);
}

// ── Tags ─────────────────────────────────────────────────────────

#[test]
fn tags_are_optional() {
    for raw in [None, Some(""), Some("  ")] {
        let out = validate_tags(raw, 0);
        assert!(out.is_valid());
        assert_eq!(out.sanitized, Some(Vec::new()));
    }
}

#[test]
fn tags_are_split_and_trimmed() {
    let out = validate_tags(Some("electronics, gadgets,, "), 0);
    assert_eq!(out.sanitized.unwrap(), vec!["electronics", "gadgets"]);
    assert!(out.warnings.is_empty());
}

#[test]
fn too_many_tags_are_dropped_with_one_warning() {
    let raw = (0..25).map(|i| format!("t{i}")).collect::<Vec<_>>().join(",");
    let out = validate_tags(Some(&raw), 0);
    let tags = out.sanitized.unwrap();
    assert_eq!(tags.len(), MAX_TAGS);
    assert_eq!(tags.last().map(String::as_str), Some("t19"));
    assert_eq!(out.warnings, vec!["Row 1: Too many tags (25), keeping the first 20"]);
}

#[test]
fn each_long_tag_is_truncated_independently() {
    let long = "a".repeat(60);
    let raw = format!("{long}, short, {long}");
    let out = validate_tags(Some(&raw), 0);
    let tags = out.sanitized.unwrap();
    assert_eq!(tags[0].len(), MAX_TAG_LEN);
    assert_eq!(tags[1], "short");
    assert_eq!(tags[2].len(), MAX_TAG_LEN);
    assert_eq!(out.warnings.len(), 2);
    assert!(out.errors.is_empty());
}

// ── Dates & timestamps ───────────────────────────────────────────

#[test]
fn date_is_normalized_to_iso() {
    let out = validate_date(Some("2024-01-15"), 0, &now());
    assert_eq!(out.sanitized.unwrap().to_iso_string(), "2024-01-15T00:00:00.000Z");
    assert!(out.warnings.is_empty());
}

#[test]
fn unparseable_timestamp_echoes_literal() {
    let out = validate_timestamp(Some("last tuesday"), 0, &now());
    assert!(!out.is_valid());
    assert_eq!(out.errors, vec![r#"Row 1: Invalid timestamp "last tuesday""#]);
}

#[test]
fn missing_date_is_an_error() {
    let out = validate_date(None, 0, &now());
    assert_eq!(out.errors, vec!["Row 1: Order date must be a non-empty string"]);
}

#[test]
fn implausible_date_is_only_a_warning() {
    let out = validate_date(Some("1901-03-01"), 0, &now());
    assert!(out.is_valid());
    assert_eq!(
        out.warnings,
        vec!["Row 1: Order date 1901-03-01T00:00:00.000Z is more than 50 years from now"]
    );
}

#[test]
fn timestamp_horizon_is_tighter_than_date_horizon() {
    let ts = validate_timestamp(Some("2005-01-01T00:00:00Z"), 0, &now());
    assert!(ts.is_valid());
    assert_eq!(ts.warnings.len(), 1);

    let date = validate_date(Some("2005-01-01"), 0, &now());
    assert!(date.warnings.is_empty());
}
