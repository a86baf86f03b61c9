use ordersheet_transform::{Transformer, DEFAULT_MAX_RECOVERY_ATTEMPTS, UNKNOWN_USER};
use ordersheet_types::{ActionType, HiddenType, IsoTimestamp, RawRow, SheetsData};
use pretty_assertions::assert_eq;

fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|c| c.to_string()).collect()
}

fn broken_sheets() -> SheetsData {
    SheetsData {
        hidden_orders: Some(vec![
            row(&["A1", "2024-01-15"]),
            row(&["", "2024-01-15"]),
            row(&["A3"]),
        ]),
        action_log: Some(vec![row(&["archive", "A1"]), row(&["unhide", "A2", "jane"])]),
        user_settings: None,
    }
}

// ── Bound ────────────────────────────────────────────────────────

#[test]
fn recovery_is_bounded_to_three_attempts() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut transformer = Transformer::new();
    let data = broken_sheets();
    let errors = vec!["Row 1: Expected at least 6 columns, got 2".to_string()];

    for attempt in 1..=DEFAULT_MAX_RECOVERY_ATTEMPTS {
        let recovered = transformer.attempt_recovery(&data, &errors).unwrap();
        assert!(recovered.meta.recovered);
        assert_eq!(recovered.meta.recovery_attempt, attempt);
    }
    assert!(transformer.attempt_recovery(&data, &errors).is_none());
    assert_eq!(transformer.recovery_attempts(), 3);
}

#[test]
fn custom_bound_and_reset() {
    let mut transformer = Transformer::with_max_recovery_attempts(1);
    let data = broken_sheets();

    assert!(transformer.attempt_recovery(&data, &[]).is_some());
    assert!(transformer.attempt_recovery(&data, &[]).is_none());

    transformer.reset_recovery();
    assert_eq!(transformer.recovery_attempts(), 0);
    assert!(transformer.attempt_recovery(&data, &[]).is_some());
}

#[test]
fn zero_bound_never_recovers() {
    let mut transformer = Transformer::with_max_recovery_attempts(0);
    assert!(transformer.attempt_recovery(&broken_sheets(), &[]).is_none());
}

// ── Lenient parsing ──────────────────────────────────────────────

#[test]
fn recovery_keeps_supplied_kinds_only() {
    let mut transformer = Transformer::new();
    let recovered = transformer.attempt_recovery(&broken_sheets(), &[]).unwrap();

    assert_eq!(recovered.hidden_orders.as_ref().map(Vec::len), Some(1));
    assert_eq!(recovered.action_log.as_ref().map(Vec::len), Some(2));
    assert_eq!(recovered.user_settings, None);
    assert_eq!(recovered.record_count(), 3);
}

#[test]
fn hidden_order_recovery_defaults_missing_cells() {
    let before = IsoTimestamp::now();
    let records = Transformer::new().recover_hidden_orders(&[row(&["A1", "2024-01-15"])]);

    let record = &records[0];
    assert_eq!(record.order_id, "A1");
    assert_eq!(record.order_date.map(|d| d.to_iso_string()), Some("2024-01-15T00:00:00.000Z".into()));
    assert_eq!(record.hidden_by, UNKNOWN_USER);
    assert_eq!(record.hidden_type, HiddenType::Details);
    assert!(record.hidden_at >= before);
}

#[test]
fn hidden_order_recovery_forces_details_type() {
    let records = Transformer::new().recover_hidden_orders(&[row(&[
        "A1", "", "john", "", "summary", "2024-01-15T10:30:00Z",
    ])]);
    assert_eq!(records[0].hidden_type, HiddenType::Details);
    assert_eq!(records[0].hidden_by, "john");
}

#[test]
fn hidden_order_recovery_clamps_instead_of_rejecting() {
    let long_id = "7".repeat(80);
    let records = Transformer::new().recover_hidden_orders(&[row(&[&long_id, "bad date"])]);
    assert_eq!(records[0].order_id.len(), 50);
    assert_eq!(records[0].order_date, None);
}

#[test]
fn invalid_action_recovers_as_hide() {
    let records = Transformer::new().recover_action_log(&[
        row(&["archive", "A1"]),
        row(&["unhide", "A2", "jane", "2024-03-01T08:00:00Z"]),
    ]);
    assert_eq!(records[0].action, ActionType::Hide);
    assert_eq!(records[0].performed_by, UNKNOWN_USER);
    assert_eq!(records[1].action, ActionType::Unhide);
    assert_eq!(records[1].timestamp.to_iso_string(), "2024-03-01T08:00:00.000Z");
}

#[test]
fn user_settings_recovery_needs_username() {
    let records = Transformer::new().recover_user_settings(&[row(&[""]), row(&["john", "garbage"])]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username, "john");
}
