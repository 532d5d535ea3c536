use super::entry::{EvalFailure, WatchEntry};
use super::row::{Row, ValueStyle};
use crate::constants::{VALUE_DISPLAY_LIMIT, VALUE_TRUNCATION_MARKER};

#[test]
fn value_style_classifies_error_kinds() {
    assert_eq!(ValueStyle::classify(None), ValueStyle::Normal);
    assert_eq!(ValueStyle::classify(Some("NameError")), ValueStyle::Inert);
    assert_eq!(ValueStyle::classify(Some("UnboundLocalError")), ValueStyle::Inert);
    assert_eq!(ValueStyle::classify(Some("SyntaxError")), ValueStyle::Invalid);
    assert_eq!(ValueStyle::classify(Some("ZeroDivisionError")), ValueStyle::Attention);
}

#[test]
fn failed_row_shows_kind_tag_and_message_tooltip() {
    let mut row = Row::new(Some("1/0".to_string()));
    row.apply_entry(WatchEntry::failed("1/0", "division by zero", "ZeroDivisionError"));

    assert_eq!(row.display_text(), "<ZeroDivisionError>");
    assert_eq!(row.tooltip(), "division by zero");
    assert_eq!(row.style(), ValueStyle::Attention);
    assert!(row.changed);
}

#[test]
fn apply_entry_marks_changed_only_when_display_text_differs() {
    let mut row = Row::new(Some("a".to_string()));
    row.apply_entry(WatchEntry::ok("a", "1"));
    assert!(row.changed);

    row.apply_entry(WatchEntry::ok("a", "1"));
    assert!(!row.changed);

    row.apply_entry(WatchEntry::failed("a", "first", "NameError"));
    assert!(row.changed);
    // Same tag, different message: the visible text is unchanged.
    row.apply_entry(WatchEntry::failed("a", "second", "NameError"));
    assert!(!row.changed);
    assert_eq!(row.tooltip(), "second");
}

#[test]
fn clear_value_keeps_expression() {
    let mut row = Row::new(Some("a".to_string()));
    row.apply_entry(WatchEntry::failed("a", "oops", "NameError"));
    row.clear_value();

    assert_eq!(row.expression, "a");
    assert_eq!(row.display_text(), "");
    assert_eq!(row.tooltip(), "");
    assert_eq!(row.style(), ValueStyle::Normal);
}

#[test]
fn entries_convert_between_outcomes_and_tuples() {
    let long = "9".repeat(VALUE_DISPLAY_LIMIT + 1);
    let entry = WatchEntry::from_outcome("big", Ok(long));
    assert!(entry.value.ends_with(VALUE_TRUNCATION_MARKER));

    let failure = EvalFailure::new("NameError", "name 'q' is not defined");
    let entry = WatchEntry::from_outcome("q", Err(failure.clone()));
    assert_eq!(entry, WatchEntry::from(("q", "name 'q' is not defined", Some("NameError"))));
    assert_eq!(entry.outcome(), Err(failure));
}

#[test]
fn row_ids_are_unique() {
    let a = Row::new(None);
    let b = Row::new(None);
    assert_ne!(a.id, b.id);
    assert!(a.is_pending());
}
