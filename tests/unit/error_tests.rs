//! Unit tests for `PlotError` display format and error behavior.

use plotpipe::PlotError;

#[test]
fn no_session_display_starts_with_prefix() {
    let err = PlotError::NoSession("probe first".into());
    assert!(err.to_string().starts_with("no session:"));
}

#[test]
fn probe_hung_display_includes_message() {
    let err = PlotError::ProbeHung("timed out waiting for version string".into());
    assert_eq!(
        err.to_string(),
        "probe hung: timed out waiting for version string"
    );
}

#[test]
fn error_message_no_trailing_period() {
    let err = PlotError::Discovery("whereis produced no output".into());
    let s = err.to_string();
    assert!(
        !s.ends_with('.'),
        "error message must not end with a period: {s}"
    );
}

#[test]
fn variants_with_same_message_are_distinct() {
    let query = PlotError::Query("write failed".into());
    let engine = PlotError::Engine("write failed".into());
    assert_ne!(query.to_string(), engine.to_string());
    assert!(query.to_string().starts_with("query:"));
    assert!(engine.to_string().starts_with("engine:"));
}

#[test]
fn invalid_command_is_distinct_from_config() {
    let invalid = PlotError::InvalidCommand("too short".into());
    let config = PlotError::Config("too short".into());
    assert_ne!(invalid.to_string(), config.to_string());
}

#[test]
fn error_implements_std_error_trait() {
    let err = PlotError::Io("broken pipe".into());
    let display = format!("{err}");
    let debug = format!("{err:?}");
    assert!(!display.is_empty());
    assert!(!debug.is_empty());
}

#[test]
fn debug_representation_names_the_variant() {
    let err = PlotError::ProbeHung("read timeout".into());
    let debug = format!("{err:?}");
    assert!(debug.contains("ProbeHung"));
    assert!(debug.contains("read timeout"));
}
